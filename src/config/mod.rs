//! Configuration: TOML file, environment and CLI precedence, key bindings.

pub mod keybindings;
pub mod loader;

pub use keybindings::KeyBindings;
pub use loader::{
    apply_cli_overrides, apply_env_overrides, default_config_path, default_log_path,
    load_config_file, load_config_with_precedence, merge_config, ConfigError, ConfigFile,
    ResolvedConfig, DEFAULT_THEME,
};

use crate::state::LoadPolicy;

impl ResolvedConfig {
    /// Chunk sizes and thresholds handed to the application state.
    pub fn load_policy(&self) -> LoadPolicy {
        LoadPolicy {
            load_more_chunk: self.load_more_chunk_size,
            load_to_end_batch: self.load_to_end_batch_size,
            trigger_threshold: self.load_trigger_threshold,
        }
    }
}
