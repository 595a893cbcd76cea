//! Startup wiring between the command line, the loader and the state.
//!
//! Everything here runs before the terminal is touched, so any failure can
//! still be reported on stderr.

use crate::config::ResolvedConfig;
use crate::model::StartupError;
use crate::source::{estimate_total, load_initial};
use crate::state::AppState;
use std::path::PathBuf;
use tracing::{info, warn};

/// What the user asked for on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StartupOptions {
    pub path: PathBuf,
    /// Filters to install, in order.
    pub filters: Vec<String>,
    /// View transform to install.
    pub view: Option<String>,
}

/// Read the first chunk and build the initial application state.
///
/// # Errors
///
/// Fails if the file cannot be opened or read, or any filter or view
/// expression does not compile. Nothing is shown in that case.
pub fn prepare(options: &StartupOptions, config: &ResolvedConfig) -> Result<AppState, StartupError> {
    let initial = load_initial(&options.path, config.initial_chunk_size)?;
    let mut state = AppState::new(options.path.clone(), initial, config.load_policy());

    for expression in &options.filters {
        state
            .add_filter(expression)
            .map_err(|source| StartupError::InvalidFilter {
                expression: expression.clone(),
                source,
            })?;
    }

    if let Some(expression) = &options.view {
        state
            .set_view(expression)
            .map_err(|source| StartupError::InvalidView {
                expression: expression.clone(),
                source,
            })?;
    }

    if !state.is_fully_loaded() {
        match estimate_total(&options.path, config.estimate_sample_size) {
            Ok(estimate) => state.set_estimated_total(estimate),
            Err(e) => warn!(error = %e, "Could not estimate line count"),
        }
    }

    if config.tail {
        state.enable_tail_follow();
    }

    info!(
        path = %options.path.display(),
        loaded = state.store().len(),
        fully_loaded = state.is_fully_loaded(),
        filters = options.filters.len(),
        "Initial load complete"
    );

    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::InputError;
    use crate::test_harness::{numbered_jsonl, TempLog};

    fn options(log: &TempLog) -> StartupOptions {
        StartupOptions {
            path: log.path().to_path_buf(),
            ..StartupOptions::default()
        }
    }

    #[test]
    fn missing_file_is_reported_before_anything_is_shown() {
        let opts = StartupOptions {
            path: PathBuf::from("/nonexistent/sift/input.jsonl"),
            ..StartupOptions::default()
        };
        let err = prepare(&opts, &ResolvedConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            StartupError::Input(InputError::FileNotFound { .. })
        ));
    }

    #[test]
    fn command_line_filters_are_installed_in_order() {
        let log = TempLog::new("startup-filters.jsonl", &numbered_jsonl(9));
        let opts = StartupOptions {
            filters: vec![".n > 2".to_string(), r#".level == "error""#.to_string()],
            ..options(&log)
        };

        let state = prepare(&opts, &ResolvedConfig::default()).unwrap();

        let sources: Vec<&str> = state.filters().filters().iter().map(|f| f.source()).collect();
        assert_eq!(sources, vec![".n > 2", r#".level == "error""#]);
        let visible: Vec<usize> = state.visible().iter().map(|n| n.get()).collect();
        assert_eq!(visible, vec![3, 6, 9]);
    }

    #[test]
    fn invalid_filter_names_the_expression() {
        let log = TempLog::new("startup-bad-filter.jsonl", &numbered_jsonl(1));
        let opts = StartupOptions {
            filters: vec![".level ==".to_string()],
            ..options(&log)
        };

        let err = prepare(&opts, &ResolvedConfig::default()).unwrap_err();

        match err {
            StartupError::InvalidFilter { expression, .. } => assert_eq!(expression, ".level =="),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn invalid_view_is_fatal() {
        let log = TempLog::new("startup-bad-view.jsonl", &numbered_jsonl(1));
        let opts = StartupOptions {
            view: Some("{".to_string()),
            ..options(&log)
        };

        let err = prepare(&opts, &ResolvedConfig::default()).unwrap_err();

        assert!(matches!(err, StartupError::InvalidView { .. }));
    }

    #[test]
    fn large_file_gets_an_estimate() {
        let log = TempLog::new("startup-estimate.jsonl", &numbered_jsonl(300));
        let config = ResolvedConfig {
            initial_chunk_size: 50,
            ..ResolvedConfig::default()
        };

        let state = prepare(&options(&log), &config).unwrap();

        assert!(!state.is_fully_loaded());
        let estimate = state.estimated_total();
        assert!((285..=315).contains(&estimate), "estimate {estimate}");
    }

    #[test]
    fn tail_from_config_enables_follow() {
        let log = TempLog::new("startup-tail.jsonl", &numbered_jsonl(3));
        let config = ResolvedConfig {
            tail: true,
            ..ResolvedConfig::default()
        };

        let state = prepare(&options(&log), &config).unwrap();

        assert!(state.is_tail_follow());
    }
}
