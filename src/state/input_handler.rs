//! Key handling for the modes that bypass the Normal-mode key bindings.
//!
//! Text entry, the filter manager and the overlays each own a small fixed
//! key map. These functions only translate keys into `AppState` calls.

use crate::state::app_state::AppState;
use crate::state::mode::Mode;
use crate::state::text_input::InputOutcome;
use crossterm::event::{KeyCode, KeyEvent};

/// Keys while typing a filter, an edited filter or a view expression.
pub fn handle_entry_key(app: &mut AppState, key: KeyEvent) {
    let Some(input) = app.mode_mut().input_mut() else {
        return;
    };
    match input.handle_key(key) {
        InputOutcome::Editing => {}
        InputOutcome::Submit => app.submit_entry(),
        InputOutcome::Cancel => app.cancel_entry(),
    }
}

/// Keys in the filter manager.
pub fn handle_manage_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => app.manage_move(-1),
        KeyCode::Down | KeyCode::Char('j') => app.manage_move(1),
        KeyCode::Enter | KeyCode::Char(' ') => app.manage_toggle(),
        KeyCode::Char('d') | KeyCode::Char('x') => app.manage_delete(),
        KeyCode::Char('e') => app.manage_edit(),
        KeyCode::Esc | KeyCode::Char('F') => app.set_mode(Mode::Normal),
        _ => {}
    }
}

/// Keys in the detail and help overlays.
///
/// `content_lines` is the rendered height of the overlay content, which
/// bounds scrolling.
pub fn handle_overlay_key(app: &mut AppState, key: KeyEvent, content_lines: usize) {
    let page = isize::try_from(app.page_height()).unwrap_or(isize::MAX);
    let is_help = matches!(app.mode(), Mode::Help);
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => app.scroll_overlay(-1, content_lines),
        KeyCode::Down | KeyCode::Char('j') => app.scroll_overlay(1, content_lines),
        KeyCode::PageUp => app.scroll_overlay(-page, content_lines),
        KeyCode::PageDown => app.scroll_overlay(page, content_lines),
        KeyCode::Char('q') => app.quit(),
        KeyCode::Esc => app.set_mode(Mode::Normal),
        KeyCode::Enter | KeyCode::Char(' ') if !is_help => app.set_mode(Mode::Normal),
        KeyCode::Char('h') | KeyCode::Char('?') if is_help => app.set_mode(Mode::Normal),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LineNumber;
    use crate::source::load_initial;
    use crate::state::app_state::LoadPolicy;
    use crate::test_harness::{numbered_jsonl, TempLog};
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app_with(log: &TempLog) -> AppState {
        let initial = load_initial(log.path(), 100).unwrap();
        let mut app = AppState::new(log.path(), initial, LoadPolicy::default());
        app.resize(80, 6);
        app
    }

    fn type_into(app: &mut AppState, text: &str) {
        for ch in text.chars() {
            handle_entry_key(app, key(KeyCode::Char(ch)));
        }
    }

    #[test]
    fn typed_filter_is_added_on_enter() {
        let log = TempLog::new("input-filter.jsonl", &numbered_jsonl(6));
        let mut app = app_with(&log);
        app.set_mode(Mode::FilterEntry(Default::default()));

        type_into(&mut app, ".n > 4");
        handle_entry_key(&mut app, key(KeyCode::Enter));

        assert_eq!(app.mode(), &Mode::Normal);
        assert_eq!(app.filters().len(), 1);
        assert_eq!(app.visible().len(), 2);
    }

    #[test]
    fn escape_discards_typed_filter() {
        let log = TempLog::new("input-cancel.jsonl", &numbered_jsonl(3));
        let mut app = app_with(&log);
        app.set_mode(Mode::FilterEntry(Default::default()));

        type_into(&mut app, ".n > 1");
        handle_entry_key(&mut app, key(KeyCode::Esc));

        assert_eq!(app.mode(), &Mode::Normal);
        assert!(app.filters().is_empty());
    }

    #[test]
    fn empty_view_entry_clears_transform() {
        let log = TempLog::new("input-view.jsonl", &numbered_jsonl(1));
        let mut app = app_with(&log);
        app.set_view(".level").unwrap();
        app.set_mode(Mode::ViewEntry(Default::default()));

        handle_entry_key(&mut app, key(KeyCode::Enter));

        assert!(!app.transform().is_active());
    }

    #[test]
    fn manager_navigates_toggles_and_exits() {
        let log = TempLog::new("input-manage.jsonl", &numbered_jsonl(4));
        let mut app = app_with(&log);
        app.add_filter(".n > 1").unwrap();
        app.add_filter(".n > 2").unwrap();
        app.set_mode(Mode::FilterManage { cursor: 0 });

        handle_manage_key(&mut app, key(KeyCode::Char('j')));
        handle_manage_key(&mut app, key(KeyCode::Down));
        assert_eq!(app.mode(), &Mode::FilterManage { cursor: 1 });

        handle_manage_key(&mut app, key(KeyCode::Char(' ')));
        assert!(!app.filters().filters()[1].is_enabled());
        assert_eq!(app.visible().len(), 3);

        handle_manage_key(&mut app, key(KeyCode::Char('F')));
        assert_eq!(app.mode(), &Mode::Normal);
    }

    #[test]
    fn manager_edit_key_opens_editor() {
        let log = TempLog::new("input-manage-edit.jsonl", &numbered_jsonl(2));
        let mut app = app_with(&log);
        app.add_filter(".n > 1").unwrap();
        app.set_mode(Mode::FilterManage { cursor: 0 });

        handle_manage_key(&mut app, key(KeyCode::Char('e')));
        handle_entry_key(&mut app, key(KeyCode::Esc));

        assert_eq!(app.mode(), &Mode::FilterManage { cursor: 0 });
    }

    #[test]
    fn manager_delete_key_removes_filter() {
        let log = TempLog::new("input-manage-delete.jsonl", &numbered_jsonl(2));
        let mut app = app_with(&log);
        app.add_filter(".n > 1").unwrap();
        app.set_mode(Mode::FilterManage { cursor: 0 });

        handle_manage_key(&mut app, key(KeyCode::Char('x')));

        assert!(app.filters().is_empty());
        assert_eq!(app.visible().len(), 2);
    }

    #[test]
    fn detail_scrolls_and_closes() {
        let log = TempLog::new("input-detail.jsonl", &numbered_jsonl(1));
        let mut app = app_with(&log);
        app.set_mode(Mode::Detail {
            line: LineNumber::FIRST,
        });

        // 5 list rows, 12 content lines: at most 7 rows of scroll.
        handle_overlay_key(&mut app, key(KeyCode::PageDown), 12);
        handle_overlay_key(&mut app, key(KeyCode::PageDown), 12);
        assert_eq!(app.view().overlay_scroll(), 7);
        handle_overlay_key(&mut app, key(KeyCode::Up), 12);
        assert_eq!(app.view().overlay_scroll(), 6);

        handle_overlay_key(&mut app, key(KeyCode::Char(' ')), 12);
        assert_eq!(app.mode(), &Mode::Normal);
    }

    #[test]
    fn help_closes_on_h_but_ignores_enter() {
        let log = TempLog::new("input-help.jsonl", "");
        let mut app = app_with(&log);
        app.set_mode(Mode::Help);

        handle_overlay_key(&mut app, key(KeyCode::Enter), 30);
        assert_eq!(app.mode(), &Mode::Help);

        handle_overlay_key(&mut app, key(KeyCode::Char('h')), 30);
        assert_eq!(app.mode(), &Mode::Normal);
    }

    #[test]
    fn q_in_overlay_quits() {
        let log = TempLog::new("input-quit.jsonl", "");
        let mut app = app_with(&log);
        app.set_mode(Mode::Help);

        handle_overlay_key(&mut app, key(KeyCode::Char('q')), 30);

        assert!(app.should_quit());
    }
}
