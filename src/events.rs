use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::App;

/// Poll for events with a timeout
pub fn poll_event(timeout: Duration) -> Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Handle a key event
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    // Windows reports both press and release
    if key.kind == KeyEventKind::Release {
        return;
    }

    // Quit accelerators work everywhere, including over the help overlay
    if key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('q') | KeyCode::Char('c'))
    {
        app.quit();
        return;
    }

    // If help is shown, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    match key.code {
        KeyCode::Char('q') => app.quit(),

        // Start/stop toggle
        KeyCode::Char(' ') | KeyCode::Char('s') | KeyCode::Enter => app.toggle_sampling(),

        // Interval selector
        KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Right | KeyCode::Char('l') => {
            app.increase_interval()
        }
        KeyCode::Char('-') | KeyCode::Left | KeyCode::Char('h') => app.decrease_interval(),

        KeyCode::Char('?') => app.toggle_help(),

        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::tests::ScriptedSampler;
    use crate::controller::{shared, Controller, Interval, RunState};
    use crate::data::History;
    use crate::recorder::Recorder;
    use crate::ui::Theme;
    use tokio::runtime::Handle;

    fn press(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
        handle_key_event(app, KeyEvent::new(code, modifiers));
    }

    fn test_app() -> App {
        let controller = Controller::new(
            shared(ScriptedSampler::new(Vec::new())),
            Handle::current(),
            Interval::default(),
        );
        App::new(controller, History::new(), Recorder::new("unused.db"), Theme::dark())
    }

    #[tokio::test]
    async fn test_space_toggles_sampling() {
        let mut app = test_app();
        press(&mut app, KeyCode::Char(' '), KeyModifiers::NONE);
        assert_eq!(app.state(), RunState::Running);
        press(&mut app, KeyCode::Char(' '), KeyModifiers::NONE);
        assert_eq!(app.state(), RunState::Idle);
    }

    #[tokio::test]
    async fn test_interval_keys_clamp() {
        let mut app = test_app();
        for _ in 0..15 {
            press(&mut app, KeyCode::Char('+'), KeyModifiers::NONE);
        }
        assert_eq!(app.controller().interval().secs(), 10);
        for _ in 0..15 {
            press(&mut app, KeyCode::Left, KeyModifiers::NONE);
        }
        assert_eq!(app.controller().interval().secs(), 1);
    }

    #[tokio::test]
    async fn test_ctrl_q_quits_over_help() {
        let mut app = test_app();
        press(&mut app, KeyCode::Char('?'), KeyModifiers::NONE);
        assert!(app.show_help);
        press(&mut app, KeyCode::Char('q'), KeyModifiers::CONTROL);
        assert!(!app.running);
    }

    #[tokio::test]
    async fn test_any_key_closes_help() {
        let mut app = test_app();
        press(&mut app, KeyCode::Char('?'), KeyModifiers::NONE);
        press(&mut app, KeyCode::Char('x'), KeyModifiers::NONE);
        assert!(!app.show_help);
        assert!(app.running);
    }
}
