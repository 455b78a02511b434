use crate::application::App;
use crate::domain::PrimaryFilter;
use crossterm::event::{KeyCode, KeyModifiers};

pub struct InputHandler;

impl InputHandler {
    pub fn handle_key_event(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
        if modifiers.contains(KeyModifiers::CONTROL) {
            if let KeyCode::Char('c') = key {
                app.quit();
            }
            return;
        }

        match key {
            KeyCode::Char('q') | KeyCode::Esc => app.quit(),
            KeyCode::Tab | KeyCode::BackTab => app.toggle_focus(),
            KeyCode::Right | KeyCode::Down | KeyCode::Char('l') | KeyCode::Char('j') => {
                app.next_option()
            }
            KeyCode::Left | KeyCode::Up | KeyCode::Char('h') | KeyCode::Char('k') => {
                app.previous_option()
            }
            KeyCode::Char('1') => app.select_filter(PrimaryFilter::All),
            KeyCode::Char('2') => app.select_filter(PrimaryFilter::Government),
            KeyCode::Char('3') => app.select_filter(PrimaryFilter::NonGovernment),
            KeyCode::Char('g') => app.toggle_gsi(),
            _ => {}
        }
    }
}
