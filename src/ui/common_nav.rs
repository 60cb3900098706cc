use crossterm::event::{KeyCode, KeyEvent};
use crate::app::Transition;

/// Esc or Enter closes a read-only overlay.
pub fn close_overlay(k: KeyEvent) -> Option<Transition> {
    match k.code {
        KeyCode::Esc | KeyCode::Enter => Some(Transition::Pop),
        _ => None,
    }
}
