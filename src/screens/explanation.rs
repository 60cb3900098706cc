use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    prelude::Frame,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::app::{AppCtx, ScreenWidget, Transition};
use crate::ui::common_nav::close_overlay;
use crate::ui::help::help_explanation;
use crate::ui::layout::centered_rect;

/// Full-screen reader for the service's explanation text.
pub struct ExplanationScreen {
    title: String,
    text: String,
    scroll: u16,
}

impl ExplanationScreen {
    pub fn new(title: String, text: String) -> Self {
        Self { title, text, scroll: 0 }
    }
}

impl ScreenWidget for ExplanationScreen {
    fn title(&self) -> &str { &self.title }

    fn draw(&self, f: &mut Frame<'_>, size: Rect, _ctx: &AppCtx) {
        let area = centered_rect(85, 85, size);
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(3)])
            .split(area);

        let block = Block::default().borders(Borders::ALL).title(format!(" {} ", self.title()));
        let body = Paragraph::new(self.text.as_str())
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((self.scroll, 0));

        f.render_widget(Clear, area);
        f.render_widget(body, chunks[0]);
        f.render_widget(
            Paragraph::new(help_explanation()).block(Block::default().borders(Borders::ALL)),
            chunks[1],
        );
    }

    fn on_key(&mut self, k: KeyEvent, _ctx: &mut AppCtx) -> Result<Transition> {
        if let Some(t) = close_overlay(k) {
            return Ok(t);
        }
        match k.code {
            KeyCode::Up => self.scroll = self.scroll.saturating_sub(1),
            KeyCode::Down => self.scroll = self.scroll.saturating_add(1),
            KeyCode::PageUp => self.scroll = self.scroll.saturating_sub(10),
            KeyCode::PageDown => self.scroll = self.scroll.saturating_add(10),
            KeyCode::Home => self.scroll = 0,
            _ => {}
        }
        Ok(Transition::Stay)
    }
}
