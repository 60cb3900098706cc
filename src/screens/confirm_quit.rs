use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Margin, Rect},
    prelude::Frame,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::app::{AppCtx, ScreenWidget, Transition};
use crate::ui::layout::centered_rect_abs;
use crate::ui::style;

const MESSAGE: &str = "Quit the wireless calculator?";
const STAY_LABEL: &str = "Stay";
const QUIT_LABEL: &str = "Quit";

pub struct ConfirmQuitScreen {
    quit_selected: bool,
}

impl ConfirmQuitScreen {
    pub fn new() -> Self {
        Self { quit_selected: false }
    }
}

impl Default for ConfirmQuitScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl ScreenWidget for ConfirmQuitScreen {
    fn title(&self) -> &str {
        ""
    }

    fn draw(&self, f: &mut Frame<'_>, size: Rect, ctx: &AppCtx) {
        // "< " + label + " >"
        let btn_len = |label: &str| 4 + label.len();
        let buttons_len = btn_len(STAY_LABEL) + 3 + btn_len(QUIT_LABEL);

        let mut lines = vec![MESSAGE.to_string()];
        let pending = crate::scenario::Scenario::ALL
            .iter()
            .filter(|s| ctx.controller.is_submitting(**s))
            .count();
        if pending > 0 {
            lines.push(format!("{pending} calculation(s) still running will be dropped."));
        }

        let inner_width = lines.iter().map(String::len).max().unwrap_or(0).max(buttons_len).max(36) as u16;
        let inner_height = lines.len() as u16 + 3;
        let area = centered_rect_abs(inner_width + 4, inner_height + 3, size);
        let inner = area.inner(&Margin { horizontal: 2, vertical: 1 });

        let mut constraints = vec![Constraint::Length(1); lines.len() + 3];
        constraints.push(Constraint::Min(0));
        let vchunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(inner);

        let mut btn_spans = Vec::new();
        btn_spans.extend(style::button_spans(STAY_LABEL, !self.quit_selected));
        btn_spans.push(Span::raw("   "));
        btn_spans.extend(style::button_spans(QUIT_LABEL, self.quit_selected));

        f.render_widget(Clear, area);
        f.render_widget(Block::default().borders(Borders::ALL).title(self.title()), area);
        for (i, l) in lines.iter().enumerate() {
            let p = Paragraph::new(Line::from(l.as_str())).alignment(Alignment::Center);
            f.render_widget(p, vchunks[i + 1]);
        }
        let buttons = Paragraph::new(Line::from(btn_spans)).alignment(Alignment::Center);
        f.render_widget(buttons, vchunks[lines.len() + 2]);
    }

    fn on_key(&mut self, k: KeyEvent, _ctx: &mut AppCtx) -> Result<Transition> {
        match k.code {
            KeyCode::Esc => return Ok(Transition::Pop),
            KeyCode::Left | KeyCode::Right | KeyCode::Tab | KeyCode::Char(' ') => {
                self.quit_selected = !self.quit_selected;
            }
            KeyCode::Char('y' | 'Y') => return Ok(Transition::Quit),
            KeyCode::Char('n' | 'N') => return Ok(Transition::Pop),
            KeyCode::Enter => {
                return Ok(if self.quit_selected { Transition::Quit } else { Transition::Pop });
            }
            _ => {}
        }
        Ok(Transition::Stay)
    }
}
