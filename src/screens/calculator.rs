use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::Rect,
    prelude::Frame,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs, Wrap},
};
use textwrap::wrap;

use crate::app::{AppCtx, ScreenWidget, Transition};
use crate::controller::{KeyDispatch, UiController};
use crate::format::format_label;
use crate::render::{PanelRenderer, ResultsRenderer};
use crate::scenario::{FieldSpec, Scenario};
use crate::screens::ExplanationScreen;
use crate::store::FileStore;
use crate::ui::components::{field_line_text, result_line, TextField};
use crate::ui::help::help_calculator;
use crate::ui::layout::{form_and_results, three_box_layout, Margins};
use crate::ui::style::{busy_line, button_spans, button_spans_disabled, error_line, tab_highlight};

type Controller = UiController<PanelRenderer, FileStore>;

pub struct CalculatorScreen {
    scenario: Scenario,
    // 0..n form fields, n = Calculate, n+1 = View Explanation
    focus: usize,
    editor: TextField,
}

impl CalculatorScreen {
    pub fn new(ctl: &Controller) -> Self {
        let mut s = Self { scenario: ctl.active(), focus: 0, editor: TextField::default() };
        s.load_editor(ctl);
        s
    }

    fn submit_idx(&self) -> usize { self.scenario.fields().len() }
    fn explain_idx(&self) -> usize { self.submit_idx() + 1 }
    fn positions(&self) -> usize { self.submit_idx() + 2 }
    fn on_button(&self) -> bool { self.focus >= self.submit_idx() }

    /// Line of the form the focus sits on; both buttons share the row after the spacer.
    fn focus_row(&self) -> usize {
        if self.on_button() { self.submit_idx() + 1 } else { self.focus }
    }

    /// Scroll offset that keeps the focused line inside a pane `height` lines tall.
    fn form_scroll(&self, height: u16) -> u16 {
        (self.focus_row() as u16).saturating_sub(height.saturating_sub(1))
    }

    fn focused_field(&self) -> Option<&'static FieldSpec> {
        self.scenario.fields().get(self.focus)
    }

    fn load_editor(&mut self, ctl: &Controller) {
        self.editor = self
            .focused_field()
            .map(|f| TextField::with(ctl.field(f.name)))
            .unwrap_or_default();
    }

    fn reset_for(&mut self, scenario: Scenario, ctl: &Controller) {
        self.scenario = scenario;
        self.focus = 0;
        self.load_editor(ctl);
    }

    fn move_focus(&mut self, forward: bool, ctl: &Controller) {
        let n = self.positions();
        self.focus = if forward { (self.focus + 1) % n } else { (self.focus + n - 1) % n };
        self.load_editor(ctl);
    }

    /// Apply an edit to the focused field and write it through.
    fn edit(&mut self, ctl: &mut Controller, f: impl FnOnce(&mut TextField)) {
        let Some(spec) = self.focused_field() else { return };
        f(&mut self.editor);
        ctl.set_field(spec.name, &self.editor.text);
    }

    fn form_lines(&self, ctl: &Controller) -> Vec<Line<'static>> {
        let mut lines: Vec<Line> = Vec::new();
        for (i, spec) in self.scenario.fields().iter().enumerate() {
            let mut label = format_label(spec.name);
            if spec.required {
                label.push('*');
            }
            let line = if i == self.focus {
                field_line_text(&label, &self.editor, true)
            } else {
                field_line_text(&label, &TextField::with(ctl.field(spec.name)), false)
            };
            lines.push(line);
        }
        lines.push(Line::from(""));

        let mut spans: Vec<Span<'static>> = Vec::new();
        if ctl.is_submitting(self.scenario) {
            spans.extend(button_spans_disabled("Calculate"));
        } else {
            spans.extend(button_spans("Calculate", self.focus == self.submit_idx()));
        }
        spans.push(Span::raw("   "));
        spans.extend(button_spans("View Explanation", self.focus == self.explain_idx()));
        lines.push(Line::from(spans));
        lines
    }

    fn results_lines(&self, ctl: &Controller, width: usize) -> Vec<Line<'static>> {
        let panel = ctl.renderer();
        let mut lines: Vec<Line> = Vec::new();

        for n in &panel.notifications {
            for part in n.message.lines() {
                lines.push(error_line(part));
            }
            lines.push(Line::from(""));
        }
        if ctl.is_submitting(self.scenario) {
            lines.push(busy_line());
            lines.push(Line::from(""));
        }

        if !panel.visible {
            if lines.is_empty() {
                lines.push(Line::from(Span::styled(
                    "No results yet. Fill in the form and press Enter.",
                    Style::default().fg(Color::DarkGray),
                )));
            }
            return lines;
        }

        for row in &panel.rows {
            lines.push(result_line(&row.label, &row.value, row.unit));
        }
        if !panel.explanation.is_empty() {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "Explanation",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )));
            for seg in wrap(&panel.explanation, width.max(10)) {
                lines.push(Line::from(seg.to_string()));
            }
        }
        lines
    }
}

impl ScreenWidget for CalculatorScreen {
    fn draw(&self, f: &mut Frame<'_>, size: Rect, ctx: &AppCtx) {
        let ctl = &ctx.controller;
        let regions = three_box_layout(
            size, 3, 4,
            Margins { page: 1, inner_top: 1, inner_middle: 0, inner_bottom: 2 },
        );

        // === TOP: scenario tabs ===
        let titles: Vec<Line> = Scenario::ALL
            .iter()
            .enumerate()
            .map(|(i, s)| Line::from(format!("{} {}", i + 1, s.title())))
            .collect();
        let tabs = Tabs::new(titles)
            .block(Block::default().borders(Borders::ALL).title(self.title()))
            .select(self.scenario.index())
            .highlight_style(tab_highlight());
        f.render_widget(tabs, regions.top);

        // === MIDDLE: form | results ===
        let (form_area, results_area) = form_and_results(regions.middle, 45);

        let form_block = Block::default().borders(Borders::ALL).title(format!(" {} ", self.scenario.title()));
        let form_inner = form_block.inner(form_area);
        f.render_widget(form_block, form_area);
        let form_lines = self.form_lines(ctl);
        let offset = self.form_scroll(form_inner.height);
        f.render_widget(Paragraph::new(form_lines).scroll((offset, 0)), form_inner);

        let results_block = Block::default().borders(Borders::ALL).title(" Results ");
        let results_inner = results_block.inner(results_area);
        f.render_widget(results_block, results_area);
        let lines = self.results_lines(ctl, results_inner.width as usize);
        f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), results_inner);

        // === BOTTOM: tooltip + legend ===
        f.render_widget(Block::default().borders(Borders::ALL), regions.bottom);
        let tip = self.focused_field().map(|s| s.tooltip).unwrap_or("");
        let footer = vec![
            Line::from(Span::styled(tip.to_string(), Style::default().fg(Color::Gray))),
            help_calculator(),
        ];
        f.render_widget(Paragraph::new(footer), regions.bottom_inner);
    }

    fn on_key(&mut self, k: KeyEvent, ctx: &mut AppCtx) -> Result<Transition> {
        if ctx.controller.active() != self.scenario {
            let active = ctx.controller.active();
            self.reset_for(active, &ctx.controller);
        }

        match ctx.controller.dispatch_key(k, self.on_button()) {
            KeyDispatch::Switched(s) => {
                self.reset_for(s, &ctx.controller);
                return Ok(Transition::Stay);
            }
            KeyDispatch::Handled => return Ok(Transition::Stay),
            KeyDispatch::Submit => {
                ctx.submit();
                return Ok(Transition::Stay);
            }
            KeyDispatch::Unhandled => {}
        }

        if k.code == KeyCode::Enter && self.focus == self.submit_idx() {
            ctx.submit();
            return Ok(Transition::Stay);
        }

        let ctl = &mut ctx.controller;
        match k.code {
            // Navigation
            KeyCode::Up | KeyCode::BackTab => self.move_focus(false, ctl),
            KeyCode::Down | KeyCode::Tab => self.move_focus(true, ctl),

            // Buttons
            KeyCode::Enter if self.focus == self.explain_idx() => {
                let text = ctl.renderer().explanation.clone();
                if text.is_empty() {
                    ctl.renderer_mut().show_error("No explanation to show yet");
                } else {
                    let title = format!("{} explanation", self.scenario.title());
                    return Ok(Transition::Push(Box::new(ExplanationScreen::new(title, text))));
                }
            }
            KeyCode::Left | KeyCode::Right if self.on_button() => {
                self.focus = if self.focus == self.submit_idx() { self.explain_idx() } else { self.submit_idx() };
            }

            // Cursor movement and editing
            KeyCode::Left => self.edit(ctl, TextField::move_left),
            KeyCode::Right => self.edit(ctl, TextField::move_right),
            KeyCode::Home => self.edit(ctl, TextField::home),
            KeyCode::End => self.edit(ctl, TextField::end),
            KeyCode::Backspace => self.edit(ctl, TextField::backspace),
            KeyCode::Delete => self.edit(ctl, TextField::delete),
            KeyCode::Char(c)
                if !k.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                self.edit(ctl, |t| t.insert_char(c))
            }

            _ => {}
        }
        Ok(Transition::Stay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn screen(scenario: Scenario, focus: usize) -> CalculatorScreen {
        CalculatorScreen { scenario, focus, editor: TextField::default() }
    }

    #[test]
    fn buttons_map_to_the_row_after_the_spacer() {
        let n = Scenario::LinkBudget.fields().len();
        assert_eq!(screen(Scenario::LinkBudget, 2).focus_row(), 2);
        assert_eq!(screen(Scenario::LinkBudget, n).focus_row(), n + 1);
        assert_eq!(screen(Scenario::LinkBudget, n + 1).focus_row(), n + 1);
    }

    #[test]
    fn focused_button_stays_visible_in_a_short_pane() {
        let n = Scenario::LinkBudget.fields().len();
        let s = screen(Scenario::LinkBudget, n);
        let height = 4u16;
        let offset = s.form_scroll(height);
        // button line (n + 1) must land on the last visible line
        assert_eq!(offset, (n + 1) as u16 - (height - 1));

        // a tall pane never scrolls
        assert_eq!(s.form_scroll(40), 0);
        assert_eq!(screen(Scenario::LinkBudget, 0).form_scroll(height), 0);
    }
}
