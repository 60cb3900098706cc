use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};
use std::borrow::Cow;

pub fn span_key(s: &'static str) -> Span<'static> {
    Span::styled(s, Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
}
pub fn span_sep() -> Span<'static> {
    Span::styled("  |  ", Style::default().fg(Color::DarkGray))
}
pub fn span_text(s: &'static str) -> Span<'static> {
    Span::raw(s)
}

/* ---------- button helpers (Blue brackets, Red for selected) ---------- */

const ACCENT_BRACKET: Color = Color::Blue;
const SELECTED_TEXT: Color = Color::Red;
const IDLE_TEXT: Color = Color::Blue;

/// Core painter: "< " + LABEL + " >"
pub fn button_spans<S: Into<Cow<'static, str>>>(label: S, selected: bool) -> Vec<Span<'static>> {
    let label = label.into();
    vec![
        Span::styled("< ", Style::default().fg(ACCENT_BRACKET).add_modifier(Modifier::BOLD)),
        Span::styled(
            label,
            Style::default()
                .fg(if selected { SELECTED_TEXT } else { IDLE_TEXT })
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(" >", Style::default().fg(ACCENT_BRACKET).add_modifier(Modifier::BOLD)),
    ]
}

/// Same look, but visually "disabled" (request in flight)
pub fn button_spans_disabled<S: Into<Cow<'static, str>>>(label: S) -> Vec<Span<'static>> {
    let label = label.into();
    vec![
        Span::styled("< ", Style::default().fg(Color::DarkGray)),
        Span::styled(label, Style::default().fg(Color::Gray)),
        Span::styled(" >", Style::default().fg(Color::DarkGray)),
    ]
}

pub fn tab_highlight() -> Style {
    Style::default().fg(Color::Black).bg(Color::Cyan).add_modifier(Modifier::BOLD)
}

/// White-on-red banner line for error notifications.
pub fn error_line(message: &str) -> Line<'static> {
    Line::from(Span::styled(
        format!(" {message} "),
        Style::default().fg(Color::White).bg(Color::Red).add_modifier(Modifier::BOLD),
    ))
}

pub fn busy_line() -> Line<'static> {
    Line::from(Span::styled(
        "Calculating...",
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD | Modifier::SLOW_BLINK),
    ))
}
