use ratatui::text::Line;

use super::style::{span_key, span_sep, span_text};

pub fn help_calculator<'a>() -> Line<'a> {
    Line::from(vec![
        span_key("↑/↓/Tab"), span_text(" Move"), span_sep(),
        span_key("Enter"), span_text(" Calculate"), span_sep(),
        span_key("Ctrl/Alt+1-4"), span_text(" Scenario"), span_sep(),
        span_key("Ctrl+E"), span_text(" Export"), span_sep(),
        span_key("Esc"), span_text(" Clear"), span_sep(),
        span_key("Ctrl+Q"), span_text(" Quit"),
    ])
}

pub fn help_explanation<'a>() -> Line<'a> {
    Line::from(vec![
        span_key("↑/↓/PgUp/PgDn"), span_text(" Scroll"), span_sep(),
        span_key("Esc/Enter"), span_text(" Back"), span_sep(),
        span_key("Ctrl+Q"), span_text(" Quit"),
    ])
}
