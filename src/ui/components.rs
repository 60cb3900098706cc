use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

/// Single-line editor. `cursor` is a byte offset kept on a char boundary.
#[derive(Clone, Default, Debug, PartialEq, Eq)]
pub struct TextField {
    pub text: String,
    pub cursor: usize,
}

impl TextField {
    pub fn with(text: &str) -> Self {
        Self { text: text.into(), cursor: text.len() }
    }

    fn prev_boundary(&self) -> usize {
        self.text[..self.cursor].char_indices().next_back().map(|(i, _)| i).unwrap_or(0)
    }

    fn next_boundary(&self) -> usize {
        self.text[self.cursor..]
            .chars()
            .next()
            .map(|c| self.cursor + c.len_utf8())
            .unwrap_or(self.cursor)
    }

    pub fn insert_char(&mut self, c: char) { self.text.insert(self.cursor, c); self.cursor += c.len_utf8(); }
    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            let at = self.prev_boundary();
            self.text.remove(at);
            self.cursor = at;
        }
    }
    pub fn delete(&mut self) { if self.cursor < self.text.len() { self.text.remove(self.cursor); } }
    pub fn move_left(&mut self) { self.cursor = self.prev_boundary(); }
    pub fn move_right(&mut self) { self.cursor = self.next_boundary(); }
    pub fn home(&mut self) { self.cursor = 0; }
    pub fn end(&mut self) { self.cursor = self.text.len(); }
}

// Bash-style block cursor that covers the char (no shifting)
pub fn field_line_text<'a>(label: &str, field: &TextField, focused: bool) -> Line<'a> {
    let label_s = format!("{label}: ");
    let text = field.text.as_str();
    let cur = field.cursor.min(text.len());
    let label_span = Span::styled(label_s, Style::default().fg(Color::Yellow));

    if !focused {
        return Line::from(vec![label_span, Span::raw(text.to_string())]);
    }

    let (left, rest) = text.split_at(cur);
    let block = |s: &str| {
        Span::styled(
            s.to_string(),
            Style::default().fg(Color::Black).bg(Color::Cyan).add_modifier(Modifier::BOLD),
        )
    };

    if let Some(ch) = rest.chars().next() {
        let after = &rest[ch.len_utf8()..];
        Line::from(vec![
            label_span,
            Span::raw(left.to_string()),
            block(&ch.to_string()),
            Span::raw(after.to_string()),
        ])
    } else {
        Line::from(vec![label_span, Span::raw(left.to_string()), block(" ")])
    }
}

/// `label: value unit` row of the results panel.
pub fn result_line<'a>(label: &str, value: &str, unit: &str) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("{label}: "), Style::default().fg(Color::Yellow)),
        Span::styled(value.to_string(), Style::default().fg(Color::White).add_modifier(Modifier::BOLD)),
        Span::raw(" "),
        Span::styled(unit.to_string(), Style::default().fg(Color::DarkGray)),
    ])
}
