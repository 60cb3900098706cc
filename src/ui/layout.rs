use ratatui::layout::{Constraint, Direction, Layout, Margin, Rect};

pub struct ThreeBox {
    pub top: Rect,
    pub middle: Rect,
    pub bottom: Rect,
    pub top_inner: Rect,
    pub middle_inner: Rect,
    pub bottom_inner: Rect,
}

pub struct Margins {
    pub page: u16,         // outer page margin
    pub inner_top: u16,    // horizontal inner margin for top box
    pub inner_middle: u16, // horizontal inner margin for middle box
    pub inner_bottom: u16, // horizontal inner margin for bottom box
}

/// Top box sized to its content, bottom box fixed, middle takes the rest.
pub fn three_box_layout(size: Rect, top_needed: u16, footer_height: u16, margins: Margins) -> ThreeBox {
    let available = size.height.saturating_sub(2 * margins.page).saturating_sub(footer_height);
    let top_height = top_needed.min(available);
    let middle_height = available.saturating_sub(top_height);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(margins.page)
        .constraints([
            Constraint::Length(top_height),
            Constraint::Length(middle_height),
            Constraint::Length(footer_height),
        ])
        .split(size);

    let top_inner = chunks[0].inner(&Margin { horizontal: margins.inner_top, vertical: 1 });
    let middle_inner = chunks[1].inner(&Margin { horizontal: margins.inner_middle, vertical: 1 });
    let bottom_inner = chunks[2].inner(&Margin { horizontal: margins.inner_bottom, vertical: 1 });

    ThreeBox {
        top: chunks[0],
        middle: chunks[1],
        bottom: chunks[2],
        top_inner,
        middle_inner,
        bottom_inner,
    }
}

/// Split a box into form (left) and results (right) columns.
pub fn form_and_results(area: Rect, form_percent: u16) -> (Rect, Rect) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(form_percent),
            Constraint::Percentage(100 - form_percent.min(100)),
        ])
        .split(area);
    (cols[0], cols[1])
}

pub fn centered_rect_abs(width: u16, height: u16, r: Rect) -> Rect {
    let w = width.min(r.width.saturating_sub(2));
    let h = height.min(r.height.saturating_sub(2));
    let x = r.x + (r.width.saturating_sub(w)) / 2;
    let y = r.y + (r.height.saturating_sub(h)) / 2;
    Rect { x, y, width: w, height: h }
}

pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Percentage((100 - percent_y) / 2),
                Constraint::Percentage(percent_y),
                Constraint::Percentage((100 - percent_y) / 2),
            ]
            .as_ref(),
        )
        .split(r);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints(
            [
                Constraint::Percentage((100 - percent_x) / 2),
                Constraint::Percentage(percent_x),
                Constraint::Percentage((100 - percent_x) / 2),
            ]
            .as_ref(),
        )
        .split(popup_layout[1])[1]
}
