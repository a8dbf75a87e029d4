use ratatui::layout::{Constraint, Direction, Layout, Rect};

use crate::db::StoreError;

/// Produce a rectangle centered within `area` that spans the requested percent
/// of the width and height. Used for modal dialogs.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(area);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(horizontal[1]);

    vertical[1]
}

/// Like [`centered_rect`] but with a fixed height in rows, clamped to `area`.
pub(crate) fn centered_rows(percent_x: u16, height: u16, area: Rect) -> Rect {
    let horizontal = centered_rect(percent_x, 100, area);
    let height = height.min(area.height);
    Rect {
        x: horizontal.x,
        y: area.y + (area.height - height) / 2,
        width: horizontal.width,
        height,
    }
}

/// Extract the most relevant message from a store error: the deepest cause.
pub(crate) fn surface_error(err: &StoreError) -> String {
    let mut cause: &dyn std::error::Error = err;
    while let Some(next) = cause.source() {
        cause = next;
    }
    cause.to_string()
}
