//! Terminal front end built on ratatui.

pub mod app;
pub mod confirm;
pub mod notifications;
pub mod task_form;
pub mod task_item;
pub mod task_list;

use ratatui::layout::Rect;

/// A `width` x `height` rectangle centered in `area`, shrunk to fit.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_rect_fits_small_areas() {
        let area = Rect::new(0, 0, 30, 5);
        assert_eq!(centered_rect(44, 7, area), area);
        assert_eq!(centered_rect(10, 3, Rect::new(2, 2, 20, 9)), Rect::new(7, 5, 10, 3));
    }
}
