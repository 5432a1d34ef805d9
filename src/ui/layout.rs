use tui::layout::{Constraint, Layout, Rect, Size};
pub const TAB_BAR_HEIGHT: u16 = 3;
pub const STATUS_HEIGHT: u16 = 1;
pub const LOG_PANE_PERCENT: u16 = 30;

/// Pre-computed layout areas for the main draw loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutAreas {
    pub tab_bar: [Rect; 2],
    pub main: Rect,
    pub status: Rect,
    /// Zero-sized while the log pane is hidden.
    pub logs: Rect,
}

impl LayoutAreas {
    pub fn new(size: Size) -> Self {
        let rect = Rect::new(0, 0, size.width, size.height);
        Self::from_rect(rect, false, false)
    }

    pub fn update(&mut self, area: Rect, full_screen: bool, show_logs: bool) {
        *self = Self::from_rect(area, full_screen, show_logs);
    }

    fn from_rect(area: Rect, full_screen: bool, show_logs: bool) -> Self {
        let (body, logs) = if show_logs {
            let [body, logs] = Layout::vertical([
                Constraint::Fill(1),
                Constraint::Percentage(LOG_PANE_PERCENT),
            ])
            .areas(area);
            (body, logs)
        } else {
            (area, Rect::ZERO)
        };

        if full_screen {
            let [main, status] =
                Layout::vertical([Constraint::Fill(1), Constraint::Length(STATUS_HEIGHT)]).areas(body);
            return LayoutAreas {
                tab_bar: [Rect::ZERO, Rect::ZERO],
                main,
                status,
                logs,
            };
        }

        let [tab, main, status] = Layout::vertical([
            Constraint::Length(TAB_BAR_HEIGHT),
            Constraint::Fill(1),
            Constraint::Length(STATUS_HEIGHT),
        ])
        .areas(body);

        LayoutAreas {
            tab_bar: Self::split_tab_bar(tab),
            main,
            status,
            logs,
        }
    }

    fn split_tab_bar(area: Rect) -> [Rect; 2] {
        Layout::horizontal([Constraint::Percentage(85), Constraint::Percentage(15)]).areas(area)
    }
}

/// A `width` x `height` rect centered in `area`, clamped to fit.
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_screen_drops_the_tab_bar() {
        let mut layout = LayoutAreas::new(Size::new(80, 24));
        layout.update(Rect::new(0, 0, 80, 24), true, false);
        assert_eq!(layout.tab_bar, [Rect::ZERO, Rect::ZERO]);
        assert_eq!(layout.main.height, 23);
        assert_eq!(layout.status.y, 23);
    }

    #[test]
    fn log_pane_takes_bottom_share() {
        let mut layout = LayoutAreas::new(Size::new(80, 40));
        layout.update(Rect::new(0, 0, 80, 40), false, true);
        assert_eq!(layout.logs.height, 12);
        assert_eq!(layout.status.y + 1, layout.logs.y);
    }

    #[test]
    fn centered_rect_is_clamped() {
        let r = centered(Rect::new(0, 0, 20, 10), 40, 4);
        assert_eq!(r, Rect::new(0, 3, 20, 4));
    }
}
