use tui::buffer::Buffer;
use tui::layout::{Alignment, Constraint, Layout, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{Clear, Paragraph, Widget, Wrap};

use crate::draw::default_border;
use crate::state::confirm::ConfirmDialog;
use crate::ui::layout::centered;

const WIDTH: u16 = 50;
const HEIGHT: u16 = 7;

/// Modal yes/no popup drawn over whatever is underneath.
pub struct ConfirmPopup<'a> {
    pub title: &'a str,
    pub message: &'a str,
}

impl<'a> ConfirmPopup<'a> {
    pub fn new<A>(dialog: &'a ConfirmDialog<A>) -> Self {
        Self {
            title: dialog.title.as_deref().unwrap_or(" Confirm "),
            message: &dialog.message,
        }
    }

    /// Area the popup occupies inside `screen`.
    pub fn area(screen: Rect) -> Rect {
        centered(screen, WIDTH, HEIGHT)
    }
}

impl Widget for ConfirmPopup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);

        let block = default_border(Color::Yellow).title(self.title);
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.height < 2 {
            return;
        }

        let [message_area, keys_area] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(inner);

        Paragraph::new(self.message)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(message_area, buf);

        let key = Style::default().add_modifier(Modifier::BOLD);
        Paragraph::new(Line::from(vec![
            Span::styled("y", key.fg(Color::Red)),
            Span::raw(" delete    "),
            Span::styled("n", key.fg(Color::Gray)),
            Span::raw(" cancel"),
        ]))
        .alignment(Alignment::Center)
        .render(keys_area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(buf: &Buffer) -> String {
        buf.content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn shows_title_message_and_keys() {
        let dialog = ConfirmDialog::new("Are you sure you want to delete this team?", 3u32)
            .with_title(" Delete team ");
        let area = Rect::new(0, 0, 50, 7);
        let mut buf = Buffer::empty(area);
        ConfirmPopup::new(&dialog).render(area, &mut buf);

        let text = rendered(&buf);
        assert!(text.contains("Delete team"));
        assert!(text.contains("delete this team?"));
        assert!(text.contains("y delete"));
    }

    #[test]
    fn untitled_dialog_gets_a_generic_title() {
        let dialog = ConfirmDialog::new("Sure?", ());
        assert_eq!(ConfirmPopup::new(&dialog).title, " Confirm ");
    }
}
