use tui::backend::Backend;
use tui::layout::{Alignment, Constraint, Layout, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{Block, BorderType, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Tabs};
use tui::{Frame, Terminal};
use tui_logger::TuiLoggerWidget;

use crate::app::{App, MenuItem};
use crate::components::confirm_dialog::ConfirmPopup;
use crate::state::app_state::Level;
use crate::state::form::FormMode;
use crate::state::list::capitalize;
use crate::state::network::{ERROR_CHAR, LoadingState};
use crate::state::validation::FieldKind;
use crate::state::view::{FormView, ListView};
use crate::ui::layout::{LayoutAreas, centered};

static TABS: &[&str; 3] = &["Teams", "Players", "Matches"];

const LABEL_WIDTH: u16 = 20;

pub fn draw<B>(terminal: &mut Terminal<B>, app: &mut App, loading: LoadingState)
where
    B: Backend,
{
    let current_size = terminal.size().unwrap_or_default();
    if current_size.width <= 10 || current_size.height <= 10 {
        return;
    }

    let mut layout = LayoutAreas::new(current_size);

    let result = terminal.draw(|f| {
        layout.update(f.area(), app.settings.full_screen, app.state.show_logs);

        if !app.settings.full_screen {
            draw_tabs(f, layout.tab_bar, app);
        }

        if let Some(list) = app.state.screen.list() {
            draw_list(f, layout.main, list);
        } else if let Some(form) = app.state.screen.form_view() {
            draw_form(f, layout.main, form);
        }

        draw_status(f, layout.status, app);

        if app.state.show_logs {
            draw_logs(f, layout.logs);
        }

        if let Some(dialog) = app.state.screen.list().and_then(|l| l.confirmation()) {
            f.render_widget(ConfirmPopup::new(dialog), ConfirmPopup::area(f.area()));
        }

        if app.state.show_help {
            draw_help(f, f.area());
        }

        draw_loading_spinner(f, f.area(), app, loading);
    });

    if let Err(e) = result {
        log::error!("draw failed: {e}");
    }
}

pub fn default_border<'a>(color: Color) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
}

fn draw_tabs(f: &mut Frame, tab_bar: [Rect; 2], app: &App) {
    let style = Style::default().fg(Color::White);
    let border_type = BorderType::Rounded;

    let tab_index = match app.active_tab() {
        MenuItem::Teams => 0,
        MenuItem::Players => 1,
        MenuItem::Matches => 2,
    };

    let titles: Vec<Line> = TABS.iter().map(|t| Line::from(*t)).collect();
    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::LEFT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .highlight_style(Style::default().add_modifier(Modifier::UNDERLINED))
        .select(tab_index)
        .style(style);
    f.render_widget(tabs, tab_bar[0]);

    let help = Paragraph::new("Help: ? ")
        .alignment(Alignment::Right)
        .block(
            Block::default()
                .borders(Borders::RIGHT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .style(style);
    f.render_widget(help, tab_bar[1]);
}

fn draw_list(f: &mut Frame, area: Rect, list: &dyn ListView) {
    let title = format!(" {} ", capitalize(list.entity().plural()));
    let block = default_border(Color::White).title(title);

    if list.is_loading() {
        draw_placeholder(f, area, block, "Loading...");
        return;
    }

    let rows = list.rows();
    if rows.is_empty() {
        let msg = format!("No {} yet. Press n to add one.", list.entity().plural());
        draw_placeholder(f, area, block, &msg);
        return;
    }

    let header = Row::new(list.columns().iter().map(|c| Cell::from(*c)))
        .style(Style::default().add_modifier(Modifier::BOLD))
        .bottom_margin(1);
    let widths = vec![Constraint::Fill(1); list.columns().len()];
    let table = Table::new(rows.into_iter().map(Row::new), widths)
        .header(header)
        .block(block)
        .row_highlight_style(Style::default().fg(Color::Black).bg(Color::Yellow))
        .highlight_symbol("> ");

    let mut state = TableState::default().with_selected(Some(list.selected()));
    f.render_stateful_widget(table, area, &mut state);
}

fn draw_placeholder(f: &mut Frame, area: Rect, block: Block, msg: &str) {
    let inner = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(
        Paragraph::new(msg)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center),
        inner,
    );
}

fn draw_form(f: &mut Frame, area: Rect, form: &dyn FormView) {
    let label = form.entity().label();
    let title = match form.mode() {
        FormMode::Create => format!(" New {label} "),
        FormMode::Edit(id) => format!(" Edit {label} #{id} "),
    };
    let block = default_border(Color::White).title(title);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let [fields_area, footer] =
        Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(inner);

    let mut lines = Vec::new();
    for (idx, field) in form.fields().iter().enumerate() {
        let focused = idx == form.focus();
        let marker = if focused { "> " } else { "  " };
        let label_style = if focused {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };

        let required = if field.spec.is_required() { "*" } else { "" };
        let mut value = form.display_value(idx);
        if matches!(field.spec.kind, FieldKind::Choice(_) | FieldKind::TeamRef) {
            value = format!("< {value} >");
        } else if focused {
            value.push('_');
        }

        lines.push(Line::from(vec![
            Span::styled(marker, label_style),
            Span::styled(
                format!("{:<width$}", format!("{}{required}", field.spec.label), width = LABEL_WIDTH as usize),
                label_style,
            ),
            Span::raw(value),
        ]));
        if let Some(message) = field.error_message() {
            lines.push(Line::from(Span::styled(
                format!("{:indent$}{message}", "", indent = LABEL_WIDTH as usize + 2),
                Style::default().fg(Color::Red),
            )));
        }
    }
    f.render_widget(Paragraph::new(lines), fields_area);

    let hint = if form.is_submitting() {
        "Saving..."
    } else {
        "Tab/↑↓ move  ←/→ choose  Enter save  Esc cancel"
    };
    f.render_widget(
        Paragraph::new(hint).style(Style::default().fg(Color::DarkGray)),
        footer,
    );
}

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
    let line = match app.state.notifications.current() {
        Some(n) => {
            let color = match n.level {
                Level::Success => Color::Green,
                Level::Error => Color::Red,
            };
            Line::from(Span::styled(n.message.as_str(), Style::default().fg(color)))
        }
        None => Line::from(Span::styled(
            app.state.route.to_string(),
            Style::default().fg(Color::DarkGray),
        )),
    };
    f.render_widget(Paragraph::new(line), area);
}

fn draw_logs(f: &mut Frame, area: Rect) {
    let logs = TuiLoggerWidget::default()
        .block(default_border(Color::DarkGray).title(" Logs "))
        .style_error(Style::default().fg(Color::Red))
        .style_warn(Style::default().fg(Color::Yellow))
        .style_info(Style::default().fg(Color::Gray))
        .output_file(false)
        .output_line(false);
    f.render_widget(logs, area);
}

fn draw_help(f: &mut Frame, area: Rect) {
    let rows = [
        ("1 / 2 / 3", "Teams / Players / Matches"),
        ("j k ↑ ↓", "Move selection"),
        ("n", "New record"),
        ("e / Enter", "Edit selected"),
        ("d", "Delete selected"),
        ("r", "Reload"),
        ("Tab / Shift-Tab", "Next / previous field"),
        ("← →", "Cycle choices"),
        ("Enter / Esc", "Save / cancel form"),
        ("f", "Toggle full screen"),
        ("\"", "Toggle logs"),
        ("q / Ctrl-c", "Quit"),
    ];
    let lines: Vec<Line> = rows
        .iter()
        .map(|(keys, what)| {
            Line::from(vec![
                Span::styled(format!("{keys:<18}"), Style::default().fg(Color::Yellow)),
                Span::raw(*what),
            ])
        })
        .collect();

    let popup = centered(area, 52, rows.len() as u16 + 2);
    f.render_widget(Clear, popup);
    f.render_widget(
        Paragraph::new(lines).block(default_border(Color::White).title(" Help ")),
        popup,
    );
}

fn draw_loading_spinner(f: &mut Frame, area: Rect, app: &App, loading: LoadingState) {
    if !loading.is_loading && loading.spinner_char != ERROR_CHAR {
        return;
    }
    let style = match loading.spinner_char {
        ERROR_CHAR => Style::default().fg(Color::Red),
        _ => Style::default().fg(Color::White),
    };
    let spinner = Paragraph::new(loading.spinner_char.to_string())
        .alignment(Alignment::Right)
        .style(style);
    let area = if app.settings.full_screen {
        Rect::new(area.width.saturating_sub(3), area.height.saturating_sub(2), 1, 1)
    } else {
        Rect::new(area.width.saturating_sub(11), 1, 1, 1)
    };
    f.render_widget(spinner, area);
}
