use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap},
};
use crate::tui::app::{App, ConsumerState, View};
use crate::tui::pie::PieWidget;
use crate::tui::theme::Theme;

pub fn render(frame: &mut Frame, app: &App) {
    let theme = &app.theme;
    let area = frame.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0), Constraint::Length(1)])
        .split(area);
    render_topbar(frame, app, chunks[0], theme);
    let mid = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chunks[1]);
    render_pie(frame, app, mid[0], theme);
    render_legend(frame, app, mid[1], theme);
    render_bottombar(frame, app, chunks[2], theme);
    if app.view == View::Help { render_help(frame, area); }
}

fn render_topbar(frame: &mut Frame, app: &App, area: Rect, theme: &Theme) {
    let badge = match app.consumer_state {
        ConsumerState::Running => Span::styled("[LIVE]", Style::default().fg(theme.success)),
        ConsumerState::Stopped => Span::styled("[STOP]", Style::default().fg(theme.warning)),
        ConsumerState::Exhausted => Span::styled("[DONE]", Style::default().fg(theme.highlight)),
    };
    let info = format!(" {} | field '{}' | {} events", app.source_name, app.tally.field(), app.tally.table().total());
    let line = Line::from(vec![badge, Span::raw(info)]);
    frame.render_widget(Paragraph::new(line).style(Style::default().bg(theme.bg).fg(theme.fg)), area);
}

fn render_pie(frame: &mut Frame, app: &App, area: Rect, theme: &Theme) {
    let block = Block::default().borders(Borders::ALL).title(app.chart.title.clone())
        .border_style(Style::default().fg(theme.highlight));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(PieWidget::new(&app.chart, theme), inner);
}

fn render_legend(frame: &mut Frame, app: &App, area: Rect, theme: &Theme) {
    let header = Row::new(["", "Label", "Count", "Share"].map(|h| Cell::from(h).style(Style::default().add_modifier(Modifier::BOLD))));
    let rows: Vec<Row> = app.chart.slices.iter().enumerate().map(|(i, s)| {
        let color = theme.slice_color(i, app.chart.is_aggregate(i));
        Row::new([
            Cell::from("██").style(Style::default().fg(color)),
            Cell::from(truncate(&s.label, 24)),
            Cell::from(s.size.to_string()),
            Cell::from(app.chart.percent_label(i)),
        ])
    }).collect();
    let title = format!("Slices ({} categories)", app.tally.table().len());
    let table = Table::new(rows, [Constraint::Length(2), Constraint::Min(12), Constraint::Length(8), Constraint::Length(6)])
        .header(header).block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(table, area);
}

fn render_bottombar(frame: &mut Frame, app: &App, area: Rect, theme: &Theme) {
    let mut spans = vec![
        Span::raw(format!(" processed {} | dropped ", app.tally.processed())),
        Span::styled(app.tally.dropped().to_string(), Style::default().fg(if app.tally.dropped() > 0 { theme.error } else { theme.fg })),
        Span::raw(format!(" | {}", app.status_msg)),
    ];
    if let Some(err) = &app.last_source_error {
        spans.push(Span::styled(format!(" | source error ({}): {err}", app.source_errors), Style::default().fg(theme.error)));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)).style(Style::default().bg(theme.bg).fg(theme.fg)), area);
}

fn render_help(frame: &mut Frame, area: Rect) {
    let popup = centered_rect(50, 50, area);
    let lines = vec![
        Line::from("q        quit"),
        Line::from("s/Ctrl-C stop consuming, keep chart"),
        Line::from("Ctrl-C   quit (once stopped)"),
        Line::from("t        cycle theme"),
        Line::from("?/Esc    close help"),
        Line::from(""),
        Line::from("Slices under the share threshold fold into 'other';"),
        Line::from("the two largest categories are always shown."),
    ];
    frame.render_widget(Clear, popup);
    frame.render_widget(Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Help")).wrap(Wrap { trim: false }), popup);
}

fn centered_rect(pct_x: u16, pct_y: u16, area: Rect) -> Rect {
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage((100 - pct_y) / 2), Constraint::Percentage(pct_y), Constraint::Percentage((100 - pct_y) / 2)])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage((100 - pct_x) / 2), Constraint::Percentage(pct_x), Constraint::Percentage((100 - pct_x) / 2)])
        .split(vert[1])[1]
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max { s.to_owned() } else { format!("{}…", s.chars().take(max.saturating_sub(1)).collect::<String>()) }
}
