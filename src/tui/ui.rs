//! UI Rendering
//!
//! Main UI layout and rendering logic for the TUI.

use crate::dispatcher::{ActiveResult, Operation};
use crate::selection::SelectionField;
use crate::tui::app::{App, InputMode, View};
use crate::tui::theme::{Icons, Theme};
use crate::tui::widgets;
use crate::workflow::WorkflowPhase;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Notices shown below the results
const VISIBLE_NOTICES: usize = 3;

/// Render the main UI
pub fn render(frame: &mut Frame, app: &App) {
    let editing = app.mode == InputMode::EditingPath;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),                                  // Header
            Constraint::Min(10),                                    // Body
            Constraint::Length(VISIBLE_NOTICES as u16 + 2),         // Notices
            Constraint::Length(if editing { 3 } else { 0 }),        // Path input
            Constraint::Length(1),                                  // Status bar
        ])
        .split(frame.area());

    render_header(frame, chunks[0], app);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(36), Constraint::Min(20)])
        .split(chunks[1]);
    let sidebar = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(10)])
        .split(body[0]);

    render_dataset(frame, sidebar[0], app);
    render_selection(frame, sidebar[1], app);
    render_result(frame, body[1], app);
    render_notices(frame, chunks[2], app);
    if editing {
        render_path_input(frame, chunks[3], app);
    }
    render_status_bar(frame, chunks[4], app);

    if app.view == View::Help {
        render_help(frame);
    }
}

fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let dataset = match &app.snapshot.dataset {
        Some(ds) => Span::styled(
            format!(
                "{} · {} rows · {} cols",
                ds.original_filename,
                ds.row_count,
                ds.columns.len()
            ),
            Theme::text_secondary(),
        ),
        None => Span::styled("no dataset", Theme::text_dim()),
    };

    let title = Paragraph::new(Line::from(vec![
        Span::styled("DataLens", Theme::title()),
        Span::styled("  ", Theme::text()),
        dataset,
        Span::styled(format!("  {}", app.config.service.base_url), Theme::text_dim()),
    ]))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Theme::border()),
    );

    frame.render_widget(title, area);
}

fn render_dataset(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title(" Columns ")
        .borders(Borders::ALL)
        .border_style(Theme::border());

    let lines: Vec<Line> = match &app.snapshot.dataset {
        Some(ds) => ds
            .columns
            .iter()
            .map(|c| Line::from(vec![
                Span::styled(format!("{} ", Icons::DOT), Theme::text_dim()),
                Span::styled(c.clone(), Theme::text()),
            ]))
            .collect(),
        None => vec![
            Line::from(Span::styled("No dataset loaded.", Theme::text_secondary())),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", Theme::text_dim()),
                Span::styled("o", Theme::shortcut_key()),
                Span::styled(" to open a file.", Theme::text_dim()),
            ]),
        ],
    };

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_selection(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title(" Selection ")
        .borders(Borders::ALL)
        .border_style(if app.has_dataset() {
            Theme::border_focused()
        } else {
            Theme::border()
        });

    let chart_type = app.snapshot.chart_type;
    let mut lines: Vec<Line> = SelectionField::ALL
        .iter()
        .enumerate()
        .map(|(i, field)| {
            let focused = i == app.focus;
            let marker = if focused { Icons::SELECTED } else { " " };
            let chart_field = matches!(field, SelectionField::ChartLabel | SelectionField::ChartValue);

            let value = match &app.snapshot.selection {
                _ if chart_field && !chart_type.uses_columns() => {
                    Span::styled("(all numeric)", Theme::text_dim())
                }
                Some(selection) => Span::styled(
                    selection.get(*field).to_string(),
                    if focused { Theme::selected() } else { Theme::text() },
                ),
                None => Span::styled("-", Theme::text_dim()),
            };

            Line::from(vec![
                Span::styled(format!("{} ", marker), Theme::shortcut_key()),
                Span::styled(format!("{:<12}", field.label()), Theme::text_secondary()),
                value,
            ])
        })
        .collect();

    lines.push(Line::from(vec![
        Span::styled("  ", Theme::text()),
        Span::styled(format!("{:<12}", "Chart type"), Theme::text_secondary()),
        Span::styled(chart_type.to_string(), Theme::text()),
    ]));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn result_title(result: &ActiveResult) -> String {
    match result {
        ActiveResult::Idle => " Result ".to_string(),
        ActiveResult::Clean(_) => " Cleaned data ".to_string(),
        ActiveResult::Stats(_) => " Statistics ".to_string(),
        ActiveResult::Table { source: Operation::Group, rows } => {
            format!(" Grouped ({} rows) ", rows.len())
        }
        ActiveResult::Table { rows, .. } => format!(" Sorted ({} rows) ", rows.len()),
        ActiveResult::Chart(view) => format!(" {} chart ", view.spec.type_name()),
        ActiveResult::Failed { operation, .. } => format!(" {} ", operation),
    }
}

fn render_result(frame: &mut Frame, area: Rect, app: &App) {
    let result = &app.snapshot.result;
    let block = Block::default()
        .title(result_title(result))
        .borders(Borders::ALL)
        .border_style(Theme::border());

    match result {
        ActiveResult::Idle => {
            let text = if app.snapshot.phase == WorkflowPhase::Busy {
                Span::styled("Working...", Theme::active())
            } else {
                Span::styled("Run an operation to see results here.", Theme::text_dim())
            };
            frame.render_widget(Paragraph::new(Line::from(text)).block(block), area);
        }
        ActiveResult::Clean(report) => {
            widgets::render_clean(frame, area, block, report, app.scroll_offset)
        }
        ActiveResult::Stats(stats) => widgets::render_stats(frame, area, block, stats),
        ActiveResult::Table { rows, .. } => {
            widgets::render_rows(frame, area, block, rows, app.scroll_offset)
        }
        ActiveResult::Chart(_) => match app.chart_host.surface() {
            Some(surface) => widgets::render_chart(frame, area, block, surface),
            None => frame.render_widget(block, area),
        },
        ActiveResult::Failed { message, .. } => {
            let text = Paragraph::new(vec![
                Line::from(Span::styled(format!("{} {}", Icons::ERROR, message), Theme::error())),
            ])
            .wrap(Wrap { trim: true })
            .block(block);
            frame.render_widget(text, area);
        }
    }
}

fn render_notices(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title(" Notices ")
        .borders(Borders::ALL)
        .border_style(Theme::border());

    let start = app.notices.len().saturating_sub(VISIBLE_NOTICES);
    let lines: Vec<Line> = app.notices[start..]
        .iter()
        .map(|notice| {
            Line::from(vec![
                Span::styled(
                    notice.at.with_timezone(&chrono::Local).format("%H:%M:%S ").to_string(),
                    Theme::text_dim(),
                ),
                Span::styled(notice.message.clone(), Theme::notice(notice.level)),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_path_input(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title(" Open file (Enter to upload, Esc to cancel) ")
        .borders(Borders::ALL)
        .border_style(Theme::border_focused());
    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(&app.path_input, inner);
}

fn shortcut<'a>(key: &'a str, desc: &'a str, enabled: bool) -> [Span<'a>; 2] {
    if enabled {
        [
            Span::styled(key, Theme::shortcut_key()),
            Span::styled(desc, Theme::shortcut_desc()),
        ]
    } else {
        [
            Span::styled(key, Theme::shortcut_disabled()),
            Span::styled(desc, Theme::shortcut_disabled()),
        ]
    }
}

fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let idle = app.triggers_enabled();
    let ready = idle && app.has_dataset();

    let status = if app.uploading {
        Span::styled(format!("{} Uploading", Icons::ACTIVE), Theme::active())
    } else {
        match app.snapshot.phase {
            WorkflowPhase::NoDataset => Span::styled(format!("{} No dataset", Icons::PENDING), Theme::text_secondary()),
            WorkflowPhase::DatasetLoaded => Span::styled(format!("{} Ready", Icons::COMPLETE), Theme::success()),
            WorkflowPhase::Busy => Span::styled(format!("{} Working", Icons::ACTIVE), Theme::active()),
        }
    };

    let mut spans = vec![status, Span::raw(" │ ")];
    spans.extend(shortcut("[o]", " Open ", idle));
    spans.extend(shortcut("[c]", " Clean ", ready));
    spans.extend(shortcut("[s]", " Stats ", ready));
    spans.extend(shortcut("[r]", " Sort ", ready));
    spans.extend(shortcut("[g]", " Group ", ready));
    spans.extend(shortcut("[h]", " Chart ", ready));
    spans.extend(shortcut("[x]", " Correlation ", ready));
    spans.extend(shortcut("[t]", " Type ", true));
    spans.extend(shortcut("[F1]", " Help", true));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Render the help modal
fn render_help(frame: &mut Frame) {
    let area = centered_rect(60, 70, frame.area());
    frame.render_widget(Clear, area);

    let entries = [
        ("o            ", "Open a data file"),
        ("c            ", "Clean the dataset"),
        ("s            ", "Statistics for the stats column"),
        ("r            ", "Sort by the sort column (descending)"),
        ("g            ", "Group and sum the aggregate column"),
        ("h            ", "Chart the label/value columns"),
        ("x            ", "Correlation heatmap of numeric columns"),
        ("t            ", "Cycle chart type"),
        ("Tab/Shift+Tab", "Move between selection fields"),
        ("←/→          ", "Change the focused column"),
        ("Enter        ", "Run the focused field's operation"),
        ("↑/↓          ", "Scroll result rows"),
        ("Esc          ", "Close help / cancel file input"),
        ("q, Ctrl+Q    ", "Quit"),
    ];

    let mut help_lines = vec![
        Line::from(Span::styled("Keyboard Shortcuts", Theme::heading())),
        Line::from(""),
    ];
    help_lines.extend(entries.iter().map(|(key, desc)| {
        Line::from(vec![
            Span::styled(format!("{} ", key), Theme::shortcut_key()),
            Span::styled(*desc, Theme::text()),
        ])
    }));
    help_lines.push(Line::from(""));
    help_lines.push(Line::from(Span::styled("Press Esc to close", Theme::text_dim())));

    let paragraph = Paragraph::new(help_lines).block(
        Block::default()
            .title(" Help ")
            .borders(Borders::ALL)
            .border_style(Theme::border_focused()),
    );

    frame.render_widget(paragraph, area);
}

/// Helper to create a centered rect
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Row;

    #[test]
    fn test_result_titles() {
        assert_eq!(result_title(&ActiveResult::Idle), " Result ");
        let grouped = ActiveResult::Table {
            source: Operation::Group,
            rows: vec![Row::new(), Row::new()],
        };
        assert_eq!(result_title(&grouped), " Grouped (2 rows) ");
        let sorted = ActiveResult::Table {
            source: Operation::Sort,
            rows: vec![Row::new()],
        };
        assert_eq!(result_title(&sorted), " Sorted (1 rows) ");
    }

    #[test]
    fn test_centered_rect_inside_area() {
        let area = Rect::new(0, 0, 100, 50);
        let popup = centered_rect(60, 70, area);
        assert_eq!(popup.width, 60);
        assert!(popup.x >= 20 && popup.y >= 7);
    }
}
