//! Tabular results: sorted/grouped rows, statistics, clean previews

use ratatui::{
    layout::{Constraint, Rect},
    text::{Line, Span},
    widgets::{Block, Cell, Paragraph, Row as TableRow, Table},
    Frame,
};

use crate::models::{display_value, CleanReport, Row, StatsTable};
use crate::tui::theme::Theme;

const MAX_COLUMN_WIDTH: usize = 24;

/// Column headers in first-seen order across all rows
pub fn headers(rows: &[Row]) -> Vec<String> {
    let mut headers: Vec<String> = Vec::new();
    for row in rows {
        for key in row.keys() {
            if !headers.iter().any(|h| h == key) {
                headers.push(key.clone());
            }
        }
    }
    headers
}

fn column_widths(headers: &[String], rows: &[Row]) -> Vec<Constraint> {
    headers
        .iter()
        .map(|header| {
            let widest = rows
                .iter()
                .filter_map(|row| row.get(header))
                .map(|value| display_value(value).chars().count())
                .fold(header.chars().count(), usize::max);
            Constraint::Length(widest.min(MAX_COLUMN_WIDTH) as u16)
        })
        .collect()
}

/// Rows from `scroll` onwards; missing cells render blank.
pub fn render_rows(frame: &mut Frame, area: Rect, block: Block, rows: &[Row], scroll: usize) {
    if rows.is_empty() {
        let empty = Paragraph::new(Line::from(Span::styled("No rows returned", Theme::text_dim())))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let headers = headers(rows);
    let widths = column_widths(&headers, rows);
    let header = TableRow::new(headers.iter().map(|h| Cell::from(h.clone()))).style(Theme::heading());

    let body = rows.iter().skip(scroll).map(|row| {
        TableRow::new(headers.iter().map(|h| {
            Cell::from(row.get(h).map(display_value).unwrap_or_default())
        }))
        .style(Theme::text())
    });

    let table = Table::new(body, widths)
        .header(header)
        .column_spacing(2)
        .block(block);
    frame.render_widget(table, area);
}

pub fn render_stats(frame: &mut Frame, area: Rect, block: Block, stats: &StatsTable) {
    let body = stats.iter().map(|(name, value)| {
        TableRow::new(vec![
            Cell::from(Span::styled(name.clone(), Theme::text_secondary())),
            Cell::from(Span::styled(display_value(value), Theme::text())),
        ])
    });
    let table = Table::new(body, [Constraint::Length(16), Constraint::Min(10)])
        .header(TableRow::new(vec!["statistic", "value"]).style(Theme::heading()))
        .block(block);
    frame.render_widget(table, area);
}

/// Row counts on top, preview rows below
pub fn render_clean(frame: &mut Frame, area: Rect, block: Block, report: &CleanReport, scroll: usize) {
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.height == 0 {
        return;
    }

    let summary = Paragraph::new(Line::from(vec![
        Span::styled("Cleaning complete: ", Theme::success()),
        Span::styled(report.summary(), Theme::text()),
    ]));
    frame.render_widget(summary, Rect { height: 1, ..inner });

    let preview = report.preview();
    if preview.is_empty() || inner.height < 3 {
        return;
    }
    let rest = Rect {
        y: inner.y + 2,
        height: inner.height - 2,
        ..inner
    };
    render_rows(frame, rest, Block::default(), &preview, scroll);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: serde_json::Value) -> Row {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_headers_union_of_row_keys() {
        let rows = vec![row(json!({"a": 1, "b": 2})), row(json!({"b": 3, "c": 4}))];
        assert_eq!(headers(&rows), vec!["a", "b", "c"]);
        assert!(headers(&[]).is_empty());
    }

    #[test]
    fn test_column_widths_capped() {
        let rows = vec![row(json!({"id": "x".repeat(60)}))];
        let widths = column_widths(&headers(&rows), &rows);
        assert_eq!(widths, vec![Constraint::Length(MAX_COLUMN_WIDTH as u16)]);
    }
}
