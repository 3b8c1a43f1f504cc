//! Chart widget
//!
//! Paints a [`ChartOption`] held by the live terminal surface: bars with
//! `BarChart`, lines with `Chart`, pies as a proportional legend, heatmaps
//! as a coloured grid on the option's visual-map scale.

use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{
        Axis as PlotAxis, Bar, BarChart, BarGroup, Block, Cell, Chart, Dataset, GraphType,
        Paragraph, Row as TableRow, Table,
    },
    Frame,
};

use crate::chart::{ChartOption, HeatCell, Series};
use crate::chart::option::PieDatum;
use crate::tui::surface::TerminalSurface;
use crate::tui::theme::{Icons, Theme};

pub fn render_chart(frame: &mut Frame, area: Rect, block: Block, surface: &TerminalSurface) {
    let Some(option) = surface.option() else {
        frame.render_widget(block, area);
        return;
    };

    match option.series.first() {
        Some(Series::Bar { data }) => render_bar(frame, area, block, option, data, surface.size()),
        Some(Series::Line { data, .. }) => render_line(frame, area, block, option, data),
        Some(Series::Pie { name, data, .. }) => render_pie(frame, area, block, name, data),
        Some(Series::Heatmap { data, .. }) => render_heatmap(frame, area, block, option, data),
        None => frame.render_widget(block, area),
    }
}

fn categories(option: &ChartOption) -> &[String] {
    option.x_axis.as_ref().map(|axis| axis.data.as_slice()).unwrap_or(&[])
}

fn axis_title(axis: Option<&crate::chart::Axis>) -> String {
    axis.and_then(|axis| axis.name.clone()).unwrap_or_default()
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{:.2}", value)
    }
}

/// Width per bar so all bars fit the viewport the surface was sized for
fn bar_width(viewport_width: u16, count: usize) -> u16 {
    if count == 0 {
        return 1;
    }
    let per_bar = viewport_width.saturating_sub(2) as usize / count;
    per_bar.saturating_sub(1).clamp(1, 9) as u16
}

fn render_bar(
    frame: &mut Frame,
    area: Rect,
    block: Block,
    option: &ChartOption,
    data: &[Option<f64>],
    viewport: (u16, u16),
) {
    let labels = categories(option);
    let width = bar_width(viewport.0.min(area.width), data.len());

    // BarChart heights are unsigned; negatives and gaps draw as empty bars
    let bars: Vec<Bar> = data
        .iter()
        .enumerate()
        .map(|(i, value)| {
            let label = labels.get(i).cloned().unwrap_or_default();
            let text = value.map(format_number).unwrap_or_else(|| "-".to_string());
            Bar::default()
                .value(value.unwrap_or(0.0).max(0.0).round() as u64)
                .text_value(text)
                .label(Line::from(label))
                .style(Style::default().fg(Theme::series(0)))
        })
        .collect();

    let title = format!(
        "{} by {}",
        axis_title(option.y_axis.as_ref()),
        axis_title(option.x_axis.as_ref())
    );
    let chart = BarChart::default()
        .block(block.title_bottom(Line::from(title).centered()))
        .bar_width(width)
        .bar_gap(1)
        .value_style(Style::default().fg(Theme::TEXT_PRIMARY).add_modifier(Modifier::BOLD))
        .label_style(Theme::text_secondary())
        .data(BarGroup::default().bars(&bars));
    frame.render_widget(chart, area);
}

fn bounds(values: impl Iterator<Item = f64>) -> [f64; 2] {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !min.is_finite() || !max.is_finite() {
        [0.0, 1.0]
    } else if min == max {
        [min - 1.0, max + 1.0]
    } else {
        [min, max]
    }
}

fn render_line(
    frame: &mut Frame,
    area: Rect,
    block: Block,
    option: &ChartOption,
    data: &[Option<f64>],
) {
    let labels = categories(option);
    let points: Vec<(f64, f64)> = data
        .iter()
        .enumerate()
        .filter_map(|(i, value)| value.map(|v| (i as f64, v)))
        .collect();

    let x_max = data.len().saturating_sub(1).max(1) as f64;
    let [y_min, y_max] = bounds(points.iter().map(|(_, y)| *y));

    let x_labels: Vec<Span> = match (labels.first(), labels.last()) {
        (Some(first), Some(last)) if labels.len() > 1 => {
            vec![Span::raw(first.clone()), Span::raw(last.clone())]
        }
        (Some(only), _) => vec![Span::raw(only.clone())],
        _ => Vec::new(),
    };

    let dataset = Dataset::default()
        .name(axis_title(option.y_axis.as_ref()))
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Theme::series(0)))
        .data(&points);

    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            PlotAxis::default()
                .title(axis_title(option.x_axis.as_ref()))
                .style(Theme::text_secondary())
                .bounds([0.0, x_max])
                .labels(x_labels),
        )
        .y_axis(
            PlotAxis::default()
                .title(axis_title(option.y_axis.as_ref()))
                .style(Theme::text_secondary())
                .bounds([y_min, y_max])
                .labels(vec![
                    Span::raw(format_number(y_min)),
                    Span::raw(format_number(y_max)),
                ]),
        );
    frame.render_widget(chart, area);
}

/// Share of each slice in the total of the valued slices
fn shares(data: &[PieDatum]) -> Vec<Option<f64>> {
    let total: f64 = data.iter().filter_map(|d| d.value).filter(|v| *v > 0.0).sum();
    data.iter()
        .map(|d| match d.value {
            Some(v) if total > 0.0 && v > 0.0 => Some(v / total),
            _ => None,
        })
        .collect()
}

fn render_pie(frame: &mut Frame, area: Rect, block: Block, name: &str, data: &[PieDatum]) {
    let inner_width = block.inner(area).width as usize;
    let label_width = data
        .iter()
        .map(|d| d.name.chars().count())
        .max()
        .unwrap_or(0)
        .min(20);
    let bar_room = inner_width.saturating_sub(label_width + 20).max(1);

    let mut lines = vec![Line::from(Span::styled(name.to_string(), Theme::heading())), Line::default()];
    for (i, (datum, share)) in data.iter().zip(shares(data)).enumerate() {
        let colour = Theme::series(i);
        let filled = share.map(|s| (s * bar_room as f64).round() as usize).unwrap_or(0);
        let percent = share
            .map(|s| format!("{:5.1}%", s * 100.0))
            .unwrap_or_else(|| "    -".to_string());
        let value = datum.value.map(format_number).unwrap_or_else(|| "-".to_string());
        let label: String = datum.name.chars().take(label_width).collect();

        lines.push(Line::from(vec![
            Span::styled(format!("{} ", Icons::DOT), Style::default().fg(colour)),
            Span::styled(format!("{:<width$} ", label, width = label_width), Theme::text()),
            Span::styled(percent, Theme::text_secondary()),
            Span::raw(" "),
            Span::styled(Icons::BAR.repeat(filled), Style::default().fg(colour)),
            Span::styled(format!(" {}", value), Theme::text_dim()),
        ]));
    }

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Cells placed on the `y` by `x` grid; out-of-range indices are ignored
fn heat_grid(cells: &[HeatCell], width: usize, height: usize) -> Vec<Vec<Option<f64>>> {
    let mut grid = vec![vec![None; width]; height];
    for HeatCell(x, y, value) in cells {
        if let Some(slot) = grid.get_mut(*y).and_then(|row| row.get_mut(*x)) {
            *slot = *value;
        }
    }
    grid
}

fn render_heatmap(
    frame: &mut Frame,
    area: Rect,
    block: Block,
    option: &ChartOption,
    cells: &[HeatCell],
) {
    let x_labels = categories(option);
    let y_labels = option
        .y_axis
        .as_ref()
        .map(|axis| axis.data.as_slice())
        .unwrap_or(&[]);
    let (min, max) = option
        .visual_map
        .as_ref()
        .map(|scale| (scale.min, scale.max))
        .unwrap_or((-1.0, 1.0));

    let grid = heat_grid(cells, x_labels.len(), y_labels.len());
    let label_width = y_labels.iter().map(|l| l.chars().count()).max().unwrap_or(0).min(16) as u16;

    let header = TableRow::new(
        std::iter::once(Cell::from(""))
            .chain(x_labels.iter().map(|l| Cell::from(l.clone()))),
    )
    .style(Theme::heading());

    let rows = y_labels.iter().zip(&grid).map(|(label, values)| {
        let cells = values.iter().map(|value| match value {
            Some(v) => {
                let bg = Theme::heat(*v, min, max);
                Cell::from(format!("{:.2}", v)).style(Style::default().bg(bg).fg(Theme::heat_text(bg)))
            }
            None => Cell::from("").style(Theme::text_dim()),
        });
        TableRow::new(std::iter::once(Cell::from(label.clone()).style(Theme::text_secondary())).chain(cells))
    });

    let widths = std::iter::once(Constraint::Length(label_width))
        .chain(x_labels.iter().map(|_| Constraint::Length(7)));
    let scale = format!("scale {} .. {}", format_number(min), format_number(max));
    let table = Table::new(rows, widths)
        .header(header)
        .column_spacing(1)
        .block(block.title_bottom(Line::from(scale).right_aligned()));
    frame.render_widget(table, area);
}
