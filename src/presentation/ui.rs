use crate::application::{App, Focus};
use crate::domain::{ChartData, PrimaryFilter, SubFilter};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Padding, Paragraph},
    Frame,
};

const TITLE: &str = "National/International Users";
const HEADER_BG: &str = "#0A5678";
const BAR_GAP: u16 = 4;

pub fn render_ui(f: &mut Frame, app: &App) {
    let filter_height = if app.sub_filter_visible() { 4 } else { 3 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(filter_height),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.area());

    render_header(f, chunks[0]);
    render_filters(f, app, chunks[1]);
    render_chart_area(f, app, chunks[2]);
    render_status_bar(f, app, chunks[3]);
}

fn hex_color(hex: &str) -> Color {
    hex.parse().unwrap_or(Color::Reset)
}

fn render_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new(TITLE)
        .alignment(Alignment::Center)
        .style(
            Style::default()
                .bg(hex_color(HEADER_BG))
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .block(Block::default().padding(Padding::new(0, 0, 1, 0)));
    f.render_widget(header, area);
}

fn render_filters(f: &mut Frame, app: &App, area: Rect) {
    let mut lines = vec![select_line(
        "Filter Users:",
        PrimaryFilter::ALL.iter().map(PrimaryFilter::label),
        app.filter.primary.label(),
        app.focus == Focus::Filter,
    )];

    if app.sub_filter_visible() {
        lines.push(select_line(
            "Sub-Filter:  ",
            SubFilter::ALL.iter().map(SubFilter::label),
            app.filter.sub.label(),
            app.focus == Focus::SubFilter,
        ));
    }

    let filters = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Filters"));
    f.render_widget(filters, area);
}

/// One select control: a label followed by its options, the chosen one
/// bracketed and highlighted.
fn select_line<'a>(
    label: &'a str,
    options: impl Iterator<Item = &'a str>,
    selected: &str,
    focused: bool,
) -> Line<'a> {
    let label_style = if focused {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };

    let mut spans = vec![Span::styled(label, label_style), Span::raw(" ")];
    for option in options {
        if option == selected {
            let style = if focused {
                Style::default().bg(Color::LightBlue).fg(Color::Black)
            } else {
                Style::default().fg(Color::Cyan)
            };
            spans.push(Span::styled(format!("[{}]", option), style));
        } else {
            spans.push(Span::raw(format!(" {} ", option)));
        }
        spans.push(Span::raw(" "));
    }
    Line::from(spans)
}

fn render_chart_area(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title("Users");
    let inner = block.inner(area);
    f.render_widget(block, area);

    match &app.chart {
        Some(chart) => render_chart(f, chart, inner),
        None => f.render_widget(Paragraph::new("Loading..."), inner),
    }
}

fn render_chart(f: &mut Frame, chart: &ChartData, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(area);

    let legend = Line::from(vec![
        Span::styled("■ ", Style::default().fg(hex_color(chart.style.background[0]))),
        Span::styled("■ ", Style::default().fg(hex_color(chart.style.background[1]))),
        Span::raw(chart.dataset_label),
    ]);
    f.render_widget(Paragraph::new(legend).alignment(Alignment::Center), chunks[0]);

    let bars: Vec<Bar> = chart
        .labels
        .iter()
        .zip(chart.counts)
        .enumerate()
        .map(|(index, (label, count))| {
            let fill = hex_color(chart.style.background[index]);
            let border = hex_color(chart.style.border[index]);
            Bar::default()
                .value(count as u64)
                .label(Line::from(*label))
                .style(Style::default().fg(fill))
                .value_style(Style::default().fg(border).bg(fill).add_modifier(Modifier::BOLD))
        })
        .collect();

    // Bars stretch to the available width instead of keeping a fixed shape.
    let slots = chart.labels.len() as u16;
    let usable = chunks[1].width.saturating_sub(BAR_GAP * (slots + 1));
    let bar_width = (usable / slots).clamp(1, chart.style.bar_thickness);
    let max_value = chart.counts.iter().copied().max().unwrap_or(0).max(1) as u64;

    let bar_chart = BarChart::default()
        .data(BarGroup::default().bars(&bars))
        .bar_width(bar_width)
        .bar_gap(BAR_GAP)
        .max(max_value);
    f.render_widget(bar_chart, centered(chunks[1], bar_width * slots + BAR_GAP * (slots - 1)));
}

fn centered(area: Rect, width: u16) -> Rect {
    let width = width.min(area.width);
    Rect {
        x: area.x + (area.width - width) / 2,
        width,
        ..area
    }
}

fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let mut text = String::from("Tab: switch select | ←/→: change option | 1/2/3: All/Government/Non-Government");
    if app.sub_filter_visible() {
        text.push_str(" | g: toggle GSI");
    }
    text.push_str(" | q: quit");

    let status = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title("Keys"))
        .style(Style::default().fg(Color::Gray));
    f.render_widget(status, area);
}
