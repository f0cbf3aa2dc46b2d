use nixvis_dashboard::selector::WebsiteSelector;
use nixvis_dashboard::{DateRange, RankingKind, RankingRow, SelectorStyle};
use ratzilla::ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line as TextLine, Span, Text},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Cell, Paragraph, Row, Table, Tabs, Wrap},
    Frame,
};

use crate::api::TrafficPoint;
use crate::format::{format_count, format_traffic, share};
use crate::widgets::{DashboardView, SeriesState};

const ACCENT: Color = Color::Rgb(0, 0, 238);

pub fn render_page(
    view: &DashboardView,
    selector: &WebsiteSelector,
    range: DateRange,
    f: &mut Frame<'_>,
) {
    let area = f.area();
    let block = Block::default()
        .title("NixVis")
        .title_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));
    let inner = block.inner(area).inner(Margin::new(1, 1));
    f.render_widget(block, area);

    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(15),
        ])
        .split(inner);

    render_header(view, selector, range, f, main_layout[0]);
    render_status(view, f, main_layout[1]);
    render_summary(view, f, main_layout[2]);

    let content = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(main_layout[3]);

    render_traffic_chart(&view.traffic, f, content[0]);
    render_locations(&view.locations, f, content[1]);
    render_rankings(view, f, main_layout[4]);
}

fn render_header(
    view: &DashboardView,
    selector: &WebsiteSelector,
    range: DateRange,
    f: &mut Frame<'_>,
    area: Rect,
) {
    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let website_block = Block::default()
        .title("Website")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let website_area = website_block.inner(layout[0]);
    f.render_widget(website_block, layout[0]);

    let resolved = view.initialized || selector.is_enabled() || selector.load_failed();
    if !resolved {
        f.render_widget(muted("Loading websites..."), website_area);
    } else if let Some(placeholder) = selector.placeholder() {
        f.render_widget(muted(placeholder), website_area);
    } else {
        match selector.style() {
            SelectorStyle::Tabs => render_website_tabs(selector, f, website_area),
            SelectorStyle::Dropdown => render_website_dropdown(selector, f, website_area),
        }
    }

    let range_block = Block::default()
        .title("Range")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let titles = DateRange::ALL
        .iter()
        .map(|range| TextLine::from(range.label()))
        .collect::<Vec<_>>();
    let tabs = Tabs::new(titles)
        .block(range_block)
        .select(range.index())
        .style(Style::default().fg(Color::Gray))
        .highlight_style(highlight())
        .divider(Span::raw("|"));
    f.render_widget(tabs, layout[1]);
}

fn render_website_tabs(selector: &WebsiteSelector, f: &mut Frame<'_>, area: Rect) {
    let titles = selector
        .entries()
        .map(|entry| TextLine::from(entry.label.to_string()))
        .collect::<Vec<_>>();
    let mut tabs = Tabs::new(titles)
        .style(Style::default().fg(Color::Gray))
        .highlight_style(highlight())
        .divider(Span::raw("|"));
    if let Some(index) = selector.active_index() {
        tabs = tabs.select(index);
    }
    f.render_widget(tabs, area);
}

fn render_website_dropdown(selector: &WebsiteSelector, f: &mut Frame<'_>, area: Rect) {
    let Some(active) = selector.entries().find(|entry| entry.active) else {
        f.render_widget(muted("No website selected"), area);
        return;
    };
    let position = selector.active_index().map_or(0, |index| index + 1);

    let line = TextLine::from(vec![
        Span::styled("‹ ", Style::default().fg(Color::Gray)),
        Span::styled(active.label.to_string(), highlight()),
        Span::styled(" ›", Style::default().fg(Color::Gray)),
        Span::raw("  "),
        Span::styled(
            format!("{position}/{}", selector.websites().len()),
            Style::default().fg(Color::Gray),
        ),
    ]);
    f.render_widget(Paragraph::new(Text::from(line)), area);
}

fn render_status(view: &DashboardView, f: &mut Frame<'_>, area: Rect) {
    let line = view.error.as_deref().map_or_else(
        || {
            TextLine::from(vec![
                Span::styled("←/→", Style::default().fg(Color::Gray)),
                Span::raw(" website  "),
                Span::styled("1-4", Style::default().fg(Color::Gray)),
                Span::raw(" range  "),
                Span::styled("↑/↓", Style::default().fg(Color::Gray)),
                Span::raw(" table"),
            ])
        },
        |message| {
            TextLine::from(Span::styled(
                message.to_string(),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ))
        },
    );
    f.render_widget(
        Paragraph::new(Text::from(line)).alignment(Alignment::Center),
        area,
    );
}

fn render_summary(view: &DashboardView, f: &mut Frame<'_>, area: Rect) {
    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    let (uv, pv, traffic) = view.overall.map_or_else(
        || ("-".to_string(), "-".to_string(), "-".to_string()),
        |overall| {
            (
                format_count(overall.uv),
                format_count(overall.pv),
                format_traffic(overall.traffic),
            )
        },
    );

    let cards = [
        ("Visitors (UV)", uv),
        ("Page views (PV)", pv),
        ("Traffic", traffic),
    ];
    for (index, (title, value)) in cards.into_iter().enumerate() {
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Gray));
        let paragraph = Paragraph::new(Span::styled(
            value,
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ))
        .block(block)
        .alignment(Alignment::Center);
        f.render_widget(paragraph, layout[index]);
    }
}

fn render_traffic_chart(state: &SeriesState<Vec<TrafficPoint>>, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .title("Page views")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let points = match state {
        SeriesState::Ready(points) if !points.is_empty() => points,
        other => {
            f.render_widget(muted(series_message(other, "No traffic recorded")), inner);
            return;
        }
    };

    let count = u16::try_from(points.len()).unwrap_or(u16::MAX).max(1);
    let bar_width = (inner.width / count).saturating_sub(1).max(1);

    let bars: Vec<Bar<'_>> = points
        .iter()
        .map(|point| {
            Bar::default()
                .value(point.pv)
                .label(TextLine::from(point.label.clone()))
                .style(Style::default().fg(ACCENT))
                .value_style(Style::default().fg(Color::White))
        })
        .collect();

    let max_value = points.iter().map(|point| point.pv).max().unwrap_or(0).max(1);

    let chart = BarChart::default()
        .block(Block::default())
        .data(BarGroup::default().bars(&bars))
        .max(max_value)
        .bar_gap(1)
        .bar_width(bar_width);

    f.render_widget(chart, inner);
}

fn render_locations(state: &SeriesState<Vec<RankingRow>>, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .title("Regions")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = match state {
        SeriesState::Ready(rows) if !rows.is_empty() => rows,
        other => {
            f.render_widget(muted(series_message(other, "No regions recorded")), inner);
            return;
        }
    };

    let label_width = rows
        .iter()
        .map(|row| row.label.chars().count())
        .max()
        .unwrap_or(0)
        .min(16);
    let bar_width = usize::from(inner.width).saturating_sub(label_width + 10).max(1);
    let max_value = rows.iter().map(|row| row.count).max().unwrap_or(1).max(1);

    let lines = rows
        .iter()
        .map(|row| {
            let fill = proportional(row.count, max_value, bar_width);
            let bar = format!("{}{}", "█".repeat(fill), "░".repeat(bar_width - fill));
            let label: String = row.label.chars().take(label_width).collect();
            TextLine::from(vec![
                Span::styled(
                    format!("{label:<label_width$}"),
                    Style::default().fg(Color::White),
                ),
                Span::raw(" "),
                Span::styled(bar, Style::default().fg(Color::Cyan)),
                Span::raw(format!("  {}", format_count(row.count))),
            ])
        })
        .collect::<Vec<_>>();

    let paragraph = Paragraph::new(Text::from(lines))
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, inner);
}

fn render_rankings(view: &DashboardView, f: &mut Frame<'_>, area: Rect) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(area);

    let titles = RankingKind::ALL
        .iter()
        .map(|kind| TextLine::from(kind.label()))
        .collect::<Vec<_>>();
    let tabs = Tabs::new(titles)
        .select(view.ranking_tab)
        .style(Style::default().fg(Color::Gray))
        .highlight_style(highlight())
        .divider(Span::raw("|"));
    f.render_widget(tabs, layout[0]);

    let table_area = layout[2];
    let kind = view.ranking_kind();
    let rows = view.rankings.get(&kind).map_or(&[][..], Vec::as_slice);
    if rows.is_empty() {
        let message = if view.overall.is_some() {
            "No data for this period"
        } else {
            "Waiting for statistics"
        };
        f.render_widget(muted(message), table_area);
        return;
    }

    let header = Row::new(vec![
        Cell::from("#"),
        Cell::from(kind.label()),
        Cell::from("Visits"),
        Cell::from("Share"),
    ])
    .style(
        Style::default()
            .fg(ACCENT)
            .bg(Color::Rgb(200, 200, 200))
            .add_modifier(Modifier::BOLD),
    );

    let total = rows.iter().map(|row| row.count).sum::<u64>();
    let body = rows.iter().enumerate().map(|(index, row)| {
        Row::new(vec![
            Cell::from((index + 1).to_string()),
            Cell::from(row.label.clone()),
            Cell::from(format_count(row.count)),
            Cell::from(format!("{:.1}%", share(row.count, total))),
        ])
        .style(Style::default().fg(Color::White))
    });

    let table = Table::new(
        body,
        [
            Constraint::Length(4),
            Constraint::Min(20),
            Constraint::Length(12),
            Constraint::Length(8),
        ],
    )
    .header(header)
    .column_spacing(1);

    f.render_widget(table, table_area);
}

fn series_message<T>(state: &SeriesState<T>, empty: &'static str) -> &'static str {
    match state {
        SeriesState::Idle => "No website selected",
        SeriesState::Loading => "Loading...",
        SeriesState::Unavailable => "Data unavailable",
        SeriesState::Ready(_) => empty,
    }
}

/// Filled cells of a `width`-wide bar for `value` out of `max`. Any non-zero
/// value gets at least one cell.
fn proportional(value: u64, max: u64, width: usize) -> usize {
    if value == 0 || max == 0 || width == 0 {
        return 0;
    }
    #[allow(clippy::cast_precision_loss)]
    let ratio = value as f64 / max as f64;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let fill = (ratio * width as f64).round() as usize;
    fill.clamp(1, width)
}

fn muted(message: &str) -> Paragraph<'_> {
    Paragraph::new(message)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Gray))
}

fn highlight() -> Style {
    Style::default()
        .fg(Color::White)
        .bg(ACCENT)
        .add_modifier(Modifier::BOLD)
}
