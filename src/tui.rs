//! Terminal dashboard: tabbed navigation over the four pages.
//!
//! Tab/Shift-Tab or 1-4 switch pages, Left/Right change the page's
//! selection, [ ] and { } move the time-range bounds, r resets the range,
//! q or Esc quits.

use std::io;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols;
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Axis, Bar, BarChart, BarGroup, Block, Borders, Chart as ChartWidget,
    Dataset as LineDataset, GraphType, Paragraph, Tabs,
};
use ratatui::{Frame, Terminal};

use crate::charts::{viridis, CategoryBar, Chart};
use crate::models::{Dataset, PostType, SkillColumn};
use crate::pages::{self, PageView, ViewParams, PAGE_NAMES};
use crate::stats::HistogramBin;

/// Restores the terminal even when drawing panics.
struct TerminalCleanup;

impl Drop for TerminalCleanup {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

struct App<'a> {
    data: &'a Dataset,
    page_index: usize,
    post_index: usize,
    skill_index: usize,
    time_range: (f64, f64),
    time_bounds: (f64, f64),
    view: Option<PageView>,
}

impl<'a> App<'a> {
    fn new(data: &'a Dataset) -> Self {
        let params = ViewParams::initial(data);
        let time_bounds = params.time_range;
        let mut app = Self {
            data,
            page_index: 0,
            post_index: 0,
            skill_index: 0,
            time_range: params.time_range,
            time_bounds,
            view: None,
        };
        app.rebuild();
        app
    }

    fn params(&self) -> ViewParams {
        ViewParams {
            post_type: PostType::ALL[self.post_index],
            skill: SkillColumn::ALL[self.skill_index],
            time_range: self.time_range,
        }
    }

    /// One synchronous recompute pass; every interaction ends here.
    fn rebuild(&mut self) {
        let params = self.params();
        self.view = pages::dispatch(self.data, PAGE_NAMES[self.page_index], &params);
    }

    fn range_step(&self) -> f64 {
        (self.time_bounds.1 - self.time_bounds.0) / 20.0
    }

    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Tab => {
                self.page_index = (self.page_index + 1) % PAGE_NAMES.len();
            }
            KeyCode::BackTab => {
                self.page_index = (self.page_index + PAGE_NAMES.len() - 1) % PAGE_NAMES.len();
            }
            KeyCode::Char(c @ '1'..='4') => {
                self.page_index = c as usize - '1' as usize;
            }
            KeyCode::Left | KeyCode::Char('h') => self.shift_selection(-1),
            KeyCode::Right | KeyCode::Char('l') => self.shift_selection(1),
            KeyCode::Char('[') => self.shift_low(-self.range_step()),
            KeyCode::Char(']') => self.shift_low(self.range_step()),
            KeyCode::Char('{') => self.shift_high(-self.range_step()),
            KeyCode::Char('}') => self.shift_high(self.range_step()),
            KeyCode::Char('r') => self.time_range = self.time_bounds,
            _ => return false,
        }
        self.rebuild();
        false
    }

    fn shift_selection(&mut self, delta: isize) {
        match PAGE_NAMES[self.page_index] {
            "Overview" => {
                let n = PostType::ALL.len();
                self.post_index = (self.post_index as isize + delta).rem_euclid(n as isize) as usize;
            }
            "Skills" => {
                let n = SkillColumn::ALL.len();
                self.skill_index =
                    (self.skill_index as isize + delta).rem_euclid(n as isize) as usize;
            }
            _ => {}
        }
    }

    fn shift_low(&mut self, delta: f64) {
        let low = (self.time_range.0 + delta)
            .clamp(self.time_bounds.0, self.time_range.1);
        self.time_range.0 = low;
    }

    fn shift_high(&mut self, delta: f64) {
        let high = (self.time_range.1 + delta)
            .clamp(self.time_range.0, self.time_bounds.1);
        self.time_range.1 = high;
    }
}

pub fn run(data: &Dataset) -> anyhow::Result<()> {
    enable_raw_mode()?;
    execute!(io::stdout(), EnterAlternateScreen)?;
    let _cleanup = TerminalCleanup;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;
    let mut app = App::new(data);

    loop {
        terminal.draw(|frame| draw(frame, &app))?;
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press && app.handle_key(key.code) {
                break;
            }
        }
    }

    Ok(())
}

fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(1),
        ])
        .split(frame.area());

    draw_tabs(frame, chunks[0], app);
    draw_header(frame, chunks[1], app);
    draw_body(frame, chunks[2], app);
    draw_footer(frame, chunks[3], app);
}

fn draw_footer(frame: &mut Frame, area: Rect, _app: &App) {
    let footer = Paragraph::new(Line::from(
        "Tab/Shift-Tab or 1-4 switch pages  \u{2190}/\u{2192} change selection  \
         [ ] { } move time bounds  r reset range  q/Esc quit",
    ))
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, area);
}

fn draw_tabs(frame: &mut Frame, area: Rect, app: &App) {
    let titles: Vec<Line> = PAGE_NAMES.iter().map(|name| Line::from(*name)).collect();
    let tabs = Tabs::new(titles)
        .select(app.page_index)
        .block(Block::default().borders(Borders::ALL).title("Navigation"))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(tabs, area);
}

fn draw_header(frame: &mut Frame, area: Rect, app: &App) {
    let Some(view) = &app.view else {
        return;
    };
    let control = match PAGE_NAMES[app.page_index] {
        "Overview" => format!(
            "Post type: < {} >  ({}/{})",
            PostType::ALL[app.post_index].column_name(),
            app.post_index + 1,
            PostType::ALL.len()
        ),
        "Time and Approval" => format!(
            "Time range: [{:.0} .. {:.0}]  (data spans {:.0} .. {:.0})",
            app.time_range.0, app.time_range.1, app.time_bounds.0, app.time_bounds.1
        ),
        "Skills" => format!(
            "Skill: < {} >  ({}/{})",
            SkillColumn::ALL[app.skill_index].column_name(),
            app.skill_index + 1,
            SkillColumn::ALL.len()
        ),
        _ => String::new(),
    };

    let lines = vec![
        Line::from(Span::styled(
            view.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(if control.is_empty() {
            view.intro.clone()
        } else {
            control
        }),
    ];
    frame.render_widget(Paragraph::new(lines), area);
}

fn draw_body(frame: &mut Frame, area: Rect, app: &App) {
    let Some(view) = &app.view else {
        return;
    };

    if let Some(error) = &view.error {
        let message = Paragraph::new(error.as_str())
            .style(Style::default().fg(Color::Red))
            .block(Block::default().borders(Borders::ALL).title("Error"));
        frame.render_widget(message, area);
        return;
    }

    match view.charts.len() {
        0 => {}
        1 => draw_chart(frame, area, &view.charts[0]),
        _ => {
            let halves = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                .split(area);
            for (chart, half) in view.charts.iter().zip(halves.iter()) {
                draw_chart(frame, *half, chart);
            }
        }
    }
}

fn draw_chart(frame: &mut Frame, area: Rect, chart: &Chart) {
    match chart {
        Chart::Histogram {
            title,
            bins,
            density,
            ..
        } => {
            if density.is_empty() {
                draw_histogram(frame, area, title, bins);
            } else {
                let halves = Layout::default()
                    .direction(Direction::Horizontal)
                    .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
                    .split(area);
                draw_histogram(frame, halves[0], title, bins);
                draw_density(frame, halves[1], density);
            }
        }
        Chart::CategoryCounts { title, bars, .. } => draw_bars(frame, area, title, bars),
        Chart::Heatmap {
            title,
            labels,
            matrix,
        } => draw_heatmap(frame, area, title, labels, matrix),
    }
}

fn draw_histogram(frame: &mut Frame, area: Rect, title: &str, bins: &[HistogramBin]) {
    if bins.is_empty() {
        draw_empty(frame, area, title);
        return;
    }
    let bars: Vec<Bar> = bins
        .iter()
        .map(|bin| {
            Bar::default()
                .value(bin.count as u64)
                .label(Line::from(format!("{:.0}", bin.start)))
                .style(Style::default().fg(Color::Cyan))
        })
        .collect();
    let widget = BarChart::default()
        .block(Block::default().borders(Borders::ALL).title(title.to_string()))
        .data(BarGroup::default().bars(&bars))
        .bar_width(6)
        .bar_gap(1);
    frame.render_widget(widget, area);
}

fn draw_density(frame: &mut Frame, area: Rect, density: &[(f64, f64)]) {
    let x_min = density.first().map(|p| p.0).unwrap_or(0.0);
    let x_max = density.last().map(|p| p.0).unwrap_or(1.0);
    let y_max = density.iter().map(|p| p.1).fold(0.0, f64::max);

    let datasets = vec![LineDataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Magenta))
        .data(density)];
    let widget = ChartWidget::new(datasets)
        .block(Block::default().borders(Borders::ALL).title("Density"))
        .x_axis(
            Axis::default()
                .bounds([x_min, x_max])
                .labels(vec![format!("{x_min:.0}"), format!("{x_max:.0}")]),
        )
        .y_axis(Axis::default().bounds([0.0, y_max * 1.05]));
    frame.render_widget(widget, area);
}

fn draw_bars(frame: &mut Frame, area: Rect, title: &str, category_bars: &[CategoryBar]) {
    if category_bars.is_empty() {
        draw_empty(frame, area, title);
        return;
    }
    let bars: Vec<Bar> = category_bars
        .iter()
        .map(|bar| {
            let (r, g, b) = bar.color;
            Bar::default()
                .value(bar.count as u64)
                .label(Line::from(bar.label.clone()))
                .style(Style::default().fg(Color::Rgb(r, g, b)))
        })
        .collect();
    let widget = BarChart::default()
        .block(Block::default().borders(Borders::ALL).title(title.to_string()))
        .data(BarGroup::default().bars(&bars))
        .bar_width(7)
        .bar_gap(1);
    frame.render_widget(widget, area);
}

fn draw_heatmap(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    labels: &[String],
    matrix: &[Vec<f64>],
) {
    const CELL: usize = 7;
    const GUTTER: usize = 14;

    let mut lines = Vec::with_capacity(matrix.len() + 1);
    let mut header = vec![Span::raw(format!("{:>GUTTER$}", ""))];
    for label in labels {
        header.push(Span::styled(
            format!(" {:>width$}", clip(label, CELL), width = CELL),
            Style::default().add_modifier(Modifier::BOLD),
        ));
    }
    lines.push(Line::from(header));

    for (label, row) in labels.iter().zip(matrix) {
        let mut spans = vec![Span::styled(
            format!("{:>GUTTER$}", clip(label, GUTTER)),
            Style::default().add_modifier(Modifier::BOLD),
        )];
        for &value in row {
            let (text, style) = if value.is_nan() {
                (
                    format!(" {:>width$}", "nan", width = CELL),
                    Style::default().fg(Color::DarkGray),
                )
            } else {
                let (r, g, b) = viridis((value + 1.0) / 2.0);
                let fg = if value.abs() > 0.5 { Color::Black } else { Color::White };
                (
                    format!(" {value:>width$.2}", width = CELL),
                    Style::default().bg(Color::Rgb(r, g, b)).fg(fg),
                )
            };
            spans.push(Span::styled(text, style));
        }
        lines.push(Line::from(spans));
    }

    let widget = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(title.to_string()));
    frame.render_widget(widget, area);
}

fn draw_empty(frame: &mut Frame, area: Rect, title: &str) {
    let widget = Paragraph::new("(no data in range)")
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL).title(title.to_string()));
    frame.render_widget(widget, area);
}

fn clip(label: &str, width: usize) -> &str {
    &label[..label.len().min(width)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::sample_record;

    fn app_data() -> Dataset {
        Dataset::new(vec![
            sample_record(10.0, "yes", "3,4"),
            sample_record(20.0, "no", "2"),
            sample_record(30.0, "yes", "4"),
        ])
    }

    #[test]
    fn tab_cycles_through_all_pages() {
        let data = app_data();
        let mut app = App::new(&data);
        for expected in [1, 2, 3, 0] {
            app.handle_key(KeyCode::Tab);
            assert_eq!(app.page_index, expected);
            assert!(app.view.is_some());
        }
    }

    #[test]
    fn selection_keys_only_affect_the_active_page() {
        let data = app_data();
        let mut app = App::new(&data);
        app.handle_key(KeyCode::Right);
        assert_eq!(app.post_index, 1);
        assert_eq!(app.skill_index, 0);

        app.handle_key(KeyCode::Char('3'));
        app.handle_key(KeyCode::Right);
        assert_eq!(app.post_index, 1);
        assert_eq!(app.skill_index, 1);
    }

    #[test]
    fn range_bounds_stay_clamped_and_ordered() {
        let data = app_data();
        let mut app = App::new(&data);
        app.handle_key(KeyCode::Char('2'));

        for _ in 0..100 {
            app.handle_key(KeyCode::Char(']'));
        }
        assert!(app.time_range.0 <= app.time_range.1);
        assert_eq!(app.time_range.0, app.time_range.1);

        app.handle_key(KeyCode::Char('r'));
        assert_eq!(app.time_range, app.time_bounds);

        for _ in 0..100 {
            app.handle_key(KeyCode::Char('{'));
        }
        assert!(app.time_range.1 >= app.time_range.0);
    }

    #[test]
    fn quit_keys_end_the_loop() {
        let data = app_data();
        let mut app = App::new(&data);
        assert!(app.handle_key(KeyCode::Char('q')));
        assert!(app.handle_key(KeyCode::Esc));
        assert!(!app.handle_key(KeyCode::Tab));
    }
}
