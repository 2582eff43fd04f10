use std::{io, time::Duration};
use anyhow::Result;
use chrono::NaiveDate;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{Bar, BarChart, BarGroup, Block, Borders, BorderType, Paragraph, Padding},
};
use tracing::warn;
use zenith_core::{bucket, Bucket, Granularity, Task};
use zenith_core::usecase::report::{shift, window_label};

struct Theme {
    primary: Color,
    muted: Color,
    text: Color,
    bar: Color,
}

const THEME: Theme = Theme {
    primary: Color::Cyan,
    muted: Color::DarkGray,
    text: Color::White,
    bar: Color::Green,
};

pub struct ReportApp {
    tasks: Vec<Task>,
    today: NaiveDate,
    pub granularity: Granularity,
    pub reference: NaiveDate,
    pub buckets: Vec<Bucket>,
}

impl ReportApp {
    pub fn new(tasks: Vec<Task>, granularity: Granularity, reference: NaiveDate, today: NaiveDate) -> Self {
        let buckets = bucket(&tasks, granularity, reference);
        Self { tasks, today, granularity, reference, buckets }
    }

    fn refresh(&mut self) {
        self.buckets = bucket(&self.tasks, self.granularity, self.reference);
    }

    pub fn step(&mut self, steps: i32) {
        match shift(self.granularity, self.reference, steps) {
            Ok(reference) => {
                self.reference = reference;
                self.refresh();
            }
            Err(err) => warn!(error = %err, "cannot move report window"),
        }
    }

    pub fn set_granularity(&mut self, granularity: Granularity) {
        self.granularity = granularity;
        self.refresh();
    }

    pub fn reset(&mut self) {
        self.reference = self.today;
        self.refresh();
    }

    pub fn total(&self) -> usize {
        self.buckets.iter().map(|b| b.count).sum()
    }
}

pub fn run(tasks: Vec<Task>, granularity: Granularity, reference: NaiveDate, today: NaiveDate) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = ReportApp::new(tasks, granularity, reference, today);
    let res = run_loop(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn run_loop(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut ReportApp) -> Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                        KeyCode::Left | KeyCode::Char('h') => app.step(-1),
                        KeyCode::Right | KeyCode::Char('l') => app.step(1),
                        KeyCode::Char('w') => app.set_granularity(Granularity::Week),
                        KeyCode::Char('m') => app.set_granularity(Granularity::Month),
                        KeyCode::Char('y') => app.set_granularity(Granularity::Year),
                        KeyCode::Char('t') => app.reset(),
                        _ => {}
                    }
                }
            }
        }
    }
}

fn ui(frame: &mut Frame, app: &ReportApp) {
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(1),
        ])
        .split(frame.area());

    let header_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(24),
            Constraint::Min(1),
            Constraint::Length(34),
        ])
        .split(main_layout[0]);

    let app_title = Paragraph::new(Span::styled("ZENITH COMPLETIONS", Style::default().fg(THEME.primary).add_modifier(Modifier::BOLD)))
        .block(Block::default().padding(Padding::new(0, 0, 1, 0)));
    frame.render_widget(app_title, header_layout[0]);

    let nav_text = Line::from(vec![
        Span::styled(" < ", Style::default().fg(THEME.text)),
        Span::styled(window_label(app.granularity, app.reference), Style::default().fg(THEME.text).add_modifier(Modifier::BOLD)),
        Span::styled(" > ", Style::default().fg(THEME.text)),
    ]);
    let nav = Paragraph::new(nav_text).alignment(Alignment::Right).block(Block::default().padding(Padding::new(0, 0, 1, 0)));
    frame.render_widget(nav, header_layout[2]);

    frame.render_widget(
        Block::default().borders(Borders::BOTTOM).border_style(Style::default().fg(THEME.muted)),
        main_layout[0],
    );

    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(75),
            Constraint::Length(1),
            Constraint::Percentage(25),
        ])
        .split(main_layout[1]);

    draw_chart(frame, app, content_chunks[0]);
    draw_summary(frame, app, content_chunks[2]);

    let help = Line::from(vec![
        Span::styled("NAV: ", Style::default().fg(THEME.muted)),
        Span::styled("←/→ ", Style::default().fg(THEME.text)),
        Span::styled(" VIEW: ", Style::default().fg(THEME.muted)),
        Span::styled("w/m/y ", Style::default().fg(THEME.text)),
        Span::styled(" TODAY: ", Style::default().fg(THEME.muted)),
        Span::styled("t ", Style::default().fg(THEME.text)),
        Span::styled(" QUIT: ", Style::default().fg(THEME.muted)),
        Span::styled("q", Style::default().fg(THEME.text)),
    ]);
    frame.render_widget(Paragraph::new(help).alignment(Alignment::Center), main_layout[2]);
}

fn draw_chart(frame: &mut Frame, app: &ReportApp, area: Rect) {
    let bars: Vec<Bar> = app
        .buckets
        .iter()
        .map(|b| {
            Bar::default()
                .label(Line::from(b.label.clone()))
                .value(b.count as u64)
                .style(Style::default().fg(THEME.bar))
                .text_value(if b.count > 0 { b.count.to_string() } else { String::new() })
        })
        .collect();

    // month view has up to 31 bars
    let bar_width = match app.granularity {
        Granularity::Week => 7,
        Granularity::Month => 2,
        Granularity::Year => 4,
    };

    let chart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(THEME.muted))
                .title(" Tasks Completed "),
        )
        .bar_width(bar_width)
        .bar_gap(1)
        .data(BarGroup::default().bars(&bars));

    frame.render_widget(chart, area);
}

fn draw_summary(frame: &mut Frame, app: &ReportApp, area: Rect) {
    let peak = app.buckets.iter().max_by_key(|b| b.count).filter(|b| b.count > 0);

    let lines = vec![
        Line::from(vec![Span::styled("Overview", Style::default().add_modifier(Modifier::BOLD))]),
        Line::from(""),
        Line::from(vec![
            Span::styled("Total: ", Style::default().fg(THEME.muted)),
            Span::styled(app.total().to_string(), Style::default().fg(THEME.bar).add_modifier(Modifier::BOLD)),
        ]),
        Line::from(vec![
            Span::styled("Best:  ", Style::default().fg(THEME.muted)),
            Span::styled(
                peak.map(|b| format!("{} ({})", b.label, b.count)).unwrap_or_else(|| "-".to_string()),
                Style::default().fg(THEME.text),
            ),
        ]),
    ];

    let summary = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(THEME.muted))
            .title(" Summary "),
    );
    frame.render_widget(summary, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigation_recomputes_buckets() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 13).unwrap();
        let mut app = ReportApp::new(Vec::new(), Granularity::Week, today, today);
        assert_eq!(app.buckets.len(), 7);

        app.set_granularity(Granularity::Month);
        assert_eq!(app.buckets.len(), 31);
        app.step(-1);
        assert_eq!(app.reference, NaiveDate::from_ymd_opt(2024, 2, 13).unwrap());
        assert_eq!(app.buckets.len(), 29);

        app.set_granularity(Granularity::Year);
        assert_eq!(app.buckets.len(), 12);
        app.reset();
        assert_eq!(app.reference, today);
        assert_eq!(app.total(), 0);
    }
}
