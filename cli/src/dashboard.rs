use std::{io, time::Duration};
use anyhow::Result;
use chrono::Local;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{Bar, BarChart, BarGroup, Block, Borders, BorderType, Gauge, Padding, Paragraph, Row, Table},
};
use tracing::warn;
use fleetrent_core::{
    display_category, format_amount, AccountingReport, RentalRepository, ReportPeriod, ReportUseCase,
};

use crate::summary::truncate;

// --- THEME ---
struct Theme {
    primary: Color,
    muted: Color,
    text: Color,
    paid: Color,
    pending: Color,
    cancelled: Color,
}

const THEME: Theme = Theme {
    primary: Color::Cyan,
    muted: Color::DarkGray,
    text: Color::White,
    paid: Color::Green,
    pending: Color::Yellow,
    cancelled: Color::Red,
};

pub struct DashboardApp {
    pub period: ReportPeriod,
    pub recent_limit: usize,
    pub report: AccountingReport,
    pub error: Option<String>,
}

impl DashboardApp {
    pub fn new(period: ReportPeriod, recent_limit: usize, report: AccountingReport) -> Self {
        Self {
            period,
            recent_limit,
            report,
            error: None,
        }
    }

    /// Rebuilds the report for the current period. On a store failure the last
    /// good report stays on screen and the error is shown in the footer.
    pub fn refresh<R: RentalRepository>(&mut self, repo: &R) {
        match ReportUseCase::new(repo).generate(self.period, self.recent_limit, &Local::now()) {
            Ok(report) => {
                self.report = report;
                self.error = None;
            }
            Err(e) => {
                warn!(error = %e, "dashboard refresh failed");
                self.error = Some(e.to_string());
            }
        }
    }

    pub fn next_period(&mut self) {
        self.period = self.period.next();
    }

    pub fn previous_period(&mut self) {
        self.period = self.period.previous();
    }
}

pub fn run<R: RentalRepository>(repo: &R, period: ReportPeriod, recent_limit: usize) -> Result<()> {
    // A failing store aborts before the terminal is taken over
    let report = ReportUseCase::new(repo).generate(period, recent_limit, &Local::now())?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = DashboardApp::new(period, recent_limit, report);
    let res = event_loop(&mut terminal, &mut app, repo);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn event_loop<R: RentalRepository>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut DashboardApp,
    repo: &R,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                        KeyCode::Left | KeyCode::Char('h') => {
                            app.previous_period();
                            app.refresh(repo);
                        }
                        KeyCode::Right | KeyCode::Char('l') => {
                            app.next_period();
                            app.refresh(repo);
                        }
                        KeyCode::Char('r') => app.refresh(repo),
                        _ => {}
                    }
                }
            }
        }
    }
}

fn ui(frame: &mut Frame, app: &DashboardApp) {
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(12),   // Chart + side panel
            Constraint::Length(9), // Recent transactions
            Constraint::Length(1), // Footer
        ])
        .split(frame.area());

    draw_header(frame, app, main_layout[0]);

    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(60),
            Constraint::Length(1),
            Constraint::Percentage(40),
        ])
        .split(main_layout[1]);

    draw_trend_chart(frame, &app.report, content_chunks[0]);
    draw_info_panel(frame, &app.report, content_chunks[2]);
    draw_recent(frame, &app.report, main_layout[2]);
    draw_footer(frame, app, main_layout[3]);
}

fn draw_header(frame: &mut Frame, app: &DashboardApp, area: Rect) {
    let header_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(24),
            Constraint::Min(1),
            Constraint::Length(30),
        ])
        .split(area);

    let title = Paragraph::new(Span::styled("FLEETRENT ACCOUNTING", Style::default().fg(THEME.primary).add_modifier(Modifier::BOLD)))
        .block(Block::default().padding(Padding::new(0, 0, 1, 0)));
    frame.render_widget(title, header_layout[0]);

    let nav = Paragraph::new(Line::from(vec![
        Span::styled(" < ", Style::default().fg(THEME.text)),
        Span::styled(format!(" {} ", app.period.title()), Style::default().fg(THEME.text).add_modifier(Modifier::BOLD)),
        Span::styled(" > ", Style::default().fg(THEME.text)),
    ]))
    .alignment(Alignment::Right)
    .block(Block::default().padding(Padding::new(0, 0, 1, 0)));
    frame.render_widget(nav, header_layout[2]);

    frame.render_widget(
        Block::default().borders(Borders::BOTTOM).border_style(Style::default().fg(THEME.muted)),
        area,
    );
}

fn draw_trend_chart(frame: &mut Frame, report: &AccountingReport, area: Rect) {
    // Bar height in thousands; the bar text shows the rental count
    let bar_items: Vec<Bar> = report.summary.monthly_series.iter().map(|point| {
        let value = (point.total_income.max(0) / 1_000) as u64;
        Bar::default()
            .label(point.label.as_str())
            .value(value)
            .style(Style::default().fg(THEME.paid))
            .text_value(if point.rental_count > 0 { format!("{}x", point.rental_count) } else { String::new() })
    }).collect();

    let chart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(THEME.muted))
                .title(" Income, last 6 months (thousands) "),
        )
        .bar_width(8)
        .bar_gap(1)
        .data(BarGroup::default().bars(&bar_items));

    frame.render_widget(chart, area);
}

fn draw_info_panel(frame: &mut Frame, report: &AccountingReport, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(10), // Totals
            Constraint::Length(3),  // Collected gauge
            Constraint::Min(3),     // Categories
        ])
        .split(area);

    let summary = &report.summary;
    let card = |label: &'static str, value: String, color: Color| {
        Line::from(vec![
            Span::styled(label, Style::default().fg(THEME.muted)),
            Span::styled(value, Style::default().fg(color).add_modifier(Modifier::BOLD)),
        ])
    };

    let info_text = vec![
        card("Total:      ", format_amount(summary.total_income), THEME.text),
        card("Paid:       ", format_amount(summary.paid_income), THEME.paid),
        card("Pending:    ", format_amount(summary.pending_income), THEME.pending),
        card("Cancelled:  ", format_amount(summary.other_income()), THEME.cancelled),
        Line::from(""),
        card("Rentals:    ", report.record_count.to_string(), THEME.text),
        card("Avg days:   ", format!("{:.1}", summary.average_duration_days), THEME.text),
        card("Avg / day:  ", format_amount(summary.average_daily_rate.round() as i64), THEME.text),
    ];

    let info = Paragraph::new(info_text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(THEME.muted))
            .title(" Summary "),
    );
    frame.render_widget(info, chunks[0]);

    let ratio = if summary.total_income > 0 {
        (summary.paid_income as f64 / summary.total_income as f64).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let gauge = Gauge::default()
        .block(Block::default().title(" Collected ").borders(Borders::ALL).border_type(BorderType::Rounded).border_style(Style::default().fg(THEME.muted)))
        .gauge_style(Style::default().fg(THEME.paid))
        .ratio(ratio)
        .label(format!("{:.0}% paid", ratio * 100.0));
    frame.render_widget(gauge, chunks[1]);

    let category_lines: Vec<Line> = if summary.income_by_category.is_empty() {
        vec![Line::from(Span::styled("No rentals", Style::default().fg(THEME.muted)))]
    } else {
        summary.income_by_category.iter().map(|c| {
            Line::from(vec![
                Span::styled(format!("{:<12}", truncate(&display_category(&c.category), 12)), Style::default().fg(THEME.text)),
                Span::styled(format_amount(c.total_income), Style::default().fg(THEME.primary)),
            ])
        }).collect()
    };
    let categories = Paragraph::new(category_lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(THEME.muted))
            .title(" By Category "),
    );
    frame.render_widget(categories, chunks[2]);
}

fn draw_recent(frame: &mut Frame, report: &AccountingReport, area: Rect) {
    let rows: Vec<Row> = report.recent.iter().map(|rental| {
        let status_color = match rental.payment_status {
            fleetrent_core::PaymentStatus::Paid => THEME.paid,
            fleetrent_core::PaymentStatus::Pending => THEME.pending,
            fleetrent_core::PaymentStatus::Cancelled => THEME.cancelled,
        };
        Row::new(vec![
            Span::raw(rental.created_at.with_timezone(&Local).format("%m-%d").to_string()),
            Span::raw(truncate(&rental.renter_name, 20)),
            Span::raw(truncate(&rental.destination, 16)),
            Span::styled(rental.payment_status.to_string(), Style::default().fg(status_color)),
            Span::raw(format_amount(rental.payment_amount)),
        ])
    }).collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(6),  // Date
            Constraint::Min(12),    // Renter
            Constraint::Length(17), // Destination
            Constraint::Length(10), // Status
            Constraint::Length(14), // Amount
        ],
    )
    .header(Row::new(vec!["Date", "Renter", "Destination", "Status", "Amount"]).style(Style::default().fg(THEME.primary)))
    .block(
        Block::default()
            .title(" Recent Transactions ")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(THEME.muted)),
    );

    frame.render_widget(table, area);
}

fn draw_footer(frame: &mut Frame, app: &DashboardApp, area: Rect) {
    let line = match &app.error {
        Some(err) => Line::from(Span::styled(format!("Refresh failed: {}", err), Style::default().fg(THEME.cancelled))),
        None => Line::from(vec![
            Span::styled("PERIOD: ", Style::default().fg(THEME.muted)),
            Span::styled("←/→ ", Style::default().fg(THEME.text)),
            Span::raw("  "),
            Span::styled("RELOAD: ", Style::default().fg(THEME.muted)),
            Span::styled("r ", Style::default().fg(THEME.text)),
            Span::raw("  "),
            Span::styled("QUIT: ", Style::default().fg(THEME.muted)),
            Span::styled("q", Style::default().fg(THEME.text)),
        ]),
    };
    frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}
