// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use anyhow::Result;
use chrono::{Local, NaiveDate};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::info;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame, Terminal,
};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

use crate::api::RatesSource;
use crate::app::{App, FetchOutcome, FetchRequest, Focus};
use crate::currencies::get_currency_data;

const TICK: Duration = Duration::from_millis(100);

/// Runs currency fetches on the tokio worker pool and hands the results back
/// to the UI loop over a channel.
pub struct Dispatcher {
    source: Arc<dyn RatesSource>,
    reference_date: Option<NaiveDate>,
    runtime: Handle,
    tx: UnboundedSender<FetchOutcome>,
    tasks: Vec<JoinHandle<()>>,
}

impl Dispatcher {
    pub fn new(
        source: Arc<dyn RatesSource>,
        reference_date: Option<NaiveDate>,
        runtime: Handle,
    ) -> (Self, UnboundedReceiver<FetchOutcome>) {
        let (tx, rx) = unbounded_channel();
        let dispatcher = Self {
            source,
            reference_date,
            runtime,
            tx,
            tasks: Vec::new(),
        };
        (dispatcher, rx)
    }

    pub fn submit(&mut self, request: FetchRequest) {
        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        let today = self
            .reference_date
            .unwrap_or_else(|| Local::now().date_naive());

        self.tasks.retain(|task| !task.is_finished());
        self.tasks.push(self.runtime.spawn(async move {
            let result = get_currency_data(source.as_ref(), today).await;
            // The receiver is gone only once the UI has exited.
            let _ = tx.send(FetchOutcome::new(request, result));
        }));
    }

    /// Wait for every submitted fetch. Nothing is cancelled.
    pub async fn drain(self) {
        let pending = self.tasks.len();
        if pending > 0 {
            info!("Waiting for {} background fetch(es) to finish", pending);
        }
        futures::future::join_all(self.tasks).await;
    }
}

pub fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
    dispatcher: &mut Dispatcher,
    outcomes: &mut UnboundedReceiver<FetchOutcome>,
) -> Result<()> {
    dispatcher.submit(app.start_loading());

    loop {
        while let Ok(outcome) = outcomes.try_recv() {
            app.apply(outcome);
        }

        terminal.draw(|f| draw_ui(f, &app))?;

        if !event::poll(TICK)? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        if app.notice().is_some() {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter) {
                app.dismiss_notice();
            }
            continue;
        }

        let ctrl_c = key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c');
        if ctrl_c || key.code == KeyCode::Esc {
            return Ok(());
        }

        match (app.focus(), key.code) {
            (_, KeyCode::Tab) => app.toggle_focus(),
            (_, KeyCode::Enter) => {
                if let Some(request) = app.request_conversion() {
                    dispatcher.submit(request);
                }
            }
            (Focus::Countries, KeyCode::Char('q')) => return Ok(()),
            (Focus::Countries, KeyCode::Char('r')) => dispatcher.submit(app.start_loading()),
            (Focus::Countries, KeyCode::Down) => app.next(),
            (Focus::Countries, KeyCode::Up) => app.previous(),
            (Focus::Amount, KeyCode::Backspace) => app.pop_char(),
            (Focus::Amount, KeyCode::Char(c)) => app.push_char(c),
            _ => {}
        }
    }
}

fn border_style(active: bool) -> Style {
    if active {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    }
}

fn draw_ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(f.size());

    let title = Paragraph::new("Currency Converter")
        .style(Style::default().fg(Color::Cyan))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(chunks[1]);

    draw_countries(f, app, body[0]);

    let form = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)])
        .split(body[1]);

    let amount = Paragraph::new(app.amount()).block(
        Block::default()
            .title("Enter amount in USD")
            .borders(Borders::ALL)
            .border_style(border_style(app.focus() == Focus::Amount)),
    );
    f.render_widget(amount, form[0]);

    let lines: Vec<Line> = app
        .result_lines()
        .iter()
        .map(|line| Line::from(line.as_str()))
        .collect();
    let result = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().title("Result").borders(Borders::ALL));
    f.render_widget(result, form[1]);

    let convert_hint = if app.convert_enabled() {
        "Enter convert"
    } else {
        "Enter (busy)"
    };
    let help = Paragraph::new(Line::from(vec![
        Span::raw("Tab switch field | Up/Down pick country | "),
        Span::raw(convert_hint),
        Span::raw(" | r reload | q/Esc quit"),
    ]))
    .style(Style::default().fg(Color::DarkGray));
    f.render_widget(help, chunks[2]);

    if let Some(notice) = app.notice() {
        let area = centered_rect(50, 5, f.size());
        let popup = Paragraph::new(notice)
            .wrap(Wrap { trim: true })
            .block(Block::default().title("Error").borders(Borders::ALL))
            .style(Style::default().fg(Color::Red));
        f.render_widget(Clear, area);
        f.render_widget(popup, area);
    }
}

fn draw_countries(f: &mut Frame, app: &App, area: Rect) {
    let title = if app.countries_enabled() {
        "Select Currency"
    } else {
        "Select Currency (loading)"
    };
    let item_style = if app.countries_enabled() {
        Style::default()
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let items: Vec<ListItem> = app
        .countries()
        .iter()
        .map(|country| ListItem::new(Line::from(Span::styled(country.as_str(), item_style))))
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(border_style(app.focus() == Focus::Countries)),
        )
        .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");

    let mut state = ListState::default().with_selected(app.selected());
    f.render_stateful_widget(list, area, &mut state);
}

fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

/// Open the conversion form and block until the user quits. Fetches still in
/// flight are awaited before returning.
pub async fn start_tui(source: Arc<dyn RatesSource>, reference_date: Option<NaiveDate>) -> Result<()> {
    let (mut dispatcher, mut outcomes) = Dispatcher::new(source, reference_date, Handle::current());

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = tokio::task::block_in_place(|| {
        run_app(&mut terminal, App::new(), &mut dispatcher, &mut outcomes)
    });

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    dispatcher.drain().await;
    res
}
