// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use foodlog_app::{
    APP_TITLE, AppCommand, AppState, CHART_TITLE, CHART_X_LABEL, CHART_Y_LABEL, ChartSeries,
    ChartView, Dish, DishId, EntryForm, Field, ListingView, NewDish, SubmitError, TabKind,
};
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Axis, Block, Borders, Chart, Clear, Dataset, GraphType, Paragraph, Row, Table, Tabs, Wrap,
};
use ratatui::{Frame, Terminal};
use std::io;
use std::time::{Duration, Instant};
use time::Date;

const FOCUS_MARK: &str = "▸";
const LISTING_TITLE: &str = "Все блюда";
const FORM_TITLE: &str = "Новое блюдо";
const RANGE_TITLE: &str = "Период";
const DIALOG_HINT: &str = "Enter или Esc: закрыть";
const STATUS_TTL: Duration = Duration::from_secs(4);
const POLL_INTERVAL: Duration = Duration::from_millis(120);

/// Everything the UI needs from the outside world.
pub trait AppRuntime {
    fn list_dishes(&mut self) -> Result<Vec<Dish>>;
    fn list_dishes_in_range(&mut self, from: Date, to: Date) -> Result<Vec<Dish>>;
    fn insert_dish(&mut self, dish: &NewDish) -> Result<DishId>;
    fn today(&self) -> Date {
        foodlog_app::today()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ViewData {
    form: EntryForm,
    listing: ListingView,
    chart: ChartView,
    status_deadline: Option<Instant>,
}

impl ViewData {
    fn new(today: Date, chart_days: u32) -> Self {
        Self {
            form: EntryForm::new(today),
            listing: ListingView::default(),
            chart: ChartView::new(today, chart_days),
            status_deadline: None,
        }
    }
}

/// Runs the interactive loop until `Ctrl+Q`. The terminal is restored before
/// returning, whether or not the loop failed.
pub fn run_app<R: AppRuntime>(state: &mut AppState, runtime: &mut R, chart_days: u32) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    if let Err(error) = execute!(stdout, terminal::EnterAlternateScreen) {
        let _ = disable_raw_mode();
        return Err(error).context("enter alternate screen");
    }

    let result = Terminal::new(CrosstermBackend::new(stdout))
        .context("create terminal")
        .and_then(|mut terminal| event_loop(&mut terminal, state, runtime, chart_days));

    let restored = disable_raw_mode()
        .context("disable raw mode")
        .and_then(|()| {
            execute!(io::stdout(), terminal::LeaveAlternateScreen)
                .context("leave alternate screen")
        });
    log::info!("terminal restored");
    result.and(restored)
}

fn event_loop<B: Backend, R: AppRuntime>(
    terminal: &mut Terminal<B>,
    state: &mut AppState,
    runtime: &mut R,
    chart_days: u32,
) -> Result<()> {
    let mut view_data = ViewData::new(runtime.today(), chart_days);
    load_listing(state, runtime, &mut view_data);

    loop {
        expire_status(state, &mut view_data, Instant::now());

        terminal
            .draw(|frame| render(frame, state, &view_data))
            .context("draw frame")?;

        if !event::poll(POLL_INTERVAL).context("poll event")? {
            continue;
        }
        if let Event::Key(key) = event::read().context("read event")?
            && key.kind != KeyEventKind::Release
            && handle_key_event(state, runtime, &mut view_data, key)
        {
            return Ok(());
        }
    }
}

fn load_listing<R: AppRuntime>(state: &mut AppState, runtime: &mut R, view_data: &mut ViewData) {
    match runtime.list_dishes() {
        Ok(dishes) => {
            log::debug!("loaded {} dishes", dishes.len());
            view_data.listing.refresh(&dishes);
        }
        Err(error) => {
            log::error!("load dishes: {error:#}");
            state.dispatch(AppCommand::ShowError(format!(
                "Не удалось загрузить блюда: {error:#}"
            )));
        }
    }
}

/// Checked once per poll tick; a newer status pushes the deadline out.
fn expire_status(state: &mut AppState, view_data: &mut ViewData, now: Instant) {
    if view_data.status_deadline.is_some_and(|deadline| now >= deadline) {
        view_data.status_deadline = None;
        state.dispatch(AppCommand::ClearStatus);
    }
}

fn dispatch_with_status(state: &mut AppState, view_data: &mut ViewData, command: AppCommand) {
    state.dispatch(command);
    view_data.status_deadline = Some(Instant::now() + STATUS_TTL);
}

/// Returns `true` when the app should exit.
fn handle_key_event<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    key: KeyEvent,
) -> bool {
    let control = key.modifiers.contains(KeyModifiers::CONTROL);

    if control && key.code == KeyCode::Char('q') {
        return true;
    }

    if state.dialog.is_some() {
        if matches!(key.code, KeyCode::Esc | KeyCode::Enter) {
            state.dispatch(AppCommand::DismissDialog);
        }
        return false;
    }

    match (key.code, control) {
        (KeyCode::Char('n'), true) | (KeyCode::F(2), _) => {
            state.dispatch(AppCommand::NextTab);
            return false;
        }
        (KeyCode::Char('p'), true) => {
            state.dispatch(AppCommand::PrevTab);
            return false;
        }
        _ => {}
    }

    match state.active_tab {
        TabKind::Entry => handle_entry_key(state, runtime, view_data, key),
        TabKind::Chart => handle_chart_key(state, runtime, view_data, key),
    }
    false
}

fn handle_entry_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    key: KeyEvent,
) {
    match key.code {
        KeyCode::Tab | KeyCode::Down => view_data.form.focus_next(),
        KeyCode::BackTab | KeyCode::Up => view_data.form.focus_prev(),
        KeyCode::Enter => submit_entry(state, runtime, view_data),
        KeyCode::Backspace => view_data.form.backspace(),
        KeyCode::Char(ch) if is_text_input(key) => view_data.form.insert_char(ch),
        _ => {}
    }
}

fn handle_chart_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    key: KeyEvent,
) {
    match key.code {
        KeyCode::Tab | KeyCode::Down | KeyCode::BackTab | KeyCode::Up => {
            view_data.chart.toggle_focus();
        }
        KeyCode::Enter => render_chart(state, runtime, view_data),
        KeyCode::Backspace => view_data.chart.backspace(),
        KeyCode::Char(ch) if is_text_input(key) => view_data.chart.insert_char(ch),
        _ => {}
    }
}

fn is_text_input(key: KeyEvent) -> bool {
    !key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
}

fn submit_entry<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
) {
    let today = runtime.today();
    match view_data.form.submit(today, |dish| runtime.insert_dish(dish)) {
        Ok(dish) => {
            view_data.listing.append(&dish);
            dispatch_with_status(state, view_data, AppCommand::DishSaved(dish.id));
        }
        Err(error) => report_error(state, &error),
    }
}

fn render_chart<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
) {
    let points = match view_data
        .chart
        .render(|from, to| runtime.list_dishes_in_range(from, to))
    {
        Ok(series) => series.points().len(),
        Err(error) => {
            report_error(state, &error);
            return;
        }
    };
    dispatch_with_status(state, view_data, AppCommand::ChartPlotted(points));
}

fn report_error(state: &mut AppState, error: &SubmitError) {
    match error {
        SubmitError::Storage(source) => log::error!("storage: {source:#}"),
        SubmitError::Invalid(invalid) => log::debug!("rejected input: {invalid}"),
    }
    state.dispatch(AppCommand::ShowError(error.message()));
}

fn render(frame: &mut Frame<'_>, state: &AppState, view_data: &ViewData) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let selected = TabKind::ALL
        .iter()
        .position(|tab| *tab == state.active_tab)
        .unwrap_or(0);
    let tabs = Tabs::new(TabKind::ALL.iter().map(|tab| tab.label()))
        .block(Block::default().title(APP_TITLE).borders(Borders::ALL))
        .style(Style::default().fg(Color::White))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .select(selected);
    frame.render_widget(tabs, layout[0]);

    match state.active_tab {
        TabKind::Entry => render_entry_tab(frame, layout[1], view_data),
        TabKind::Chart => render_chart_tab(frame, layout[1], view_data),
    }

    let status = Paragraph::new(status_text(state))
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, layout[2]);

    if let Some(dialog) = &state.dialog {
        let area = centered_rect(60, 30, frame.area());
        frame.render_widget(Clear, area);
        let body = Paragraph::new(vec![
            Line::from(dialog.message.as_str()),
            Line::default(),
            Line::from(Span::styled(
                DIALOG_HINT,
                Style::default().fg(Color::DarkGray),
            )),
        ])
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(dialog.title.as_str())
                .borders(Borders::ALL)
                .style(Style::default().fg(Color::Red)),
        );
        frame.render_widget(body, area);
    }
}

fn render_entry_tab(frame: &mut Frame<'_>, area: Rect, view_data: &ViewData) {
    let split = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(Field::ENTRY.len() as u16 + 2),
            Constraint::Min(3),
        ])
        .split(area);

    let form = &view_data.form;
    let lines = Field::ENTRY
        .iter()
        .map(|field| input_line(*field, form.value(*field), form.focused() == *field))
        .collect::<Vec<_>>();
    frame.render_widget(
        Paragraph::new(lines).block(Block::default().title(FORM_TITLE).borders(Borders::ALL)),
        split[0],
    );

    let header = Row::new(view_data.listing.headers()).style(
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    );
    let rows = view_data
        .listing
        .rows()
        .iter()
        .map(|row| Row::new(row.cells.iter().map(String::as_str)));
    let widths = [
        Constraint::Percentage(30),
        Constraint::Percentage(14),
        Constraint::Percentage(14),
        Constraint::Percentage(14),
        Constraint::Percentage(14),
        Constraint::Percentage(14),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().title(LISTING_TITLE).borders(Borders::ALL));
    frame.render_widget(table, split[1]);
}

fn render_chart_tab(frame: &mut Frame<'_>, area: Rect, view_data: &ViewData) {
    let split = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(Field::RANGE.len() as u16 + 2),
            Constraint::Min(3),
        ])
        .split(area);

    let chart = &view_data.chart;
    let lines = vec![
        input_line(Field::DateFrom, &chart.from, chart.focused() == Field::DateFrom),
        input_line(Field::DateTo, &chart.to, chart.focused() == Field::DateTo),
    ];
    frame.render_widget(
        Paragraph::new(lines).block(Block::default().title(RANGE_TITLE).borders(Borders::ALL)),
        split[0],
    );

    let block = Block::default().title(CHART_TITLE).borders(Borders::ALL);
    let series = chart.series();
    let data = series.data();
    let datasets = if series.is_empty() {
        Vec::new()
    } else {
        vec![
            Dataset::default()
                .name(CHART_Y_LABEL)
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(Color::Cyan))
                .data(&data),
        ]
    };
    let [low, high] = series.y_bounds();
    let widget = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .title(CHART_X_LABEL)
                .bounds(series.x_bounds())
                .labels(x_axis_labels(series)),
        )
        .y_axis(
            Axis::default()
                .title(CHART_Y_LABEL)
                .bounds([low, high])
                .labels([format!("{low:.0}"), format!("{high:.0}")]),
        );
    frame.render_widget(widget, split[1]);
}

/// Dish names under each point. The axis line is only drawn with labels, and
/// it needs two to span, so short series are padded with blanks.
fn x_axis_labels(series: &ChartSeries) -> Vec<String> {
    let mut labels = series
        .labels()
        .into_iter()
        .map(str::to_owned)
        .collect::<Vec<_>>();
    while labels.len() < 2 {
        labels.push(String::new());
    }
    labels
}

fn input_line(field: Field, value: &str, focused: bool) -> Line<'static> {
    let marker = if focused { FOCUS_MARK } else { " " };
    let label_style = if focused {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    let value_span = if value.is_empty() {
        Span::styled(
            field.placeholder().to_owned(),
            Style::default().fg(Color::DarkGray),
        )
    } else {
        Span::raw(value.to_owned())
    };
    Line::from(vec![
        Span::styled(format!("{marker} {}: ", field.label()), label_style),
        value_span,
    ])
}

fn status_text(state: &AppState) -> String {
    if let Some(status) = &state.status_line {
        return status.clone();
    }
    let action = match state.active_tab {
        TabKind::Entry => "Enter: добавить",
        TabKind::Chart => "Enter: построить график",
    };
    format!("{action} · Tab: следующее поле · Ctrl+N/Ctrl+P: вкладки · Ctrl+Q: выход")
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
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
