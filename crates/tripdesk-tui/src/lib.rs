// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Tabs, Wrap};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;
use time::OffsetDateTime;
use tracing::{debug, info, warn};
use tripdesk_app::{
    BrowserCommand, BrowserEvent, BrowserState, CollectionKind, Notification, Record, RecordId,
    Route, SessionContext, Severity, detail_sections,
};

const DETAIL_OPEN: &str = "▾";
const DETAIL_CLOSED: &str = "▸";
const STATUS_CLEAR_AFTER: Duration = Duration::from_secs(4);

/// Everything the browser needs from the outside world. The `spawn_*`
/// defaults run inline and post their result on `tx`; implementations that
/// talk to a real server override them to run on a worker thread.
pub trait AppRuntime {
    fn fetch_records(&mut self, kind: CollectionKind) -> Result<Vec<Record>>;
    fn delete_record(&mut self, kind: CollectionKind, id: &RecordId) -> Result<()>;
    fn open_route(&mut self, route: &Route) -> Result<()>;

    /// Called once when the signed-in session lapses.
    fn end_session(&mut self) {}

    fn spawn_fetch(
        &mut self,
        request_id: u64,
        kind: CollectionKind,
        tx: Sender<InternalEvent>,
    ) -> Result<()> {
        let result = self
            .fetch_records(kind)
            .map_err(|error| format!("{error:#}"));
        tx.send(InternalEvent::FetchCompleted {
            request_id,
            kind,
            result,
        })
        .map_err(|_| anyhow::anyhow!("fetch event channel closed"))?;
        Ok(())
    }

    fn spawn_delete(
        &mut self,
        request_id: u64,
        kind: CollectionKind,
        id: RecordId,
        tx: Sender<InternalEvent>,
    ) -> Result<()> {
        let result = self
            .delete_record(kind, &id)
            .map_err(|error| format!("{error:#}"));
        tx.send(InternalEvent::DeleteCompleted {
            request_id,
            kind,
            id,
            result,
        })
        .map_err(|_| anyhow::anyhow!("delete event channel closed"))?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InternalEvent {
    ClearStatus {
        token: u64,
    },
    FetchCompleted {
        request_id: u64,
        kind: CollectionKind,
        result: Result<Vec<Record>, String>,
    },
    DeleteCompleted {
        request_id: u64,
        kind: CollectionKind,
        id: RecordId,
        result: Result<(), String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum InputMode {
    #[default]
    Nav,
    Search,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct ViewData {
    mode: InputMode,
    /// Cursor within the rows of the current page.
    selected_row: usize,
    help_visible: bool,
    status_token: u64,
    fetch_request: u64,
    delete_request: u64,
    delete_in_flight: Option<(u64, RecordId)>,
}

pub fn run_app<R: AppRuntime>(
    state: &mut BrowserState,
    session: &mut SessionContext,
    runtime: &mut R,
) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut view_data = ViewData::default();
    let (internal_tx, internal_rx) = mpsc::channel();

    reload(state, runtime, &mut view_data, &internal_tx);

    let mut result = Ok(());
    loop {
        process_internal_events(state, runtime, &mut view_data, &internal_tx, &internal_rx);
        check_session(
            state,
            runtime,
            &mut view_data,
            &internal_tx,
            session,
            OffsetDateTime::now_utc(),
        );

        if let Err(error) = terminal.draw(|frame| render(frame, state, session, &view_data)) {
            result = Err(error).context("draw frame");
            break;
        }

        let has_event = event::poll(Duration::from_millis(120)).context("poll event")?;
        if has_event {
            match event::read().context("read event")? {
                Event::Key(key) => {
                    if handle_key_event(state, runtime, &mut view_data, &internal_tx, key) {
                        break;
                    }
                }
                Event::Resize(_, _) => {}
                _ => {}
            }
        }
    }

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    result
}

fn process_internal_events<R: AppRuntime>(
    state: &mut BrowserState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    rx: &Receiver<InternalEvent>,
) {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::ClearStatus { token } if token == view_data.status_token => {
                state.dispatch(BrowserCommand::ClearNotification);
            }
            InternalEvent::ClearStatus { .. } => {}
            InternalEvent::FetchCompleted {
                request_id,
                kind,
                result,
            } => {
                if request_id != view_data.fetch_request || kind != state.collection() {
                    debug!(
                        request_id,
                        collection = kind.as_str(),
                        "discarding stale fetch result"
                    );
                    continue;
                }
                let command = match result {
                    Ok(records) => BrowserCommand::Loaded(records),
                    Err(error) => {
                        warn!(collection = kind.as_str(), %error, "fetch failed");
                        BrowserCommand::LoadFailed(error)
                    }
                };
                apply_command(state, runtime, view_data, tx, command);
            }
            InternalEvent::DeleteCompleted {
                request_id,
                kind,
                id,
                result,
            } => {
                let expected = view_data
                    .delete_in_flight
                    .as_ref()
                    .map(|(request, _)| *request);
                if expected != Some(request_id) {
                    continue;
                }
                view_data.delete_in_flight = None;

                let visible = kind == state.collection() && state.record(&id).is_some();
                let command = match result {
                    Ok(()) if visible => BrowserCommand::RecordDeleted(id),
                    Ok(()) => BrowserCommand::Notify(Notification::deleted(kind)),
                    Err(error) if kind == state.collection() => BrowserCommand::DeleteFailed(error),
                    Err(error) => BrowserCommand::Notify(Notification::delete_failed(kind, &error)),
                };
                apply_command(state, runtime, view_data, tx, command);
            }
        }
    }
}

/// Dispatches `command` and carries out the side effects its events ask for.
fn apply_command<R: AppRuntime>(
    state: &mut BrowserState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    command: BrowserCommand,
) -> Vec<BrowserEvent> {
    let events = state.dispatch(command);
    for event in &events {
        match event {
            BrowserEvent::Notified(notification) => {
                debug!(
                    severity = notification.severity.as_str(),
                    title = %notification.title,
                    "status updated"
                );
                view_data.status_token = view_data.status_token.saturating_add(1);
                schedule_status_clear(tx, view_data.status_token);
            }
            BrowserEvent::CollectionChanged(_) => start_fetch(state, runtime, view_data, tx),
            BrowserEvent::DeleteConfirmed(id) => {
                start_delete(state, runtime, view_data, tx, id.clone());
            }
            BrowserEvent::PageChanged(_) | BrowserEvent::QueryChanged(_) => {
                view_data.selected_row = 0;
            }
            _ => {}
        }
    }
    clamp_cursor(state, view_data);
    events
}

fn reload<R: AppRuntime>(
    state: &mut BrowserState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
) {
    apply_command(state, runtime, view_data, tx, BrowserCommand::LoadStarted);
    start_fetch(state, runtime, view_data, tx);
}

fn start_fetch<R: AppRuntime>(
    state: &mut BrowserState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
) {
    view_data.fetch_request = view_data.fetch_request.wrapping_add(1);
    let kind = state.collection();
    debug!(
        collection = kind.as_str(),
        request_id = view_data.fetch_request,
        "fetch requested"
    );
    if let Err(error) = runtime.spawn_fetch(view_data.fetch_request, kind, tx.clone()) {
        apply_command(
            state,
            runtime,
            view_data,
            tx,
            BrowserCommand::LoadFailed(error.to_string()),
        );
    }
}

fn start_delete<R: AppRuntime>(
    state: &mut BrowserState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    id: RecordId,
) {
    view_data.delete_request = view_data.delete_request.wrapping_add(1);
    let request_id = view_data.delete_request;
    view_data.delete_in_flight = Some((request_id, id.clone()));
    let kind = state.collection();
    info!(collection = kind.as_str(), id = %id, "delete confirmed");
    if let Err(error) = runtime.spawn_delete(request_id, kind, id, tx.clone()) {
        view_data.delete_in_flight = None;
        apply_command(
            state,
            runtime,
            view_data,
            tx,
            BrowserCommand::DeleteFailed(error.to_string()),
        );
    }
}

fn open_route<R: AppRuntime>(
    state: &mut BrowserState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    route: Route,
) {
    let path = route.path();
    let notification = match runtime.open_route(&route) {
        Ok(()) => {
            info!(path = %path, "opened console route");
            Notification::info(format!("opened {path} in the browser"))
        }
        Err(error) => {
            warn!(path = %path, %error, "open console route failed");
            Notification::error(format!("could not open {path}: {error}"))
        }
    };
    apply_command(
        state,
        runtime,
        view_data,
        tx,
        BrowserCommand::Notify(notification),
    );
}

/// Clears a lapsed session and tells the user. Returns true on the tick that
/// expired it.
fn check_session<R: AppRuntime>(
    state: &mut BrowserState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    session: &mut SessionContext,
    now: OffsetDateTime,
) -> bool {
    if !session.expire_if_due(now) {
        return false;
    }
    warn!("session expired");
    runtime.end_session();
    apply_command(
        state,
        runtime,
        view_data,
        tx,
        BrowserCommand::Notify(Notification::session_expired()),
    );
    true
}

fn schedule_status_clear(internal_tx: &Sender<InternalEvent>, token: u64) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(STATUS_CLEAR_AFTER);
        let _ = sender.send(InternalEvent::ClearStatus { token });
    });
}

fn clamp_cursor(state: &BrowserState, view_data: &mut ViewData) {
    let rows = state.page_rows().len();
    view_data.selected_row = view_data.selected_row.min(rows.saturating_sub(1));
}

fn selected_record_id(state: &BrowserState, view_data: &ViewData) -> Option<RecordId> {
    state
        .page_rows()
        .get(view_data.selected_row)
        .map(|record| record.id().clone())
}

fn handle_key_event<R: AppRuntime>(
    state: &mut BrowserState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    if key.code == KeyCode::Char('q') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }

    if view_data.help_visible {
        if key.code == KeyCode::Esc || key.code == KeyCode::Char('?') {
            view_data.help_visible = false;
        }
        return false;
    }

    if state.pending_delete().is_some() {
        let command = match key.code {
            KeyCode::Char('y') | KeyCode::Enter => BrowserCommand::ConfirmDelete,
            KeyCode::Char('n') | KeyCode::Esc => BrowserCommand::CancelDelete,
            _ => return false,
        };
        apply_command(state, runtime, view_data, internal_tx, command);
        return false;
    }

    match view_data.mode {
        InputMode::Search => handle_search_key(state, runtime, view_data, internal_tx, key),
        InputMode::Nav => handle_nav_key(state, runtime, view_data, internal_tx, key),
    }
    false
}

fn handle_search_key<R: AppRuntime>(
    state: &mut BrowserState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    let command = match key.code {
        KeyCode::Esc | KeyCode::Enter => {
            view_data.mode = InputMode::Nav;
            return;
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            BrowserCommand::SetQuery(String::new())
        }
        KeyCode::Backspace => BrowserCommand::PopQueryChar,
        KeyCode::Tab => BrowserCommand::NextCriterion,
        KeyCode::BackTab => BrowserCommand::PrevCriterion,
        KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            BrowserCommand::PushQueryChar(ch)
        }
        _ => return,
    };
    apply_command(state, runtime, view_data, tx, command);
}

fn handle_nav_key<R: AppRuntime>(
    state: &mut BrowserState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    let kind = state.collection();
    let command = match key.code {
        KeyCode::Char('?') => {
            view_data.help_visible = true;
            return;
        }
        KeyCode::Char('/') => {
            view_data.mode = InputMode::Search;
            return;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            let last = state.page_rows().len().saturating_sub(1);
            view_data.selected_row = (view_data.selected_row + 1).min(last);
            return;
        }
        KeyCode::Char('k') | KeyCode::Up => {
            view_data.selected_row = view_data.selected_row.saturating_sub(1);
            return;
        }
        KeyCode::Char('g') => {
            view_data.selected_row = 0;
            return;
        }
        KeyCode::Char('G') => {
            view_data.selected_row = state.page_rows().len().saturating_sub(1);
            return;
        }
        KeyCode::Char('r') if view_data.delete_in_flight.is_some() => delete_busy(),
        KeyCode::Char('r') => {
            reload(state, runtime, view_data, tx);
            return;
        }
        KeyCode::Char('v') => {
            open_route(state, runtime, view_data, tx, Route::ViewCollection(kind));
            return;
        }
        KeyCode::Char('a') => {
            open_route(state, runtime, view_data, tx, Route::AddRecord(kind));
            return;
        }
        KeyCode::Char('R') => {
            open_route(state, runtime, view_data, tx, Route::Report(kind));
            return;
        }
        KeyCode::Char('e') => {
            let Some(id) = selected_record_id(state, view_data) else {
                return;
            };
            open_route(state, runtime, view_data, tx, Route::UpdateRecord(kind, id));
            return;
        }
        KeyCode::Char('d') | KeyCode::Delete => {
            let Some(id) = selected_record_id(state, view_data) else {
                return;
            };
            if view_data.delete_in_flight.is_some() {
                delete_busy()
            } else {
                BrowserCommand::RequestDelete(id)
            }
        }
        KeyCode::Enter | KeyCode::Char(' ') => {
            let Some(id) = selected_record_id(state, view_data) else {
                return;
            };
            BrowserCommand::ToggleExpand(id)
        }
        KeyCode::Esc => {
            if let Some(id) = state.expanded().cloned() {
                BrowserCommand::ToggleExpand(id)
            } else if !state.query().is_empty() {
                BrowserCommand::SetQuery(String::new())
            } else {
                return;
            }
        }
        KeyCode::Char('n') | KeyCode::Right | KeyCode::PageDown => BrowserCommand::NextPage,
        KeyCode::Char('p') | KeyCode::Left | KeyCode::PageUp => BrowserCommand::PrevPage,
        KeyCode::Home => BrowserCommand::GoToPage(0),
        KeyCode::End => BrowserCommand::GoToPage(state.page_count().saturating_sub(1)),
        KeyCode::Char(digit @ '1'..='9') => {
            BrowserCommand::GoToPage(digit as usize - '1' as usize)
        }
        KeyCode::Char('c') => BrowserCommand::NextCriterion,
        KeyCode::Char('C') => BrowserCommand::PrevCriterion,
        KeyCode::Tab | KeyCode::Char('f') | KeyCode::BackTab | KeyCode::Char('b')
            if view_data.delete_in_flight.is_some() =>
        {
            delete_busy()
        }
        KeyCode::Tab | KeyCode::Char('f') => BrowserCommand::SwitchCollection(kind.next()),
        KeyCode::BackTab | KeyCode::Char('b') => BrowserCommand::SwitchCollection(kind.prev()),
        _ => return,
    };
    apply_command(state, runtime, view_data, tx, command);
}

/// Reloads and collection switches wait for an in-flight delete so the
/// removal lands on the list it was issued against.
fn delete_busy() -> BrowserCommand {
    BrowserCommand::Notify(Notification::info("a delete is already in progress"))
}

fn render(
    frame: &mut ratatui::Frame<'_>,
    state: &BrowserState,
    session: &SessionContext,
    view_data: &ViewData,
) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(2),
        ])
        .split(frame.area());

    let selected = CollectionKind::ALL
        .iter()
        .position(|kind| *kind == state.collection())
        .unwrap_or(0);
    let tab_titles = CollectionKind::ALL
        .iter()
        .map(|kind| tab_title(*kind, state))
        .collect::<Vec<String>>();
    let tabs = Tabs::new(tab_titles)
        .block(
            Block::default()
                .title(header_title(session))
                .borders(Borders::ALL),
        )
        .style(Style::default().fg(Color::White))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .select(selected);
    frame.render_widget(tabs, layout[0]);

    let search_style = match view_data.mode {
        InputMode::Search => Style::default().fg(Color::Cyan),
        InputMode::Nav => Style::default(),
    };
    let search = Paragraph::new(search_bar_text(state, view_data))
        .style(search_style)
        .block(Block::default().title("search").borders(Borders::ALL));
    frame.render_widget(search, layout[1]);

    match visible_expanded_record(state) {
        Some(record) => {
            let body = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(5), Constraint::Percentage(50)])
                .split(layout[2]);
            render_table(frame, body[0], state, view_data);
            let detail = Paragraph::new(detail_text(state.collection(), record))
                .wrap(Wrap { trim: false })
                .block(
                    Block::default()
                        .title(state.collection().record_label(record))
                        .borders(Borders::ALL),
                );
            frame.render_widget(detail, body[1]);
        }
        None => render_table(frame, layout[2], state, view_data),
    }

    let status_widget = Paragraph::new(status_text(state, view_data))
        .style(status_style(state))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status_widget, layout[3]);

    if state.pending_delete().is_some() {
        let area = centered_rect(50, 30, frame.area());
        frame.render_widget(Clear, area);
        let confirm = Paragraph::new(confirm_overlay_text(state))
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .title("delete")
                    .borders(Borders::ALL)
                    .style(Style::default().fg(Color::Red)),
            );
        frame.render_widget(confirm, area);
    }

    if view_data.help_visible {
        let area = centered_rect(80, 60, frame.area());
        frame.render_widget(Clear, area);
        let help = Paragraph::new(help_overlay_text())
            .block(Block::default().title("help").borders(Borders::ALL));
        frame.render_widget(help, area);
    }
}

fn render_table(frame: &mut ratatui::Frame<'_>, area: Rect, state: &BrowserState, view_data: &ViewData) {
    let rows = state.page_rows();
    let title = table_title(state);
    if rows.is_empty() {
        let empty = Paragraph::new(empty_table_text(state))
            .block(Block::default().title(title).borders(Borders::ALL));
        frame.render_widget(empty, area);
        return;
    }

    let columns = state.collection().table_columns();
    let mut widths = vec![Constraint::Length(1)];
    widths.extend(columns.iter().map(|_| Constraint::Min(8)));

    let header = Row::new(
        std::iter::once(Cell::from(""))
            .chain(columns.iter().map(|column| {
                Cell::from(column.label).style(
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                )
            }))
            .collect::<Vec<_>>(),
    );

    let expanded = state.expanded();
    let table_rows = rows.iter().enumerate().map(|(row_index, record)| {
        let marker = if expanded == Some(record.id()) {
            DETAIL_OPEN
        } else {
            DETAIL_CLOSED
        };
        let mut style = Style::default();
        if row_index == view_data.selected_row {
            style = style.bg(Color::DarkGray).add_modifier(Modifier::BOLD);
        }
        let cells = std::iter::once(Cell::from(marker))
            .chain(columns.iter().map(|column| Cell::from(column.cell(record))))
            .collect::<Vec<_>>();
        Row::new(cells).style(style)
    });

    let table = Table::new(table_rows, widths)
        .header(header)
        .column_spacing(1)
        .block(Block::default().title(title).borders(Borders::ALL));
    frame.render_widget(table, area);
}

fn header_title(session: &SessionContext) -> String {
    match session.username() {
        Some(name) => format!("tripdesk | signed in as {name}"),
        None => "tripdesk".to_owned(),
    }
}

fn tab_title(kind: CollectionKind, state: &BrowserState) -> String {
    if kind == state.collection() && !state.is_loading() {
        format!("{} ({})", kind.label(), state.records().len())
    } else {
        kind.label().to_owned()
    }
}

fn table_title(state: &BrowserState) -> String {
    let kind = state.collection();
    if state.is_loading() {
        return format!("{} | loading", kind.label());
    }
    let filtered = state.filtered().len();
    let mut title = format!(
        "{} | page {}/{}",
        kind.label(),
        state.page().index() + 1,
        state.page_count()
    );
    if state.query().is_empty() {
        title.push_str(&format!(" | {filtered} total"));
    } else {
        title.push_str(&format!(" | {filtered} of {}", state.records().len()));
    }
    title
}

fn empty_table_text(state: &BrowserState) -> String {
    let noun = state.collection().as_str();
    if state.is_loading() {
        format!("Loading {noun}...")
    } else if state.query().is_empty() {
        format!("No {noun} found.")
    } else {
        format!("No {noun} match {:?}.", state.query())
    }
}

fn search_bar_text(state: &BrowserState, view_data: &ViewData) -> String {
    let field = state.criterion().field();
    match view_data.mode {
        InputMode::Search => format!("{}: {}_", field.label, state.query()),
        InputMode::Nav if state.query().is_empty() => {
            format!("{}: (press / to search)", field.label)
        }
        InputMode::Nav => format!("{}: {}", field.label, state.query()),
    }
}

/// The expanded record, but only while its row is on the current page.
fn visible_expanded_record(state: &BrowserState) -> Option<&Record> {
    let id = state.expanded()?;
    state
        .page_rows()
        .into_iter()
        .find(|record| record.id() == id)
}

fn detail_text(kind: CollectionKind, record: &Record) -> String {
    let mut out = String::new();
    for section in detail_sections(kind, record) {
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(section.title);
        out.push('\n');
        for line in section.lines {
            out.push_str("  ");
            out.push_str(&line);
            out.push('\n');
        }
    }
    out
}

fn confirm_overlay_text(state: &BrowserState) -> String {
    let Some(id) = state.pending_delete() else {
        return String::new();
    };
    let kind = state.collection();
    let label = state
        .record(id)
        .map(|record| kind.record_label(record))
        .unwrap_or_else(|| id.to_string());
    format!(
        "Are you sure?\n\nDelete {} \"{label}\"?\nYou won't be able to revert this!\n\ny delete | n cancel",
        kind.singular()
    )
}

fn status_text(state: &BrowserState, view_data: &ViewData) -> String {
    if view_data.help_visible {
        return String::new();
    }

    let (mode, hints) = if state.pending_delete().is_some() {
        ("CONFIRM", "y delete | n cancel")
    } else {
        match view_data.mode {
            InputMode::Search => (
                "SEARCH",
                "type to filter | tab/shift+tab field | ctrl+u clear | enter/esc done",
            ),
            InputMode::Nav => (
                "NAV",
                "j/k row | n/p page | enter expand | / search | c/C field | d del | e edit | a add | R report | v view | r reload | tab collection | ? help | ctrl+q",
            ),
        }
    };
    match state.notification() {
        Some(notification) => format!("{mode} | {} | {hints}", notification.display()),
        None => format!("{mode} | {hints}"),
    }
}

fn status_style(state: &BrowserState) -> Style {
    let color = match state.notification().map(|notification| notification.severity) {
        Some(Severity::Success) => Color::Green,
        Some(Severity::Warning) => Color::Magenta,
        Some(Severity::Error) => Color::Red,
        Some(Severity::Info) | None => Color::Yellow,
    };
    Style::default().fg(color)
}

fn help_overlay_text() -> &'static str {
    "global: ctrl+q quit | ? help\n\
nav: j/k row | g/G first/last row | n/p or left/right page | 1-9 page | home/end\n\
nav: enter/space expand details | esc collapse or clear search\n\
nav: tab/shift+tab or f/b collection | r reload | v view in console\n\
search: / start | type to filter | tab/shift+tab field | backspace | ctrl+u clear | enter/esc done\n\
fields: c/C next/prev search field\n\
records: d delete (y/n confirm) | e edit in console | a add in console | R report in console"
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

#[cfg(test)]
mod tests {
    use super::{
        AppRuntime, InputMode, InternalEvent, ViewData, check_session, confirm_overlay_text,
        detail_text, empty_table_text, handle_key_event, header_title, help_overlay_text,
        process_internal_events, reload, search_bar_text, status_text, table_title,
        visible_expanded_record,
    };
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use std::sync::mpsc;
    use time::{Duration, OffsetDateTime};
    use tripdesk_app::{
        BrowserCommand, BrowserState, CollectionKind, Record, RecordId, Route, Session,
        SessionContext, Severity,
    };
    use tripdesk_testkit::{DemoData, sample_destinations, sample_hotels, sample_users};

    #[derive(Debug, Default)]
    struct TestRuntime {
        hotels: Vec<Record>,
        destinations: Vec<Record>,
        users: Vec<Record>,
        fetch_error: Option<String>,
        delete_error: Option<String>,
        fetches: Vec<CollectionKind>,
        deletes: Vec<(CollectionKind, RecordId)>,
        opened: Vec<Route>,
        sessions_ended: usize,
    }

    impl TestRuntime {
        fn with_samples() -> Self {
            Self {
                hotels: sample_hotels(),
                destinations: sample_destinations(),
                users: sample_users(),
                ..Self::default()
            }
        }
    }

    impl AppRuntime for TestRuntime {
        fn fetch_records(&mut self, kind: CollectionKind) -> anyhow::Result<Vec<Record>> {
            self.fetches.push(kind);
            if let Some(error) = &self.fetch_error {
                return Err(anyhow::anyhow!("{error}"));
            }
            Ok(match kind {
                CollectionKind::Hotels => self.hotels.clone(),
                CollectionKind::Destinations => self.destinations.clone(),
                CollectionKind::Users => self.users.clone(),
            })
        }

        fn delete_record(&mut self, kind: CollectionKind, id: &RecordId) -> anyhow::Result<()> {
            self.deletes.push((kind, id.clone()));
            match &self.delete_error {
                Some(error) => Err(anyhow::anyhow!("{error}")),
                None => Ok(()),
            }
        }

        fn open_route(&mut self, route: &Route) -> anyhow::Result<()> {
            self.opened.push(route.clone());
            Ok(())
        }

        fn end_session(&mut self) {
            self.sessions_ended += 1;
        }
    }

    struct Harness {
        state: BrowserState,
        runtime: TestRuntime,
        view_data: ViewData,
        tx: mpsc::Sender<InternalEvent>,
        rx: mpsc::Receiver<InternalEvent>,
    }

    impl Harness {
        fn loaded(runtime: TestRuntime) -> Self {
            let (tx, rx) = mpsc::channel();
            let mut harness = Self {
                state: BrowserState::default(),
                runtime,
                view_data: ViewData::default(),
                tx,
                rx,
            };
            reload(
                &mut harness.state,
                &mut harness.runtime,
                &mut harness.view_data,
                &harness.tx,
            );
            harness.pump();
            harness
        }

        fn pump(&mut self) {
            process_internal_events(
                &mut self.state,
                &mut self.runtime,
                &mut self.view_data,
                &self.tx,
                &self.rx,
            );
        }

        fn press(&mut self, key: KeyEvent) -> bool {
            let quit = handle_key_event(
                &mut self.state,
                &mut self.runtime,
                &mut self.view_data,
                &self.tx,
                key,
            );
            self.pump();
            quit
        }

        /// Handles `key` but leaves worker results queued on the channel.
        fn press_queued(&mut self, key: KeyEvent) {
            handle_key_event(
                &mut self.state,
                &mut self.runtime,
                &mut self.view_data,
                &self.tx,
                key,
            );
        }

        fn press_chars(&mut self, text: &str) {
            for ch in text.chars() {
                self.press(key(KeyCode::Char(ch)));
            }
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn initial_reload_fills_the_table() {
        let harness = Harness::loaded(TestRuntime::with_samples());
        assert_eq!(harness.runtime.fetches, vec![CollectionKind::Hotels]);
        assert_eq!(harness.state.records().len(), 3);
        assert!(!harness.state.is_loading());
        assert_eq!(
            table_title(&harness.state),
            "Hotels List | page 1/1 | 3 total"
        );
    }

    #[test]
    fn ctrl_q_quits() {
        let mut harness = Harness::loaded(TestRuntime::with_samples());
        assert!(!harness.press(key(KeyCode::Char('q'))));
        assert!(harness.press(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL)));
    }

    #[test]
    fn search_mode_types_into_chosen_field() {
        let mut harness = Harness::loaded(TestRuntime::with_samples());
        harness.press(key(KeyCode::Char('/')));
        assert_eq!(harness.view_data.mode, InputMode::Search);

        harness.press(key(KeyCode::Tab));
        assert_eq!(harness.state.criterion().key(), "hotel_name");

        harness.press_chars("PALM");
        assert_eq!(harness.state.query(), "PALM");
        let hits = harness.state.filtered();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id().as_str(), "h2");
        assert_eq!(
            search_bar_text(&harness.state, &harness.view_data),
            "Hotel Name: PALM_"
        );

        harness.press(key(KeyCode::Backspace));
        assert_eq!(harness.state.query(), "PAL");

        harness.press(key(KeyCode::Esc));
        assert_eq!(harness.view_data.mode, InputMode::Nav);
        assert_eq!(harness.state.query(), "PAL");

        harness.press(key(KeyCode::Esc));
        assert_eq!(harness.state.query(), "");
    }

    #[test]
    fn search_keys_do_not_trigger_nav_bindings() {
        let mut harness = Harness::loaded(TestRuntime::with_samples());
        harness.press(key(KeyCode::Char('/')));
        harness.press_chars("dn");
        assert!(harness.state.pending_delete().is_none());
        assert_eq!(harness.state.page().index(), 0);
        assert_eq!(harness.state.query(), "dn");
    }

    #[test]
    fn empty_result_message_names_the_query() {
        let mut harness = Harness::loaded(TestRuntime::with_samples());
        harness.press(key(KeyCode::Char('/')));
        harness.press_chars("zzz");
        assert!(harness.state.page_rows().is_empty());
        assert_eq!(empty_table_text(&harness.state), "No hotels match \"zzz\".");
    }

    #[test]
    fn paging_moves_through_filtered_rows() {
        let runtime = TestRuntime {
            hotels: DemoData::generate(1).hotels,
            ..TestRuntime::default()
        };
        let mut harness = Harness::loaded(runtime);
        assert_eq!(harness.state.records().len(), 24);
        assert_eq!(harness.state.page_count(), 3);

        harness.press(key(KeyCode::Char('j')));
        assert_eq!(harness.view_data.selected_row, 1);

        harness.press(key(KeyCode::Char('n')));
        assert_eq!(harness.state.page().index(), 1);
        assert_eq!(harness.view_data.selected_row, 0);

        harness.press(key(KeyCode::End));
        assert_eq!(harness.state.page().index(), 2);
        assert_eq!(harness.state.page_rows().len(), 4);

        harness.press(key(KeyCode::Char('n')));
        assert_eq!(harness.state.page().index(), 2);

        harness.press(key(KeyCode::Char('G')));
        assert_eq!(harness.view_data.selected_row, 3);

        harness.press(key(KeyCode::Char('1')));
        assert_eq!(harness.state.page().index(), 0);
    }

    #[test]
    fn enter_toggles_single_expanded_row() {
        let mut harness = Harness::loaded(TestRuntime::with_samples());
        harness.press(key(KeyCode::Enter));
        assert_eq!(
            harness.state.expanded().map(RecordId::as_str),
            Some("h1")
        );
        let record = visible_expanded_record(&harness.state).expect("expanded row visible");
        assert!(detail_text(CollectionKind::Hotels, record).contains("Available Packages"));

        harness.press(key(KeyCode::Char('j')));
        harness.press(key(KeyCode::Enter));
        assert_eq!(
            harness.state.expanded().map(RecordId::as_str),
            Some("h2")
        );

        harness.press(key(KeyCode::Enter));
        assert_eq!(harness.state.expanded(), None);
    }

    #[test]
    fn delete_requires_confirmation() {
        let mut harness = Harness::loaded(TestRuntime::with_samples());
        harness.press(key(KeyCode::Char('d')));
        assert_eq!(
            harness.state.pending_delete().map(RecordId::as_str),
            Some("h1")
        );
        assert!(confirm_overlay_text(&harness.state).contains("Delete hotel \"Lake View Hotel\"?"));
        assert!(status_text(&harness.state, &harness.view_data).starts_with("CONFIRM"));

        // unrelated keys leave the prompt open
        harness.press(key(KeyCode::Char('j')));
        assert!(harness.state.pending_delete().is_some());

        harness.press(key(KeyCode::Char('n')));
        assert!(harness.state.pending_delete().is_none());
        assert!(harness.runtime.deletes.is_empty());
        assert_eq!(harness.state.records().len(), 3);
    }

    #[test]
    fn confirmed_delete_removes_row_and_notifies() {
        let mut harness = Harness::loaded(TestRuntime::with_samples());
        harness.press(key(KeyCode::Char('d')));
        harness.press(key(KeyCode::Char('y')));

        assert_eq!(
            harness.runtime.deletes,
            vec![(CollectionKind::Hotels, RecordId::from("h1"))]
        );
        assert!(harness.view_data.delete_in_flight.is_none());
        assert_eq!(harness.state.records().len(), 2);
        assert!(harness.state.record(&RecordId::from("h1")).is_none());
        let notification = harness.state.notification().expect("notification");
        assert_eq!(notification.title, "Deleted!");
        assert_eq!(notification.severity, Severity::Success);
        assert!(
            status_text(&harness.state, &harness.view_data)
                .contains("Deleted! Hotel has been deleted successfully.")
        );
    }

    #[test]
    fn failed_delete_keeps_row_and_reports_reason() {
        let mut runtime = TestRuntime::with_samples();
        runtime.delete_error = Some("server error (409): Hotel has active bookings".to_owned());
        let mut harness = Harness::loaded(runtime);

        harness.press(key(KeyCode::Char('d')));
        harness.press(key(KeyCode::Enter));

        assert_eq!(harness.state.records().len(), 3);
        let notification = harness.state.notification().expect("notification");
        assert_eq!(notification.severity, Severity::Error);
        assert_eq!(
            notification.message,
            "Error deleting hotel: server error (409): Hotel has active bookings"
        );
    }

    #[test]
    fn failed_fetch_shows_error_and_empty_table() {
        let mut runtime = TestRuntime::with_samples();
        runtime.fetch_error = Some("cannot reach http://localhost:3001".to_owned());
        let harness = Harness::loaded(runtime);

        assert!(harness.state.records().is_empty());
        assert!(!harness.state.is_loading());
        let notification = harness.state.notification().expect("notification");
        assert_eq!(
            notification.message,
            "Failed to load hotel data: cannot reach http://localhost:3001"
        );
    }

    #[test]
    fn switching_collection_discards_stale_results() {
        let mut harness = Harness::loaded(TestRuntime::with_samples());

        // a reload whose result is still queued when the user switches away
        reload(
            &mut harness.state,
            &mut harness.runtime,
            &mut harness.view_data,
            &harness.tx,
        );
        handle_key_event(
            &mut harness.state,
            &mut harness.runtime,
            &mut harness.view_data,
            &harness.tx,
            key(KeyCode::Tab),
        );
        harness.pump();

        assert_eq!(harness.state.collection(), CollectionKind::Destinations);
        assert_eq!(harness.state.criterion().key(), "destination_id");
        assert_eq!(harness.state.records().len(), 2);
        assert_eq!(
            harness.runtime.fetches,
            vec![
                CollectionKind::Hotels,
                CollectionKind::Hotels,
                CollectionKind::Destinations
            ]
        );
    }

    #[test]
    fn late_fetch_for_same_collection_is_ignored() {
        let mut harness = Harness::loaded(TestRuntime::with_samples());
        harness
            .tx
            .send(InternalEvent::FetchCompleted {
                request_id: 0,
                kind: CollectionKind::Hotels,
                result: Ok(Vec::new()),
            })
            .expect("send");
        harness.pump();
        assert_eq!(harness.state.records().len(), 3);
    }

    #[test]
    fn reload_waits_for_delete_in_flight() {
        let mut harness = Harness::loaded(TestRuntime::with_samples());
        harness.press(key(KeyCode::Char('d')));
        harness.press_queued(key(KeyCode::Char('y')));
        assert!(harness.view_data.delete_in_flight.is_some());

        harness.press_queued(key(KeyCode::Char('r')));
        assert_eq!(harness.runtime.fetches, vec![CollectionKind::Hotels]);
        assert_eq!(harness.state.records().len(), 3);
        assert_eq!(
            harness.state.notification().map(|note| note.message.as_str()),
            Some("a delete is already in progress")
        );

        harness.pump();
        assert!(harness.view_data.delete_in_flight.is_none());
        assert!(harness.state.record(&RecordId::from("h1")).is_none());
        assert_eq!(harness.state.records().len(), 2);

        harness.runtime.hotels.retain(|record| record.id().as_str() != "h1");
        harness.press(key(KeyCode::Char('r')));
        assert_eq!(harness.runtime.fetches.len(), 2);
        assert!(harness.state.record(&RecordId::from("h1")).is_none());
    }

    #[test]
    fn collection_switch_waits_for_delete_in_flight() {
        let mut harness = Harness::loaded(TestRuntime::with_samples());
        harness.press(key(KeyCode::Char('d')));
        harness.press_queued(key(KeyCode::Char('y')));

        harness.press_queued(key(KeyCode::Tab));
        harness.press_queued(key(KeyCode::Char('b')));
        assert_eq!(harness.state.collection(), CollectionKind::Hotels);

        harness.pump();
        assert_eq!(harness.state.records().len(), 2);
        let notification = harness.state.notification().expect("notification");
        assert_eq!(notification.severity, Severity::Success);

        harness.press(key(KeyCode::Tab));
        assert_eq!(harness.state.collection(), CollectionKind::Destinations);
    }

    #[test]
    fn view_key_opens_collection_in_console() {
        let mut harness = Harness::loaded(TestRuntime::with_samples());
        harness.press(key(KeyCode::Char('v')));
        assert_eq!(
            harness.runtime.opened,
            vec![Route::ViewCollection(CollectionKind::Hotels)]
        );
        let notification = harness.state.notification().expect("notification");
        assert_eq!(notification.message, "opened /view-hotels in the browser");
        assert!(help_overlay_text().contains("v view in console"));
    }

    #[test]
    fn edit_and_add_open_console_routes() {
        let mut harness = Harness::loaded(TestRuntime::with_samples());
        harness.press(key(KeyCode::Char('e')));
        harness.press(key(KeyCode::Char('a')));
        harness.press(key(KeyCode::Char('R')));
        assert_eq!(
            harness.runtime.opened,
            vec![
                Route::UpdateRecord(CollectionKind::Hotels, RecordId::from("h1")),
                Route::AddRecord(CollectionKind::Hotels),
                Route::Report(CollectionKind::Hotels),
            ]
        );
        let notification = harness.state.notification().expect("notification");
        assert_eq!(notification.message, "opened /hotel-report in the browser");
    }

    #[test]
    fn clear_status_only_honors_latest_token() {
        let mut harness = Harness::loaded(TestRuntime::with_samples());
        harness.state.dispatch(BrowserCommand::Notify(
            tripdesk_app::Notification::info("first"),
        ));
        harness.view_data.status_token = 2;

        harness
            .tx
            .send(InternalEvent::ClearStatus { token: 1 })
            .expect("send");
        harness.pump();
        assert!(harness.state.notification().is_some());

        harness
            .tx
            .send(InternalEvent::ClearStatus { token: 2 })
            .expect("send");
        harness.pump();
        assert!(harness.state.notification().is_none());
    }

    #[test]
    fn session_expiry_notifies_once() {
        let mut harness = Harness::loaded(TestRuntime::with_samples());
        let start = OffsetDateTime::UNIX_EPOCH;
        let mut session = SessionContext::new();
        session.begin(Session::start("tok", "Nimal Perera", "nimal@tripdesk.lk", "u1", start));
        assert_eq!(header_title(&session), "tripdesk | signed in as Nimal");

        let mut tick = |session: &mut SessionContext, now| {
            check_session(
                &mut harness.state,
                &mut harness.runtime,
                &mut harness.view_data,
                &harness.tx,
                session,
                now,
            )
        };
        assert!(!tick(&mut session, start + Duration::minutes(30)));
        assert!(tick(&mut session, start + Duration::hours(2)));
        assert!(!tick(&mut session, start + Duration::hours(3)));

        assert_eq!(harness.runtime.sessions_ended, 1);
        assert_eq!(header_title(&session), "tripdesk");
        let notification = harness.state.notification().expect("notification");
        assert_eq!(notification.title, "Session Expired");
    }

    #[test]
    fn help_overlay_swallows_keys_until_closed() {
        let mut harness = Harness::loaded(TestRuntime::with_samples());
        harness.press(key(KeyCode::Char('?')));
        assert!(harness.view_data.help_visible);
        assert_eq!(status_text(&harness.state, &harness.view_data), "");

        harness.press(key(KeyCode::Char('d')));
        assert!(harness.state.pending_delete().is_none());

        harness.press(key(KeyCode::Esc));
        assert!(!harness.view_data.help_visible);
        assert!(help_overlay_text().contains("d delete"));
    }
}
