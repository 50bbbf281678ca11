//! notekeep TUI
//!
//! Terminal user interface over the live note list.
//!
//! ## Screens
//!
//! - List: every note, highest priority first, updated as the store changes
//! - Form: add or edit a single note
//!
//! The list observes the store only while it is on screen. Opening the form
//! detaches it and returning to the list subscribes again.
//!
//! ## List keys
//!
//! - j/k or ↑/↓: Move selection up/down
//! - gg / G: First / last note
//! - Enter: Edit note
//! - a: Add note
//! - d: Delete note
//! - D: Delete all notes (asks first)
//! - ?: Help
//! - q: Quit
//!
//! ## Form keys
//!
//! - Tab / Shift+Tab: Next / previous field
//! - ←/→ or -/+ on the priority field: Change priority
//! - Enter or Ctrl+S: Save
//! - Esc: Cancel

mod adapter;
mod app;
mod ui;

use std::fs::File;
use std::io::stdout;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::prelude::*;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use notekeep_core::{Config, NoteSnapshot, NoteSubscription, NoteViewModel};

use app::{Action, ActionOutcome, App, FormField, Screen};

/// Run the TUI application
pub async fn run(config: &Config, view_model: NoteViewModel) -> Result<()> {
    init_tui_logging(config);

    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let mut app = App::new();
    let result = run_app(&mut terminal, &mut app, &view_model).await;

    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}

async fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    view_model: &NoteViewModel,
) -> Result<()> {
    let (outcome_tx, mut outcome_rx) = mpsc::channel::<ActionOutcome>(32);
    let mut subscription: Option<NoteSubscription> = None;

    loop {
        sync_subscription(app, view_model, &mut subscription);

        app.check_status_timeout();
        app.adapter.check_highlight_timeout();

        terminal.draw(|frame| ui::draw(frame, app))?;

        tokio::select! {
            biased;

            Some(outcome) = outcome_rx.recv() => {
                app.handle_outcome(outcome);
            }

            snapshot = next_snapshot(&mut subscription) => {
                match snapshot {
                    Some(notes) => {
                        let ops = app.adapter.submit_list(&notes);
                        debug!(ops = ops.len(), rows = app.adapter.len(), "Applied list update");
                    }
                    None => {
                        warn!("Note list closed");
                        app.should_quit = true;
                    }
                }
            }

            _ = tokio::time::sleep(Duration::from_millis(50)) => {
                if event::poll(Duration::from_millis(0))? {
                    if let Event::Key(key) = event::read()? {
                        if key.kind != KeyEventKind::Press {
                            continue;
                        }

                        // If help is showing, any key dismisses it
                        if app.show_help {
                            app.show_help = false;
                            continue;
                        }

                        let action = if app.is_list_screen() {
                            handle_list_mode(app, key.code, key.modifiers)
                        } else {
                            handle_form_mode(app, key.code, key.modifiers)
                        };

                        if let Some(action) = action {
                            dispatch(app, view_model, &outcome_tx, action);
                        }
                    }
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

/// Observe the list only while the list screen is showing
fn sync_subscription(
    app: &mut App,
    view_model: &NoteViewModel,
    subscription: &mut Option<NoteSubscription>,
) {
    match (&app.screen, subscription.is_some()) {
        (Screen::List, false) => {
            let observed = view_model.all_notes();
            app.adapter.submit_list(&observed.current());
            *subscription = Some(observed);
            debug!(observers = view_model.observer_count(), "List subscribed");
        }
        (Screen::Form(_), true) => {
            if let Some(observed) = subscription.take() {
                observed.unsubscribe();
            }
            debug!(observers = view_model.observer_count(), "List unsubscribed");
        }
        _ => {}
    }
}

async fn next_snapshot(subscription: &mut Option<NoteSubscription>) -> Option<NoteSnapshot> {
    match subscription {
        Some(observed) => observed.changed().await,
        None => std::future::pending().await,
    }
}

/// Run an action in the background and report back over the channel
fn dispatch(
    app: &mut App,
    view_model: &NoteViewModel,
    outcome_tx: &mpsc::Sender<ActionOutcome>,
    action: Action,
) {
    debug!(?action, "Dispatching");
    app.action_started();

    let view_model = view_model.clone();
    let outcome_tx = outcome_tx.clone();
    tokio::spawn(async move {
        let outcome = perform(&view_model, action).await;
        let _ = outcome_tx.send(outcome).await;
    });
}

async fn perform(view_model: &NoteViewModel, action: Action) -> ActionOutcome {
    match action {
        Action::Insert(note) => ActionOutcome::Inserted(view_model.insert(note).await),
        Action::Update(note) => ActionOutcome::Updated(view_model.update(note).await),
        Action::Delete(note) => ActionOutcome::Deleted(view_model.delete(note).await),
        Action::DeleteAll => ActionOutcome::DeletedAll(view_model.delete_all_notes().await),
    }
}

/// Handle key events on the list screen
fn handle_list_mode(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Option<Action> {
    if app.confirm_delete_all {
        return app.answer_delete_all(matches!(code, KeyCode::Char('y') | KeyCode::Char('Y')));
    }

    // Clear pending 'g' if timeout expired (500ms)
    if let Some(time) = app.pending_g {
        if time.elapsed() > Duration::from_millis(500) {
            app.pending_g = None;
        }
    }

    match code {
        KeyCode::Char('q') => {
            app.should_quit = true;
        }
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true;
        }

        KeyCode::Char('k') | KeyCode::Up => app.adapter.select_previous(),
        KeyCode::Char('j') | KeyCode::Down => app.adapter.select_next(),

        KeyCode::Enter => {
            if let Some(event) = app.adapter.click() {
                return app.handle_adapter_event(event);
            }
        }
        KeyCode::Char('d') | KeyCode::Delete => {
            if let Some(event) = app.adapter.swipe() {
                return app.handle_adapter_event(event);
            }
        }
        KeyCode::Char('a') => app.open_add_form(),
        KeyCode::Char('D') => app.request_delete_all(),
        KeyCode::Char('?') => app.toggle_help(),

        KeyCode::Char('G') => {
            app.pending_g = None;
            app.adapter.select_last();
        }
        KeyCode::Char('g') => {
            if app.pending_g.take().is_some() {
                app.adapter.select_first();
            } else {
                app.pending_g = Some(Instant::now());
            }
        }

        _ => {
            app.pending_g = None;
        }
    }

    None
}

/// Handle key events on the form screen
fn handle_form_mode(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Option<Action> {
    match code {
        KeyCode::Esc => {
            app.cancel_form();
            return None;
        }
        KeyCode::Enter => return app.save_form(),
        KeyCode::Char('s') if modifiers.contains(KeyModifiers::CONTROL) => {
            return app.save_form();
        }
        _ => {}
    }

    let state = app.form_state_mut()?;
    let on_priority = state.field == FormField::Priority;

    match code {
        KeyCode::Tab | KeyCode::Down => state.next_field(),
        KeyCode::BackTab | KeyCode::Up => state.prev_field(),

        KeyCode::Left | KeyCode::Char('-') if on_priority => state.form.decrement_priority(),
        KeyCode::Right | KeyCode::Char('+') if on_priority => state.form.increment_priority(),

        KeyCode::Left => state.cursor_left(),
        KeyCode::Right => state.cursor_right(),
        KeyCode::Backspace => state.delete_char(),
        KeyCode::Char(c) => state.insert_char(c),

        _ => {}
    }

    None
}

/// Initialize logging for TUI mode
///
/// Only initializes if NOTEKEEP_LOG environment variable is set.
/// Logs to file (config.log_file or default {data_dir}/debug.log).
fn init_tui_logging(config: &Config) {
    let Ok(log_level) = std::env::var("NOTEKEEP_LOG") else {
        return;
    };

    let log_path = config.log_path();

    let log_file = match File::create(&log_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: Could not create log file {:?}: {}", log_path, e);
            return;
        }
    };

    let env_filter = EnvFilter::new(format!(
        "notekeep_core={},notekeep_cli={}",
        log_level, log_level
    ));

    // Ignore error if already initialized
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(log_file)
        .try_init();

    info!("TUI logging initialized to {:?}", log_path);
}
