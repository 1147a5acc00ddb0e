//! Terminal entry point and event loop.
//!
//! This module provides the thin integration layer between the teisearch
//! library and the terminal. It parses the CLI, sets up storage and the
//! worker thread, and pumps the crossterm event loop until the user quits.
//!
//! # Architecture
//!
//! The binary owns three threads:
//!
//! ```text
//! ┌─────────────────────────┐
//! │      Main Thread        │
//! │  ┌──────────────────┐   │
//! │  │ AppState + loop  │   │  ← UI state, event handling, drawing
//! │  └──────────────────┘   │
//! │     │            │      │
//! │     │ mpsc       │ mpsc │
//! │     ▼            ▼      │
//! │  ┌────────┐ ┌─────────┐ │
//! │  │ reader │ │ worker  │ │  ← crossterm polling / storage I/O
//! │  │ thread │ │ thread  │ │
//! │  └────────┘ └─────────┘ │
//! └─────────────────────────┘
//! ```
//!
//! # Lifecycle
//!
//! 1. **Startup**: Parse CLI, merge config, initialize tracing
//! 2. **Storage**: Open the JSON store (`seed` subcommand short-circuits
//!    here)
//! 3. **Worker**: Spawn the search worker around the storage handle
//! 4. **Resume**: Queue `Event::Resumed` so the presenter loads the catalog
//!    and runs the first search
//! 5. **Loop**: Translate terminal events, execute actions against the
//!    presenter, drain worker outcomes, redraw when dirty
//! 6. **Teardown**: Restore the terminal, stop the reader, join the worker
//!
//! # Event Mapping
//!
//! Terminal events are translated to library events:
//!
//! - `Tab` / `BackTab` → `Event::FocusNext` / `Event::FocusPrev`
//! - `Up` / `Down` (and `Ctrl+p` / `Ctrl+n`) → cursor movement
//! - `Enter` → `Event::Confirm`
//! - `Esc` → `Event::Escape`
//! - `Ctrl+l` → `Event::ClearFilters`
//! - `Ctrl+c` → `Event::Quit`
//! - Focus regained → `Event::Resumed`
//!
//! # Keybindings
//!
//! Global:
//! - `Tab` / `Shift+Tab`: Cycle panel focus
//! - `Ctrl+c`: Quit immediately
//! - `Ctrl+l`: Clear all filters
//!
//! In the form:
//! - `Up`/`Down`: Move between fields
//! - `Left`/`Right`: Cycle option values
//! - `Enter`: Open the date picker on date fields, search otherwise
//! - `Esc`: Quit
//!
//! In the date picker:
//! - `Left`/`Right`: Switch segment
//! - `Up`/`Down`: Adjust the focused segment
//! - `Enter`: Apply the date
//! - `Esc`: Cancel

#![allow(clippy::multiple_crate_versions)]

use std::collections::VecDeque;
use std::io::stdout;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::TryRecvError;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use clap::{Parser, Subcommand};
use ratatui::crossterm::event::{
    self, DisableFocusChange, EnableFocusChange, Event as TerminalEvent, KeyCode, KeyEvent,
    KeyEventKind, KeyModifiers,
};
use ratatui::crossterm::execute;

use teisearch::storage::{seed_demo_data, JsonStorage};
use teisearch::worker::spawn_search_worker;
use teisearch::{
    handle_event, initialize, Action, AppState, Config, ConfigOverrides, Event, Result,
    SearchPresenter, TeiSearchError,
};

/// Interval the reader thread polls the terminal at.
const INPUT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Pause between main loop ticks.
const TICK_INTERVAL: Duration = Duration::from_millis(16);

/// Search tracked entities from the terminal.
#[derive(Debug, Parser)]
#[command(name = "teisearch", version, about)]
struct Cli {
    /// Path to the JSON store file.
    #[arg(long, value_name = "PATH")]
    data: Option<String>,

    /// Path to the TOML config file.
    #[arg(long, value_name = "PATH")]
    config: Option<String>,

    /// Built-in theme name (catppuccin-mocha, -latte, -frappe, -macchiato).
    #[arg(long, value_name = "NAME")]
    theme: Option<String>,

    /// Path to a custom TOML theme file.
    #[arg(long, value_name = "PATH")]
    theme_file: Option<String>,

    /// Tracing filter directive for the log file (e.g. debug).
    #[arg(long, value_name = "LEVEL")]
    trace_level: Option<String>,

    /// Instances requested per result page.
    #[arg(long, value_name = "N")]
    page_size: Option<usize>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Write a demonstration catalog and instance set into the store.
    Seed,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("teisearch: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let overrides = ConfigOverrides {
        data_path: cli.data,
        config_path: cli.config,
        theme_name: cli.theme,
        theme_file: cli.theme_file,
        trace_level: cli.trace_level,
        page_size: cli.page_size,
    };
    let config = Config::load(&overrides)?;
    teisearch::observability::init_tracing(&config);
    tracing::debug!(
        data_path = %config.data_path.display(),
        page_size = config.page_size,
        "configuration loaded"
    );

    let mut storage = JsonStorage::new(config.data_path.clone())?;

    if let Some(Command::Seed) = cli.command {
        let summary = seed_demo_data(&mut storage)?;
        println!(
            "Seeded {} programs, {} attributes, and {} instances into {}",
            summary.programs,
            summary.attributes,
            summary.instances,
            config.data_path.display()
        );
        return Ok(());
    }

    let worker = spawn_search_worker(Box::new(storage))?;
    let presenter = SearchPresenter::new(worker, config.page_size);
    let state = initialize(&config)?;

    run_event_loop(state, presenter)
}

/// Pumps the terminal event loop until the user quits.
///
/// The reader thread forwards crossterm events into a channel; this loop
/// drains them, feeds the handler, executes the resulting actions against
/// the presenter, applies worker outcomes, and redraws when anything
/// changed.
fn run_event_loop(mut state: AppState, mut presenter: SearchPresenter) -> Result<()> {
    let mut terminal = ratatui::init();
    terminal.clear()?;
    let _ = execute!(stdout(), EnableFocusChange);

    let (event_tx, event_rx) = mpsc::channel();
    let reader_running = Arc::new(AtomicBool::new(true));
    let reader_flag = Arc::clone(&reader_running);

    let reader = thread::spawn(move || {
        while reader_flag.load(Ordering::Relaxed) {
            match event::poll(INPUT_POLL_INTERVAL) {
                Ok(true) => match event::read() {
                    Ok(terminal_event) => {
                        if event_tx.send(terminal_event).is_err() {
                            break;
                        }
                    }
                    Err(_) => break,
                },
                Ok(false) => {}
                Err(_) => break,
            }
        }
    });

    let mut pending: VecDeque<Event> = VecDeque::new();
    pending.push_back(Event::Resumed);

    let loop_result = (|| -> Result<()> {
        let mut dirty = true;

        loop {
            loop {
                match event_rx.try_recv() {
                    Ok(terminal_event) => {
                        if let Some(app_event) = map_terminal_event(&terminal_event) {
                            pending.push_back(app_event);
                        }
                    }
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        return Err(TeiSearchError::Terminal(
                            "input event channel disconnected".to_string(),
                        ));
                    }
                }
            }

            while let Some(app_event) = pending.pop_front() {
                let (should_render, actions) = handle_event(&mut state, &app_event)?;
                dirty |= should_render;

                for action in actions {
                    if !execute_action(&mut presenter, &mut state, action)? {
                        return Ok(());
                    }
                }
            }

            dirty |= presenter.process_outcomes(&mut state)?;
            dirty |= presenter.drain_picked_dates(&mut state)?;

            if dirty {
                terminal.draw(|frame| teisearch::ui::render(frame, &state))?;
                dirty = false;
            }

            thread::sleep(TICK_INTERVAL);
        }
    })();

    ratatui::restore();
    let _ = execute!(stdout(), DisableFocusChange);

    reader_running.store(false, Ordering::Relaxed);
    let _ = reader.join();

    let shutdown_result = presenter.shutdown();
    loop_result.and(shutdown_result)
}

/// Translates a crossterm event into an application event.
///
/// Key events are only considered on press so terminals reporting releases
/// don't double-type. Regaining terminal focus maps to `Resumed`, which
/// re-runs the presenter's init the way returning to the screen does.
fn map_terminal_event(terminal_event: &TerminalEvent) -> Option<Event> {
    match terminal_event {
        TerminalEvent::Key(key) if key.kind == KeyEventKind::Press => map_key_event(key),
        TerminalEvent::Resize(..) => Some(Event::Resized),
        TerminalEvent::FocusGained => Some(Event::Resumed),
        _ => None,
    }
}

/// Maps keyboard events to application events.
fn map_key_event(key: &KeyEvent) -> Option<Event> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Event::Quit),
            KeyCode::Char('n') => Some(Event::CursorDown),
            KeyCode::Char('p') => Some(Event::CursorUp),
            KeyCode::Char('l') => Some(Event::ClearFilters),
            _ => None,
        };
    }

    Some(match key.code {
        KeyCode::Tab => Event::FocusNext,
        KeyCode::BackTab => Event::FocusPrev,
        KeyCode::Down => Event::CursorDown,
        KeyCode::Up => Event::CursorUp,
        KeyCode::Left => Event::Left,
        KeyCode::Right => Event::Right,
        KeyCode::Enter => Event::Confirm,
        KeyCode::Esc => Event::Escape,
        KeyCode::Backspace => Event::Backspace,
        KeyCode::Char(c) => Event::Char(c),
        _ => return None,
    })
}

/// Executes an action returned from event handling.
///
/// Routes library actions to the presenter, which pushes any resulting
/// model changes back into the state through the view contract.
///
/// Returns `false` when the application should exit.
#[tracing::instrument(level = "debug", skip(presenter, state))]
fn execute_action(
    presenter: &mut SearchPresenter,
    state: &mut AppState,
    action: Action,
) -> Result<bool> {
    match action {
        Action::Quit => {
            tracing::debug!("quit requested");
            return Ok(false);
        }
        Action::InitPresenter => presenter.init(state)?,
        Action::SetProgram(program) => presenter.set_program(program, state)?,
        Action::SetAttributeValue {
            attribute_id,
            value,
        } => presenter.set_attribute_value(&attribute_id, &value)?,
        Action::SetQuery(query) => presenter.set_query(&query)?,
        Action::Search => presenter.search()?,
        Action::PickDate { attribute_id } => presenter.pick_date(&attribute_id, state)?,
        Action::ClearFilters => presenter.clear_filters(state)?,
    }

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    #[test]
    fn plain_keys_map_to_their_events() {
        assert_eq!(map_key_event(&press(KeyCode::Tab)), Some(Event::FocusNext));
        assert_eq!(map_key_event(&press(KeyCode::Enter)), Some(Event::Confirm));
        assert_eq!(map_key_event(&press(KeyCode::Esc)), Some(Event::Escape));
        assert_eq!(
            map_key_event(&press(KeyCode::Char('a'))),
            Some(Event::Char('a'))
        );
        assert_eq!(map_key_event(&press(KeyCode::F(5))), None);
    }

    #[test]
    fn control_chords_map_to_their_events() {
        assert_eq!(map_key_event(&ctrl('c')), Some(Event::Quit));
        assert_eq!(map_key_event(&ctrl('n')), Some(Event::CursorDown));
        assert_eq!(map_key_event(&ctrl('p')), Some(Event::CursorUp));
        assert_eq!(map_key_event(&ctrl('l')), Some(Event::ClearFilters));
        assert_eq!(map_key_event(&ctrl('x')), None);
    }

    #[test]
    fn focus_gain_resumes_and_key_release_is_ignored() {
        let release = KeyEvent {
            kind: KeyEventKind::Release,
            ..KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)
        };

        assert_eq!(
            map_terminal_event(&TerminalEvent::FocusGained),
            Some(Event::Resumed)
        );
        assert_eq!(map_terminal_event(&TerminalEvent::Key(release)), None);
        assert_eq!(
            map_terminal_event(&TerminalEvent::Resize(80, 24)),
            Some(Event::Resized)
        );
    }
}
