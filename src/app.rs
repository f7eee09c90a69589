// ABOUTME: App orchestrator: wires together config, the HTTP service, the dispatcher, and the TUI.
// ABOUTME: Runs the terminal event loop over key presses, service results, and a render tick.

use std::io::stdout;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{
    DisableBracketedPaste, EnableBracketedPaste, Event, EventStream, KeyEvent, KeyEventKind,
};
use futures::StreamExt;
use ratatui::DefaultTerminal;
use tokio::sync::mpsc;

use crate::config::Config;
use crate::controller::dispatch::ExportSettings;
use crate::controller::{ChatController, Dispatcher, Request, ServiceEvent};
use crate::export::SummaryLayout;
use crate::service::{HttpService, QaService};
use crate::tui::input::{InputResult, handle_key};
use crate::tui::state::TuiState;
use crate::tui::ui;
use crate::tui::widgets::status::format_elapsed;

/// Redraw cadence for spinners and the session clock.
const TICK_INTERVAL: Duration = Duration::from_millis(120);

/// Everything the event loop reacts to.
#[derive(Debug)]
pub enum Msg {
    Key(KeyEvent),
    Paste(String),
    Service(ServiceEvent),
    Tick,
    /// Resize and other terminal events that only need a redraw.
    Redraw,
}

/// What the loop should do after a message was handled.
#[derive(Debug, PartialEq)]
pub enum Step {
    Continue(Option<Request>),
    Quit,
}

/// Top-level application that orchestrates all subsystems.
pub struct App {
    config: Config,
    initial_upload: Option<PathBuf>,
}

impl App {
    /// Create a new app. `initial_upload` is uploaded as soon as the service is ready.
    pub fn new(config: Config, initial_upload: Option<PathBuf>) -> Self {
        Self {
            config,
            initial_upload,
        }
    }

    /// Run the application: start the readiness probe and drive the TUI until quit.
    pub async fn run(self) -> anyhow::Result<()> {
        let base_url = self.config.service.base_url.clone();
        let service: Arc<dyn QaService> = Arc::new(HttpService::new(&base_url));

        let (event_tx, mut event_rx) = mpsc::channel::<ServiceEvent>(64);
        let retry = self.config.readiness.policy();
        let max_attempts = retry.max_attempts;
        let dispatcher = Dispatcher::new(
            service,
            event_tx,
            retry,
            ExportSettings {
                output_path: self.config.export.output_path(),
                title: self.config.export.title.clone(),
                layout: SummaryLayout::default(),
            },
        );

        let mut controller = ChatController::new(self.config.ask.ordering);
        if let Some(path) = self.initial_upload {
            controller = controller.with_initial_upload(path);
        }
        let mut state = TuiState::new(controller, base_url, max_attempts);

        tracing::info!(
            base_url = %state.base_url,
            ordering = ?self.config.ask.ordering,
            "starting pdfchat"
        );
        dispatcher.dispatch(Request::CheckHealth);

        let mut terminal = ratatui::init();
        let result = match crossterm::execute!(stdout(), EnableBracketedPaste) {
            Ok(()) => event_loop(&mut terminal, &mut state, &dispatcher, &mut event_rx).await,
            Err(e) => Err(e.into()),
        };
        let _ = crossterm::execute!(stdout(), DisableBracketedPaste);
        ratatui::restore();

        result?;
        print_exit_screen(&state);
        Ok(())
    }
}

async fn event_loop(
    terminal: &mut DefaultTerminal,
    state: &mut TuiState,
    dispatcher: &Dispatcher,
    events: &mut mpsc::Receiver<ServiceEvent>,
) -> anyhow::Result<()> {
    let mut terminal_events = EventStream::new();
    let mut tick = tokio::time::interval(TICK_INTERVAL);

    loop {
        terminal.draw(|frame| ui::render(frame, state))?;

        let msg = tokio::select! {
            maybe = terminal_events.next() => match maybe {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => Msg::Key(key),
                Some(Ok(Event::Paste(text))) => Msg::Paste(text),
                Some(Ok(_)) => Msg::Redraw,
                Some(Err(e)) => return Err(e.into()),
                None => return Ok(()),
            },
            Some(event) = events.recv() => Msg::Service(event),
            _ = tick.tick() => Msg::Tick,
        };

        match update(state, msg) {
            Step::Quit => return Ok(()),
            Step::Continue(Some(request)) => dispatcher.dispatch(request),
            Step::Continue(None) => {}
        }
    }
}

/// Apply one message to the screen state.
pub fn update(state: &mut TuiState, msg: Msg) -> Step {
    match msg {
        Msg::Key(key) => match handle_key(state, key) {
            InputResult::Quit => Step::Quit,
            result => Step::Continue(state.apply_input(result)),
        },
        Msg::Paste(text) => {
            if state.is_ready() && !state.has_notice() {
                state.insert_str_at_cursor(&text);
            }
            Step::Continue(None)
        }
        Msg::Service(event) => Step::Continue(state.apply_event(event)),
        Msg::Tick => {
            state.advance_tick();
            Step::Continue(None)
        }
        Msg::Redraw => Step::Continue(None),
    }
}

/// Print a farewell screen after the TUI exits.
fn print_exit_screen(state: &TuiState) {
    let elapsed = format_elapsed(state.session_start.elapsed().as_secs());
    let pair_count = state.session().transcript().len();

    println!();
    println!("  \u{1f4c4} \x1b[1mThanks for using pdfchat!\x1b[0m");
    println!();
    match state.session().current_filename() {
        Some(name) => println!(
            "  \u{1f550} Session lasted {elapsed} with {pair_count} questions about {name}."
        ),
        None => println!("  \u{1f550} Session lasted {elapsed}."),
    }
    if let Some(path) = state.controller.last_export() {
        println!("  \u{1f4be} Summary saved to {}", path.display());
    }
    println!();
}
