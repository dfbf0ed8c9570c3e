//! TUI controller and terminal management (impure shell)
//!
//! [`TuiApp`] owns the session state and is the only place it is mutated.
//! Searches and transfers run on the tokio runtime and report back through an
//! unbounded channel that the event loop drains between key events.

pub mod constants;
mod layout;
mod query_input;
mod result_table;
mod styles;

pub use layout::{calculate_areas, render_layout, table_page_size, ScreenAreas};
pub use query_input::QueryInputView;
pub use result_table::render_result_table;
pub use styles::{ColorConfig, Theme};

use crate::config::keybindings::KeyBindings;
use crate::config::ResolvedConfig;
use crate::model::{KeyAction, SearchError};
use crate::provider::SearchSession;
use crate::state::{handle_query_key, AppEvent, AppState};
use crate::transfer::{ByteTransfer, StartRefusal, TransferCoordinator};
use crossterm::{
    event::{self, Event, KeyEvent, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{backend::CrosstermBackend, layout::Rect, widgets::TableState, Terminal};
use std::io::{self, Stdout};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

/// Errors that end the session.
#[derive(Debug, Error)]
pub enum TuiError {
    /// IO error during terminal operations
    #[error("Terminal IO error: {0}")]
    Io(#[from] io::Error),

    /// The async runtime could not be started
    #[error("Failed to start async runtime: {0}")]
    Runtime(#[source] io::Error),

    /// The HTTP client could not be built
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Network collaborators the controller drives.
pub struct AppServices {
    /// Runs searches for the query box.
    pub search: SearchSession,
    /// Moves bytes for row downloads.
    pub transfer: Arc<dyn ByteTransfer>,
}

/// Main TUI application
///
/// Generic over backend to support testing with TestBackend
pub struct TuiApp<B>
where
    B: ratatui::backend::Backend,
{
    terminal: Terminal<B>,
    app_state: AppState,
    key_bindings: KeyBindings,
    search: SearchSession,
    transfers: TransferCoordinator,
    runtime: Handle,
    events_tx: UnboundedSender<AppEvent>,
    events_rx: UnboundedReceiver<AppEvent>,
    theme: Theme,
    /// Scroll offset of the table between frames
    table_state: TableState,
}

impl TuiApp<CrosstermBackend<Stdout>> {
    /// Create and initialize a new TUI application
    ///
    /// Sets up terminal in raw mode with alternate screen
    pub fn new(
        config: &ResolvedConfig,
        services: AppServices,
        runtime: Handle,
    ) -> Result<Self, TuiError> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        stdout.execute(EnterAlternateScreen)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;

        let theme = Theme::new(ColorConfig::from_env_and_args(config.no_color));

        Ok(Self::assemble(
            terminal,
            AppState::new(config.query_char_limit),
            KeyBindings::default(),
            services,
            runtime,
            config.download_dir.clone(),
            theme,
        ))
    }

    /// Run the main event loop
    ///
    /// Returns when the user quits. Transfers still running are left to the
    /// caller's runtime shutdown.
    pub fn run(&mut self) -> Result<(), TuiError> {
        const TICK: Duration = Duration::from_millis(100);

        self.draw()?;

        loop {
            let mut dirty = false;

            if event::poll(TICK)? {
                match event::read()? {
                    Event::Key(key) => {
                        if self.handle_key(key) {
                            break;
                        }
                        dirty = true;
                    }
                    Event::Resize(..) => dirty = true,
                    _ => {}
                }
            }

            if self.drain_events() > 0 {
                dirty = true;
            }

            if dirty {
                self.draw()?;
            }
        }

        info!(in_flight = self.app_state.in_flight(), "quit requested");
        Ok(())
    }
}

impl<B> TuiApp<B>
where
    B: ratatui::backend::Backend,
{
    fn assemble(
        terminal: Terminal<B>,
        app_state: AppState,
        key_bindings: KeyBindings,
        services: AppServices,
        runtime: Handle,
        download_dir: PathBuf,
        theme: Theme,
    ) -> Self {
        let (events_tx, events_rx) = unbounded_channel();
        let transfers = TransferCoordinator::new(
            services.transfer,
            runtime.clone(),
            events_tx.clone(),
            download_dir,
        );

        Self {
            terminal,
            app_state,
            key_bindings,
            search: services.search,
            transfers,
            runtime,
            events_tx,
            events_rx,
            theme,
            table_state: TableState::default(),
        }
    }

    /// Handle a keyboard event. Returns true if the app should quit.
    ///
    /// Bound keys take precedence over text entry, so the navigation keys
    /// can never be typed into the query.
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.kind != KeyEventKind::Press {
            return false;
        }

        match self.key_bindings.get(key) {
            Some(KeyAction::Quit) => return true,
            Some(KeyAction::SubmitSearch) => self.submit_search(),
            Some(KeyAction::Download) => self.start_download(),
            Some(action) => self.app_state.apply_navigation(action),
            None => {
                handle_query_key(&mut self.app_state.query, key);
            }
        }
        false
    }

    /// Spawn a search for the current query.
    fn submit_search(&mut self) {
        let Ok((ticket, query)) = self.app_state.begin_search() else {
            return;
        };

        let session = self.search.clone();
        let events = self.events_tx.clone();
        let runtime = self.runtime.clone();
        self.runtime.spawn(async move {
            // Run in a nested task so a panicking provider still produces a
            // completion and the controller leaves `Searching`.
            let search = runtime.spawn(async move { session.search(query.as_str()).await });
            let outcome = match search.await {
                Ok(outcome) => outcome,
                Err(err) => Err(SearchError::Aborted(err.to_string())),
            };
            if events
                .send(AppEvent::SearchCompleted { ticket, outcome })
                .is_err()
            {
                debug!(ticket = ticket.value(), "controller gone, dropping search completion");
            }
        });
    }

    /// Start a transfer for the selected row.
    fn start_download(&mut self) {
        let Some(index) = self.app_state.table.selected() else {
            self.app_state.set_error(StartRefusal::NoResults.to_string());
            return;
        };

        match self.transfers.start(&mut self.app_state.table, index) {
            Ok(started) => self
                .app_state
                .transfer_started(started.tag, &started.destination),
            Err(refusal) => {
                debug!(row = index, %refusal, "transfer refused");
                self.app_state.set_error(refusal.to_string());
            }
        }
    }

    /// Apply one background completion.
    fn handle_app_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::SearchCompleted { ticket, outcome } => {
                let replaced = outcome.is_ok();
                if self.app_state.apply_search_completed(ticket, outcome) && replaced {
                    self.table_state = TableState::default();
                }
            }
            AppEvent::TransferCompleted { tag, outcome } => {
                self.app_state.apply_transfer_completed(tag, outcome);
            }
        }
    }

    /// Apply every queued completion. Returns how many were applied.
    fn drain_events(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            self.handle_app_event(event);
            applied += 1;
        }
        applied
    }

    /// Render the current frame
    fn draw(&mut self) -> Result<(), TuiError> {
        let size = self.terminal.size()?;
        self.app_state.page_size = table_page_size(Rect::new(0, 0, size.width, size.height));

        let state = &self.app_state;
        let theme = &self.theme;
        let table_state = &mut self.table_state;
        self.terminal
            .draw(|frame| render_layout(frame, state, theme, table_state))?;

        Ok(())
    }
}

// ===== Test Helpers =====
//
// The following methods are ONLY for testing within the crate.

#[cfg(test)]
#[allow(dead_code)]
impl<B> TuiApp<B>
where
    B: ratatui::backend::Backend,
{
    /// Create TuiApp for testing without touching the real terminal.
    pub(crate) fn new_for_test(
        terminal: Terminal<B>,
        app_state: AppState,
        services: AppServices,
        runtime: Handle,
        download_dir: PathBuf,
    ) -> Self {
        Self::assemble(
            terminal,
            app_state,
            KeyBindings::default(),
            services,
            runtime,
            download_dir,
            Theme::default(),
        )
    }

    pub(crate) fn app_state(&self) -> &AppState {
        &self.app_state
    }

    /// Handle a single keyboard event. Returns true if app should quit.
    pub(crate) fn handle_key_test(&mut self, key: KeyEvent) -> bool {
        self.handle_key(key)
    }

    /// Wait for the next background completion and apply it.
    ///
    /// Returns false if the channel closed.
    pub(crate) async fn apply_next_event(&mut self) -> bool {
        match self.events_rx.recv().await {
            Some(event) => {
                self.handle_app_event(event);
                true
            }
            None => false,
        }
    }

    /// Apply an event as if it had arrived from a background task.
    pub(crate) fn handle_app_event_test(&mut self, event: AppEvent) {
        self.handle_app_event(event);
    }

    pub(crate) fn drain_events_test(&mut self) -> usize {
        self.drain_events()
    }

    pub(crate) fn render_test(&mut self) -> Result<(), TuiError> {
        self.draw()
    }

    pub(crate) fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }
}

/// Initialize and run the TUI application
///
/// This is the main entry point for the TUI. It handles terminal setup, runs
/// the event loop, and restores the terminal even when the loop fails.
///
/// Note: Logging must be initialized by caller before calling this function.
pub fn run_app(
    config: &ResolvedConfig,
    services: AppServices,
    runtime: Handle,
) -> Result<(), TuiError> {
    let mut app = match TuiApp::new(config, services, runtime) {
        Ok(app) => app,
        Err(err) => return Err(abandon_init(err, restore_terminal)),
    };

    let result = app.run();

    // Always restore terminal state
    restore_terminal()?;

    result
}

/// Undo a partial terminal setup after `err`, keeping `err` as the outcome.
///
/// A failing `restore` is logged, never returned.
fn abandon_init(err: TuiError, restore: impl FnOnce() -> Result<(), TuiError>) -> TuiError {
    if let Err(restore_err) = restore() {
        warn!(error = %restore_err, init_error = %err, "terminal restore failed after init error");
    }
    err
}

/// Restore terminal to normal state
fn restore_terminal() -> Result<(), TuiError> {
    disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}
