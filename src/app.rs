use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::events::terminal::Handler as TerminalEventHandler;
use crate::gesture::PlatformCapabilities;
use crate::logger::{CustomLogger, LogBuffer};
use crate::shell::Shell;
use crate::store::{CanvasStore, FileStorage};
use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::*;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, stdout};
use std::time::Instant;

/// Specify how many formatted log lines the log panel keeps.
///
const LOG_CAPACITY: usize = 200;

/// Oversees event processing, store persistence, and terminal output.
///
pub struct App {
    config: Config,
    storage: FileStorage,
}

impl App {
    /// Start a new application according to the given configuration. Returns
    /// the result of the application execution.
    ///
    pub fn start(config: Config, reset_preferences: bool) -> Result<()> {
        let logs = LogBuffer::new(LOG_CAPACITY);
        App::init_logger(&logs)?;

        info!("Starting application...");
        let mut app = App {
            storage: FileStorage::new(config.storage_directory()?),
            config,
        };

        let mut store = CanvasStore::load_or_default(&app.storage)
            .with_scroll_idle(app.config.navigation.scroll_idle_ms);
        if reset_preferences {
            info!("Resetting stored preferences...");
            store.reset_preferences();
        }

        // A terminal has no touch input and no browser observers.
        let shell = Shell::new(&app.config, store, PlatformCapabilities::default(), logs);
        let shell = app.start_ui(shell)?;

        if let Err(e) = shell.store().persist(&mut app.storage) {
            error!("Failed to persist store on exit: {}", e);
        }
        if let Err(e) = app.config.save() {
            error!("Failed to save config on exit: {}", e);
        }

        info!("Exiting application...");
        Ok(())
    }

    /// Install the custom logger, feeding formatted lines to the log panel.
    ///
    fn init_logger(logs: &LogBuffer) -> AppResult<()> {
        let logger = CustomLogger::new().with_level(LevelFilter::Debug);
        let sink = logs.clone();
        logger.set_log_callback(Box::new(move |line| sink.push(line)));
        let level = logger.level();
        log::set_boxed_logger(Box::new(logger)).map_err(|e| AppError::Logger(e.to_string()))?;
        log::set_max_level(level);
        Ok(())
    }

    /// Begin the terminal event poll on a separate thread before starting the
    /// render loop on the main thread. Return the shell following an exit
    /// request, or the first unrecoverable error.
    ///
    fn start_ui(&self, mut shell: Shell) -> Result<Shell> {
        debug!("Starting user interface on main thread...");
        let mut stdout = stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
            .map_err(terminal_error("enter alternate screen"))?;
        enable_raw_mode().map_err(terminal_error("enable raw mode"))?;

        let mut terminal =
            Terminal::new(CrosstermBackend::new(stdout)).map_err(terminal_error("open terminal"))?;
        terminal.hide_cursor()?;

        let result = App::run(&mut terminal, &mut shell);

        disable_raw_mode().map_err(terminal_error("disable raw mode"))?;
        let mut stdout = io::stdout();
        execute!(stdout, LeaveAlternateScreen, DisableMouseCapture)
            .map_err(terminal_error("leave alternate screen"))?;
        terminal.show_cursor()?;

        result.map(|_| shell)
    }

    fn run<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, shell: &mut Shell) -> Result<()> {
        let terminal_event_handler = TerminalEventHandler::new();
        loop {
            let started = Instant::now();
            terminal.draw(|frame| crate::ui::render(frame, shell))?;
            shell.record_render_time(started.elapsed().as_secs_f64() * 1000.0);
            if !terminal_event_handler.handle_next(shell)? {
                debug!("Received application exit request.");
                break;
            }
        }
        Ok(())
    }
}

/// Wrap a terminal I/O failure with the step that failed.
///
fn terminal_error(action: &'static str) -> impl Fn(io::Error) -> AppError {
    move |e| AppError::Terminal(format!("failed to {}: {}", action, e))
}
