//! User Dashboard
//!
//! A terminal dashboard charting National vs International users from a
//! spreadsheet, filterable by Government / Non-Government email domains.

use std::io;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use tracing::info;

use user_dashboard::application::App;
use user_dashboard::domain::UserAggregator;
use user_dashboard::infrastructure::{init_logging, Config, LoadTask, SpreadsheetLoader};
use user_dashboard::presentation::{render_ui, InputHandler};

const TICK_RATE: Duration = Duration::from_millis(100);

/// Entry point for the dashboard.
///
/// With `--print` the spreadsheet is loaded on the spot and the chart data is
/// written to stdout as JSON. Otherwise the terminal UI starts immediately and
/// the spreadsheet loads in the background.
///
/// # Errors
///
/// Returns an error if logging or terminal setup fails, or, in print mode, if
/// the spreadsheet cannot be loaded.
fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    init_logging(&config.log_file)?;

    if config.print {
        return print_chart(&config);
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new();
    app.start_loading(LoadTask::spawn(config.source()));
    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }

    info!("dashboard closed");
    Ok(())
}

fn print_chart(config: &Config) -> anyhow::Result<()> {
    let records = SpreadsheetLoader::load(&config.source())?;
    let chart = UserAggregator::new(&records).aggregate(config.filter_state());
    println!("{}", serde_json::to_string_pretty(&chart)?);
    Ok(())
}

/// Main event loop.
///
/// Redraws every tick, applies the background load once it lands and
/// dispatches key presses until the user quits.
fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        app.poll_load();
        terminal.draw(|f| render_ui(f, app))?;

        if event::poll(TICK_RATE)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    InputHandler::handle_key_event(app, key.code, key.modifiers);
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
