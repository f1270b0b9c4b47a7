//! quickdef - look up English word definitions from the terminal
//!
//! With words on the command line, each is looked up once and printed.
//! Without words, an interactive popup opens with a search box.

mod app;
mod logging;
mod oneshot;
mod ui;

use std::io;
use std::panic;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{info, warn};

use quickdef::cache::{DefinitionCache, DurableStore, FileStore, MemoryStore};
use quickdef::cli::{Cli, Mode, StartupConfig};
use quickdef::config::LookupConfig;
use quickdef::data::DictionaryApiClient;
use quickdef::surface::RecentSearch;
use quickdef::{spawn_lookup_worker, LookupHandle, LookupService};

use app::App;

/// How long to wait for pending cache writes on exit
const WRITE_FLUSH_TIMEOUT: Duration = Duration::from_secs(5);

/// Sets up a panic hook that restores the terminal before printing the panic message.
/// This ensures the terminal is usable even if the application panics.
fn setup_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Attempt to restore the terminal
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        // Call the original panic hook
        original_hook(panic_info);
    }));
}

/// Picks the durable store and returns its directory, if it has one
fn open_store(config: &LookupConfig) -> (Arc<dyn DurableStore>, Option<PathBuf>) {
    if !config.cache_enabled {
        return (Arc::new(MemoryStore::new()), None);
    }

    let store = match &config.cache_dir {
        Some(dir) => Some(FileStore::with_dir(dir.clone())),
        None => FileStore::new(),
    };

    match store {
        Some(store) => {
            let dir = store.dir().to_path_buf();
            (Arc::new(store), Some(dir))
        }
        None => (Arc::new(MemoryStore::new()), None),
    }
}

fn build_service(
    config: &LookupConfig,
    store: Arc<dyn DurableStore>,
) -> Result<LookupService, Box<dyn std::error::Error>> {
    let cache = Arc::new(DefinitionCache::new(store).with_ttl(config.cache_ttl));

    let mut client = DictionaryApiClient::with_base_url(config.api_base_url.clone());
    if let Some(timeout) = config.request_timeout {
        client = client.with_timeout(timeout)?;
    }

    Ok(LookupService::new(Arc::new(client), cache))
}

async fn run_oneshot(handle: &LookupHandle, words: &[String], startup: &StartupConfig) -> ExitCode {
    let outcomes = oneshot::lookup_all(handle, words, startup.selection).await;

    for outcome in &outcomes {
        if startup.json {
            match serde_json::to_string(&outcome.json_response()) {
                Ok(line) => println!("{line}"),
                Err(e) => eprintln!("error: {e}"),
            }
        } else {
            print!("{}", oneshot::format_outcome(outcome));
        }
    }

    if outcomes.iter().all(oneshot::Outcome::is_success) {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

async fn run_interactive(
    handle: LookupHandle,
    store: Arc<dyn DurableStore>,
) -> Result<(), Box<dyn std::error::Error>> {
    // Set up panic hook to restore terminal on crash
    setup_panic_hook();

    let mut app = App::new(handle, RecentSearch::new(store));
    app.load_recent().await;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Main event loop
    loop {
        terminal.draw(|f| ui::render(f, &app))?;

        // Poll for keyboard events with 100ms timeout
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                app.handle_key(key);
            }
        }

        app.drain_results().await;

        if app.should_quit {
            break;
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    Ok(())
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let startup = match StartupConfig::from_cli(&cli, LookupConfig::from_env()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return Ok(ExitCode::from(2));
        }
    };

    let (store, store_dir) = open_store(&startup.lookup);

    let log_setup = match &startup.mode {
        Mode::Interactive => {
            let dir = logging::log_dir(store_dir.as_deref());
            logging::init_file(&startup.log_directive, &dir)
        }
        Mode::OneShot { .. } => logging::init_stderr(&startup.log_directive),
    };
    if let Err(e) = log_setup {
        eprintln!("warning: {e}");
    }

    match &store_dir {
        Some(dir) => info!(dir = %dir.display(), "using file cache"),
        None if startup.lookup.cache_enabled => {
            warn!("no cache directory available, definitions kept in memory")
        }
        None => info!("cache disabled, definitions kept in memory"),
    }

    let service = build_service(&startup.lookup, store.clone())?;
    let (handle, _worker) = spawn_lookup_worker(service.clone());

    let exit = match &startup.mode {
        Mode::OneShot { words } => run_oneshot(&handle, words, &startup).await,
        Mode::Interactive => {
            run_interactive(handle, store).await?;
            ExitCode::SUCCESS
        }
    };

    // Cache writes run in the background; let them land before the runtime stops
    if tokio::time::timeout(WRITE_FLUSH_TIMEOUT, service.flush_writes())
        .await
        .is_err()
    {
        warn!("gave up waiting for cache writes");
    }

    Ok(exit)
}
