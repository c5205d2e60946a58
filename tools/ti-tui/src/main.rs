//! trie-inspector: terminal front end for per-account storage tries.
//!
//! Talks to the trie backend over JSON/HTTP. Every backend call runs on a
//! spawned task; completions are applied between key events.
//!
//! ## Usage
//!
//! ```bash
//! # Backend on localhost:8080 (default)
//! trie-inspector
//!
//! # Remote backend, shorter timeout, logs in /tmp
//! trie-inspector --backend-url http://trie.example.com:8080 --timeout-ms 3000 \
//!     --log-file /tmp/inspector.log
//! ```

mod app;
mod rpc;
mod ui;

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use tokio::sync::mpsc;

use app::App;
use rpc::HttpGateway;
use ti_core::{Completion, InspectorConfig, InspectorService};
use ti_telemetry::{init_logging, LoggingConfig};

/// Log file used when neither the flag nor `TI_LOG_FILE` names one.
const DEFAULT_LOG_FILE: &str = "trie-inspector.log";

/// How long to wait for a key before redrawing.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Storage trie inspector
#[derive(Parser, Debug)]
#[command(name = "trie-inspector")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Trie backend base URL
    #[arg(long, env = "TI_BACKEND_URL")]
    backend_url: Option<String>,

    /// Per-request timeout in milliseconds
    #[arg(long, env = "TI_TIMEOUT_MS")]
    timeout_ms: Option<u64>,

    /// JSON file with an inspector configuration
    #[arg(long, env = "TI_CONFIG")]
    config: Option<PathBuf>,

    /// Log file (falls back to TI_LOG_FILE)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log level or filter directive (falls back to TI_LOG_LEVEL / RUST_LOG)
    #[arg(long)]
    log_level: Option<String>,

    /// Emit JSON log lines (also enabled by TI_JSON_LOGS)
    #[arg(long)]
    json_logs: bool,
}

impl Args {
    /// Configuration file, then explicit flags.
    fn inspector_config(&self) -> Result<InspectorConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config {}", path.display()))?;
                serde_json::from_str(&raw)
                    .with_context(|| format!("Failed to parse config {}", path.display()))?
            }
            None => InspectorConfig::default(),
        };

        if let Some(url) = &self.backend_url {
            config.backend_url = url.clone();
        }
        if let Some(ms) = self.timeout_ms {
            config.request_timeout = Duration::from_millis(ms);
        }

        config.validate().context("Invalid configuration")?;
        Ok(config)
    }

    /// Environment, then explicit flags. Always logs to a file.
    fn logging_config(&self) -> LoggingConfig {
        let mut logging = LoggingConfig::from_env();
        if let Some(level) = &self.log_level {
            logging = logging.with_level(level.clone());
        }
        if self.json_logs {
            logging = logging.with_json(true);
        }
        let file = self
            .log_file
            .clone()
            .or_else(|| logging.log_file.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE));
        logging.with_file(file)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = args.inspector_config()?;
    init_logging(&args.logging_config()).context("Failed to initialize logging")?;

    tracing::info!(
        backend_url = %config.backend_url,
        timeout_ms = config.request_timeout.as_millis() as u64,
        "Starting trie inspector"
    );

    let gateway = HttpGateway::new(&config).context("Failed to create HTTP client")?;
    let service = InspectorService::new(Arc::new(gateway), &config);

    // Setup terminal with panic hook for cleanup
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(info);
    }));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(&config);
    let result = run_app(&mut terminal, &mut app, &service).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        tracing::error!(error = %e, "Inspector exited with error");
        eprintln!("Error: {e:#}");
    }
    tracing::info!("Trie inspector stopped");

    Ok(())
}

/// Main application loop.
async fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    service: &InspectorService<HttpGateway>,
) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel::<Completion>();

    loop {
        terminal.draw(|frame| ui::render(frame, app))?;

        // Apply finished backend calls (non-blocking)
        while let Ok(completion) = rx.try_recv() {
            app.on_completion(completion);
        }

        if event::poll(POLL_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if let Some(call) = app.on_key(key.code) {
                        service.spawn(call, tx.clone());
                    }
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }

        // Let spawned calls make progress on the current-thread path
        tokio::task::yield_now().await;
    }
}
