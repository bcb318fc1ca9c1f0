use crate::cache::TtlCache;
use crate::dashboard::Dashboard;
use crate::domain::Tab;
use crate::poller::PollRequest;
use crate::store::DashboardState;
use std::future::pending;
use std::io;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Stdout, stdin, stdout};
use tokio::sync::mpsc::Sender;
use tokio::sync::watch::Receiver;
use tokio::time::sleep_until;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::LinesStream;
use tracing::{info, instrument, warn};

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

const HELP: &str = "Commands: <tab id | label | number>, search <query> (or /<query>), refresh, clear-cache, help, quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Select(Tab),
    Search(String),
    Refresh,
    ClearCache,
    Help,
    Redraw,
    Quit,
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let line = s.trim();

        if let Some(query) = line.strip_prefix('/') {
            return Ok(Command::Search(query.trim().to_string()));
        }
        if let Some((word, query)) = line.split_once(char::is_whitespace) {
            if word.eq_ignore_ascii_case("search") {
                return Ok(Command::Search(query.trim().to_string()));
            }
        }

        match line.to_lowercase().as_str() {
            "" => Ok(Command::Redraw),
            "search" => Ok(Command::Search(String::new())),
            "refresh" | "r" => Ok(Command::Refresh),
            "clear-cache" => Ok(Command::ClearCache),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            _ => line.parse::<Tab>().map(Command::Select).map_err(|_| CommandError::Unknown(line.to_string())),
        }
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum CommandError {
    #[error("Unknown command '{0}', type 'help' to list the commands")]
    Unknown(String),
}

/// Reads commands from stdin and redraws the dashboard after every command, every
/// state change and when a search highlight expires. Returns on `quit`, at the end
/// of input or when the store goes away.
#[instrument(skip_all)]
pub async fn run(
    mut dashboard: Dashboard,
    mut notifier: Receiver<DashboardState>,
    poll_tx: Sender<PollRequest>,
    cache: Arc<TtlCache>,
) -> io::Result<()> {
    let mut lines = LinesStream::new(BufReader::new(stdin()).lines());
    let mut out = stdout();

    draw(&mut dashboard, &mut notifier, &cache, &mut out).await?;

    loop {
        let expiry = dashboard.highlight_expiry(Instant::now());
        let highlight_expired = async {
            match expiry {
                Some(at) => sleep_until(at.into()).await,
                None => pending().await,
            }
        };

        tokio::select! {
            line = lines.next() => {
                let Some(line) = line else {
                    break;
                };
                match line?.parse::<Command>() {
                    Ok(Command::Quit) => break,
                    Ok(command) => execute(command, &mut dashboard, &poll_tx, &cache).await,
                    Err(e) => dashboard.set_message(e.to_string()),
                }
            }
            changed = notifier.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            _ = highlight_expired => {}
        }

        draw(&mut dashboard, &mut notifier, &cache, &mut out).await?;
    }

    info!("👋 Console closed");
    Ok(())
}

async fn execute(command: Command, dashboard: &mut Dashboard, poll_tx: &Sender<PollRequest>, cache: &TtlCache) {
    match command {
        Command::Select(tab) => {
            dashboard.select(tab);
            if dashboard.active() == Tab::AiIntelligence {
                request_poll(poll_tx, PollRequest::Insights).await;
            }
        }
        Command::Search(query) => {
            dashboard.search(&query, Instant::now());
        }
        Command::Refresh => {
            dashboard.set_message("Refreshing...");
            request_poll(poll_tx, PollRequest::All).await;
        }
        Command::ClearCache => {
            match cache.clear().await {
                Ok(removed) => dashboard.set_message(format!("Cleared {} cached responses", removed)),
                Err(e) => {
                    warn!("⚠️ Unable to clear the cache: {}", e);
                    dashboard.set_message(format!("Unable to clear the cache: {}", e));
                }
            }
            request_poll(poll_tx, PollRequest::All).await;
        }
        Command::Help => dashboard.set_message(HELP),
        Command::Redraw | Command::Quit => {}
    }
}

async fn request_poll(poll_tx: &Sender<PollRequest>, request: PollRequest) {
    if poll_tx.send(request).await.is_err() {
        warn!(?request, "⚠️ Poller is not running");
    }
}

async fn draw(
    dashboard: &mut Dashboard,
    notifier: &mut Receiver<DashboardState>,
    cache: &TtlCache,
    out: &mut Stdout,
) -> io::Result<()> {
    let entries = cache.entries().await.unwrap_or_else(|e| {
        warn!("⚠️ Unable to list cache entries: {}", e);
        Vec::new()
    });

    let frame = {
        let state = notifier.borrow_and_update();
        dashboard.render(&state, &entries, Instant::now())
    };

    out.write_all(CLEAR_SCREEN.as_bytes()).await?;
    out.write_all(frame.as_bytes()).await?;
    out.write_all(b"\n> ").await?;
    out.flush().await
}
