use crate::domain::events::Event;
use crate::loader::Loader;
use std::time::Duration;
use tokio::sync::mpsc::error::SendError;
use tokio::sync::mpsc::{Receiver, Sender};
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info, instrument};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollRequest {
    /// Reload every screen. Telemetry still goes through the cache.
    All,
    Insights,
}

/// Reloads on every tick of `every` and on every explicit request, until the
/// request channel or the store goes away. The first tick fires immediately.
#[instrument(skip_all)]
pub async fn poller(loader: Loader, tx: Sender<Event>, mut requests: Receiver<PollRequest>, every: Duration) {
    let mut ticker = interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        let request = tokio::select! {
            _ = ticker.tick() => PollRequest::All,
            request = requests.recv() => match request {
                Some(request) => request,
                None => break,
            },
        };

        debug!(?request, "🔄 Polling...");
        if poll(&loader, &tx, request).await.is_err() {
            break;
        }
    }

    info!("🔄 Poller stopped");
}

async fn poll(loader: &Loader, tx: &Sender<Event>, request: PollRequest) -> Result<(), SendError<Event>> {
    tx.send(Event::InsightsRequested).await?;

    match request {
        PollRequest::All => {
            let (live, report, history, insights) = tokio::join!(loader.live(), loader.report(), loader.history(), loader.insights());
            tx.send(Event::LiveLoaded(live)).await?;
            tx.send(Event::ReportLoaded(report)).await?;
            tx.send(Event::HistoryLoaded(history)).await?;
            tx.send(Event::InsightsLoaded(insights)).await?;
        }
        PollRequest::Insights => {
            tx.send(Event::InsightsLoaded(loader.insights().await)).await?;
        }
    }

    Ok(())
}
