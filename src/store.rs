use crate::domain::Loadable;
use crate::domain::events::Event;
use crate::domain::insights::MlInsights;
use crate::domain::snapshot::TelemetrySnapshot;
use tokio::sync::mpsc::Receiver;
use tokio::sync::watch;
use tokio::sync::watch::{Receiver as WatchReceiver, Sender as WatchSender};
use tracing::{debug, info, instrument};

/// What the screens render from. Every slot loads independently.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardState {
    pub live: Loadable<TelemetrySnapshot>,
    pub report: Loadable<TelemetrySnapshot>,
    pub history: Loadable<Vec<TelemetrySnapshot>>,
    pub insights: Loadable<MlInsights>,
}

#[derive(Debug)]
pub struct Store {
    rx: Receiver<Event>,
    notifier_tx: WatchSender<DashboardState>,
    notifier_rx: WatchReceiver<DashboardState>,
}

impl Store {
    pub fn new(rx: Receiver<Event>) -> Self {
        let (notifier_tx, notifier_rx) = watch::channel(DashboardState::default());

        Store { rx, notifier_tx, notifier_rx }
    }

    pub fn notifier(&self) -> WatchReceiver<DashboardState> {
        self.notifier_rx.clone()
    }

    #[instrument(skip(self))]
    pub async fn listen(&mut self) {
        while let Some(event) = self.rx.recv().await {
            debug!("🔵 Received event: {:?}", event);
            self.notifier_tx.send_if_modified(|state| apply(state, event));
        }
        info!("🔵 Event channel closed, store stopped");
    }
}

/// Returns whether the state changed.
fn apply(state: &mut DashboardState, event: Event) -> bool {
    match event {
        Event::LiveLoaded(snapshot) => replace(&mut state.live, snapshot.into()),
        Event::ReportLoaded(snapshot) => replace(&mut state.report, snapshot.into()),
        Event::HistoryLoaded(records) => replace(&mut state.history, Loadable::Ready(records)),
        Event::InsightsRequested => {
            // Keep showing the previous insights while a refresh is in flight
            if state.insights.ready().is_some() {
                false
            } else {
                replace(&mut state.insights, Loadable::Loading)
            }
        }
        Event::InsightsLoaded(insights) => replace(&mut state.insights, Loadable::Ready(insights)),
    }
}

fn replace<T: PartialEq>(slot: &mut Loadable<T>, value: Loadable<T>) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}
