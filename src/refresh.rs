//! Periodic roster refresh that can be cancelled.
//!
//! Each cycle loads the roster, annotates it once, and publishes the result
//! as a new [`Snapshot`] on a watch channel. Receivers always see the latest
//! snapshot; older ones are dropped when nobody holds them.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{Instrument, error, info};

use crate::analyzers::analyzer::annotate;
use crate::error::{Result, RosterError};
use crate::model::AnnotatedDataset;
use crate::source::{RosterSource, load_or_empty};

/// One annotated roster load.
#[derive(Debug)]
pub struct Snapshot {
    pub cycle: u64,
    pub loaded_at: DateTime<Utc>,
    pub data: AnnotatedDataset,
}

pub type SnapshotReceiver = watch::Receiver<Option<Arc<Snapshot>>>;

/// Owner side of a running refresh task.
pub struct RefreshHandle {
    cancel: Option<oneshot::Sender<()>>,
    task: JoinHandle<Result<()>>,
}

impl RefreshHandle {
    /// Stops the task after the cycle in progress and waits for it to exit.
    pub async fn cancel(mut self) -> Result<()> {
        if let Some(cancel) = self.cancel.take() {
            let _ = cancel.send(());
        }
        self.join().await
    }

    /// Waits for the task to finish on its own (cycle limit or structural error).
    pub async fn wait(self) -> Result<()> {
        self.join().await
    }

    async fn join(self) -> Result<()> {
        match self.task.await {
            Ok(result) => result,
            Err(e) => {
                error!(error = %e, "Refresh task did not complete cleanly");
                Err(RosterError::Task(e))
            }
        }
    }
}

/// Spawns a task that reloads `source` every `period`.
///
/// The first load happens immediately. `max_cycles == 0` means run until
/// cancelled. A structural load error (e.g. a missing column) ends the task
/// and is returned from [`RefreshHandle::wait`] / [`RefreshHandle::cancel`].
pub fn spawn_refresh<S>(source: S, period: Duration, max_cycles: u64) -> (RefreshHandle, SnapshotReceiver)
where
    S: RosterSource + 'static,
{
    let (snapshot_tx, snapshot_rx) = watch::channel(None);
    let (cancel_tx, mut cancel_rx) = oneshot::channel::<()>();

    let span = tracing::info_span!("refresh", source = %source.describe(), period_ms = period.as_millis() as u64);
    let task = tokio::spawn(
        async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut cycle = 0u64;

            loop {
                if max_cycles > 0 && cycle >= max_cycles {
                    break;
                }

                tokio::select! {
                    _ = &mut cancel_rx => {
                        info!(cycle, "Refresh cancelled");
                        break;
                    }
                    _ = ticker.tick() => {}
                }

                cycle += 1;
                let loaded = load_or_empty(&source).await?;
                let snapshot = Snapshot {
                    cycle,
                    loaded_at: Utc::now(),
                    data: annotate(&loaded.into_dataset()),
                };
                info!(cycle, rows = snapshot.data.len(), "Published roster snapshot");
                snapshot_tx.send_replace(Some(Arc::new(snapshot)));
            }

            Ok::<(), RosterError>(())
        }
        .instrument(span),
    );

    (
        RefreshHandle {
            cancel: Some(cancel_tx),
            task,
        },
        snapshot_rx,
    )
}
