use std::{sync::Arc, time::Duration};
use tokio::{task::JoinHandle, time::interval};
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, info, info_span};

use crate::cache::AnalysisCache;

/// Runs `cleanup_expired` immediately and then every `every` until
/// `shutdown` is cancelled.
pub fn spawn_sweeper(
    cache: Arc<AnalysisCache>,
    every: Duration,
    shutdown: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(
        async move {
            let mut ticker = interval(every);

            loop {
                tokio::select! {
                    _ = shutdown.cancelled() => {
                        info!("Sweeper shutting down");
                        break;
                    }
                    _ = ticker.tick() => {
                        let report = cache.cleanup_expired().await;
                        debug!(
                            memory_removed = report.memory_removed,
                            persistent_removed = report.persistent_removed,
                            "sweep finished"
                        );
                    }
                }
            }
        }
        .instrument(info_span!("sweeper", every_secs = every.as_secs())),
    )
}
