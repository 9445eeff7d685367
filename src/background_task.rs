use tokio::time::{interval, Duration, MissedTickBehavior};

use crate::middlewares::idempotency::IdempotencyStore;

/// Periodically evicts idempotency entries older than the store's TTL.
pub async fn start_idempotency_purge_task(store: IdempotencyStore) {
    let period = (store.ttl() / 2).clamp(Duration::from_secs(1), Duration::from_secs(60));
    let mut interval = interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;

        let purged = store.purge_expired();
        if purged > 0 {
            tracing::debug!("Purged {} expired idempotency entries", purged);
        }
    }
}
