//! Round countdown background task

use std::{sync::Arc, time::Duration};
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, error, info};

use crate::state::{AppState, Tick};

/// Time between two countdown ticks
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Background task that drives the active round's countdown.
///
/// Follows the countdown published by [`AppState`]: whenever a new generation
/// starts, the interval for the old one is dropped before the new one runs, so
/// at most one countdown ever ticks.
pub async fn round_timer_task(state: Arc<AppState>) {
    info!("Starting round timer task");

    let mut timer_rx = state.timer_update_tx.subscribe();

    loop {
        let (generation, active) = {
            let timer = timer_rx.borrow_and_update();
            (timer.generation, timer.active)
        };

        if !active {
            // Wait for a round to start
            if timer_rx.changed().await.is_err() {
                break;
            }
            continue;
        }

        debug!("Countdown {} started", generation);
        let mut interval = interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    match state.tick(generation) {
                        Ok(Tick::Expired) => debug!("Countdown {} expired", generation),
                        Ok(_) => {}
                        Err(e) => error!("Failed to deliver countdown tick: {}", e),
                    }
                }

                changed = timer_rx.changed() => {
                    if changed.is_err() {
                        info!("Timer channel closed, stopping round timer task");
                        return;
                    }
                    let timer = timer_rx.borrow_and_update();
                    if timer.generation != generation || !timer.active {
                        debug!("Countdown {} cancelled", generation);
                        break;
                    }
                }
            }
        }
    }

    info!("Round timer task finished");
}
