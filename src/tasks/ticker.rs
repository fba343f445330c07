//! Periodic phase resampling task

use std::sync::Arc;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info};

use super::Dispatcher;
use crate::{
    services::DEFAULT_VOLUME,
    state::{AppState, Snapshot},
};

/// Sample the phase once and dispatch its side effects
fn evaluate(state: &AppState, dispatcher: &mut Dispatcher) -> Option<Snapshot> {
    let snapshot = match state.snapshot() {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to sample timer: {}", e);
            return None;
        }
    };

    let track = state.selected_track().unwrap_or_else(|e| {
        error!("Failed to read selected track: {}", e);
        None
    });
    let volume = state.get_volume().unwrap_or_else(|e| {
        error!("Failed to read volume: {}", e);
        DEFAULT_VOLUME
    });

    if dispatcher.dispatch(&snapshot, track.as_ref(), volume) {
        if let Err(e) = state.complete() {
            error!("Failed to complete workout: {}", e);
        }
    }

    Some(snapshot)
}

/// Background task that drives the phase while the timer runs.
///
/// At most one interval exists at a time: it is dropped as soon as the run
/// state changes, before the new state is evaluated. While paused or stopped
/// the phase is evaluated once and no interval runs.
pub async fn ticker_task(state: Arc<AppState>, mut dispatcher: Dispatcher) {
    info!("Starting ticker task ({}ms period)", state.tick_interval.as_millis());

    let mut changes = state.subscribe();

    loop {
        changes.borrow_and_update();

        let active = evaluate(&state, &mut dispatcher)
            .map(|s| s.run_state.is_active())
            .unwrap_or(false);

        if active {
            let mut ticks = interval(state.tick_interval);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // first tick completes immediately and was just evaluated
            ticks.tick().await;

            loop {
                tokio::select! {
                    _ = ticks.tick() => {
                        evaluate(&state, &mut dispatcher);
                    }
                    changed = changes.changed() => {
                        if changed.is_err() {
                            info!("State channel closed, stopping ticker");
                            return;
                        }
                        debug!("Run state changed, cancelling resample interval");
                        break;
                    }
                }
            }
        } else if changes.changed().await.is_err() {
            info!("State channel closed, stopping ticker");
            return;
        }
    }
}
