//! # Backend Poller
//!
//! Fixed-interval refresh of collaborator state: the latest sensor reading
//! and, in remote mode, the alert snapshot. Without a backend there is
//! nothing to poll and the loop never starts; local alert mutations
//! reconcile the views eagerly instead.

use gloo_timers::callback::Interval;
use leptos::prelude::Set;
use leptos::task::spawn_local;

use crate::services::api;
use crate::state::AppState;

pub const POLL_INTERVAL_MS: u32 = 5_000;

/// Starts the poll loop, with one immediate tick so the dashboard is
/// populated at startup.
pub fn start(state: &AppState) {
    let Some(base) = state.config.api_base.clone() else {
        log::info!("no backend configured, poller disabled");
        return;
    };

    tick(state.clone(), base.clone());
    let state = state.clone();
    Interval::new(POLL_INTERVAL_MS, move || {
        tick(state.clone(), base.clone());
    })
    .forget();
}

fn tick(state: AppState, base: String) {
    spawn_local(async move {
        // Sensor failures keep the previous displayed values.
        match api::fetch_latest_reading(&base).await {
            Ok(Some(reading)) => state.sensor.set(Some(reading)),
            Ok(None) => log::info!("no sensor reading available yet"),
            Err(err) => log::warn!("sensor poll failed, keeping last reading: {err}"),
        }

        if let Err(err) = state.store.refresh().await {
            log::warn!("alert refresh failed: {err}");
        }
    });
}
