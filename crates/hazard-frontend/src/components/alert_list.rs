//! # Alert List Component
//!
//! One row per active alert with a resolve control, rebuilt reactively from
//! the store snapshot. An empty store shows a distinct indicator instead of
//! an empty list.

use leptos::prelude::*;
use leptos::task::spawn_local;

use hazard_domain::Alert;

use crate::state::{NoticeKind, use_app_state};

#[component]
pub fn AlertListPanel() -> impl IntoView {
    let state = use_app_state();

    let alerts = {
        let state = state.clone();
        move || state.store.list()
    };
    let count = {
        let alerts = alerts.clone();
        move || alerts().len()
    };
    let is_empty = {
        let alerts = alerts.clone();
        move || alerts().is_empty()
    };

    view! {
        <div class="panel">
            <div class="panel-header">
                <span class="panel-title">"ACTIVE ALERTS"</span>
                <span class="panel-badge">{count}</span>
            </div>
            <div class="panel-body no-padding">
                <ul class="alert-list">
                    <For
                        each=alerts
                        key=|alert| alert.id
                        children=move |alert| view! { <AlertRow alert=alert /> }
                    />
                </ul>
                {move || {
                    is_empty()
                        .then(|| view! { <div class="empty-state">"No active alerts."</div> })
                }}
            </div>
        </div>
    }
}

/// Single alert row with its resolve action.
#[component]
fn AlertRow(alert: Alert) -> impl IntoView {
    let state = use_app_state();
    let id = alert.id;

    let on_resolve = move |_| {
        let state = state.clone();
        spawn_local(async move {
            match state.store.resolve(id).await {
                Ok(removed) => {
                    if !removed {
                        log::info!("alert {id} was already gone");
                    }
                }
                Err(err) => {
                    log::error!("alert {id} could not be resolved: {err}");
                    state.push_notice(NoticeKind::Error, "The alert could not be resolved.");
                }
            }
        });
    };

    view! {
        <li class="alert-row">
            <div class="alert-info">
                <span class="alert-category">{alert.category.label()}</span>
                <p class="alert-description">{alert.description.clone()}</p>
            </div>
            <button class="btn btn-resolve" on:click=on_resolve>
                "Resolve"
            </button>
        </li>
    }
}
