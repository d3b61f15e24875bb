//! # Hazard Watch Frontend
//!
//! Browser dashboard for placing and tracking geolocated hazard alerts on a
//! tile map, with a live station reading panel.

#![forbid(unsafe_code)]
#![warn(clippy::all)]

pub mod components;
pub mod config;
pub mod map;
pub mod services;
pub mod state;
pub mod store;

use leptos::prelude::*;
use leptos_meta::{Title, provide_meta_context};

use components::*;
use config::Config;
use state::{provide_app_state, use_app_state};

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();
    provide_app_state(Config::from_build_env());

    let state = use_app_state();
    services::poller::start(&state);

    view! {
        <Title text="Hazard Watch" />
        <div class="app-container">
            <Header />
            <div class="app-left-panel">
                <ControlsPanel />
                <AlertListPanel />
                <SensorPanel />
            </div>
            <div class="app-main">
                <MapPanel />
            </div>
        </div>
        <NoticeContainer />
    }
}

/// Transient toast stack; notices also dismiss themselves after a few
/// seconds.
#[component]
fn NoticeContainer() -> impl IntoView {
    let state = use_app_state();

    view! {
        <div class="toast-container">
            <For
                each=move || state.notices.get()
                key=|notice| notice.id
                children=move |notice| {
                    let state = use_app_state();
                    let id = notice.id;
                    view! {
                        <div class=format!("toast {}", notice.kind.class())>
                            <span>{notice.message.clone()}</span>
                            <button class="btn btn-sm" on:click=move |_| state.dismiss_notice(id)>
                                "×"
                            </button>
                        </div>
                    }
                }
            />
        </div>
    }
}

pub fn main() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    log::info!("Hazard Watch v{}", env!("CARGO_PKG_VERSION"));
    leptos::mount::mount_to_body(App);
}
