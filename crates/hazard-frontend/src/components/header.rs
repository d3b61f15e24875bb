//! # Header Component
//!
//! Top bar with product name and operating mode.

use leptos::prelude::*;

use crate::state::use_app_state;

#[component]
pub fn Header() -> impl IntoView {
    let state = use_app_state();

    let (mode_class, mode_label) = if state.config.is_remote() {
        ("nominal", "LIVE")
    } else {
        ("warning", "LOCAL")
    };

    view! {
        <header class="app-header">
            <div class="logo">
                <svg class="logo-icon" viewBox="0 0 24 24" fill="currentColor">
                    <path d="M12 2C8.13 2 5 5.13 5 9c0 5.25 7 13 7 13s7-7.75 7-13c0-3.87-3.13-7-7-7zm0 9.5a2.5 2.5 0 0 1 0-5 2.5 2.5 0 0 1 0 5z"/>
                </svg>
                <div>
                    <div class="logo-text">"HAZARD WATCH"</div>
                    <div class="logo-subtitle">"CITY HAZARD MAP"</div>
                </div>
            </div>

            <div class=format!("status-badge {mode_class}")>
                <span class=format!("status-dot {mode_class}")></span>
                {mode_label}
            </div>
        </header>
    }
}
