//! # Placement Controls
//!
//! Category picker and the interaction status line. The selected category
//! gates alert creation; the status line narrates the create flow.

use leptos::prelude::*;

use hazard_domain::AlertCategory;

use crate::state::{STATUS_IDLE, use_app_state};

#[component]
pub fn ControlsPanel() -> impl IntoView {
    let state = use_app_state();

    let on_change = {
        let state = state.clone();
        move |ev| {
            let selection = event_target_value(&ev).parse::<AlertCategory>().ok();
            if selection.is_some() {
                state.status.set(STATUS_IDLE.to_string());
            }
            state.selected_category.set(selection);
        }
    };

    view! {
        <div class="panel">
            <div class="panel-header">
                <span class="panel-title">"PLACE AN ALERT"</span>
            </div>
            <div class="panel-body">
                <select class="category-select" on:change=on_change>
                    <option value="">"Select a category"</option>
                    {AlertCategory::ALL
                        .into_iter()
                        .map(|category| {
                            view! { <option value=category.as_str()>{category.label()}</option> }
                        })
                        .collect_view()}
                </select>

                <div class="status-line">
                    <span>{move || state.status.get()}</span>
                    {move || state.busy.get().then(|| view! { <span class="spinner"></span> })}
                </div>
            </div>
        </div>
    }
}
