//! # Sensor Panel
//!
//! Latest station reading. Fields degrade independently: a failed poll or a
//! malformed field leaves the previous value (or the placeholder) in place.

use leptos::prelude::*;

use crate::state::use_app_state;

#[component]
pub fn SensorPanel() -> impl IntoView {
    let state = use_app_state();
    let reading = move || state.sensor.get().unwrap_or_default();

    view! {
        <div class="panel">
            <div class="panel-header">
                <span class="panel-title">"LATEST STATION READING"</span>
            </div>
            <div class="panel-body">
                <div class="sensor-grid">
                    <div class="sensor-field">
                        <span class="sensor-label">"Station"</span>
                        <span class="sensor-value">{move || reading().station_display()}</span>
                    </div>
                    <div class="sensor-field">
                        <span class="sensor-label">"Temperature"</span>
                        <span class="sensor-value">{move || reading().temperature_display()}</span>
                    </div>
                    <div class="sensor-field">
                        <span class="sensor-label">"Humidity"</span>
                        <span class="sensor-value">{move || reading().humidity_display()}</span>
                    </div>
                    <div class="sensor-field">
                        <span class="sensor-label">"Pressure"</span>
                        <span class="sensor-value">{move || reading().pressure_display()}</span>
                    </div>
                    <div class="sensor-field">
                        <span class="sensor-label">"Updated"</span>
                        <span class="sensor-value">{move || reading().time_display()}</span>
                    </div>
                </div>
            </div>
        </div>
    }
}
