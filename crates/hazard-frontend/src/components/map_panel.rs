//! # Map Panel
//!
//! Mounts the Leaflet map, wires the click-to-place flow, and mirrors every
//! store change onto the marker layer. The map handle is owned here and
//! shared only with the overlay controls rendered inside the panel.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;

use hazard_domain::GeoPoint;

use crate::map::{BaseLayer, MapView};
use crate::state::{
    AppState, NoticeKind, STATUS_GENERATING, STATUS_IDLE, STATUS_NEED_CATEGORY, STATUS_SAVING,
    use_app_state,
};

type MapHandle = Rc<RefCell<Option<Rc<MapView>>>>;

/// Map panel with overlay layer/locate controls.
#[component]
pub fn MapPanel() -> impl IntoView {
    let state = use_app_state();
    let map_id = "hazard-map";
    let handle: MapHandle = Rc::new(RefCell::new(None));
    let (active_layer, set_active_layer) = signal(BaseLayer::Light);

    // Mount once the container element exists.
    {
        let handle = Rc::clone(&handle);
        let state = state.clone();
        Effect::new(move |_| {
            if handle.borrow().is_some() {
                return;
            }
            let Some(view) = MapView::mount(map_id) else {
                return;
            };
            let view = Rc::new(view);
            view.install_location_handlers();
            view.locate();
            {
                let state = state.clone();
                view.on_click(move |point| place_alert(state.clone(), point));
            }
            // The snapshot effect below runs after this one and performs the
            // initial reconciliation.
            *handle.borrow_mut() = Some(view);
        });
    }

    // Mirror every snapshot change onto the marker layer.
    {
        let handle = Rc::clone(&handle);
        let state = state.clone();
        Effect::new(move |_| {
            let alerts = state.store.list();
            if let Some(view) = handle.borrow().as_ref() {
                view.reconcile(&alerts);
            }
        });
    }

    let switch_layer = {
        let handle = Rc::clone(&handle);
        move |layer: BaseLayer| {
            if let Some(view) = handle.borrow().as_ref() {
                view.switch_base(layer);
                set_active_layer.set(view.active_base());
            }
        }
    };

    let locate = {
        let handle = Rc::clone(&handle);
        move |_| {
            if let Some(view) = handle.borrow().as_ref() {
                view.locate();
            }
        }
    };

    view! {
        <div class="map-container">
            <div id=map_id class="map-canvas"></div>

            <div class="map-overlay">
                {BaseLayer::ALL
                    .into_iter()
                    .map(|layer| {
                        let switch_layer = switch_layer.clone();
                        view! {
                            <button
                                class="map-control"
                                class:active=move || active_layer.get() == layer
                                on:click=move |_| switch_layer(layer)
                            >
                                {layer.label()}
                            </button>
                        }
                    })
                    .collect_view()}
                <button class="map-control" on:click=locate>
                    "Locate me"
                </button>
            </div>
        </div>
    }
}

/// Click-to-place flow: guard the category selection, obtain a description,
/// append to the store, and report the outcome. Every await point yields to
/// the UI; the snapshot signal drives reconciliation afterwards.
fn place_alert(state: AppState, point: GeoPoint) {
    let Some(category) = state.selected_category.get_untracked() else {
        state.status.set(STATUS_NEED_CATEGORY.to_string());
        return;
    };

    state.busy.set(true);
    state.status.set(STATUS_GENERATING.to_string());
    spawn_local(async move {
        let description = state.describer.describe(category).await;
        log::debug!("description for {category} via {:?}", description.source);
        state.status.set(STATUS_SAVING.to_string());
        match state.store.create(category, point, description.text).await {
            Ok(alert) => {
                log::info!("alert {} created ({})", alert.id, alert.category);
                state.push_notice(NoticeKind::Success, "Alert created.");
            }
            Err(err) => {
                log::error!("alert creation failed: {err}");
                state.push_notice(NoticeKind::Error, "The alert could not be saved.");
            }
        }
        state.busy.set(false);
        state.status.set(STATUS_IDLE.to_string());
    });
}
