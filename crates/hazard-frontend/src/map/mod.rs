//! # Map Layer
//!
//! Ownership of everything drawn on the Leaflet map: the mounted base tile
//! layer, one marker per active alert, and the geolocation circle. The
//! marker table is patched from `MarkerPlan` diffs so marker identity (open
//! popups) survives refreshes.

pub mod leaflet;

use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};

use wasm_bindgen::prelude::*;

use hazard_domain::{Alert, GeoPoint, plan_markers};

/// Initial view: Bogotá.
pub const MAP_CENTER: GeoPoint = GeoPoint::new(4.7110, -74.0721);
pub const MAP_ZOOM: u32 = 12;

const LOCATE_MAX_ZOOM: u32 = 16;
const LOCATION_RADIUS_M: f64 = 500.0;
const LOCATION_POPUP: &str = "You are here.";
const LOCATION_ERROR: &str =
    "Could not determine your location. Make sure location permission is granted.";

/// Selectable base tile layers; exactly one is mounted at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseLayer {
    Light,
    Dark,
    Satellite,
}

impl BaseLayer {
    pub const ALL: [Self; 3] = [Self::Light, Self::Dark, Self::Satellite];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Light => "Default",
            Self::Dark => "Dark",
            Self::Satellite => "Satellite",
        }
    }

    const fn url(self) -> &'static str {
        match self {
            Self::Light => "https://{s}.basemaps.cartocdn.com/light_all/{z}/{x}/{y}{r}.png",
            Self::Dark => "https://{s}.basemaps.cartocdn.com/dark_all/{z}/{x}/{y}{r}.png",
            Self::Satellite => {
                "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}"
            }
        }
    }

    const fn attribution(self) -> &'static str {
        match self {
            Self::Light | Self::Dark => "&copy; CARTO",
            Self::Satellite => "&copy; Esri",
        }
    }
}

/// Owned handle to the mounted map. Held by the map panel; no globals.
pub struct MapView {
    map: leaflet::Map,
    base: RefCell<(BaseLayer, leaflet::TileLayer)>,
    markers: RefCell<HashMap<i64, leaflet::Marker>>,
}

impl MapView {
    /// Mounts the map into the container element. Returns `None` when the
    /// Leaflet bundle is not loaded; the rest of the dashboard keeps
    /// working without a map.
    pub fn mount(container_id: &str) -> Option<Self> {
        let window = web_sys::window()?;
        if window.get("L").is_none() {
            log::warn!("Leaflet not loaded, map will not render");
            return None;
        }

        let map = leaflet::create_map(container_id);
        map.set_view(&leaflet::lat_lng(MAP_CENTER.lat, MAP_CENTER.lng), MAP_ZOOM);

        let initial = BaseLayer::Light;
        let tiles = make_base(initial);
        tiles.add_to(&map);

        log::info!("map mounted at {}", MAP_CENTER.display());
        Some(Self {
            map,
            base: RefCell::new((initial, tiles)),
            markers: RefCell::new(HashMap::new()),
        })
    }

    #[must_use]
    pub fn active_base(&self) -> BaseLayer {
        self.base.borrow().0
    }

    /// Swaps the mounted base layer; requesting the active one is a no-op.
    pub fn switch_base(&self, next: BaseLayer) {
        let mut base = self.base.borrow_mut();
        if base.0 == next {
            return;
        }
        self.map.remove_layer(base.1.as_ref());
        let tiles = make_base(next);
        tiles.add_to(&self.map);
        *base = (next, tiles);
    }

    /// Applies the minimal marker patch for the current snapshot: one marker
    /// per active alert with finite coordinates, none for anything else.
    pub fn reconcile(&self, alerts: &[Alert]) {
        let mounted: BTreeSet<i64> = self.markers.borrow().keys().copied().collect();
        let plan = plan_markers(&mounted, alerts);
        for id in &plan.skipped {
            log::warn!("alert {id} has invalid coordinates, marker skipped");
        }

        let mut markers = self.markers.borrow_mut();
        for id in plan.remove {
            if let Some(marker) = markers.remove(&id) {
                marker.marker_remove();
            }
        }
        for alert in plan.add {
            let marker = self.add_marker(&alert);
            markers.insert(alert.id, marker);
        }
    }

    fn add_marker(&self, alert: &Alert) -> leaflet::Marker {
        let options = js_sys::Object::new();
        js_sys::Reflect::set(&options, &"icon".into(), &alert_icon()).unwrap();

        let marker = leaflet::create_marker(
            &leaflet::lat_lng(alert.point.lat, alert.point.lng),
            &options.into(),
        );
        marker.bind_popup(&popup_html(alert));
        marker.marker_add_to(&self.map);
        marker
    }

    /// Registers the click handler used to place alerts.
    pub fn on_click(&self, callback: impl Fn(GeoPoint) + 'static) {
        let closure = Closure::wrap(Box::new(move |event: JsValue| {
            if let Some(point) = event_lat_lng(&event) {
                callback(point);
            }
        }) as Box<dyn Fn(JsValue)>);
        self.map.on("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Asks the browser for the current position, recentering on success.
    pub fn locate(&self) {
        let options = js_sys::Object::new();
        js_sys::Reflect::set(&options, &"setView".into(), &true.into()).unwrap();
        js_sys::Reflect::set(&options, &"maxZoom".into(), &LOCATE_MAX_ZOOM.into()).unwrap();
        self.map.locate(&options.into());
    }

    /// Wires the geolocation outcome handlers: a fixed-radius circle with an
    /// opened popup on success, a blocking message on failure.
    pub fn install_location_handlers(&self) {
        let map = self.map.clone();
        let found = Closure::wrap(Box::new(move |event: JsValue| {
            let Some(point) = event_lat_lng(&event) else {
                return;
            };
            let options = js_sys::Object::new();
            js_sys::Reflect::set(&options, &"color".into(), &"#3b82f6".into()).unwrap();
            js_sys::Reflect::set(&options, &"fillColor".into(), &"#60a5fa".into()).unwrap();
            js_sys::Reflect::set(&options, &"fillOpacity".into(), &0.5.into()).unwrap();
            js_sys::Reflect::set(&options, &"radius".into(), &LOCATION_RADIUS_M.into()).unwrap();

            let circle =
                leaflet::create_circle(&leaflet::lat_lng(point.lat, point.lng), &options.into());
            circle.circle_add_to(map.unchecked_ref());
            circle.circle_bind_popup(LOCATION_POPUP);
            circle.circle_open_popup();
        }) as Box<dyn Fn(JsValue)>);
        self.map.on("locationfound", found.as_ref().unchecked_ref());
        found.forget();

        let error = Closure::wrap(Box::new(move |event: JsValue| {
            let reason = js_sys::Reflect::get(&event, &"message".into())
                .ok()
                .and_then(|m| m.as_string())
                .unwrap_or_default();
            log::warn!("geolocation failed: {reason}");
            if let Some(window) = web_sys::window() {
                let _ = window.alert_with_message(LOCATION_ERROR);
            }
        }) as Box<dyn Fn(JsValue)>);
        self.map.on("locationerror", error.as_ref().unchecked_ref());
        error.forget();
    }
}

fn make_base(layer: BaseLayer) -> leaflet::TileLayer {
    let options = js_sys::Object::new();
    js_sys::Reflect::set(&options, &"maxZoom".into(), &19.into()).unwrap();
    js_sys::Reflect::set(&options, &"attribution".into(), &layer.attribution().into()).unwrap();
    leaflet::tile_layer(layer.url(), &options.into())
}

/// `event.latlng` from a Leaflet mouse or location event.
fn event_lat_lng(event: &JsValue) -> Option<GeoPoint> {
    let latlng = js_sys::Reflect::get(event, &"latlng".into()).ok()?;
    let lat = js_sys::Reflect::get(&latlng, &"lat".into()).ok()?.as_f64()?;
    let lng = js_sys::Reflect::get(&latlng, &"lng".into()).ok()?.as_f64()?;
    Some(GeoPoint::new(lat, lng))
}

fn alert_icon() -> JsValue {
    const SVG: &str = r##"<svg class="hazard-marker-icon" xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" fill="#ef4444" stroke="#fff" stroke-width="1.5"><path d="M10.29 3.86L1.82 18a2 2 0 0 0 1.71 3h16.94a2 2 0 0 0 1.71-3L13.71 3.86a2 2 0 0 0-3.42 0z"/><line x1="12" y1="9" x2="12" y2="13"/><circle cx="12" cy="17" r="1" fill="#fff"/></svg>"##;

    let options = js_sys::Object::new();
    js_sys::Reflect::set(&options, &"className".into(), &"hazard-div-icon".into()).unwrap();
    js_sys::Reflect::set(&options, &"html".into(), &SVG.into()).unwrap();
    let size = js_sys::Array::new();
    size.push(&40.into());
    size.push(&40.into());
    js_sys::Reflect::set(&options, &"iconSize".into(), &size.into()).unwrap();
    leaflet::div_icon(&options.into())
}

/// Popup body: category label, description (or placeholder), coordinates to
/// 4 decimal places.
#[must_use]
pub fn popup_html(alert: &Alert) -> String {
    format!(
        "<b>Alert: {}</b><hr/><p>{}</p><small>{}</small>",
        alert.category.label(),
        alert.description_or_placeholder(),
        alert.point.display(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use hazard_domain::{AlertCategory, AlertStatus};

    fn alert(description: &str) -> Alert {
        Alert {
            id: 1,
            category: AlertCategory::Flood,
            description: description.to_string(),
            point: GeoPoint::new(4.711, -74.072),
            status: AlertStatus::Active,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_popup_formats_coordinates_to_four_decimals() {
        let html = popup_html(&alert("river rising"));
        assert!(html.contains("Alert: Flood"));
        assert!(html.contains("river rising"));
        assert!(html.contains("Lat: 4.7110, Lng: -74.0720"));
    }

    #[test]
    fn test_popup_substitutes_placeholder_for_empty_description() {
        let html = popup_html(&alert(""));
        assert!(html.contains(hazard_domain::NO_DESCRIPTION));
    }

    #[test]
    fn test_base_layers_are_distinct() {
        let urls: std::collections::BTreeSet<&str> =
            BaseLayer::ALL.iter().map(|layer| layer.url()).collect();
        assert_eq!(urls.len(), BaseLayer::ALL.len());
    }
}
