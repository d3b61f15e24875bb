//! Minimal Leaflet.js bindings used by the dashboard map. Only the surface
//! the dashboard touches is declared; option objects are assembled with
//! `js_sys::Reflect` at the call sites.

use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = L)]
    pub type Map;

    #[wasm_bindgen(js_namespace = L, js_name = map)]
    pub fn create_map(id: &str) -> Map;

    #[wasm_bindgen(method, js_name = setView)]
    pub fn set_view(this: &Map, lat_lng: &JsValue, zoom: u32) -> Map;

    #[wasm_bindgen(method, js_name = removeLayer)]
    pub fn remove_layer(this: &Map, layer: &JsValue);

    #[wasm_bindgen(method)]
    pub fn locate(this: &Map, options: &JsValue);

    #[wasm_bindgen(method)]
    pub fn on(this: &Map, event: &str, handler: &js_sys::Function);

    #[wasm_bindgen(js_namespace = L)]
    pub type TileLayer;

    #[wasm_bindgen(js_namespace = L, js_name = tileLayer)]
    pub fn tile_layer(url: &str, options: &JsValue) -> TileLayer;

    #[wasm_bindgen(method, js_name = addTo)]
    pub fn add_to(this: &TileLayer, map: &Map);

    #[wasm_bindgen(js_namespace = L)]
    pub type Marker;

    #[wasm_bindgen(js_namespace = L, js_name = marker)]
    pub fn create_marker(lat_lng: &JsValue, options: &JsValue) -> Marker;

    #[wasm_bindgen(method, js_name = addTo)]
    pub fn marker_add_to(this: &Marker, map: &Map);

    #[wasm_bindgen(method, js_name = bindPopup)]
    pub fn bind_popup(this: &Marker, content: &str) -> Marker;

    #[wasm_bindgen(method, js_name = remove)]
    pub fn marker_remove(this: &Marker);

    #[wasm_bindgen(js_namespace = L)]
    pub type Circle;

    #[wasm_bindgen(js_namespace = L, js_name = circle)]
    pub fn create_circle(lat_lng: &JsValue, options: &JsValue) -> Circle;

    #[wasm_bindgen(method, js_name = addTo)]
    pub fn circle_add_to(this: &Circle, map: &Map);

    #[wasm_bindgen(method, js_name = bindPopup)]
    pub fn circle_bind_popup(this: &Circle, content: &str) -> Circle;

    #[wasm_bindgen(method, js_name = openPopup)]
    pub fn circle_open_popup(this: &Circle);

    #[wasm_bindgen(js_namespace = L, js_name = divIcon)]
    pub fn div_icon(options: &JsValue) -> JsValue;
}

/// `[lat, lng]` pair in the shape Leaflet accepts.
pub fn lat_lng(lat: f64, lng: f64) -> JsValue {
    let pair = js_sys::Array::new();
    pair.push(&JsValue::from_f64(lat));
    pair.push(&JsValue::from_f64(lng));
    pair.into()
}
