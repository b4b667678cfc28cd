use serde::Serialize;
use serde_wasm_bindgen::to_value;
use shared::{Bounds, Coordinate};
use wasm_bindgen::prelude::{JsValue, wasm_bindgen};

use crate::config::MapConfig;

#[wasm_bindgen(module = "/maplibre_map.js")]
extern "C" {
    #[wasm_bindgen(js_name = initMap)]
    fn init_map(config: JsValue);
    #[wasm_bindgen(js_name = disposeMap)]
    fn dispose_map();
    #[wasm_bindgen(js_name = setMarker)]
    fn set_marker_js(key: u32, marker: JsValue);
    #[wasm_bindgen(js_name = removeMarker)]
    fn remove_marker_js(key: u32);
    #[wasm_bindgen(js_name = clearMarkers)]
    fn clear_markers_js();
    #[wasm_bindgen(js_name = setLine)]
    fn set_line_js(coords: JsValue);
    #[wasm_bindgen(js_name = removeLine)]
    fn remove_line_js();
    #[wasm_bindgen(js_name = fitBounds)]
    fn fit_bounds_js(bounds: JsValue, padding: u32);
    #[wasm_bindgen(js_name = flyTo)]
    fn fly_to_js(center: JsValue);
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerSpec {
    pub coordinate: Coordinate,
    pub label: String,
}

/// Drawing primitives of the embedded map. No business logic lives behind it.
pub trait MapHost {
    fn add_or_update_marker(&mut self, key: usize, marker: &MarkerSpec);
    fn remove_marker(&mut self, key: usize);
    fn remove_all_markers(&mut self);
    fn add_or_update_line(&mut self, coords: &[Coordinate]);
    fn remove_line(&mut self);
    fn fit_to_bounds(&mut self, bounds: Bounds, padding: u32);
    fn fly_to(&mut self, center: Coordinate);
}

/// The single MapLibre map living in `#map`, driven through `maplibre_map.js`.
pub struct MaplibreHost {
    mounted: bool,
}

impl MaplibreHost {
    pub fn mount(config: &MapConfig) -> Self {
        match to_value(config) {
            Ok(value) => {
                init_map(value);
                Self { mounted: true }
            }
            Err(err) => {
                tracing::error!("could not encode map configuration: {err}");
                Self { mounted: false }
            }
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Releases every marker and the map instance. Later calls are no-ops.
    pub fn dispose(&mut self) {
        if self.mounted {
            clear_markers_js();
            dispose_map();
            self.mounted = false;
        }
    }
}

fn encode<T: Serialize + ?Sized>(value: &T) -> Option<JsValue> {
    match to_value(value) {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::error!("could not encode value for the map: {err}");
            None
        }
    }
}

fn marker_key(key: usize) -> u32 {
    u32::try_from(key).unwrap_or(u32::MAX)
}

impl MapHost for MaplibreHost {
    fn add_or_update_marker(&mut self, key: usize, marker: &MarkerSpec) {
        if !self.mounted {
            return;
        }
        if let Some(value) = encode(marker) {
            set_marker_js(marker_key(key), value);
        }
    }

    fn remove_marker(&mut self, key: usize) {
        if self.mounted {
            remove_marker_js(marker_key(key));
        }
    }

    fn remove_all_markers(&mut self) {
        if self.mounted {
            clear_markers_js();
        }
    }

    fn add_or_update_line(&mut self, coords: &[Coordinate]) {
        if !self.mounted {
            return;
        }
        if let Some(value) = encode(coords) {
            set_line_js(value);
        }
    }

    fn remove_line(&mut self) {
        if self.mounted {
            remove_line_js();
        }
    }

    fn fit_to_bounds(&mut self, bounds: Bounds, padding: u32) {
        if !self.mounted {
            return;
        }
        if let Some(value) = encode(&bounds) {
            fit_bounds_js(value, padding);
        }
    }

    fn fly_to(&mut self, center: Coordinate) {
        if !self.mounted {
            return;
        }
        if let Some(value) = encode(&center) {
            fly_to_js(value);
        }
    }
}

#[cfg(test)]
pub(crate) mod recording {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    pub enum Call {
        Marker(usize, String),
        RemoveMarker(usize),
        ClearMarkers,
        Line(Vec<Coordinate>),
        RemoveLine,
        Fit(Bounds, u32),
        FlyTo(Coordinate),
    }

    /// Host double that records every drawing call in order.
    #[derive(Debug, Default)]
    pub struct RecordingHost {
        pub calls: Vec<Call>,
    }

    impl RecordingHost {
        pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
            self.calls.iter().filter(|c| pred(c)).count()
        }
    }

    impl MapHost for RecordingHost {
        fn add_or_update_marker(&mut self, key: usize, marker: &MarkerSpec) {
            self.calls.push(Call::Marker(key, marker.label.clone()));
        }
        fn remove_marker(&mut self, key: usize) {
            self.calls.push(Call::RemoveMarker(key));
        }
        fn remove_all_markers(&mut self) {
            self.calls.push(Call::ClearMarkers);
        }
        fn add_or_update_line(&mut self, coords: &[Coordinate]) {
            self.calls.push(Call::Line(coords.to_vec()));
        }
        fn remove_line(&mut self) {
            self.calls.push(Call::RemoveLine);
        }
        fn fit_to_bounds(&mut self, bounds: Bounds, padding: u32) {
            self.calls.push(Call::Fit(bounds, padding));
        }
        fn fly_to(&mut self, center: Coordinate) {
            self.calls.push(Call::FlyTo(center));
        }
    }
}
