use serde::Serialize;

pub const DEFAULT_API_ROOT: &str = "https://unl-be.vercel.app";

pub const DEBOUNCE_MS: u64 = 300;

/// Padding in pixels around a fitted line.
pub const FIT_PADDING: u32 = 20;

/// Base URL of the location service, overridable at build time.
pub fn api_root() -> String {
    resolve_api_root(option_env!("LOCATION_API_ROOT"))
}

fn resolve_api_root(configured: Option<&str>) -> String {
    match configured.map(str::trim) {
        Some(url) if !url.is_empty() => url.trim_end_matches('/').to_string(),
        _ => DEFAULT_API_ROOT.to_string(),
    }
}

/// Fixed widget settings handed to `initMap`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapConfig {
    pub container: &'static str,
    pub style_url: &'static str,
    /// `[lng, lat]`, the order MapLibre expects.
    pub center: [f64; 2],
    pub zoom: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub scale_max_width: u32,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            container: "map",
            style_url: "https://demotiles.maplibre.org/style.json",
            center: [77.31715220081993, 28.570912915241163],
            zoom: 15.0,
            min_zoom: 0.0,
            max_zoom: 22.0,
            scale_max_width: 80,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_root_falls_back_to_default() {
        assert_eq!(resolve_api_root(None), DEFAULT_API_ROOT);
        assert_eq!(resolve_api_root(Some("  ")), DEFAULT_API_ROOT);
        assert_eq!(
            resolve_api_root(Some("http://localhost:3002/")),
            "http://localhost:3002"
        );
    }

    #[test]
    fn map_config_serializes_for_js() {
        let json = serde_json::to_value(MapConfig::default()).unwrap();
        assert_eq!(json["styleUrl"], "https://demotiles.maplibre.org/style.json");
        assert_eq!(json["zoom"], 15.0);
        assert_eq!(json["maxZoom"], 22.0);
        assert_eq!(json["center"][1], 28.570912915241163);
        assert_eq!(DEBOUNCE_MS, 300);
    }
}
