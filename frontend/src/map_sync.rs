//! Keeps the map and the distance panel in step with the waypoint list.

use std::collections::BTreeMap;

use shared::{Bounds, Coordinate, DistanceMatrixRequest, Unit, format_distance};

use crate::config::FIT_PADDING;
use crate::map_host::{MapHost, MarkerSpec};
use crate::waypoints::WaypointList;

/// A distance-matrix request tagged with the sequence number its reply must carry.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceRequest {
    pub seq: u64,
    pub body: DistanceMatrixRequest,
}

/// The resolved waypoints a set of distances was (or is being) computed for.
#[derive(Debug, Clone, Default, PartialEq)]
struct Leg {
    coords: Vec<Coordinate>,
    labels: Vec<String>,
    unit: Unit,
}

#[derive(Debug, Default)]
pub struct MapSyncController {
    markers: BTreeMap<usize, MarkerSpec>,
    line: Option<Vec<Coordinate>>,
    /// Most recent distance request.
    requested: Option<Leg>,
    latest_seq: u64,
    distances: Vec<f64>,
    /// Waypoints behind `distances`; changes only when a reply is applied.
    shown: Leg,
}

impl MapSyncController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn distances(&self) -> &[f64] {
        &self.distances
    }

    pub fn has_line(&self) -> bool {
        self.line.is_some()
    }

    pub fn marker_keys(&self) -> impl Iterator<Item = usize> + '_ {
        self.markers.keys().copied()
    }

    /// Reconciles the map with `waypoints` and reports the distance request to
    /// send, if the resolved coordinates or the unit changed.
    pub fn sync(
        &mut self,
        waypoints: &WaypointList,
        unit: Unit,
        host: &mut impl MapHost,
    ) -> Option<DistanceRequest> {
        let resolved = waypoints.resolved();

        let wanted: BTreeMap<usize, MarkerSpec> = resolved
            .iter()
            .map(|slot| {
                (
                    slot.index,
                    MarkerSpec {
                        coordinate: slot.coordinate,
                        label: slot.label.clone(),
                    },
                )
            })
            .collect();
        let stale: Vec<usize> = self
            .markers
            .keys()
            .filter(|key| !wanted.contains_key(key))
            .copied()
            .collect();
        for key in stale {
            host.remove_marker(key);
            self.markers.remove(&key);
        }
        for (key, marker) in wanted {
            if self.markers.get(&key) != Some(&marker) {
                host.add_or_update_marker(key, &marker);
                self.markers.insert(key, marker);
            }
        }

        let coords: Vec<Coordinate> = resolved.iter().map(|slot| slot.coordinate).collect();
        let coords_changed = self
            .requested
            .as_ref()
            .is_none_or(|pending| pending.coords != coords);

        if waypoints.is_line_eligible() {
            if self.line.as_deref() != Some(coords.as_slice()) {
                host.add_or_update_line(&coords);
                if let Some(bounds) = Bounds::enclosing(&coords) {
                    host.fit_to_bounds(bounds, FIT_PADDING);
                }
                self.line = Some(coords.clone());
            }
        } else if self.line.take().is_some() {
            host.remove_line();
        }

        if coords_changed {
            if let [single] = coords.as_slice() {
                host.fly_to(*single);
            }
        }

        let labels: Vec<String> = resolved.into_iter().map(|slot| slot.label).collect();
        if self.shown.coords == coords {
            self.shown.labels.clone_from(&labels);
        }
        self.request_distances(coords, labels, unit)
    }

    fn request_distances(
        &mut self,
        coords: Vec<Coordinate>,
        labels: Vec<String>,
        unit: Unit,
    ) -> Option<DistanceRequest> {
        if coords.is_empty() {
            self.requested = None;
            self.distances.clear();
            self.shown = Leg::default();
            // Replies still in flight belong to an older set.
            self.latest_seq += 1;
            return None;
        }
        if let Some(pending) = self.requested.as_mut() {
            if pending.coords == coords && pending.unit == unit {
                pending.labels = labels;
                return None;
            }
        }
        self.latest_seq += 1;
        let body = DistanceMatrixRequest::from_coordinates(&coords, unit);
        self.requested = Some(Leg {
            coords,
            labels,
            unit,
        });
        tracing::debug!(
            seq = self.latest_seq,
            points = body.latitudes.len(),
            %unit,
            "requesting distances"
        );
        Some(DistanceRequest {
            seq: self.latest_seq,
            body,
        })
    }

    /// Stores a distance-matrix reply; out-of-date replies and failures leave
    /// the current distances in place. Returns `true` when applied.
    pub fn apply_distances<E: std::fmt::Display>(
        &mut self,
        seq: u64,
        result: Result<Vec<f64>, E>,
    ) -> bool {
        if seq != self.latest_seq {
            tracing::debug!(seq, latest = self.latest_seq, "discarding stale distances");
            return false;
        }
        match result {
            Ok(distances) => {
                if let Some(pending) = &self.requested {
                    self.shown = pending.clone();
                }
                self.distances = distances;
                true
            }
            Err(err) => {
                tracing::warn!(seq, "error fetching distance matrix: {err}");
                false
            }
        }
    }

    /// The distance panel: one line per consecutive pair of resolved waypoints.
    pub fn distance_lines(&self) -> Vec<String> {
        self.distances
            .iter()
            .enumerate()
            .filter_map(|(idx, value)| {
                let from = self.shown.labels.get(idx)?;
                let to = self.shown.labels.get(idx + 1)?;
                Some(format!(
                    "Distance between {from} and {to}: {}",
                    format_distance(*value, self.shown.unit)
                ))
            })
            .collect()
    }

    pub fn teardown(&mut self, host: &mut impl MapHost) {
        host.remove_all_markers();
        self.markers.clear();
        if self.line.take().is_some() {
            host.remove_line();
        }
    }
}
