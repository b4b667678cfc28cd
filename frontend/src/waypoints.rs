use shared::{Candidate, Coordinate};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Waypoint {
    pub display_text: String,
    /// Coordinate bound by an accepted suggestion; any edit clears it.
    pub resolution: Option<Coordinate>,
}

impl Waypoint {
    pub fn is_resolved(&self) -> bool {
        self.resolution.is_some() && !self.display_text.is_empty()
    }
}

/// A resolved slot as seen by the map: index, coordinate and popup label.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSlot {
    pub index: usize,
    pub coordinate: Coordinate,
    pub label: String,
}

/// Ordered waypoint slots. Never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct WaypointList {
    slots: Vec<Waypoint>,
}

impl Default for WaypointList {
    fn default() -> Self {
        Self::new()
    }
}

impl WaypointList {
    pub fn new() -> Self {
        Self {
            slots: vec![Waypoint::default()],
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Waypoint> {
        self.slots.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Waypoint> {
        self.slots.iter()
    }

    pub fn text(&self, index: usize) -> Option<&str> {
        self.slots.get(index).map(|w| w.display_text.as_str())
    }

    pub fn add_slot(&mut self) {
        self.slots.push(Waypoint::default());
    }

    /// Retyping a slot drops its resolution; out-of-range indices are ignored.
    pub fn update_text(&mut self, index: usize, text: String) {
        if let Some(slot) = self.slots.get_mut(index) {
            slot.display_text = text;
            slot.resolution = None;
        }
    }

    pub fn accept_suggestion(&mut self, index: usize, candidate: &Candidate) {
        if let Some(slot) = self.slots.get_mut(index) {
            slot.display_text = candidate.label.clone();
            slot.resolution = Some(candidate.coordinate);
        }
    }

    /// Returns `false` when nothing was removed: the index is out of range or
    /// the slot is the last one left.
    pub fn remove_slot(&mut self, index: usize) -> bool {
        if self.slots.len() <= 1 || index >= self.slots.len() {
            return false;
        }
        self.slots.remove(index);
        true
    }

    pub fn is_line_eligible(&self) -> bool {
        self.slots.len() >= 2 && self.slots.iter().all(Waypoint::is_resolved)
    }

    pub fn resolved(&self) -> Vec<ResolvedSlot> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, w)| w.is_resolved())
            .filter_map(|(index, w)| {
                Some(ResolvedSlot {
                    index,
                    coordinate: w.resolution?,
                    label: w.display_text.clone(),
                })
            })
            .collect()
    }
}
