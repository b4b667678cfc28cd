//! State transitions behind the Seed `update` loop.
//!
//! [`Workspace`] owns the waypoint list, the suggestion session and the map
//! sync state. Every transition returns the [`Effects`] the shell has to carry
//! out with Seed: timers, the outside-click subscription and fetches.

use shared::{Candidate, Unit};

use crate::map_host::MapHost;
use crate::map_sync::{DistanceRequest, MapSyncController};
use crate::suggestions::{SuggestionQuery, SuggestionSession, Ticket};
use crate::waypoints::WaypointList;

#[derive(Debug, Default, PartialEq)]
pub struct Effects {
    /// Replace the debounce timer with one for this ticket and listen for
    /// outside clicks.
    pub schedule: Option<Ticket>,
    /// Drop the debounce timer and the outside-click subscription.
    pub release: bool,
    pub fetch_suggestions: Option<SuggestionQuery>,
    pub fetch_distances: Option<DistanceRequest>,
}

#[derive(Debug, Default)]
pub struct Workspace {
    pub waypoints: WaypointList,
    pub session: SuggestionSession,
    pub sync: MapSyncController,
    pub unit: Unit,
}

impl Workspace {
    pub fn new(session: SuggestionSession) -> Self {
        Self {
            session,
            ..Self::default()
        }
    }

    pub fn add_slot(&mut self, host: &mut impl MapHost) -> Effects {
        self.waypoints.add_slot();
        self.synced(host)
    }

    pub fn remove_slot(&mut self, index: usize, host: &mut impl MapHost) -> Effects {
        if !self.waypoints.remove_slot(index) {
            return Effects::default();
        }
        let schedule = self.session.slot_removed(index);
        Effects {
            schedule,
            release: self.session.focused().is_none(),
            ..self.synced(host)
        }
    }

    pub fn text_changed(
        &mut self,
        index: usize,
        text: String,
        host: &mut impl MapHost,
    ) -> Effects {
        self.waypoints.update_text(index, text);
        let ticket = self.session.text_changed(index);
        Effects {
            schedule: Some(ticket),
            ..self.synced(host)
        }
    }

    pub fn focus(&mut self, index: usize) -> Effects {
        Effects {
            schedule: Some(self.session.focus(index)),
            ..Effects::default()
        }
    }

    pub fn debounce_elapsed(&mut self, ticket: Ticket) -> Effects {
        Effects {
            fetch_suggestions: self.session.debounce_elapsed(ticket, &self.waypoints),
            ..Effects::default()
        }
    }

    /// Returns `true` when the suggestion list changed.
    pub fn suggestions_fetched<E: std::fmt::Display>(
        &mut self,
        ticket: Ticket,
        result: Result<Vec<Candidate>, E>,
    ) -> bool {
        self.session.apply_results(ticket, result)
    }

    pub fn pick(&mut self, position: usize, host: &mut impl MapHost) -> Effects {
        match self.session.accept(position, &mut self.waypoints) {
            Some(slot) => {
                tracing::debug!(slot, "suggestion accepted");
                Effects {
                    release: true,
                    ..self.synced(host)
                }
            }
            None => Effects::default(),
        }
    }

    pub fn outside_click(&mut self) -> Effects {
        self.session.dismiss();
        Effects {
            release: true,
            ..Effects::default()
        }
    }

    pub fn toggle_unit(&mut self, host: &mut impl MapHost) -> Effects {
        self.unit = self.unit.toggled();
        self.synced(host)
    }

    /// Returns `true` when the distance panel changed.
    pub fn distances_fetched<E: std::fmt::Display>(
        &mut self,
        seq: u64,
        result: Result<Vec<f64>, E>,
    ) -> bool {
        self.sync.apply_distances(seq, result)
    }

    /// The page is going away, possibly into the back/forward cache.
    pub fn page_hidden(&mut self, host: &mut impl MapHost) -> Effects {
        self.session.dismiss();
        self.sync.teardown(host);
        Effects {
            release: true,
            ..Effects::default()
        }
    }

    /// Redraws everything on a freshly mounted map.
    pub fn page_shown(&mut self, host: &mut impl MapHost) -> Effects {
        self.synced(host)
    }

    fn synced(&mut self, host: &mut impl MapHost) -> Effects {
        Effects {
            fetch_distances: self.sync.sync(&self.waypoints, self.unit, host),
            ..Effects::default()
        }
    }
}
