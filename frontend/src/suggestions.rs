//! Autosuggest session for the waypoint inputs.
//!
//! A single session serves the whole list: at most one slot is focused, and
//! every focus change, keystroke or dismissal issues a fresh generation. Debounce
//! timers and fetch responses carry the [`Ticket`] they were started with and are
//! ignored once it is no longer current.

use std::time::Duration;

use shared::Candidate;

use crate::config::DEBOUNCE_MS;
use crate::waypoints::WaypointList;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(DEBOUNCE_MS);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Focused(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub slot: usize,
    generation: u64,
}

/// A fetch the shell should run once a debounce period elapsed.
#[derive(Debug, Clone, PartialEq)]
pub struct SuggestionQuery {
    pub ticket: Ticket,
    pub text: String,
}

#[derive(Debug)]
pub struct SuggestionSession {
    state: SessionState,
    generation: u64,
    suggestions: Vec<Candidate>,
    debounce: Duration,
}

impl Default for SuggestionSession {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl SuggestionSession {
    pub fn new(debounce: Duration) -> Self {
        Self {
            state: SessionState::Idle,
            generation: 0,
            suggestions: Vec::new(),
            debounce,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn focused(&self) -> Option<usize> {
        match self.state {
            SessionState::Focused(index) => Some(index),
            SessionState::Idle => None,
        }
    }

    pub fn suggestions(&self) -> &[Candidate] {
        &self.suggestions
    }

    pub fn is_open(&self) -> bool {
        self.focused().is_some() && !self.suggestions.is_empty()
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    pub fn debounce_ms(&self) -> u32 {
        u32::try_from(self.debounce.as_millis()).unwrap_or(u32::MAX)
    }

    /// Focus keeps the current list; the debounced fetch replaces it.
    pub fn focus(&mut self, index: usize) -> Ticket {
        self.restart(index)
    }

    pub fn text_changed(&mut self, index: usize) -> Ticket {
        self.restart(index)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.state == SessionState::Focused(ticket.slot) && self.generation == ticket.generation
    }

    /// Called when the debounce timer for `ticket` fires.
    ///
    /// Returns the query to fetch, or `None` when the ticket was superseded or
    /// the focused slot is empty (which clears the list without a request).
    pub fn debounce_elapsed(
        &mut self,
        ticket: Ticket,
        waypoints: &WaypointList,
    ) -> Option<SuggestionQuery> {
        if !self.is_current(ticket) {
            tracing::trace!(slot = ticket.slot, "superseded debounce timer ignored");
            return None;
        }
        let text = waypoints.text(ticket.slot).unwrap_or_default();
        if text.is_empty() {
            self.suggestions.clear();
            return None;
        }
        Some(SuggestionQuery {
            ticket,
            text: text.to_string(),
        })
    }

    /// Applies a fetch result; returns `true` when the list was replaced.
    pub fn apply_results<E: std::fmt::Display>(
        &mut self,
        ticket: Ticket,
        result: Result<Vec<Candidate>, E>,
    ) -> bool {
        if !self.is_current(ticket) {
            tracing::debug!(slot = ticket.slot, "discarding stale suggestions");
            return false;
        }
        match result {
            Ok(candidates) => {
                tracing::debug!(
                    slot = ticket.slot,
                    count = candidates.len(),
                    "suggestions received"
                );
                self.suggestions = candidates;
                true
            }
            Err(err) => {
                tracing::warn!(slot = ticket.slot, "error fetching search results: {err}");
                false
            }
        }
    }

    /// Binds the candidate at `position` to the focused slot and closes the list.
    ///
    /// Returns the slot that was resolved, or `None` when there is no focused
    /// slot or no such candidate.
    pub fn accept(&mut self, position: usize, waypoints: &mut WaypointList) -> Option<usize> {
        let slot = self.focused()?;
        let candidate = self.suggestions.get(position)?;
        waypoints.accept_suggestion(slot, candidate);
        self.close();
        Some(slot)
    }

    /// Outside interaction: close the list, keep every waypoint as it is.
    pub fn dismiss(&mut self) {
        self.close();
    }

    /// Follows the focused slot across a removal.
    ///
    /// When the focused slot moves down, its pending timer is superseded and the
    /// returned ticket must be scheduled in its place.
    pub fn slot_removed(&mut self, removed: usize) -> Option<Ticket> {
        match self.state {
            SessionState::Focused(index) if index == removed => {
                self.close();
                None
            }
            SessionState::Focused(index) if index > removed => Some(self.restart(index - 1)),
            _ => None,
        }
    }

    fn restart(&mut self, index: usize) -> Ticket {
        self.generation += 1;
        self.state = SessionState::Focused(index);
        Ticket {
            slot: index,
            generation: self.generation,
        }
    }

    fn close(&mut self) {
        self.generation += 1;
        self.state = SessionState::Idle;
        self.suggestions.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::Coordinate;

    fn candidate(label: &str) -> Candidate {
        Candidate {
            label: label.into(),
            coordinate: Coordinate { lat: 28.6, lon: 77.2 },
        }
    }

    fn typed(
        list: &mut WaypointList,
        session: &mut SuggestionSession,
        index: usize,
        text: &str,
    ) -> Ticket {
        list.update_text(index, text.into());
        session.text_changed(index)
    }

    #[test]
    fn only_the_last_keystroke_fetches() {
        let mut list = WaypointList::new();
        let mut session = SuggestionSession::default();

        let t1 = typed(&mut list, &mut session, 0, "D");
        let t2 = typed(&mut list, &mut session, 0, "De");
        let t3 = typed(&mut list, &mut session, 0, "Del");

        assert!(session.debounce_elapsed(t1, &list).is_none());
        assert!(session.debounce_elapsed(t2, &list).is_none());
        let query = session.debounce_elapsed(t3, &list).unwrap();
        assert_eq!(query.text, "Del");
        assert_eq!(query.ticket.slot, 0);
    }

    #[test]
    fn empty_text_clears_without_fetching() {
        let mut list = WaypointList::new();
        let mut session = SuggestionSession::default();
        let ticket = typed(&mut list, &mut session, 0, "Del");
        let query = session.debounce_elapsed(ticket, &list).unwrap();
        assert!(session.apply_results::<String>(query.ticket, Ok(vec![candidate("Delhi")])));
        assert!(session.is_open());

        let ticket = typed(&mut list, &mut session, 0, "");
        assert!(session.debounce_elapsed(ticket, &list).is_none());
        assert!(session.suggestions().is_empty());
    }

    #[test]
    fn focus_keeps_previous_suggestions_until_fetch() {
        let mut list = WaypointList::new();
        list.add_slot();
        list.update_text(1, "Noi".into());
        let mut session = SuggestionSession::default();

        let ticket = typed(&mut list, &mut session, 0, "Del");
        session.apply_results::<String>(ticket, Ok(vec![candidate("Delhi")]));

        let ticket = session.focus(1);
        assert_eq!(session.suggestions().len(), 1);
        assert_eq!(session.debounce_elapsed(ticket, &list).unwrap().text, "Noi");
    }

    #[test]
    fn stale_response_after_focus_loss_is_discarded() {
        let mut list = WaypointList::new();
        list.add_slot();
        let mut session = SuggestionSession::default();

        let ticket = typed(&mut list, &mut session, 0, "Del");
        let query = session.debounce_elapsed(ticket, &list).unwrap();
        session.focus(1);

        assert!(!session.apply_results::<String>(query.ticket, Ok(vec![candidate("Delhi")])));
        assert!(session.suggestions().is_empty());

        let ticket = typed(&mut list, &mut session, 1, "No");
        let query = session.debounce_elapsed(ticket, &list).unwrap();
        session.dismiss();
        assert!(!session.apply_results::<String>(query.ticket, Ok(vec![candidate("Noida")])));
        assert!(session.suggestions().is_empty());
    }

    #[test]
    fn failed_fetch_keeps_prior_list() {
        let mut list = WaypointList::new();
        let mut session = SuggestionSession::default();
        let ticket = typed(&mut list, &mut session, 0, "Del");
        let both = vec![candidate("Delhi"), candidate("Dehradun")];
        session.apply_results::<String>(ticket, Ok(both));

        assert!(!session.apply_results(ticket, Err("network down")));
        assert_eq!(session.suggestions().len(), 2);
    }

    #[test]
    fn accept_resolves_focused_slot_and_goes_idle() {
        let mut list = WaypointList::new();
        let mut session = SuggestionSession::default();
        let ticket = typed(&mut list, &mut session, 0, "Del");
        let both = vec![candidate("Delhi"), candidate("Dehradun")];
        session.apply_results::<String>(ticket, Ok(both));

        assert_eq!(session.accept(1, &mut list), Some(0));
        assert_eq!(session.state(), SessionState::Idle);
        assert!(session.suggestions().is_empty());
        assert_eq!(list.text(0), Some("Dehradun"));
        assert!(list.get(0).unwrap().is_resolved());

        assert_eq!(session.accept(0, &mut list), None);
    }

    #[test]
    fn dismiss_keeps_accepted_resolution() {
        let mut list = WaypointList::new();
        let mut session = SuggestionSession::default();
        let ticket = typed(&mut list, &mut session, 0, "Del");
        session.apply_results::<String>(ticket, Ok(vec![candidate("Delhi")]));
        session.accept(0, &mut list);

        session.focus(0);
        session.dismiss();
        assert_eq!(session.state(), SessionState::Idle);
        assert!(list.get(0).unwrap().is_resolved());
    }

    #[test]
    fn removing_slots_moves_or_drops_focus() {
        let mut list = WaypointList::new();
        list.add_slot();
        list.add_slot();
        let mut session = SuggestionSession::default();

        let ticket = typed(&mut list, &mut session, 2, "Agr");
        list.remove_slot(0);
        let shifted = session.slot_removed(0).unwrap();
        assert_eq!(session.focused(), Some(1));
        assert_eq!(shifted.slot, 1);
        assert!(session.debounce_elapsed(ticket, &list).is_none());
        let query = session.debounce_elapsed(shifted, &list).unwrap();
        assert_eq!(query.text, "Agr");
        assert_eq!(query.ticket, shifted);

        // Slots after the focused one leave the session alone.
        list.add_slot();
        list.remove_slot(2);
        assert_eq!(session.slot_removed(2), None);
        assert!(session.is_current(shifted));

        list.remove_slot(1);
        assert_eq!(session.slot_removed(1), None);
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn debounce_is_configurable() {
        let session = SuggestionSession::new(Duration::from_millis(120));
        assert_eq!(session.debounce_ms(), 120);
        assert_eq!(SuggestionSession::default().debounce(), DEFAULT_DEBOUNCE);
    }
}
