pub mod api;
pub mod config;
mod error_boundary;
mod logging;
pub mod map_host;
pub mod map_sync;
pub mod shell;
pub mod suggestions;
pub mod waypoints;

use std::time::Duration;

use seed::{prelude::*, virtual_dom::AtValue, *};
use shared::{Candidate, Unit};
use wasm_bindgen::prelude::wasm_bindgen;

use crate::api::{FetchError, LocationResolverClient};
use crate::config::{DEBOUNCE_MS, MapConfig, api_root};
use crate::map_host::MaplibreHost;
use crate::shell::{Effects, Workspace};
use crate::suggestions::{SuggestionSession, Ticket};
use crate::waypoints::Waypoint;

pub struct Model {
    app: Workspace,
    client: LocationResolverClient,
    map: MaplibreHost,
    debounce: Option<CmdHandle>,
    outside_clicks: Option<StreamHandle>,
}

pub enum Msg {
    AddSlot,
    RemoveSlot(usize),
    TextChanged(usize, String),
    InputFocused(usize),
    DebounceElapsed(Ticket),
    SuggestionsFetched(Ticket, Result<Vec<Candidate>, FetchError>),
    SuggestionPicked(usize),
    OutsideClick,
    ToggleUnit,
    DistancesFetched(u64, Result<Vec<f64>, FetchError>),
    PageHidden,
    PageShown,
}

pub fn init(_: Url, orders: &mut impl Orders<Msg>) -> Model {
    orders
        .stream(streams::window_event(Ev::from("pagehide"), |_| {
            Msg::PageHidden
        }))
        .stream(streams::window_event(Ev::from("pageshow"), |_| {
            Msg::PageShown
        }));

    let root = api_root();
    tracing::info!("location service at {root}");

    Model {
        app: Workspace::new(SuggestionSession::new(Duration::from_millis(DEBOUNCE_MS))),
        client: LocationResolverClient::new(root),
        map: MaplibreHost::mount(&MapConfig::default()),
        debounce: None,
        outside_clicks: None,
    }
}

pub fn update(msg: Msg, model: &mut Model, orders: &mut impl Orders<Msg>) {
    let effects = match msg {
        Msg::AddSlot => model.app.add_slot(&mut model.map),
        Msg::RemoveSlot(index) => model.app.remove_slot(index, &mut model.map),
        Msg::TextChanged(index, text) => model.app.text_changed(index, text, &mut model.map),
        Msg::InputFocused(index) => model.app.focus(index),
        Msg::DebounceElapsed(ticket) => {
            model.debounce = None;
            model.app.debounce_elapsed(ticket)
        }
        Msg::SuggestionsFetched(ticket, result) => {
            if !model.app.suggestions_fetched(ticket, result) {
                orders.skip();
            }
            return;
        }
        Msg::SuggestionPicked(position) => model.app.pick(position, &mut model.map),
        Msg::OutsideClick => model.app.outside_click(),
        Msg::ToggleUnit => model.app.toggle_unit(&mut model.map),
        Msg::DistancesFetched(seq, result) => {
            if !model.app.distances_fetched(seq, result) {
                orders.skip();
            }
            return;
        }
        Msg::PageHidden => {
            let effects = model.app.page_hidden(&mut model.map);
            model.map.dispose();
            effects
        }
        Msg::PageShown => {
            // Also fires on the first load, when the map is already up.
            if model.map.is_mounted() {
                orders.skip();
                return;
            }
            model.map = MaplibreHost::mount(&MapConfig::default());
            model.app.page_shown(&mut model.map)
        }
    };
    perform(effects, model, orders);
}

fn perform(effects: Effects, model: &mut Model, orders: &mut impl Orders<Msg>) {
    if effects.release {
        model.debounce = None;
        model.outside_clicks = None;
    }
    if let Some(ticket) = effects.schedule {
        schedule_search(model, orders, ticket);
    }
    if let Some(query) = effects.fetch_suggestions {
        let client = model.client.clone();
        orders.perform_cmd(async move {
            let result = client.autosuggest(&query.text).await;
            Msg::SuggestionsFetched(query.ticket, result)
        });
    }
    if let Some(request) = effects.fetch_distances {
        let client = model.client.clone();
        orders.perform_cmd(async move {
            let result = client.distance_matrix(&request.body).await;
            Msg::DistancesFetched(request.seq, result)
        });
    }
}

/// Restarts the debounce timer; dropping the previous handle aborts its timeout.
fn schedule_search(model: &mut Model, orders: &mut impl Orders<Msg>, ticket: Ticket) {
    let delay = model.app.session.debounce_ms();
    model.debounce = Some(
        orders.perform_cmd_with_handle(cmds::timeout(delay, move || Msg::DebounceElapsed(ticket))),
    );
    if model.outside_clicks.is_none() {
        model.outside_clicks = Some(orders.stream_with_handle(streams::document_event(
            Ev::Click,
            |_| Msg::OutsideClick,
        )));
    }
}

pub fn view(model: &Model) -> Node<Msg> {
    div![C!["app-container"], view_distances(model), view_search(model)]
}

fn view_distances(model: &Model) -> Node<Msg> {
    if model.app.sync.distances().is_empty() {
        return empty![];
    }
    div![
        C!["distance-container"],
        div![C!["switchbox"], view_unit_toggle(model.app.unit)],
        model.app.sync.distance_lines().into_iter().map(|line| p![line]),
    ]
}

fn view_unit_toggle(unit: Unit) -> Node<Msg> {
    label![
        input![
            attrs! {
                At::Type => "checkbox",
                At::Checked => bool_attr(unit == Unit::Imperial),
            },
            ev(Ev::Change, |_| Msg::ToggleUnit),
        ],
        unit.label(),
    ]
}

fn view_search(model: &Model) -> Node<Msg> {
    div![
        C!["search-container"],
        // Clicks inside never reach the document-level dismissal listener.
        ev(Ev::Click, |event| event.stop_propagation()),
        model
            .app
            .waypoints
            .iter()
            .enumerate()
            .map(|(idx, waypoint)| view_slot(idx, waypoint)),
        span![
            C!["add-icon"],
            attrs! { At::Title => "Add a stop" },
            "+",
            ev(Ev::Click, |_| Msg::AddSlot),
        ],
        view_suggestions(model),
    ]
}

fn view_slot(idx: usize, waypoint: &Waypoint) -> Node<Msg> {
    div![
        C!["input-container"],
        el_key(&idx),
        input![
            attrs! {
                At::Type => "text",
                At::Value => &waypoint.display_text,
                At::Placeholder => "Search for a location...",
                At::AutoComplete => "off",
                At::SpellCheck => "false",
            },
            input_ev(Ev::Input, move |text| Msg::TextChanged(idx, text)),
            ev(Ev::Focus, move |_| Msg::InputFocused(idx)),
        ],
        if idx > 0 {
            span![
                C!["remove-icon"],
                "×",
                ev(Ev::Click, move |_| Msg::RemoveSlot(idx)),
            ]
        } else {
            span![C!["location-icon"], "●"]
        },
    ]
}

fn view_suggestions(model: &Model) -> Node<Msg> {
    if !model.app.session.is_open() {
        return empty![];
    }
    ul![
        C!["suggestions"],
        model
            .app
            .session
            .suggestions()
            .iter()
            .enumerate()
            .map(|(position, candidate)| {
                li![
                    candidate.label.as_str(),
                    ev(Ev::Click, move |_| Msg::SuggestionPicked(position)),
                ]
            }),
    ]
}

fn bool_attr(value: bool) -> AtValue {
    if value {
        AtValue::Some("true".into())
    } else {
        AtValue::Ignored
    }
}

#[wasm_bindgen(start)]
pub fn start() {
    logging::init();
    error_boundary::install();
    App::start("app", init, update, view);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bool_attr_omits_false() {
        assert!(matches!(bool_attr(true), AtValue::Some(ref v) if v == "true"));
        assert!(matches!(bool_attr(false), AtValue::Ignored));
    }
}
