use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen::closure::Closure;
use web_sys::{AddEventListenerOptions, Element, MouseEvent};
use yew::prelude::*;

use super::touch_button::TouchButton;
use crate::dom::{self, TouchMarker};
use crate::session::TouchSession;
use crate::util::clog;

/// Installs the per-marker listeners: mousedown grabs the point for
/// dragging, dblclick releases it.
fn spawn_marker(
    identifier: i32,
    x: f64,
    y: f64,
    session: &Rc<RefCell<TouchSession<Element>>>,
    markers: &Rc<RefCell<HashMap<i32, TouchMarker>>>,
    retired: &Rc<RefCell<Vec<TouchMarker>>>,
    active: &UseStateHandle<usize>,
) -> Result<TouchMarker, JsValue> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let mousedown = {
        let session = session.clone();
        Closure::wrap(Box::new(move |e: MouseEvent| {
            // detail == 2 is half of a dblclick, not a drag grab
            if e.detail() == 2 {
                return;
            }
            e.prevent_default();
            session
                .borrow_mut()
                .begin_drag(identifier, e.client_x() as f64, e.client_y() as f64);
        }) as Box<dyn FnMut(_)>)
    };

    let dblclick = {
        let session = session.clone();
        let markers = markers.clone();
        let retired = retired.clone();
        let active = active.clone();
        Closure::wrap(Box::new(move |_e: MouseEvent| {
            let frame = session.borrow_mut().remove_point(identifier);
            if let Some(frame) = frame {
                if let Err(err) = dom::dispatch_frame(&frame) {
                    clog(&format!("touchend dispatch failed: {err:?}"));
                }
            }
            if let Some(marker) = markers.borrow_mut().remove(&identifier) {
                marker.detach();
                // This handler lives on the marker being removed; parking
                // the marker keeps the running closure alive until the
                // next activation flushes it.
                retired.borrow_mut().push(marker);
            }
            active.set(session.borrow().len());
        }) as Box<dyn FnMut(_)>)
    };

    TouchMarker::new(&document, x, y, mousedown, dblclick)
}

#[function_component(App)]
pub fn app() -> Html {
    // Seed identifiers from the clock, folded into i32 range, so ids
    // differ across page loads in consumer logs.
    let session = use_mut_ref(|| {
        TouchSession::<Element>::with_base_identifier(
            js_sys::Date::now().rem_euclid(1_000_000_000.0) as i32,
        )
    });
    let markers = use_mut_ref(HashMap::<i32, TouchMarker>::new);
    let retired = use_mut_ref(Vec::<TouchMarker>::new);
    let capture_slot = use_mut_ref(|| None::<Closure<dyn FnMut(MouseEvent)>>);
    let capture_pending = use_mut_ref(|| false);
    let active = use_state(|| 0usize);

    // Global drag wiring: mousemove drives the dragging point, mouseup
    // ends the drag. Installed once, removed on unmount.
    {
        let session = session.clone();
        let markers = markers.clone();
        let retired = retired.clone();
        let capture_slot = capture_slot.clone();
        let capture_pending = capture_pending.clone();
        use_effect_with((), move |_| {
            let window = web_sys::window().expect("no global `window` exists");

            let mousemove_cb = {
                let session = session.clone();
                let markers = markers.clone();
                Closure::wrap(Box::new(move |e: MouseEvent| {
                    let Some(id) = session.borrow().dragging() else {
                        return;
                    };
                    let frame = session.borrow_mut().update_position(
                        id,
                        e.client_x() as f64,
                        e.client_y() as f64,
                    );
                    let Some(frame) = frame else {
                        return;
                    };
                    if let Some(pos) = session.borrow().position(id) {
                        if let Some(marker) = markers.borrow().get(&id) {
                            let _ = dom::position_marker(&marker.el, pos.x, pos.y);
                        }
                    }
                    if let Err(err) = dom::dispatch_frame(&frame) {
                        clog(&format!("touchmove dispatch failed: {err:?}"));
                    }
                }) as Box<dyn FnMut(_)>)
            };
            window
                .add_event_listener_with_callback("mousemove", mousemove_cb.as_ref().unchecked_ref())
                .ok();

            let mouseup_cb = {
                let session = session.clone();
                Closure::wrap(Box::new(move |_e: MouseEvent| {
                    let dragging = session.borrow().dragging();
                    if let Some(id) = dragging {
                        session.borrow_mut().end_drag(id);
                    }
                }) as Box<dyn FnMut(_)>)
            };
            window
                .add_event_listener_with_callback("mouseup", mouseup_cb.as_ref().unchecked_ref())
                .ok();

            let window_clone = window.clone();
            move || {
                let _ = window_clone.remove_event_listener_with_callback(
                    "mousemove",
                    mousemove_cb.as_ref().unchecked_ref(),
                );
                let _ = window_clone.remove_event_listener_with_callback(
                    "mouseup",
                    mouseup_cb.as_ref().unchecked_ref(),
                );
                if *capture_pending.borrow() {
                    if let Some(capture) = &*capture_slot.borrow() {
                        let _ = window_clone.remove_event_listener_with_callback(
                            "click",
                            capture.as_ref().unchecked_ref(),
                        );
                    }
                }
                for (_, marker) in markers.borrow_mut().drain() {
                    marker.detach();
                    retired.borrow_mut().push(marker);
                }
            }
        });
    }

    // Activation trigger: one button press arms exactly one window-level
    // click capture; the captured click seeds the next touch point.
    let arm = {
        let session = session.clone();
        let markers = markers.clone();
        let retired = retired.clone();
        let capture_slot = capture_slot.clone();
        let capture_pending = capture_pending.clone();
        let active = active.clone();
        Callback::from(move |_| {
            // Safe point: no marker handler is running here.
            retired.borrow_mut().clear();
            if *capture_pending.borrow() {
                return;
            }
            let Some(window) = web_sys::window() else {
                return;
            };
            let Some(body) = window.document().and_then(|d| d.body()) else {
                return;
            };
            let saved_cursor = body.style().get_property_value("cursor").unwrap_or_default();
            body.style().set_property("cursor", "pointer").ok();
            *capture_pending.borrow_mut() = true;

            let capture = {
                let session = session.clone();
                let markers = markers.clone();
                let retired = retired.clone();
                let capture_pending = capture_pending.clone();
                let active = active.clone();
                let body = body.clone();
                Closure::wrap(Box::new(move |e: MouseEvent| {
                    // The captured click must not double as a page click.
                    e.prevent_default();
                    e.stop_propagation();
                    *capture_pending.borrow_mut() = false;
                    body.style().set_property("cursor", &saved_cursor).ok();

                    let Some(target) = e.target().and_then(|t| t.dyn_into::<Element>().ok())
                    else {
                        return;
                    };
                    let x = e.client_x() as f64;
                    let y = e.client_y() as f64;
                    let (identifier, frame) = session.borrow_mut().create_point(target, x, y);
                    if let Err(err) = dom::dispatch_frame(&frame) {
                        clog(&format!("touchstart dispatch failed: {err:?}"));
                    }
                    match spawn_marker(identifier, x, y, &session, &markers, &retired, &active) {
                        Ok(marker) => {
                            markers.borrow_mut().insert(identifier, marker);
                        }
                        Err(err) => clog(&format!("marker creation failed: {err:?}")),
                    }
                    active.set(session.borrow().len());
                }) as Box<dyn FnMut(_)>)
            };

            let opts = AddEventListenerOptions::new();
            opts.set_capture(true);
            opts.set_once(true);
            window
                .add_event_listener_with_callback_and_add_event_listener_options(
                    "click",
                    capture.as_ref().unchecked_ref(),
                    &opts,
                )
                .ok();
            // The previous slot entry is a spent once-listener; safe to drop.
            *capture_slot.borrow_mut() = Some(capture);
        })
    };

    html! {
        <TouchButton active={*active} on_arm={arm} />
    }
}
