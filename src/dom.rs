//! Browser glue: turns [`TouchFrame`]s into real `TouchEvent`s on the
//! page and manages the visual marker element for each point.

use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen::closure::Closure;
use web_sys::{Document, Element, HtmlElement, MouseEvent, Touch, TouchEvent, TouchEventInit, TouchInit};

use crate::model::{TouchContact, TouchFrame};
use crate::util::clog;

/// Diameter of the visual marker circle in px.
pub const MARKER_SIZE: f64 = 30.0;

fn make_touch(contact: &TouchContact<Element>) -> Result<Touch, JsValue> {
    let init = TouchInit::new(contact.identifier, &contact.target);
    init.set_client_x(contact.position.x as i32);
    init.set_client_y(contact.position.y as i32);
    init.set_page_x(contact.position.x as i32);
    init.set_page_y(contact.position.y as i32);
    init.set_radius_x(contact.radius_x as f32);
    init.set_radius_y(contact.radius_y as f32);
    init.set_rotation_angle(contact.rotation_angle as f32);
    init.set_force(contact.force as f32);
    Touch::new(&init)
}

/// Dispatches one frame on the first contact's target. An empty frame
/// is not dispatchable (there is nothing to fire it on) and is dropped.
pub fn dispatch_frame(frame: &TouchFrame<Element>) -> Result<(), JsValue> {
    let Some(first) = frame.touches.first() else {
        return Ok(());
    };
    let list = js_sys::Array::new();
    for contact in &frame.touches {
        list.push(&make_touch(contact)?.into());
    }
    let init = TouchEventInit::new();
    init.set_bubbles(true);
    init.set_cancelable(true);
    init.set_composed(true);
    init.set_touches(&list);
    init.set_target_touches(&list);
    init.set_changed_touches(&list);
    let event = TouchEvent::new_with_event_init_dict(frame.phase.event_type(), &init)?;
    first.target.dispatch_event(&event)?;
    if let Ok(json) = serde_json::to_string(&frame.summary()) {
        clog(&json);
    }
    Ok(())
}

/// Centers the marker element on `(x, y)` in viewport coordinates.
pub fn position_marker(el: &HtmlElement, x: f64, y: f64) -> Result<(), JsValue> {
    let half = MARKER_SIZE / 2.0;
    el.style().set_property("left", &format!("{}px", x - half))?;
    el.style().set_property("top", &format!("{}px", y - half))?;
    Ok(())
}

fn create_marker(document: &Document, x: f64, y: f64) -> Result<HtmlElement, JsValue> {
    let el: HtmlElement = document.create_element("div")?.dyn_into()?;
    el.set_class_name("synthetic-touch");
    let style = el.style();
    style.set_property("position", "fixed")?;
    style.set_property("width", &format!("{MARKER_SIZE}px"))?;
    style.set_property("height", &format!("{MARKER_SIZE}px"))?;
    style.set_property("background", "rgba(0, 150, 255, 0.5)")?;
    style.set_property("border-radius", "50%")?;
    style.set_property("z-index", "9999")?;
    style.set_property("cursor", "grab")?;
    position_marker(&el, x, y)?;
    document
        .body()
        .ok_or_else(|| JsValue::from_str("no document body"))?
        .append_child(&el)?;
    Ok(el)
}

/// A live marker: the circle element plus the listeners that make it
/// draggable (mousedown) and removable (dblclick).
pub struct TouchMarker {
    pub el: HtmlElement,
    mousedown: Closure<dyn FnMut(MouseEvent)>,
    dblclick: Closure<dyn FnMut(MouseEvent)>,
}

impl TouchMarker {
    pub fn new(
        document: &Document,
        x: f64,
        y: f64,
        mousedown: Closure<dyn FnMut(MouseEvent)>,
        dblclick: Closure<dyn FnMut(MouseEvent)>,
    ) -> Result<Self, JsValue> {
        let el = create_marker(document, x, y)?;
        el.add_event_listener_with_callback("mousedown", mousedown.as_ref().unchecked_ref())?;
        el.add_event_listener_with_callback("dblclick", dblclick.as_ref().unchecked_ref())?;
        Ok(Self {
            el,
            mousedown,
            dblclick,
        })
    }

    /// Takes the element out of the page. The closures stay alive until
    /// the marker value itself is dropped.
    pub fn detach(&self) {
        let _ = self
            .el
            .remove_event_listener_with_callback("mousedown", self.mousedown.as_ref().unchecked_ref());
        let _ = self
            .el
            .remove_event_listener_with_callback("dblclick", self.dblclick.as_ref().unchecked_ref());
        self.el.remove();
    }
}
