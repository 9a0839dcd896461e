//! Value types shared by the touch session core and the DOM glue.
//! The core stays generic over the target handle `T` so it can run
//! (and be tested) without a live document; the glue instantiates it
//! with `web_sys::Element`.

use serde::{Deserialize, Serialize};

/// Contact geometry reported for every synthetic touch. A mouse-driven
/// session has no real sensor data, so these stay fixed.
pub const CONTACT_RADIUS: f64 = 10.0;
pub const CONTACT_ROTATION: f64 = 0.0;
pub const CONTACT_FORCE: f64 = 0.5;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TouchPhase {
    Start,
    Move,
    End,
}

impl TouchPhase {
    /// DOM event type this phase dispatches as.
    pub fn event_type(self) -> &'static str {
        match self {
            TouchPhase::Start => "touchstart",
            TouchPhase::Move => "touchmove",
            TouchPhase::End => "touchend",
        }
    }
}

/// Per-point interaction state. The grab offset is the displacement
/// between the pointer and the point's center at grab time, so a drag
/// keeps the original grip instead of re-centering on the cursor.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DragState {
    pub dragging: bool,
    pub grab_dx: f64,
    pub grab_dy: f64,
}

/// Immutable snapshot of one touch point as it appears in an emitted
/// frame. Built fresh on every change; never mutated in place.
#[derive(Clone, Debug, PartialEq)]
pub struct TouchContact<T> {
    pub identifier: i32,
    /// The element the point was created over. Touch semantics bind a
    /// touch to its original target for its whole lifetime.
    pub target: T,
    pub position: Position,
    pub radius_x: f64,
    pub radius_y: f64,
    pub rotation_angle: f64,
    pub force: f64,
}

/// One synthesized touch event payload: the phase plus the contacts to
/// report for it. Start/move frames list the full active set in
/// insertion order; end frames list only the point(s) leaving.
#[derive(Clone, Debug, PartialEq)]
pub struct TouchFrame<T> {
    pub phase: TouchPhase,
    pub touches: Vec<TouchContact<T>>,
}

impl<T> TouchFrame<T> {
    /// Compact serializable view for the console trace.
    pub fn summary(&self) -> FrameSummary {
        FrameSummary {
            phase: self.phase,
            touches: self
                .touches
                .iter()
                .map(|c| ContactSummary {
                    id: c.identifier,
                    x: c.position.x,
                    y: c.position.y,
                })
                .collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FrameSummary {
    pub phase: TouchPhase,
    pub touches: Vec<ContactSummary>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ContactSummary {
    pub id: i32,
    pub x: f64,
    pub y: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_maps_to_dom_event_type() {
        assert_eq!(TouchPhase::Start.event_type(), "touchstart");
        assert_eq!(TouchPhase::Move.event_type(), "touchmove");
        assert_eq!(TouchPhase::End.event_type(), "touchend");
    }

    #[test]
    fn frame_summary_serializes_compactly() {
        let frame = TouchFrame {
            phase: TouchPhase::Move,
            touches: vec![TouchContact {
                identifier: 7,
                target: "page",
                position: Position { x: 12.0, y: 34.0 },
                radius_x: CONTACT_RADIUS,
                radius_y: CONTACT_RADIUS,
                rotation_angle: CONTACT_ROTATION,
                force: CONTACT_FORCE,
            }],
        };
        let json = serde_json::to_string(&frame.summary()).unwrap();
        assert_eq!(
            json,
            r#"{"phase":"move","touches":[{"id":7,"x":12.0,"y":34.0}]}"#
        );
    }
}
