//! The synthetic multi-touch session: an ordered set of virtual touch
//! points plus the frames to dispatch for each change.
//!
//! All operations are synchronous and infallible; an operation on an
//! identifier that is no longer active is a silent no-op, since the
//! session is driven by best-effort UI references that can go stale.

use crate::model::{
    CONTACT_FORCE, CONTACT_RADIUS, CONTACT_ROTATION, DragState, Position, TouchContact,
    TouchFrame, TouchPhase,
};

#[derive(Clone, Debug)]
struct TouchPoint<T> {
    identifier: i32,
    target: T,
    position: Position,
    drag: DragState,
}

impl<T: Clone> TouchPoint<T> {
    fn contact(&self) -> TouchContact<T> {
        TouchContact {
            identifier: self.identifier,
            target: self.target.clone(),
            position: self.position,
            radius_x: CONTACT_RADIUS,
            radius_y: CONTACT_RADIUS,
            rotation_angle: CONTACT_ROTATION,
            force: CONTACT_FORCE,
        }
    }
}

/// The active set of synthetic touch points, in insertion order.
///
/// Identifiers are allocated monotonically from a caller-supplied base,
/// so no identifier ever repeats within one session, active or not.
/// The session ends naturally when the last point is removed; there is
/// no bulk reset.
#[derive(Clone, Debug)]
pub struct TouchSession<T> {
    points: Vec<TouchPoint<T>>,
    next_identifier: i32,
}

impl<T: Clone> TouchSession<T> {
    pub fn new() -> Self {
        Self::with_base_identifier(0)
    }

    /// A time-derived base keeps identifiers distinct across reloads for
    /// consumers that log them; within a session the counter alone
    /// guarantees uniqueness.
    pub fn with_base_identifier(base: i32) -> Self {
        Self {
            points: Vec::new(),
            next_identifier: base,
        }
    }

    /// Adds a new point at `(x, y)` bound to `target` and returns its
    /// identifier plus the `touchstart` frame listing the full active
    /// set. Always succeeds.
    pub fn create_point(&mut self, target: T, x: f64, y: f64) -> (i32, TouchFrame<T>) {
        let identifier = self.next_identifier;
        self.next_identifier += 1;
        self.points.push(TouchPoint {
            identifier,
            target,
            position: Position { x, y },
            drag: DragState::default(),
        });
        let frame = TouchFrame {
            phase: TouchPhase::Start,
            touches: self.contacts(),
        };
        (identifier, frame)
    }

    /// Starts dragging a point, remembering where on the point it was
    /// grabbed. Ignored if the identifier is unknown or any point is
    /// already dragging (one mouse pointer drives at most one drag).
    pub fn begin_drag(&mut self, identifier: i32, pointer_x: f64, pointer_y: f64) {
        if self.points.iter().any(|p| p.drag.dragging) {
            return;
        }
        let Some(point) = self.point_mut(identifier) else {
            return;
        };
        point.drag = DragState {
            dragging: true,
            grab_dx: pointer_x - point.position.x,
            grab_dy: pointer_y - point.position.y,
        };
    }

    /// Moves a dragging point to the pointer position adjusted by its
    /// grab offset and returns the `touchmove` frame listing every
    /// active point. `None` (and no state change) unless the point is
    /// currently dragging.
    pub fn update_position(
        &mut self,
        identifier: i32,
        pointer_x: f64,
        pointer_y: f64,
    ) -> Option<TouchFrame<T>> {
        let point = self.point_mut(identifier)?;
        if !point.drag.dragging {
            return None;
        }
        point.position = Position {
            x: pointer_x - point.drag.grab_dx,
            y: pointer_y - point.drag.grab_dy,
        };
        Some(TouchFrame {
            phase: TouchPhase::Move,
            touches: self.contacts(),
        })
    }

    /// Stops a drag. Local interaction state only; no frame.
    pub fn end_drag(&mut self, identifier: i32) {
        if let Some(point) = self.point_mut(identifier) {
            point.drag = DragState::default();
        }
    }

    /// Removes a point and returns the `touchend` frame carrying only
    /// the removed point. The point leaves the set before the frame is
    /// handed back, so no later frame can name it. `None` if unknown.
    pub fn remove_point(&mut self, identifier: i32) -> Option<TouchFrame<T>> {
        let index = self.points.iter().position(|p| p.identifier == identifier)?;
        let removed = self.points.remove(index);
        Some(TouchFrame {
            phase: TouchPhase::End,
            touches: vec![removed.contact()],
        })
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn contains(&self, identifier: i32) -> bool {
        self.points.iter().any(|p| p.identifier == identifier)
    }

    pub fn position(&self, identifier: i32) -> Option<Position> {
        self.points
            .iter()
            .find(|p| p.identifier == identifier)
            .map(|p| p.position)
    }

    pub fn is_dragging(&self, identifier: i32) -> bool {
        self.points
            .iter()
            .any(|p| p.identifier == identifier && p.drag.dragging)
    }

    /// The identifier currently being dragged, if any.
    pub fn dragging(&self) -> Option<i32> {
        self.points
            .iter()
            .find(|p| p.drag.dragging)
            .map(|p| p.identifier)
    }

    /// Active identifiers in insertion order.
    pub fn identifiers(&self) -> impl Iterator<Item = i32> + '_ {
        self.points.iter().map(|p| p.identifier)
    }

    fn contacts(&self) -> Vec<TouchContact<T>> {
        self.points.iter().map(TouchPoint::contact).collect()
    }

    fn point_mut(&mut self, identifier: i32) -> Option<&mut TouchPoint<T>> {
        self.points.iter_mut().find(|p| p.identifier == identifier)
    }
}

impl<T: Clone> Default for TouchSession<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CONTACT_FORCE, CONTACT_RADIUS};

    fn session() -> TouchSession<&'static str> {
        TouchSession::new()
    }

    #[test]
    fn identifiers_are_pairwise_distinct() {
        let mut s = session();
        for i in 0..8 {
            s.create_point("page", i as f64, 0.0);
        }
        let mut ids: Vec<i32> = s.identifiers().collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 8);
    }

    #[test]
    fn start_frame_lists_full_set_in_creation_order() {
        let mut s = session();
        let (a, _) = s.create_point("a", 1.0, 1.0);
        let (b, _) = s.create_point("b", 2.0, 2.0);
        let (c, frame) = s.create_point("c", 3.0, 3.0);
        assert_eq!(frame.phase, TouchPhase::Start);
        let ids: Vec<i32> = frame.touches.iter().map(|t| t.identifier).collect();
        assert_eq!(ids, vec![a, b, c]);
        assert_eq!(frame.touches[0].target, "a");
        assert_eq!(frame.touches[2].position, Position { x: 3.0, y: 3.0 });
    }

    #[test]
    fn end_frame_carries_only_the_removed_point() {
        let mut s = session();
        let (a, _) = s.create_point("a", 1.0, 1.0);
        let (b, _) = s.create_point("b", 2.0, 2.0);
        let frame = s.remove_point(a).unwrap();
        assert_eq!(frame.phase, TouchPhase::End);
        assert_eq!(frame.touches.len(), 1);
        assert_eq!(frame.touches[0].identifier, a);
        assert!(!s.contains(a));
        assert!(s.contains(b));
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn update_without_drag_is_a_noop() {
        let mut s = session();
        let (id, _) = s.create_point("page", 10.0, 20.0);
        assert!(s.update_position(id, 50.0, 60.0).is_none());
        assert_eq!(s.position(id), Some(Position { x: 10.0, y: 20.0 }));
    }

    #[test]
    fn unknown_identifiers_are_silent_noops() {
        let mut s = session();
        s.begin_drag(99, 0.0, 0.0);
        s.end_drag(99);
        assert!(s.update_position(99, 0.0, 0.0).is_none());
        assert!(s.remove_point(99).is_none());
        assert!(s.is_empty());
    }

    #[test]
    fn drag_preserves_grab_offset() {
        let mut s = session();
        let (id, _) = s.create_point("page", 100.0, 100.0);
        // Grabbed 5 right and 3 below the center.
        s.begin_drag(id, 105.0, 103.0);
        let frame = s.update_position(id, 205.0, 153.0).unwrap();
        assert_eq!(frame.phase, TouchPhase::Move);
        assert_eq!(s.position(id), Some(Position { x: 200.0, y: 150.0 }));
        assert_eq!(frame.touches[0].position, Position { x: 200.0, y: 150.0 });
    }

    #[test]
    fn single_point_round_trip() {
        let mut s = session();
        let (id, start) = s.create_point("a", 100.0, 100.0);
        assert_eq!(start.touches.len(), 1);
        assert_eq!(start.touches[0].target, "a");
        assert_eq!(start.touches[0].position, Position { x: 100.0, y: 100.0 });

        s.begin_drag(id, 100.0, 100.0);
        let moved = s.update_position(id, 150.0, 120.0).unwrap();
        assert_eq!(moved.touches.len(), 1);
        assert_eq!(moved.touches[0].identifier, id);
        assert_eq!(moved.touches[0].target, "a");
        assert_eq!(moved.touches[0].position, Position { x: 150.0, y: 120.0 });

        s.end_drag(id);
        let end = s.remove_point(id).unwrap();
        assert_eq!(end.touches.len(), 1);
        assert_eq!(end.touches[0].identifier, id);
        assert!(s.is_empty());
    }

    #[test]
    fn surviving_point_is_untouched_by_interleaved_removal() {
        let mut s = session();
        let (a, _) = s.create_point("a", 10.0, 10.0);
        let (b, _) = s.create_point("b", 20.0, 20.0);

        s.begin_drag(a, 10.0, 10.0);
        let first = s.update_position(a, 30.0, 30.0).unwrap();
        assert_eq!(first.touches.len(), 2);

        s.remove_point(b).unwrap();
        let second = s.update_position(a, 40.0, 40.0).unwrap();
        assert_eq!(second.touches.len(), 1);
        assert_eq!(second.touches[0].identifier, a);
        assert_eq!(second.touches[0].target, "a");
        assert_eq!(second.touches[0].position, Position { x: 40.0, y: 40.0 });
    }

    #[test]
    fn only_one_point_drags_at_a_time() {
        let mut s = session();
        let (a, _) = s.create_point("a", 0.0, 0.0);
        let (b, _) = s.create_point("b", 50.0, 50.0);
        s.begin_drag(a, 0.0, 0.0);
        s.begin_drag(b, 50.0, 50.0);
        assert!(s.is_dragging(a));
        assert!(!s.is_dragging(b));
        assert_eq!(s.dragging(), Some(a));
        assert!(s.update_position(b, 60.0, 60.0).is_none());

        s.end_drag(a);
        assert_eq!(s.dragging(), None);
        s.begin_drag(b, 50.0, 50.0);
        assert!(s.is_dragging(b));
    }

    #[test]
    fn drag_stops_emitting_after_end_drag() {
        let mut s = session();
        let (id, _) = s.create_point("page", 0.0, 0.0);
        s.begin_drag(id, 0.0, 0.0);
        assert!(s.update_position(id, 5.0, 5.0).is_some());
        s.end_drag(id);
        assert!(s.update_position(id, 9.0, 9.0).is_none());
        assert_eq!(s.position(id), Some(Position { x: 5.0, y: 5.0 }));
    }

    #[test]
    fn identifiers_are_not_reused_after_removal() {
        let mut s = session();
        let (a, _) = s.create_point("page", 0.0, 0.0);
        s.remove_point(a).unwrap();
        let (b, _) = s.create_point("page", 1.0, 1.0);
        assert_ne!(a, b);
    }

    #[test]
    fn base_identifier_offsets_the_counter() {
        let mut s = TouchSession::with_base_identifier(5_000);
        let (a, _) = s.create_point("page", 0.0, 0.0);
        let (b, _) = s.create_point("page", 1.0, 1.0);
        assert_eq!(a, 5_000);
        assert_eq!(b, 5_001);
    }

    #[test]
    fn contacts_carry_placeholder_geometry() {
        let mut s = session();
        let (_, frame) = s.create_point("page", 0.0, 0.0);
        let contact = &frame.touches[0];
        assert_eq!(contact.radius_x, CONTACT_RADIUS);
        assert_eq!(contact.radius_y, CONTACT_RADIUS);
        assert_eq!(contact.rotation_angle, 0.0);
        assert_eq!(contact.force, CONTACT_FORCE);
    }
}
