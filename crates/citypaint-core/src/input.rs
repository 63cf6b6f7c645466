//! Local input capture: pointer strokes on the active wall and the
//! keyboard bindings that pick which wall that is.
//!
//! Local strokes rasterize as continuous line segments, while each point
//! goes out on the wire as a `draw-line` dot event. That asymmetry is part
//! of the deployed protocol; see the [`protocol`](crate::protocol) docs.

use kurbo::Point;

use crate::protocol::DrawOperation;
use crate::surface::{Surface, SurfaceId, SurfaceRegistry};

/// What a key press asked the host to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    /// The key was not bound to anything.
    None,
    /// A wall was toggled; carries the wall now active, if any.
    WallToggled(Option<SurfaceId>),
    /// The day/night scene flag flipped. Presentation-only state; the
    /// host owns sky color and ambience.
    SceneFlipped { day: bool },
}

/// Tracks the in-progress local stroke and the scene flag.
#[derive(Debug, Clone)]
pub struct InputCapture {
    /// Armed on pointer-down over the active wall, cleared on pointer-up.
    drawing: bool,
    day: bool,
}

impl Default for InputCapture {
    fn default() -> Self {
        Self { drawing: false, day: true }
    }
}

impl InputCapture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_drawing(&self) -> bool {
        self.drawing
    }

    pub fn is_day(&self) -> bool {
        self.day
    }

    /// Pointer pressed at a global screen position. Opens a path on the
    /// active wall and returns the `draw-start` broadcast to send, or
    /// `None` when no wall is active.
    pub fn pointer_down(
        &mut self,
        registry: &mut SurfaceRegistry,
        global: Point,
    ) -> Option<DrawOperation> {
        let id = registry.active_id()?;
        let wall = registry.get_mut(id)?;
        let local = to_wall_coords(wall, global);
        let raster = wall.raster_mut();
        raster.begin_path();
        raster.move_to(local);
        self.drawing = true;
        Some(DrawOperation::PathStart { surface: id, x: local.x, y: local.y })
    }

    /// Pointer moved. While a stroke is in progress, extends and strokes
    /// the local path and returns the point broadcast (a `draw-line`
    /// event, rendered remotely as a dot).
    pub fn pointer_move(
        &mut self,
        registry: &mut SurfaceRegistry,
        global: Point,
    ) -> Option<DrawOperation> {
        if !self.drawing {
            return None;
        }
        let id = registry.active_id()?;
        let wall = registry.get_mut(id)?;
        let local = to_wall_coords(wall, global);
        let raster = wall.raster_mut();
        raster.line_to(local);
        raster.stroke();
        wall.mark_stale();
        Some(DrawOperation::PointMark { surface: id, x: local.x, y: local.y })
    }

    /// Pointer released: stop accepting move events. Emits nothing.
    pub fn pointer_up(&mut self) {
        self.drawing = false;
    }

    /// Keyboard input. Digits toggle the matching wall; `t` flips the
    /// day/night flag.
    pub fn key(&mut self, registry: &mut SurfaceRegistry, key: char) -> KeyAction {
        if let Some(digit) = key.to_digit(10) {
            let id = digit as SurfaceId;
            if registry.contains(id) {
                registry.toggle(id);
                return KeyAction::WallToggled(registry.active_id());
            }
            return KeyAction::None;
        }
        if key.eq_ignore_ascii_case(&'t') {
            self.day = !self.day;
            return KeyAction::SceneFlipped { day: self.day };
        }
        KeyAction::None
    }
}

/// Translate a global pointer position into wall-local pixel coordinates
/// using the wall's on-screen bounding box.
fn to_wall_coords(wall: &Surface, global: Point) -> Point {
    let origin = wall.config().screen.origin();
    Point::new(global.x - origin.x, global.y - origin.y)
}
