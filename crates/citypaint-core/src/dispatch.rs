//! Applies decoded draw operations to wall buffers.
//!
//! Keeps per-wall path continuity: a `draw-start` opens the wall's path,
//! a `draw` continuation extends and strokes it, and a `draw-line` point
//! paints a dot without disturbing the open path. Operations naming an
//! unregistered wall are dropped silently.

use kurbo::Point;

use crate::protocol::DrawOperation;
use crate::raster::DOT_RADIUS;
use crate::surface::SurfaceRegistry;

/// Apply one operation to the registry. Painting marks the wall's texture
/// stale; the presentation layer drains that via
/// [`SurfaceRegistry::take_stale`].
pub fn apply(registry: &mut SurfaceRegistry, op: &DrawOperation) {
    match *op {
        DrawOperation::PathStart { surface, x, y } => {
            let Some(wall) = registry.get_mut(surface) else {
                log::debug!("draw-start for unknown wall {surface}");
                return;
            };
            let raster = wall.raster_mut();
            raster.begin_path();
            raster.move_to(Point::new(x, y));
        }
        DrawOperation::PathPoint { from, surface, x, y } => {
            let Some(wall) = registry.get_mut(surface) else {
                log::debug!("draw from client {from} for unknown wall {surface}");
                return;
            };
            let raster = wall.raster_mut();
            raster.line_to(Point::new(x, y));
            raster.stroke();
            wall.mark_stale();
        }
        DrawOperation::PointMark { surface, x, y } => {
            let Some(wall) = registry.get_mut(surface) else {
                log::debug!("draw-line for unknown wall {surface}");
                return;
            };
            wall.raster_mut().fill_circle(Point::new(x, y), DOT_RADIUS);
            wall.mark_stale();
        }
        DrawOperation::SessionEnd { client } => {
            log::info!("client {client:?} left the room");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WallConfig;
    use crate::raster::WHITE;

    fn registry() -> SurfaceRegistry {
        let mut walls = vec![WallConfig::new(1, "0 0 0", "0 0 0")];
        walls[0].buffer_width = 64;
        walls[0].buffer_height = 64;
        let mut registry = SurfaceRegistry::new(walls);
        registry.get_mut(1).unwrap().raster_mut().set_stroke_color([255, 0, 0, 255]);
        registry.take_stale();
        registry
    }

    #[test]
    fn test_path_start_paints_nothing() {
        let mut registry = registry();
        apply(&mut registry, &DrawOperation::PathStart { surface: 1, x: 5.0, y: 5.0 });

        let wall = registry.get(1).unwrap();
        assert_eq!(wall.raster().path_points(), &[Point::new(5.0, 5.0)]);
        assert_eq!(wall.raster().pixel(5, 5), Some(WHITE));
        assert!(registry.take_stale().is_empty());
    }

    #[test]
    fn test_path_point_extends_and_strokes() {
        let mut registry = registry();
        apply(&mut registry, &DrawOperation::PathStart { surface: 1, x: 2.0, y: 2.0 });
        apply(&mut registry, &DrawOperation::PathPoint { from: 9, surface: 1, x: 10.0, y: 2.0 });

        let wall = registry.get(1).unwrap();
        assert_eq!(wall.raster().pixel(6, 2), Some([255, 0, 0, 255]));
        assert_eq!(wall.raster().path_points().len(), 2);
        assert_eq!(registry.take_stale(), vec![1]);
    }

    #[test]
    fn test_point_mark_paints_dot_not_segment() {
        let mut registry = registry();
        apply(&mut registry, &DrawOperation::PathStart { surface: 1, x: 2.0, y: 2.0 });
        apply(&mut registry, &DrawOperation::PointMark { surface: 1, x: 40.0, y: 40.0 });

        let wall = registry.get(1).unwrap();
        assert_eq!(wall.raster().pixel(40, 40), Some([255, 0, 0, 255]));
        // No segment back to the path start.
        assert_eq!(wall.raster().pixel(20, 20), Some(WHITE));
        // Path continuity survives the dot.
        assert_eq!(wall.raster().path_points(), &[Point::new(2.0, 2.0)]);
        assert_eq!(registry.take_stale(), vec![1]);
    }

    #[test]
    fn test_unknown_wall_is_dropped() {
        let mut registry = registry();
        apply(&mut registry, &DrawOperation::PointMark { surface: 7, x: 1.0, y: 1.0 });
        apply(&mut registry, &DrawOperation::PathStart { surface: 7, x: 1.0, y: 1.0 });
        assert!(registry.take_stale().is_empty());
        assert_eq!(registry.get(1).unwrap().raster().pixel(1, 1), Some(WHITE));
    }

    #[test]
    fn test_session_end_has_no_visual_effect() {
        let mut registry = registry();
        apply(&mut registry, &DrawOperation::SessionEnd { client: Some(3) });
        assert!(registry.take_stale().is_empty());
    }
}
