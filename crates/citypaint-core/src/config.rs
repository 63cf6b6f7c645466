//! Compiled-in wall set.
//!
//! The walls are fixed at startup: which ids exist, how large each paint
//! buffer is, where the wall sits on screen for pointer translation, and
//! where its plane lives in the 3D scene (opaque to the core).

use kurbo::Rect;

use crate::surface::SurfaceId;

/// Room every client joins on the relay.
pub const ROOM_NAME: &str = "citypaint";

/// Paint buffer dimensions shared by all walls.
pub const WALL_WIDTH: u32 = 512 * 2;
pub const WALL_HEIGHT: u32 = 512 * 4;

/// Placement of a wall's plane in the 3D scene. Carried through to the
/// presentation layer, never interpreted by the core.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub position: &'static str,
    pub rotation: &'static str,
    pub width: f64,
    pub height: f64,
}

/// Static configuration for one drawable wall.
#[derive(Debug, Clone, PartialEq)]
pub struct WallConfig {
    pub id: SurfaceId,
    pub buffer_width: u32,
    pub buffer_height: u32,
    /// On-screen bounding box of the wall while it accepts input. Pointer
    /// coordinates are translated by its origin.
    pub screen: Rect,
    pub placement: Placement,
}

impl WallConfig {
    /// A wall with the shared buffer size, placed at the default on-screen
    /// origin.
    pub fn new(id: SurfaceId, position: &'static str, rotation: &'static str) -> Self {
        Self {
            id,
            buffer_width: WALL_WIDTH,
            buffer_height: WALL_HEIGHT,
            screen: Rect::new(
                10.0,
                10.0,
                10.0 + f64::from(WALL_WIDTH),
                10.0 + f64::from(WALL_HEIGHT),
            ),
            placement: Placement { position, rotation, width: 3.0, height: 4.0 },
        }
    }
}

/// The three graffiti walls of the city scene.
pub fn default_walls() -> Vec<WallConfig> {
    vec![
        WallConfig::new(1, "15 1.6 -13.49", "0 180 0"),
        WallConfig::new(2, "-16.51 1.6 15", "0 90 0"),
        WallConfig::new(3, "5 1.6 3.49", "0 0 0"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_walls_have_stable_ids() {
        let walls = default_walls();
        let ids: Vec<_> = walls.iter().map(|w| w.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_wall_buffer_dimensions() {
        let wall = WallConfig::new(1, "0 0 0", "0 0 0");
        assert_eq!(wall.buffer_width, 1024);
        assert_eq!(wall.buffer_height, 2048);
        assert_eq!(wall.screen.origin(), kurbo::Point::new(10.0, 10.0));
    }
}
