//! Wall registry: the fixed set of drawable surfaces and which one is
//! accepting local input.

use std::collections::BTreeMap;

use crate::config::WallConfig;
use crate::raster::{color_from_hue, Raster};

/// Stable small-integer wall identifier from the compiled-in set.
pub type SurfaceId = u8;

/// One drawable wall: its paint buffer, visibility, and static config.
#[derive(Debug, Clone)]
pub struct Surface {
    config: WallConfig,
    raster: Raster,
    active: bool,
    /// Set after any paint; the presentation layer drains it to refresh
    /// the wall's texture.
    texture_stale: bool,
}

impl Surface {
    fn new(config: WallConfig) -> Self {
        let mut raster = Raster::new(config.buffer_width, config.buffer_height);
        raster.set_stroke_color(color_from_hue(rand::random::<f64>() * 360.0));
        Self { config, raster, active: false, texture_stale: false }
    }

    pub fn id(&self) -> SurfaceId {
        self.config.id
    }

    pub fn config(&self) -> &WallConfig {
        &self.config
    }

    pub fn raster(&self) -> &Raster {
        &self.raster
    }

    pub fn raster_mut(&mut self) -> &mut Raster {
        &mut self.raster
    }

    /// Whether this wall is the one accepting local input.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Flag the wall's texture as needing a refresh.
    pub fn mark_stale(&mut self) {
        self.texture_stale = true;
    }

    pub fn is_stale(&self) -> bool {
        self.texture_stale
    }
}

/// Owns every wall for the lifetime of the session. Never paints itself;
/// buffer mutation goes through the dispatcher and input capture.
#[derive(Debug, Clone)]
pub struct SurfaceRegistry {
    surfaces: BTreeMap<SurfaceId, Surface>,
    active: Option<SurfaceId>,
}

impl SurfaceRegistry {
    /// Build the registry from a wall list; no wall starts active.
    pub fn new(walls: Vec<WallConfig>) -> Self {
        let surfaces = walls
            .into_iter()
            .map(|config| (config.id, Surface::new(config)))
            .collect();
        Self { surfaces, active: None }
    }

    pub fn get(&self, id: SurfaceId) -> Option<&Surface> {
        self.surfaces.get(&id)
    }

    pub fn get_mut(&mut self, id: SurfaceId) -> Option<&mut Surface> {
        self.surfaces.get_mut(&id)
    }

    pub fn contains(&self, id: SurfaceId) -> bool {
        self.surfaces.contains_key(&id)
    }

    pub fn ids(&self) -> impl Iterator<Item = SurfaceId> + '_ {
        self.surfaces.keys().copied()
    }

    /// The wall currently accepting local input, if any.
    pub fn active_id(&self) -> Option<SurfaceId> {
        self.active
    }

    pub fn active_surface(&self) -> Option<&Surface> {
        self.active.and_then(|id| self.surfaces.get(&id))
    }

    /// Activate `id`, deactivating whichever wall was active before. A
    /// no-op when `id` is already active or not registered.
    pub fn set_active(&mut self, id: SurfaceId) {
        if !self.surfaces.contains_key(&id) || self.active == Some(id) {
            return;
        }
        if let Some(prev) = self.active.take() {
            if let Some(surface) = self.surfaces.get_mut(&prev) {
                surface.active = false;
            }
        }
        if let Some(surface) = self.surfaces.get_mut(&id) {
            surface.active = true;
            self.active = Some(id);
        }
    }

    /// Toggle `id`: activating it if inactive, closing it if it is the
    /// active wall (leaving no wall active).
    pub fn toggle(&mut self, id: SurfaceId) {
        if self.active == Some(id) {
            if let Some(surface) = self.surfaces.get_mut(&id) {
                surface.active = false;
            }
            self.active = None;
        } else {
            self.set_active(id);
        }
    }

    /// Drain the ids of every wall whose texture went stale since the
    /// last call.
    pub fn take_stale(&mut self) -> Vec<SurfaceId> {
        let mut stale = Vec::new();
        for (id, surface) in &mut self.surfaces {
            if surface.texture_stale {
                surface.texture_stale = false;
                stale.push(*id);
            }
        }
        stale
    }
}
