//! Citypaint Core Library
//!
//! Event-sourced synchronization core for the shared graffiti walls:
//! local input capture, wire codec, relay session, and deterministic
//! replay of remote draw events onto per-wall pixel buffers. The 3D
//! scene, textures, and audio live in the presentation layer on top.

pub mod config;
pub mod dispatch;
pub mod input;
pub mod protocol;
pub mod raster;
pub mod session;
pub mod surface;

#[cfg(not(target_arch = "wasm32"))]
pub mod net;

pub use config::{default_walls, WallConfig, ROOM_NAME};
pub use input::{InputCapture, KeyAction};
pub use protocol::{DrawOperation, Inbound, Request, WireError};
pub use raster::Raster;
pub use session::{ClientIdentity, ConnectionState, Session, KEEPALIVE_INTERVAL};
pub use surface::{Surface, SurfaceId, SurfaceRegistry};

#[cfg(not(target_arch = "wasm32"))]
pub use net::{RelaySocket, SocketEvent};
