//! Headless Citypaint client.
//!
//! Connects to a relay, joins the shared room, and replays every remote
//! stroke onto the local wall buffers, logging identity and texture
//! refreshes. The 3D scene and audio of the full experience sit on top of
//! this loop in the presentation layer.

use std::thread;
use std::time::{Duration, Instant};

use citypaint_core::{
    default_walls, dispatch, RelaySocket, Session, SocketEvent, SurfaceRegistry,
    KEEPALIVE_INTERVAL, ROOM_NAME,
};

const DEFAULT_RELAY: &str = "wss://nosch.uber.space/web-rooms/";

/// How often the loop drains socket events while idle.
const POLL_INTERVAL: Duration = Duration::from_millis(20);

fn main() {
    env_logger::init();

    let relay = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_RELAY.to_string());
    log::info!("Starting Citypaint, relay {relay}");

    let mut socket = match RelaySocket::connect(&relay) {
        Ok(socket) => socket,
        Err(e) => {
            log::error!("cannot open relay connection: {e}");
            std::process::exit(1);
        }
    };

    let mut registry = SurfaceRegistry::new(default_walls());
    let mut session = Session::new(ROOM_NAME);
    let mut last_keepalive = Instant::now();

    loop {
        for event in socket.poll_events() {
            match event {
                SocketEvent::Connected => session.handle_open(),
                SocketEvent::Frame(frame) => {
                    if let Some(op) = session.handle_message(&frame) {
                        dispatch::apply(&mut registry, &op);
                    }
                }
                SocketEvent::Error(message) => log::warn!("socket error: {message}"),
                SocketEvent::Disconnected => session.handle_close(),
            }
        }

        if last_keepalive.elapsed() >= KEEPALIVE_INTERVAL {
            last_keepalive = Instant::now();
            session.keepalive_tick();
        }

        for frame in session.take_outgoing() {
            socket.send(frame);
        }

        for id in registry.take_stale() {
            log::debug!("wall {id} texture stale");
        }

        if session.state() == citypaint_core::ConnectionState::Closed && !session.has_outgoing() {
            log::info!("disconnected, exiting");
            break;
        }

        thread::sleep(POLL_INTERVAL);
    }
}
