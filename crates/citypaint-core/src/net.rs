//! Native WebSocket transport to the relay.
//!
//! Runs the connection on a background thread for non-blocking operation.
//! The host drains events via [`RelaySocket::poll_events`] and feeds raw
//! frames to the session; liveness timing belongs to the session, which
//! queues the empty keepalive frames this socket sends like any other.
//! No reconnect: once the socket drops, the session is over.

use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tungstenite::{connect, Message};
use url::Url;

/// Commands sent to the socket thread.
enum SocketCommand {
    Send(String),
    Close,
}

/// Events surfaced to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SocketEvent {
    /// Handshake finished; the session may enter its room.
    Connected,
    /// The connection closed, cleanly or not.
    Disconnected,
    /// One inbound text frame, undecoded.
    Frame(String),
    /// Connect or I/O failure.
    Error(String),
}

/// Handle to the relay connection.
pub struct RelaySocket {
    cmd_tx: Option<Sender<SocketCommand>>,
    event_rx: Option<Receiver<SocketEvent>>,
    _thread: Option<JoinHandle<()>>,
}

impl RelaySocket {
    /// Open a connection to `url` (`ws://` or `wss://`).
    pub fn connect(url: &str) -> Result<Self, String> {
        let parsed = Url::parse(url).map_err(|e| format!("invalid URL: {e}"))?;
        if parsed.scheme() != "ws" && parsed.scheme() != "wss" {
            return Err(format!("invalid WebSocket URL scheme: {}", parsed.scheme()));
        }

        let (cmd_tx, cmd_rx) = channel::<SocketCommand>();
        let (event_tx, event_rx) = channel::<SocketEvent>();
        let url = url.to_string();

        let handle = thread::spawn(move || socket_thread(&url, &cmd_rx, &event_tx));

        Ok(Self { cmd_tx: Some(cmd_tx), event_rx: Some(event_rx), _thread: Some(handle) })
    }

    /// Queue a text frame for sending. Best-effort: a frame queued against
    /// a closing socket is silently lost.
    pub fn send(&self, frame: String) {
        if let Some(ref tx) = self.cmd_tx {
            let _ = tx.send(SocketCommand::Send(frame));
        }
    }

    /// Ask the socket thread to close the connection.
    pub fn close(&mut self) {
        if let Some(tx) = self.cmd_tx.take() {
            let _ = tx.send(SocketCommand::Close);
        }
    }

    /// Drain pending events (non-blocking).
    pub fn poll_events(&mut self) -> Vec<SocketEvent> {
        let mut events = Vec::new();
        if let Some(ref rx) = self.event_rx {
            while let Ok(event) = rx.try_recv() {
                events.push(event);
            }
        }
        events
    }
}

impl Drop for RelaySocket {
    fn drop(&mut self) {
        self.close();
    }
}

fn socket_thread(url: &str, cmd_rx: &Receiver<SocketCommand>, event_tx: &Sender<SocketEvent>) {
    log::info!("socket thread: connecting to {url}");

    let (mut socket, response) = match connect(url) {
        Ok(ok) => ok,
        Err(e) => {
            log::error!("connection failed: {e}");
            let _ = event_tx.send(SocketEvent::Error(format!("connection failed: {e}")));
            // A failed connect still ends the connection's life; the host
            // relies on this to move the session to its closed state.
            let _ = event_tx.send(SocketEvent::Disconnected);
            return;
        }
    };
    log::info!("connected, status: {}", response.status());
    let _ = event_tx.send(SocketEvent::Connected);

    // Short read timeout so the loop can service queued commands
    // between inbound frames.
    match socket.get_mut() {
        tungstenite::stream::MaybeTlsStream::Plain(tcp) => {
            let _ = tcp.set_read_timeout(Some(Duration::from_millis(50)));
            let _ = tcp.set_write_timeout(Some(Duration::from_secs(5)));
        }
        tungstenite::stream::MaybeTlsStream::Rustls(tls) => {
            let _ = tls.sock.set_read_timeout(Some(Duration::from_millis(50)));
            let _ = tls.sock.set_write_timeout(Some(Duration::from_secs(5)));
        }
        #[allow(unreachable_patterns)]
        _ => {}
    }

    loop {
        match cmd_rx.try_recv() {
            Ok(SocketCommand::Send(frame)) => {
                log::debug!("sending: {}", &frame[..frame.len().min(100)]);
                if let Err(e) = socket.send(Message::Text(frame)) {
                    log::error!("send error: {e}");
                    break;
                }
            }
            Ok(SocketCommand::Close) => {
                log::info!("close requested");
                let _ = socket.close(None);
                break;
            }
            Err(TryRecvError::Disconnected) => break,
            Err(TryRecvError::Empty) => {}
        }

        match socket.read() {
            Ok(Message::Text(frame)) => {
                log::debug!("received: {}", &frame[..frame.len().min(100)]);
                let _ = event_tx.send(SocketEvent::Frame(frame));
            }
            Ok(Message::Ping(data)) => {
                let _ = socket.send(Message::Pong(data));
            }
            Ok(Message::Close(_)) => {
                log::info!("received close frame");
                break;
            }
            Ok(_) => {}
            Err(tungstenite::Error::Io(ref e))
                if e.kind() == std::io::ErrorKind::WouldBlock
                    || e.kind() == std::io::ErrorKind::TimedOut =>
            {
                continue;
            }
            Err(e) => {
                log::error!("read error: {e}");
                break;
            }
        }
    }

    log::info!("socket thread exiting");
    let _ = event_tx.send(SocketEvent::Disconnected);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn test_rejects_non_websocket_url() {
        assert!(RelaySocket::connect("http://example.com").is_err());
        assert!(RelaySocket::connect("not a url").is_err());
    }

    #[test]
    fn test_connect_failure_ends_with_disconnect() {
        // Port 9 (discard) refuses WebSocket connections.
        let mut socket = RelaySocket::connect("ws://127.0.0.1:9/").unwrap();

        let deadline = Instant::now() + Duration::from_secs(5);
        let mut events = Vec::new();
        while Instant::now() < deadline {
            events.extend(socket.poll_events());
            if events.contains(&SocketEvent::Disconnected) {
                break;
            }
            thread::sleep(Duration::from_millis(10));
        }

        // The failure is reported, and the connection's life still ends
        // with a disconnect so the session can reach its closed state.
        assert!(matches!(events.first(), Some(SocketEvent::Error(_))));
        assert_eq!(events.last(), Some(&SocketEvent::Disconnected));
    }
}
