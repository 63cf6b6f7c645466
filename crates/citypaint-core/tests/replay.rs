//! End-to-end replay: a local stroke captured on one client, carried over
//! the wire contract, and replayed on a second client's walls.

use kurbo::Point;

use citypaint_core::{
    dispatch, protocol, raster::WHITE, InputCapture, Session, SurfaceRegistry, WallConfig,
};

fn walls() -> Vec<WallConfig> {
    (1..=3)
        .map(|id| {
            let mut wall = WallConfig::new(id, "0 0 0", "0 0 0");
            wall.buffer_width = 64;
            wall.buffer_height = 64;
            wall
        })
        .collect()
}

/// Strip the `*broadcast-message*` envelope the relay forwards, yielding
/// the inner payload as the peers receive it.
fn relay_forward(frame: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(frame).ok()?;
    let items = value.as_array()?;
    if items.first()?.as_str()? != "*broadcast-message*" {
        return None;
    }
    Some(items.get(1)?.to_string())
}

#[test]
fn test_local_stroke_replays_as_dots_on_peers() {
    // Painter side.
    let mut painter_walls = SurfaceRegistry::new(walls());
    let mut painter_input = InputCapture::new();
    let mut painter_session = Session::new("citypaint");
    painter_session.handle_open();
    painter_session.take_outgoing();

    painter_walls.set_active(2);
    let mut ops = Vec::new();
    ops.extend(painter_input.pointer_down(&mut painter_walls, Point::new(20.0, 20.0)));
    ops.extend(painter_input.pointer_move(&mut painter_walls, Point::new(30.0, 20.0)));
    ops.extend(painter_input.pointer_move(&mut painter_walls, Point::new(40.0, 20.0)));
    painter_input.pointer_up();

    for op in ops {
        painter_session.queue_broadcast(op);
    }
    let frames = painter_session.take_outgoing();
    // One draw-start plus two draw-line points.
    assert_eq!(frames.len(), 3);

    // Viewer side: same wall set, stroke color pinned for assertions.
    let mut viewer_walls = SurfaceRegistry::new(walls());
    viewer_walls.get_mut(2).unwrap().raster_mut().set_stroke_color([255, 0, 255, 255]);
    let mut viewer_session = Session::new("citypaint");
    viewer_session.handle_open();
    viewer_session.take_outgoing();

    for frame in &frames {
        let payload = relay_forward(frame).expect("all frames are broadcasts");
        if let Some(op) = viewer_session.handle_message(&payload) {
            dispatch::apply(&mut viewer_walls, &op);
        }
    }

    // Wall screen origin is (10, 10): local coords are (10, 10) → (30, 10).
    let raster = viewer_walls.get(2).unwrap().raster();
    assert_eq!(raster.pixel(20, 10), Some([255, 0, 255, 255]));
    assert_eq!(raster.pixel(30, 10), Some([255, 0, 255, 255]));
    // Dots, not a line: the midpoint between the two points stays white.
    assert_eq!(raster.pixel(25, 10), Some(WHITE));
    assert_eq!(viewer_walls.take_stale(), vec![2]);
}

#[test]
fn test_draw_continuation_from_foreign_client_strokes_a_line() {
    let mut viewer_walls = SurfaceRegistry::new(walls());
    viewer_walls.get_mut(1).unwrap().raster_mut().set_stroke_color([0, 128, 0, 255]);
    let mut session = Session::new("citypaint");
    session.handle_open();

    let start = protocol::encode_operation(&citypaint_core::DrawOperation::PathStart {
        surface: 1,
        x: 4.0,
        y: 4.0,
    })
    .to_string();
    let op = session.handle_message(&start).expect("draw-start decodes");
    dispatch::apply(&mut viewer_walls, &op);

    // A `draw` continuation, as emitted by clients of the richer dialect.
    let op = session
        .handle_message(r#"["draw", 12, 1, 20.0, 4.0]"#)
        .expect("draw decodes");
    dispatch::apply(&mut viewer_walls, &op);

    let raster = viewer_walls.get(1).unwrap().raster();
    for x in 4..=20 {
        assert_eq!(raster.pixel(x, 4), Some([0, 128, 0, 255]));
    }
}

#[test]
fn test_malformed_relay_traffic_never_mutates_walls() {
    let mut viewer_walls = SurfaceRegistry::new(walls());
    let mut session = Session::new("citypaint");
    session.handle_open();
    let before = viewer_walls.get(1).unwrap().raster().bytes().to_vec();

    for frame in [
        r#"["draw-line", 1]"#,
        r#"["draw-line", 1, "a", "b"]"#,
        r#"["draw-line", 9, 5.0, 5.0]"#,
        "[]",
        "42",
        "garbage",
    ] {
        if let Some(op) = session.handle_message(frame) {
            dispatch::apply(&mut viewer_walls, &op);
        }
    }

    assert_eq!(viewer_walls.get(1).unwrap().raster().bytes(), before.as_slice());
    assert!(viewer_walls.take_stale().is_empty());
}
