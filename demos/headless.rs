//! Drives a follower through a scripted pointer path against the in-memory
//! document and prints what a stylesheet would see each frame.
//!
//! Run with `RUST_LOG=debug` to see the follower's own logging.

use anyhow::Result;
use mouse_follower::prelude::*;

const FRAME_MS: f64 = 1000.0 / 60.0;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut dom = VirtualDom::new().with_viewport(800.0, 600.0);
    let clock = dom.clock();
    let body = dom.body_id();
    let button = dom.element_in(body, "button");
    dom.set_rect(button, Rect::new(360.0, 280.0, 80.0, 40.0));
    dom.set_attribute(button, "data-cursor-text", "Buy");
    dom.set_attribute(button, "data-cursor-stick", "");

    let options = FollowerOptions::from_json(r#"{"skewing": 1, "initialPos": [0, 0]}"#)?;
    let ticker = Ticker::shared();
    MouseFollower::<VirtualDom>::register_ticker(ticker.clone());
    let cursor = MouseFollower::new(dom, options)?;

    cursor.follower_mut().on(EventKind::AddState, |event| {
        log::info!("state added: {}", event.state().unwrap_or_default());
    });

    let path = (0..=40).map(|step| {
        let t = step as f64 / 40.0;
        Point::new(100.0 + 300.0 * t, 100.0 + 200.0 * t)
    });
    for (frame, pointer) in path.enumerate() {
        cursor.handle_event(PointerEvent::MouseMove { position: pointer });
        if frame == 30 {
            cursor.handle_event(PointerEvent::MouseOver {
                target: button,
                related_target: None,
            });
        }
        ticker.tick(clock.advance(FRAME_MS));

        let follower = cursor.follower();
        if let Some(transform) = follower.el().and_then(|el| follower.dom().transform(*el)) {
            println!(
                "frame {:>2}  pointer ({:>6.1}, {:>6.1})  {}  [{}]",
                frame,
                pointer.x,
                pointer.y,
                transform.to_css(),
                follower
                    .el()
                    .map(|el| follower.dom().class_name(el))
                    .unwrap_or_default()
            );
        }
    }

    // Let the last tween settle
    for _ in 0..60 {
        ticker.tick(clock.advance(FRAME_MS));
    }
    {
        let follower = cursor.follower();
        println!(
            "settled at {:?} in {:?} mode",
            follower.position(),
            follower.mode()
        );
    }

    cursor.destroy();
    println!("destroyed, ticker callbacks left: {}", ticker.len());
    Ok(())
}
