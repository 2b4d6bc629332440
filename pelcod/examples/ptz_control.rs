//! Basic PTZ control: sweep the head, exercise zoom and a preset.
//!
//! Usage: cargo run --example ptz_control [port] [address]

use std::time::Duration;

use pelcod::{Camera, Direction, PresetAction, Speed, Zoom};

#[tokio::main]
async fn main() -> pelcod::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("pelcod=debug".parse().unwrap()),
        )
        .init();

    let port = std::env::args().nth(1).unwrap_or_else(|| "/dev/ttyUSB0".into());
    let address: u8 = std::env::args()
        .nth(2)
        .and_then(|s| s.parse().ok())
        .unwrap_or(1);

    let camera = Camera::open_serial(&port, 4800, address).await?;
    println!("Connected to camera {address} on {port}");

    if let Ok(Some(info)) = camera.query().await {
        println!("Device part number: {:#06X}", info.part_number);
    }

    println!("Panning right...");
    camera.move_in(Direction::Right, Some(Speed::NORMAL)).await?;
    tokio::time::sleep(Duration::from_secs(2)).await;
    camera.stop().await?;

    println!("Tilting up slowly...");
    camera.move_in(Direction::Up, Some(Speed::SLOW)).await?;
    tokio::time::sleep(Duration::from_secs(1)).await;
    camera.stop().await?;

    println!("Zooming in...");
    camera.zoom(Zoom::In, Some(2)).await?;
    tokio::time::sleep(Duration::from_secs(1)).await;
    camera.stop().await?;

    println!("Saving this view as preset 1, then returning home");
    camera.preset(PresetAction::Set, 1).await?;
    camera.goto_zero_pan().await?;

    camera.close().await?;
    Ok(())
}
