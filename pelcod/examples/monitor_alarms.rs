//! Watch the line for unsolicited alarm replies.
//!
//! Usage: cargo run --example monitor_alarms [port] [address]

use pelcod::{Camera, LinkSession, RxEvent};

#[tokio::main]
async fn main() -> pelcod::Result<()> {
    tracing_subscriber::fmt().init();

    let port = std::env::args().nth(1).unwrap_or_else(|| "/dev/ttyUSB0".into());
    let address: u8 = std::env::args()
        .nth(2)
        .and_then(|s| s.parse().ok())
        .unwrap_or(1);

    let camera = Camera::open_serial(&port, 4800, address).await?.without_reply();

    let mut session = LinkSession::attach(&camera);
    let mut events = session.start(32)?;

    println!("Monitoring {port} for alarms for 60 seconds...");

    let deadline = tokio::time::Instant::now() + std::time::Duration::from_secs(60);
    let mut stopping = false;
    loop {
        tokio::select! {
            event = events.recv() => match event {
                Some(RxEvent::Status(alarms)) => {
                    println!("Active alarms: {:?}", alarms.active());
                }
                Some(RxEvent::EndOfStream) | None => break,
            },
            _ = tokio::time::sleep_until(deadline), if !stopping => {
                println!("Shutting down...");
                stopping = true;
                session.shutdown();
            }
        }
    }

    session.wait_for_shutdown().await;
    camera.close().await?;
    Ok(())
}
