//! # Burst Example
//!
//! Fires a burst of simulated outbound calls through a controller that lets at most
//! three run at once. One call fails; the others are unaffected.
//!
//! ## Run
//! ```bash
//! RUST_LOG=callgate=debug cargo run --example burst --features "logging"
//! ```

#[cfg(not(feature = "logging"))]
compile_error!("error");

use std::time::Duration;

use callgate::{AdmissionController, ControllerConfig, LogWriter};
use futures::future::join_all;
use tracing_subscriber::EnvFilter;

async fn fake_call(id: u32) -> anyhow::Result<String> {
    let start = tokio::time::Instant::now();
    println!("{:>6}[call-{id}] started", "");

    tokio::time::sleep(Duration::from_millis(150 + u64::from(id % 4) * 100)).await;
    if id == 5 {
        anyhow::bail!("call-{id}: upstream returned 503");
    }

    println!("{:>6}[call-{id}] completed in {:?}", "", start.elapsed());
    Ok(format!("payload-{id}"))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("callgate=info")),
        )
        .init();

    let gate = AdmissionController::with_config(ControllerConfig::new(3).with_name("upstream"))?;
    LogWriter::new().attach(&gate);

    println!("Burst: 8 calls, limit 3");
    let calls = (0..8).map(|id| gate.add(move || fake_call(id)));
    let results = join_all(calls).await;

    println!();
    for (id, res) in results.iter().enumerate() {
        match res {
            Ok(payload) => println!("call-{id}: ok  {payload}"),
            Err(e) => println!("call-{id}: err {e}"),
        }
    }

    let snap = gate.snapshot();
    println!(
        "\nfinal: running={} queued={} limit={}",
        snap.running, snap.queued, snap.limit
    );
    Ok(())
}
