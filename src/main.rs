use std::sync::Arc;

use anyhow::Result;
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

use coachvisor::{Config, LogWriter, StatusPanel, Subscribe, Supervisor, listen};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    println!("=================================================");
    println!("  coachvisor - coach subsystem control");
    println!("=================================================");

    let cfg = Config::default();
    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter), Arc::new(StatusPanel)];
    let supervisor = Supervisor::new(cfg, subs);
    supervisor.register_defaults()?;

    let controls = supervisor.controls();
    let token = supervisor.cancellation_token();
    tokio::spawn(listen(BufReader::new(tokio::io::stdin()), controls, token));

    tracing::info!("commands: LIGHT, TEMP, EMERGENCY, FIRE, POWER LOW, CHAIN, STATUS");
    supervisor.run().await?;

    println!("system shutdown complete");
    Ok(())
}
