use caprover_preview::env::{CiEnv, FlowCommand};
use caprover_preview::{cleanup, setup};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let command = FlowCommand::from_env()?;
    let ci_env = CiEnv::from_env()?;

    match command {
        FlowCommand::Setup => {
            setup::run(&ci_env).await?;
        }
        FlowCommand::Cleanup => cleanup::run(&ci_env).await?,
    }

    Ok(())
}
