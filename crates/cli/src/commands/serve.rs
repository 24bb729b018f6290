//! `contentscout serve` — start the HTTP gateway.

use contentscout_config::AppConfig;
use contentscout_gateway::GatewayState;
use contentscout_store::AppContext;
use std::sync::Arc;
use tracing::info;

pub async fn run(port: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::load()?;
    if let Some(port) = port {
        config.server.port = port;
    }

    let ctx = AppContext::connect(&config).await?;
    let orchestrator = super::build_orchestrator(&config, ctx.clone());
    info!(
        host = %config.server.host,
        port = config.server.port,
        "starting gateway"
    );

    let state = Arc::new(GatewayState {
        config,
        ctx,
        orchestrator,
    });
    contentscout_gateway::serve(state).await?;
    Ok(())
}
