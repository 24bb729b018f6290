//! `contentscout status` — backend health and campaign counts.

use contentscout_config::AppConfig;
use contentscout_core::constants::collections;
use contentscout_store::AppContext;
use serde_json::json;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    let ctx = AppContext::connect(&config).await?;

    let (store_ok, cache_ok) = ctx.health().await;
    println!(
        "store ({}): {}",
        config.store.backend,
        if store_ok { "ok" } else { "unreachable" }
    );
    println!(
        "cache ({}): {}",
        config.cache.backend,
        if cache_ok { "ok" } else { "unreachable" }
    );

    if store_ok {
        let campaigns = ctx.store.count(collections::CAMPAIGNS, &json!({})).await?;
        let reports = ctx
            .store
            .count(collections::FINAL_REPORTS, &json!({}))
            .await?;
        println!("campaigns: {campaigns}");
        println!("final reports: {reports}");
    }

    ctx.shutdown().await?;
    Ok(())
}
