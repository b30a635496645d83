//! Walks through issuing, checking and invalidating a verification code
//!
//! Run with: cargo run -p sb_infra --example verification_demo
//! Set VERIFICATION_STORE=redis and REDIS_URL to use a Redis backend.

use anyhow::Context;
use sb_infra::{build_verification_services, load_config, logging::init_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = load_config().context("failed to load configuration")?;
    init_tracing(&config.logging)?;

    println!("=== Verification Cache Demo ===\n");

    let mut services = build_verification_services(&config)
        .await
        .context("failed to build verification services")?;
    let cache = services.cache.clone();

    let subject = "Guardian@Example.com";
    let code = cache.issue(subject).await?;
    println!("Issued code {} to {}", code, subject);

    if let Some(ttl) = cache.remaining_ttl(subject).await? {
        println!("Code valid for another {}s", ttl.num_seconds());
    }

    let wrong = if code == "000000" { "111111" } else { "000000" };
    println!(
        "Wrong code accepted: {}",
        cache.verify(subject, wrong).await?
    );
    println!(
        "Lower-cased subject accepted: {}",
        cache.verify("guardian@example.com", &code).await?
    );

    cache.invalidate(subject).await?;
    println!(
        "Accepted after invalidation: {}",
        cache.verify(subject, &code).await?
    );

    services.shutdown();
    Ok(())
}
