use clawdmetrics_core::display::stats_summary;
use clawdmetrics_core::report::{report_stats, rpc_url};
use clawdmetrics_core::{
    ClawdConfig, EnvSource, SessionStore, StatsAuthMode, StatsCredentials, StatsPayload,
};

use super::{banner, print_block, Usage};

pub const USAGE: Usage = Usage {
    usage: "clawdmetrics report-stats [--auth env|session] <interaction_count> <input_tokens> <output_tokens>",
    example: "clawdmetrics report-stats 10 5000 3000",
    env_vars: &[
        "SUPABASE_URL: Supabase project URL (--auth env)",
        "SUPABASE_SERVICE_KEY: Supabase service role key",
    ],
};

pub async fn run(
    mode: StatsAuthMode,
    counters: &[String],
    env: &dyn EnvSource,
    config: &ClawdConfig,
) -> anyhow::Result<()> {
    let payload = StatsPayload::from_args(counters)?;

    banner("🚀 Supabase Stats Reporting");

    println!("\n1️⃣ Checking configuration...");
    let store = SessionStore::from_config(config);
    let creds = StatsCredentials::resolve(mode, env, config, &store)?;
    println!("   ✓ Supabase URL: {}", creds.url);
    println!("   ✓ Service role key found");
    if creds.session.is_some() {
        println!("   ✓ Session loaded from {}", store.path().display());
        if let Some(user_id) = creds.user_id() {
            println!("   ✓ User ID: {}", user_id);
        }
    }

    println!("\n2️⃣ Reporting stats...");
    println!("📊 Reporting stats to Supabase...");
    println!("   Endpoint: {}", rpc_url(&creds, config));
    println!("   Interaction Count: {}", payload.interaction_count);
    println!("   Input Tokens: {}", payload.input_tokens);
    println!("   Output Tokens: {}", payload.output_tokens);

    let report = report_stats(&creds, config, payload).await?;
    println!("✅ Successfully reported stats!");
    println!("   Day: {} (local)", report.reported_on);

    print_block("📋 Stats Summary:", &stats_summary(&report.result));

    println!("\n✅ Done! Stats have been reported successfully.");
    Ok(())
}
