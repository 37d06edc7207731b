use clawdmetrics_core::credentials::ANON_KEY_VAR;
use clawdmetrics_core::display::leaderboard_table;
use clawdmetrics_core::{
    ClawdConfig, ClawdError, EnvSource, SupabaseClient, VerifyCredentials, VerifyReport,
};

use super::{print_block, Usage};

pub const USAGE: Usage = Usage {
    usage: "clawdmetrics verify [--probe]",
    example: "clawdmetrics verify --probe",
    env_vars: &[
        "NEXT_PUBLIC_SUPABASE_URL: Supabase project URL (falls back to SUPABASE_URL)",
        "NEXT_PUBLIC_SUPABASE_ANON_KEY: Supabase anon key",
    ],
};

pub async fn run(probe: bool, env: &dyn EnvSource, config: &ClawdConfig) -> anyhow::Result<()> {
    println!("🔍 Verifying Supabase configuration...\n");

    let creds = VerifyCredentials::resolve(env, config)?;

    println!("1️⃣ Environment:");
    match creds.url_source {
        Some(var) => println!("   ✅ {}: set", var),
        None => println!("   ℹ️  Project URL not set, using configured {}", creds.url),
    }
    println!("   ✅ {}: set", ANON_KEY_VAR);

    let report = VerifyReport::build(&creds.url, creds.anon_key.expose());

    println!("\n2️⃣ URL format:");
    if report.url_ok() {
        println!("   ✅ URL format OK: {}", report.url);
    } else {
        println!("   ❌ URL format invalid: {}", report.url);
    }

    println!("\n3️⃣ API key format:");
    match &report.claims {
        Ok(claims) => {
            println!("   ✅ API key is a JWT");
            println!("   📋 JWT payload:");
            println!("      - iss (issuer): {}", claims.iss.as_deref().unwrap_or("?"));
            println!("      - ref (project ref): {}", claims.project_ref.as_deref().unwrap_or("?"));
            println!("      - role: {}", claims.role.as_deref().unwrap_or("?"));
            match report.ref_matches() {
                Some(true) => println!("      ✅ Project ref matches the URL"),
                Some(false) => println!("      ⚠️  Project ref does not match the URL"),
                None => {}
            }
        }
        Err(e) => println!("   ❌ API key format invalid: {}", e),
    }

    if probe {
        let function = &config.supabase.leaderboard_function;
        println!("\n4️⃣ Edge function ({}):", function);
        check_leaderboard(&creds, config).await?;
    }

    if !report.passed() {
        anyhow::bail!("one or more configuration checks failed");
    }

    println!("\n✅ Configuration looks good.");
    Ok(())
}

/// Call the leaderboard function once. A 404 only warns: the function may
/// not be deployed yet.
async fn check_leaderboard(
    creds: &VerifyCredentials,
    config: &ClawdConfig,
) -> Result<(), ClawdError> {
    let client = SupabaseClient::new(&creds.url, &creds.anon_key, config.timeout())?;
    match client.fetch_leaderboard(&config.supabase.leaderboard_function).await {
        Ok(rows) => {
            println!("   ✅ Edge function call succeeded");
            print_block("🏆 Leaderboard:", &leaderboard_table(&rows));
            Ok(())
        }
        Err(err @ ClawdError::Remote { status: 404, .. }) => {
            println!("   ⚠️  {}", err);
            for line in err.remediation() {
                println!("   {}", line);
            }
            Ok(())
        }
        Err(err) => Err(err),
    }
}
