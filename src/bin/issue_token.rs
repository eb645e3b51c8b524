//! Issue a signed operator token for the alert trigger endpoint.
//!
//! Usage: issue_token <operator-id> [display-name] [config-file]

use anyhow::Result;
use std::path::Path;
use trailguard::config;
use trailguard::security::AuthService;

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let operator_id = args
        .next()
        .ok_or_else(|| anyhow::anyhow!("Usage: issue_token <operator-id> [name] [config-file]"))?;
    let name = args.next().unwrap_or_else(|| operator_id.clone());
    let config_path = args.next();

    let config = config::load_config(config_path.as_deref().map(Path::new))?;
    let auth = AuthService::new(&config.security);
    let token = auth.issue_token(&operator_id, &name)?;

    println!("{}", token.access_token);
    eprintln!("expires in {} seconds", token.expires_in);

    Ok(())
}
