//! Ask command - answer one question from the terminal

use clap::Args;
use tracing::debug;

use crate::config::AppConfig;
use crate::infrastructure::logging;

#[derive(Args)]
pub struct AskArgs {
    /// The question to answer; multiple words are joined with spaces
    #[arg(required = true)]
    pub query: Vec<String>,
}

pub async fn run(args: AskArgs) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().unwrap_or_default();
    logging::init_logging(&config.logging);

    let state = crate::create_app_state(&config).await?;

    let query = args.query.join(" ");
    let (payload, cached) = state.answer_with_persistence(&query).await;
    debug!(cached, context_used = payload.context_used, "Query answered");

    println!("{}", payload.format_for_chat());

    Ok(())
}
