use anyhow::{Context, Result};
use clap::Parser;

mod analytics;
mod cli;
mod config;
mod document;
mod fetch;
mod history;
mod lm;
mod logging;
mod paths;
mod rotation;
mod sentiment;
mod staging;
mod templates;
#[cfg(test)]
mod test_support;
mod types;
mod util;
mod workflow;

use crate::cli::RootArgs;
use crate::config::Config;
use crate::lm::GeminiClient;
use crate::workflow::{summary_line, Workflow};

fn main() -> Result<()> {
    let args = RootArgs::parse();
    logging::init(args.verbose);

    let config = Config::from_env(&args)?;
    tracing::debug!(
        root = %config.paths.root().display(),
        model = %config.model,
        history_cap = config.history_cap,
        "configuration loaded"
    );
    let client = GeminiClient::new(&config.api_base, &config.model, config.api_key.clone());
    tracing::debug!(endpoint = client.url(), "generation client ready");
    let record = Workflow::new(&config, &client).run()?;

    if args.json {
        let text = serde_json::to_string_pretty(&record).context("serialize record")?;
        println!("{text}");
    } else {
        println!("{}", summary_line(&record));
    }
    Ok(())
}
