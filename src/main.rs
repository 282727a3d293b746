use anyhow::Context;
use clap::Parser;

use charcounter::cli::{Cli, Commands};
use charcounter::config::Config;
use charcounter::errors::CounterResult;
use charcounter::logging;
use charcounter::messaging::TelegramMessenger;
use charcounter::services::{BotService, SymbolCounter};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::from_env().context("loading configuration")?;
    logging::init(cli.log_level.as_deref().unwrap_or(&config.log_level));

    match cli.command {
        Commands::Run => cmd_run(&config).context("running bot")?,
        Commands::Count { url } => cmd_count(&url, &config)?,
        Commands::Resolve { url } => cmd_resolve(&url, &config)?,
    }

    Ok(())
}

fn cmd_run(config: &Config) -> CounterResult<()> {
    let messenger = TelegramMessenger::new(config)?;
    let counter = SymbolCounter::from_config(&config.scraper)?;

    if config.access_users.is_empty() {
        tracing::warn!("ACCESS_USERS is empty, every user will be rejected");
    }

    let bot = BotService::new(
        messenger,
        counter,
        config.access_users.clone(),
        config.texts.clone(),
    );

    bot.run()
}

fn cmd_count(url: &str, config: &Config) -> CounterResult<()> {
    let counter = SymbolCounter::from_config(&config.scraper)?;
    let count = counter.count_symbols(url)?;

    println!("{}", count);
    Ok(())
}

fn cmd_resolve(url: &str, config: &Config) -> CounterResult<()> {
    let counter = SymbolCounter::from_config(&config.scraper)?;
    let (source, request) = counter.plan(url)?;

    println!("Source: {}", source);
    println!("Fetch:  GET {}", request.url);
    for (name, value) in &request.headers {
        println!("  {}: {}", name, value);
    }
    if let Some(auth) = &request.basic_auth {
        println!("  Authorization: Basic ({})", auth.login);
    }

    Ok(())
}
