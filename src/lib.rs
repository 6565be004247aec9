pub mod cli;
pub mod commands;
pub mod error;
pub mod kibana;
pub mod output;
pub mod processing;
pub mod query;
pub mod retrieval;

pub async fn run() -> anyhow::Result<()> {
    use clap::{CommandFactory, Parser, error::ErrorKind};

    let args = cli::Cli::parse();

    // Configure logger based on debug flag
    if args.debug {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
        log::debug!("Debug logging enabled");
    } else {
        env_logger::init();
    }

    let operation = match args.operation() {
        Ok(operation) => operation,
        Err(e) => cli::Cli::command()
            .error(ErrorKind::MissingRequiredArgument, e)
            .exit(),
    };

    let config = kibana::ProxyConfig::new(
        &args.server_url,
        args.username.as_deref(),
        args.password.as_deref(),
        args.verify_tls,
    )?;

    log::info!("Relaying through Kibana at {}", config.base_url());
    let proxy = kibana::KibanaProxy::new(config)?;

    commands::execute(&proxy, operation, args.quiet).await?;
    Ok(())
}
