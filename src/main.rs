use anyhow::Context;
use clap::Parser;
use sst_processor::cli::{run, Cli};
use std::fs::File;
use std::sync::Mutex;
use tracing::error;
use tracing_subscriber::EnvFilter;

fn init_tracing(cli: &Cli) -> anyhow::Result<()> {
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match &cli.log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("cannot create log file {}", path.display()))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        None => builder.with_writer(std::io::stderr).init(),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli)?;

    if let Err(e) = run(cli).await {
        let e = anyhow::Error::from(e);
        error!("{:?}", e);
        return Err(e);
    }
    Ok(())
}
