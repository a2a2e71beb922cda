use std::io;

use clap::Parser;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

use crate::{
    api::ApiClient,
    cli::{Args, View},
    config::Config,
    dashboard::Dashboard,
    storage::FileStorage,
    toast::Toaster,
    wizard::Wizard,
};

mod api;
mod cli;
mod config;
mod dashboard;
mod error;
mod model;
mod storage;
#[cfg(test)]
mod testing;
mod toast;
mod wizard;

// Network calls are the only suspension points, so a single thread is enough
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = Config::load(&args.config)?;
    if let Some(api_url) = args.api_url {
        config.api_url = api_url;
    }

    // Begin logging. Logs go to stderr so they stay out of the interactive output
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.max_level())
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Using backend at {}", config.base_url());

    let api = ApiClient::new(config.base_url(), config.connect_timeout())?;
    let storage = FileStorage::open(config.storage_path())?;
    info!("Local state kept in {}", storage.path().display());
    let toasts = Toaster::new(config.toast_capacity, config.toast_ttl());

    let mut input = io::stdin().lock();
    let mut output = io::stdout();

    match args.view {
        View::Student => {
            let mut wizard = Wizard::mount(storage, api, toasts);
            cli::student::run(&mut wizard, &mut input, &mut output).await?;
        }
        View::Teacher => {
            let mut dashboard = Dashboard::mount(storage, api, toasts).await;
            cli::teacher::run(&mut dashboard, &config.download_dir, &mut input, &mut output).await?;
        }
    }

    Ok(())
}
