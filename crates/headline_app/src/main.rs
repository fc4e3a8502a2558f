mod cli;
mod config;
mod console;
mod logging;

use std::io;

use anyhow::Context;
use clap::Parser;
use headline_core::NoiseClassifier;
use headline_engine::{Loader, Pipeline, ReqwestFetcher, TitleFileLoader};
use headline_logging::headline_info;

use cli::Cli;
use config::AppConfig;
use console::ConsoleProgress;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.print_default_config {
        println!("{}", AppConfig::default().to_ron()?);
        return Ok(());
    }

    logging::initialize(cli.log, cli.verbose);

    let mut config = AppConfig::load(cli.config.as_deref()).context("loading configuration")?;
    if let Some(dir) = cli.output_dir {
        config.output.dir = dir;
    }
    if cli.keep_previous {
        config.output.prune_previous = false;
    }

    console::print_banner(&mut io::stdout())?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("starting async runtime")?;

    let fetcher = ReqwestFetcher::new(config.fetch.to_settings());
    let pipeline = Pipeline::new(
        Box::new(fetcher),
        NoiseClassifier::new(config.classifier.clone()),
    );
    let progress = ConsoleProgress::stdout();
    let result = runtime.block_on(pipeline.run(&config.sources, &progress));

    let loader = TitleFileLoader::new(&config.output.dir)
        .with_prefix(config.output.prefix.as_str())
        .with_prune_previous(config.output.prune_previous);
    let count = result.len();
    let saved = loader
        .write(result)
        .with_context(|| format!("writing titles to {:?}", config.output.dir))?;
    let Some(path) = saved else {
        println!("No titles found.");
        return Ok(());
    };

    headline_info!("Saved {} titles to {:?}", count, path);
    println!("Saved {count} titles to:\n{}", path.display());
    Ok(())
}
