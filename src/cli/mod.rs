use anyhow::{Context as _, Result};
use log::info;

use crate::{Args, archive::Archiver, config::Config};

pub fn run(args: &Args) -> Result<()> {
    let config = Config::load(args)?;
    let password = config.password()?;

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_io()
        .build()
        .context("cannot start tokio runtime")?;

    info!(
        "archiving {}@{} into {}",
        config.user(),
        config.host(),
        config.destination().display()
    );
    let archiver = Archiver::new(&config, &password);
    let summary = rt.block_on(archiver.run())?;
    summary.report();

    Ok(())
}
