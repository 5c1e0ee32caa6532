//! `tagtree` binary

use tagtree_cli::{cli, logging, App, AppConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = cli().get_matches();
    let config = AppConfig::resolve(&matches)?;
    logging::init(&config.log)?;

    tracing::debug!("Store backend {:?} at {}", config.store.backend, config.store.dir.display());
    let output = App::new(&config).execute(&matches).await?;
    print!("{output}");
    Ok(())
}
