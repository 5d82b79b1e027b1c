use crate::config::Settings;
use anyhow::{bail, Context, Result};
use log::info;

pub fn run(force: bool) -> Result<()> {
    let path = Settings::default_path().context("No configuration directory available")?;
    if path.exists() && !force {
        bail!(
            "Settings file {} already exists (use --force to overwrite)",
            path.display()
        );
    }
    Settings::default().save()?;
    info!("Wrote default settings to {}", path.display());
    Ok(())
}
