use std::path::Path;

use anyhow::{bail, Result};

use plotlyzt_core::AppConfig;

pub fn show(config: &AppConfig) -> Result<()> {
    print!("{}", config.to_toml()?);
    Ok(())
}

/// Write the default configuration to `custom`, or the default location
pub fn init(custom: Option<&Path>, force: bool) -> Result<()> {
    let path = custom.map(Path::to_path_buf).unwrap_or_else(AppConfig::config_path);
    if path.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }

    let config = AppConfig::default();
    match custom {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, config.to_toml()?)?;
        }
        None => config.save()?,
    }
    println!("Wrote {}", path.display());
    Ok(())
}

pub fn path(custom: Option<&Path>) -> Result<()> {
    let path = custom.map(Path::to_path_buf).unwrap_or_else(AppConfig::config_path);
    println!("{}", path.display());
    Ok(())
}
