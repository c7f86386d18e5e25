use anyhow::{Context, Result};
use std::process::Command;

use super::common::print_success;
use crate::config::Config;

/// Hide all but the first characters of a secret
fn mask(secret: &str) -> String {
    if secret.is_empty() {
        return String::new();
    }
    let prefix: String = secret.chars().take(4).collect();
    format!("{}…", prefix)
}

pub async fn show_config(config: Config) -> Result<()> {
    let mut shown = config.clone();
    shown.auth.access_token = mask(&shown.auth.access_token);
    shown.auth.refresh_token = mask(&shown.auth.refresh_token);
    shown.backend.anon_key = mask(&shown.backend.anon_key);

    let config_str = toml::to_string_pretty(&shown)?;

    println!("Current Configuration ({})", config.path()?.display());
    println!("────────────────────────────────");
    println!();
    println!("{}", config_str);

    Ok(())
}

pub async fn edit_config(config: Config) -> Result<()> {
    let config_file = config.path()?;

    // Ensure config file exists
    if !config_file.exists() {
        Config::default().with_path(&config_file).save()?;
    }

    // Open in default editor
    let editor = std::env::var("EDITOR").unwrap_or_else(|_| "vi".to_string());

    let status = Command::new(&editor)
        .arg(&config_file)
        .status()
        .with_context(|| format!("Failed to start editor '{}'", editor))?;

    if !status.success() {
        anyhow::bail!("Editor exited with {}", status);
    }

    // Make sure the result still parses
    Config::load_from(Some(config_file.as_path()))?;
    print_success("Configuration saved!");

    Ok(())
}

pub async fn init_config(config: Config, force: bool) -> Result<()> {
    let config_file = config.path()?;

    if config_file.exists() && !force {
        println!(
            "Configuration file already exists at: {}",
            config_file.display()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    Config::default().with_path(&config_file).save()?;

    print_success(format!(
        "Configuration initialized at: {}",
        config_file.display()
    ));
    println!();
    println!("Set the service URL and public key with: forca config edit");

    Ok(())
}

pub async fn config_path(config: Config) -> Result<()> {
    println!("{}", config.path()?.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask() {
        assert_eq!(mask(""), "");
        assert_eq!(mask("eyJhbGciOi"), "eyJh…");
        assert_eq!(mask("ab"), "ab…");
    }
}
