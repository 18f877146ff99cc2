//! Oracle command implementation.
//!
//! Install, remove and probe the gridsynth binary.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use qhe_compile::OracleCapability;
use qhe_compile::synthesis::gridsynth::{
    LICENSE_NOTICE, default_binary_path, download_url, install_dir,
};

use super::common::oracle_capability;

/// Execute the oracle install subcommand.
pub async fn execute_install(yes: bool) -> Result<()> {
    let target = default_binary_path();
    if target.is_file() {
        println!(
            "{} gridsynth already installed at {}",
            style("✓").green().bold(),
            style(target.display()).green()
        );
        return Ok(());
    }

    let url = download_url();
    println!("{} Installing gridsynth", style("→").cyan().bold());
    println!("  Source: {}", style(url).underlined());
    println!("  {}", style(LICENSE_NOTICE).yellow());

    if !yes && !confirm("Continue? [y/N] ")? {
        println!("  Aborted.");
        return Ok(());
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .context("Invalid spinner template")?,
    );
    spinner.set_message("Downloading...");
    spinner.enable_steady_tick(Duration::from_millis(100));

    let bytes = reqwest::get(url)
        .await
        .and_then(reqwest::Response::error_for_status)
        .with_context(|| format!("Failed to download {url}"))?
        .bytes()
        .await
        .context("Failed to read download")?;
    spinner.finish_and_clear();
    info!("downloaded {} bytes from {url}", bytes.len());

    let dir = install_dir();
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
    fs::write(&target, &bytes)
        .with_context(|| format!("Failed to write file: {}", target.display()))?;
    make_executable(&target)?;

    println!(
        "{} Installed {} ({} bytes)",
        style("✓").green().bold(),
        style(target.display()).green(),
        bytes.len()
    );
    Ok(())
}

/// Execute the oracle uninstall subcommand.
pub fn execute_uninstall() -> Result<()> {
    let target = default_binary_path();
    if !target.exists() {
        println!("  gridsynth is not installed at {}", target.display());
        return Ok(());
    }

    fs::remove_file(&target)
        .with_context(|| format!("Failed to remove {}", target.display()))?;
    println!(
        "{} Removed {}",
        style("✓").green().bold(),
        style(target.display()).green()
    );
    Ok(())
}

/// Execute the oracle check subcommand.
pub fn execute_check(path: Option<&Path>) {
    match oracle_capability(path) {
        OracleCapability::Available(oracle) => {
            println!("{} {} is available", style("✓").green().bold(), oracle.name());
        }
        OracleCapability::Unavailable { path } => {
            println!(
                "{} No rotation oracle at {}",
                style("✗").red().bold(),
                path.display()
            );
            println!(
                "  Run {} or set {}",
                style("qhe oracle install").cyan(),
                style("QHE_GRIDSYNTH").cyan()
            );
        }
    }
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt}");
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
        .with_context(|| format!("Failed to set permissions on {}", path.display()))
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}
