//! `incdeps who-uses` command implementation.

use std::path::{Path, PathBuf};

use colored::Colorize;

use super::display::print_files;
use super::{BuildOverrides, GlobalOptions, absolute, resolve_config};

/// Run the who-uses command.
pub async fn run(global: &GlobalOptions, file: &Path, json: bool) -> incdeps::Result<()> {
    let config = resolve_config(global, BuildOverrides::default()).await?;
    let target = absolute(file.to_path_buf(), &std::env::current_dir()?);

    let dependents = incdeps::who_is_using(&config.scan_path, &config.output, &target).await?;

    if json {
        let list: Vec<String> = dependents
            .iter()
            .map(|p| p.display().to_string())
            .collect();
        println!("{:#}", serde_json::Value::from(list));
        return Ok(());
    }

    print_report(&config.scan_path, &target, &dependents);
    Ok(())
}

fn print_report(scan_path: &Path, target: &Path, dependents: &[PathBuf]) {
    println!("Files using {}:", target.display().to_string().cyan().bold());
    println!();

    // The first entry is always the target itself.
    let others = dependents.get(1..).unwrap_or_default();
    println!(
        "  {} ({} files):",
        "Transitive dependents".white().bold(),
        others.len().to_string().yellow()
    );
    print_files(others, scan_path, "(none)");
}
