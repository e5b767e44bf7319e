//! `incdeps build` command implementation.

use colored::Colorize;

use super::{BuildOverrides, GlobalOptions, resolve_config};

/// Run the build command.
pub async fn run(global: &GlobalOptions, overrides: BuildOverrides) -> incdeps::Result<()> {
    let config = resolve_config(global, overrides).await?;

    println!(
        "{} {}...",
        "Scanning".cyan().bold(),
        config.scan_path.display()
    );

    let stats = incdeps::build_dependency_tree(&config).await?;

    println!();
    println!(
        "{} {} files, {} include edges",
        "Built".green().bold(),
        stats.files_retained,
        stats.includes_resolved
    );
    println!("{}: {}", "Output".dimmed(), config.output.display());
    println!("{}: {:.2?}", "Duration".dimmed(), stats.duration);

    if stats.files_blacklisted > 0 {
        println!(
            "{}: {} of {} files (blacklisted)",
            "Skipped".yellow(),
            stats.files_blacklisted,
            stats.files_discovered
        );
    }

    if stats.includes_unresolved() > 0 {
        println!(
            "{}: {} (likely system or external headers)",
            "Unresolved includes".dimmed(),
            stats.includes_unresolved()
        );
    }

    Ok(())
}
