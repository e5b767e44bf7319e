//! `incdeps stats` command implementation.

use colored::Colorize;
use incdeps::store;

use super::display::{format_size, print_files};
use super::{BuildOverrides, GlobalOptions, resolve_config};

/// Run the stats command.
pub async fn run(global: &GlobalOptions, limit: usize) -> incdeps::Result<()> {
    let config = resolve_config(global, BuildOverrides::default()).await?;

    let size = match tokio::fs::metadata(&config.output).await {
        Ok(meta) => format_size(meta.len()),
        Err(e) => {
            tracing::debug!(error = %e, "Failed to get graph file size");
            "size unknown".to_string()
        }
    };
    let graph = store::load_file(&config.output).await?;

    println!("{}", "Include Graph Statistics".cyan().bold());
    println!();
    println!(
        "  {}: {} ({})",
        "Graph".white().bold(),
        config.output.display(),
        size
    );
    println!(
        "  {}: {}",
        "Files".white().bold(),
        graph.len().to_string().green()
    );
    println!(
        "  {}: {}",
        "Include edges".white().bold(),
        graph.edge_count().to_string().green()
    );

    let standalone = graph
        .nodes()
        .iter()
        .filter(|n| n.includes.is_empty() && n.used_by.is_empty())
        .count();
    println!(
        "  {}: {}",
        "Unconnected files".white().bold(),
        standalone.to_string().dimmed()
    );
    println!();

    println!("  {}:", "Most included".white().bold());
    let ranked = graph.most_used(limit);
    if ranked.is_empty() {
        print_files(&[], &config.scan_path, "(no include edges)");
    }
    for (id, dependents) in ranked {
        let Some(node) = graph.node(id) else {
            continue;
        };
        println!(
            "    {} {} {}",
            "•".dimmed(),
            node.file,
            format!("({dependents} dependents)").dimmed()
        );
    }

    Ok(())
}
