//! Build command - publishes the site to the output directory

use std::{path::Path, time::Instant};

use color_eyre::eyre::{Result, WrapErr};
use quire_generator::BuildStats;

use super::Project;

/// Run the build command.
///
/// Publishes every location of the content manifest with the `plain` theme.
pub fn run(config_path: &Path, output: Option<&Path>) -> Result<BuildStats> {
    let start = Instant::now();
    tracing::info!(?config_path, ?output, "Starting build");

    let project = Project::load(config_path)?;
    let output_dir = project.output_dir(output);

    let stats = project
        .publisher(project.theme.clone(), output_dir.clone())
        .publish(&project.site)
        .wrap_err("Build failed")?;

    let duration = start.elapsed();

    println!();
    println!("  Build completed successfully!");
    println!();
    println!("  Written:    {}", stats.written);
    println!("  Skipped:    {}", stats.skipped);
    println!("  Resources:  {}", stats.resources);
    println!();
    println!("  Duration:   {:.2}s", duration.as_secs_f64());
    println!("  Output:     {}", output_dir.display());
    println!();

    tracing::info!(?stats, ?duration, "Build completed successfully");

    Ok(stats)
}
