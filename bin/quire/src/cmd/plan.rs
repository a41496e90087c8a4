//! Plan command - lists the files a build would write, without writing them

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use color_eyre::eyre::{Result, WrapErr};
use quire_generator::MemoryFileSystem;

use super::Project;

/// Every output path a build would write, sorted, relative to the output directory.
///
/// Theme resources are left out; they are listed by [`run`] as declared.
pub fn planned_files(project: &Project) -> Result<Vec<PathBuf>> {
    let fs = Arc::new(MemoryFileSystem::new());
    let root = PathBuf::from("/");
    let theme = project.theme.clone().with_resources(PathBuf::new(), Vec::new());

    project
        .publisher(theme, root.clone())
        .with_file_system(fs.clone())
        .publish(&project.site)
        .wrap_err("Planning failed")?;

    Ok(fs
        .files()
        .into_iter()
        .filter_map(|path| path.strip_prefix(&root).ok().map(Path::to_path_buf))
        .collect())
}

/// Run the plan command.
pub fn run(config_path: &Path, output: Option<&Path>) -> Result<Vec<PathBuf>> {
    tracing::info!(?config_path, "Planning build");

    let project = Project::load(config_path)?;
    let output_dir = project.output_dir(output);
    let files = planned_files(&project)?;

    println!();
    println!("  Output: {}", output_dir.display());
    println!();
    for file in &files {
        println!("  {}", file.display());
    }
    for resource in project.theme.resource_paths() {
        println!("  {} (resource)", resource.display());
    }
    println!();
    println!("  {} files, {} resources", files.len(), project.theme.resource_paths().len());
    println!();

    Ok(files)
}
