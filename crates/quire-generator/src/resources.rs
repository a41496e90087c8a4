//! Copying theme resources into the output.
//!
//! Each declared resource path is resolved against the theme's resource root
//! and copied to the same relative location in the output. A folder is copied
//! recursively. Resources are independent: one failing never stops the others.

use std::{
    io,
    path::{Component, Path, PathBuf},
};

use rayon::prelude::*;
use tracing::{debug, info};

use crate::{
    error::{GenerationError, PublishingError},
    fs::OutputFolder,
    group::TaskGroup,
};

/// Copies declared resources into an output folder.
#[derive(Debug, Clone, Copy)]
pub struct ResourceCopier<'a> {
    output: &'a OutputFolder,
}

impl<'a> ResourceCopier<'a> {
    #[must_use]
    pub fn new(output: &'a OutputFolder) -> Self {
        Self { output }
    }

    /// Copy every resource, returning the number of files copied or every failure.
    ///
    /// An empty `resource_paths` performs no file system operation at all.
    pub fn copy(&self, resource_paths: &[PathBuf], source_root: &Path) -> Result<usize, GenerationError> {
        let group = TaskGroup::new(false);
        self.copy_into(resource_paths, source_root, &group);
        group.finish().map(|stats| stats.resources)
    }

    /// Copy every resource, reporting each one into `group`.
    pub fn copy_into(&self, resource_paths: &[PathBuf], source_root: &Path, group: &TaskGroup) {
        if resource_paths.is_empty() {
            return;
        }

        info!(
            count = resource_paths.len(),
            root = %source_root.display(),
            "copying theme resources"
        );

        resource_paths
            .par_iter()
            .for_each(|path| group.run_copy(|| self.copy_one(path, source_root)));
    }

    /// Copy one declared resource, file or folder.
    fn copy_one(&self, relative: &Path, source_root: &Path) -> Result<usize, PublishingError> {
        let wrap = |source| PublishingError::ResourceCopy {
            path: relative.to_path_buf(),
            source,
        };

        if !stays_inside(relative) {
            return Err(wrap(io::Error::new(
                io::ErrorKind::InvalidInput,
                "resource paths must be relative and stay inside the resource root",
            )));
        }

        let source = source_root.join(relative);
        let fs = self.output.file_system();

        if !fs.is_folder(&source) {
            self.output.copy_file(&source, relative).map_err(wrap)?;
            return Ok(1);
        }

        let files = fs.list_files(&source).map_err(wrap)?;
        for file in &files {
            self.output
                .copy_file(&source.join(file), &relative.join(file))
                .map_err(wrap)?;
        }
        debug!(folder = %relative.display(), files = files.len(), "copied resource folder");
        Ok(files.len())
    }
}

/// Whether `path` names something below the folder it is joined onto.
fn stays_inside(path: &Path) -> bool {
    let mut named = false;
    for component in path.components() {
        match component {
            Component::Normal(_) => named = true,
            Component::CurDir => {}
            Component::RootDir | Component::Prefix(_) | Component::ParentDir => return false,
        }
    }
    named
}
