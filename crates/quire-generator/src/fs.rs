//! File system layer.
//!
//! The pipeline never touches `std::fs` directly. It goes through a
//! [`FileSystem`] so runs can target the local disk or an in-memory tree.
//! Implementations must tolerate concurrent creation of distinct files and
//! repeated creation of the same folder.

use std::{
    collections::{BTreeMap, BTreeSet, HashMap},
    fs, io,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use quire_core::ContentPath;
use tracing::debug;
use walkdir::WalkDir;

/// Operations the pipeline needs from a file system.
pub trait FileSystem: Send + Sync {
    /// Create a folder and its ancestors. Succeeds if it already exists.
    fn create_folder(&self, path: &Path) -> io::Result<()>;

    /// Create or truncate a file with `contents`. The parent must exist.
    fn write_file(&self, path: &Path, contents: &[u8]) -> io::Result<()>;

    /// Copy a file. The target's parent must exist.
    fn copy_file(&self, source: &Path, target: &Path) -> io::Result<()>;

    /// Whether `path` is an existing folder.
    fn is_folder(&self, path: &Path) -> bool;

    /// All files below `folder`, recursively, relative to it.
    fn list_files(&self, folder: &Path) -> io::Result<Vec<PathBuf>>;
}

/// The local disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileSystem;

impl FileSystem for LocalFileSystem {
    fn create_folder(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }

    fn write_file(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        fs::write(path, contents)
    }

    fn copy_file(&self, source: &Path, target: &Path) -> io::Result<()> {
        if target.exists() && fs::canonicalize(source)? == fs::canonicalize(target)? {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("cannot copy {} onto itself", source.display()),
            ));
        }
        fs::copy(source, target).map(|_| ())
    }

    fn is_folder(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn list_files(&self, folder: &Path) -> io::Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in WalkDir::new(folder).sort_by_file_name() {
            let entry = entry.map_err(io::Error::from)?;
            if entry.file_type().is_file() {
                let relative = entry
                    .path()
                    .strip_prefix(folder)
                    .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
                files.push(relative.to_path_buf());
            }
        }
        Ok(files)
    }
}

/// A recorded file system call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FsOperation {
    CreateFolder(PathBuf),
    WriteFile(PathBuf),
    CopyFile { source: PathBuf, target: PathBuf },
    IsFolder(PathBuf),
    ListFiles(PathBuf),
}

#[derive(Debug, Default)]
struct MemoryState {
    folders: BTreeSet<PathBuf>,
    files: BTreeMap<PathBuf, Vec<u8>>,
    operations: Vec<FsOperation>,
}

/// An in-memory file system that records every call.
///
/// Used for dry runs and to assert on the exact operations a run performs.
#[derive(Debug, Default)]
pub struct MemoryFileSystem {
    state: Mutex<MemoryState>,
}

impl MemoryFileSystem {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a file, e.g. a theme resource, creating its ancestors.
    #[must_use]
    pub fn with_file(self, path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) -> Self {
        {
            let mut state = self.lock();
            let path = path.into();
            if let Some(parent) = path.parent() {
                insert_with_ancestors(&mut state.folders, parent);
            }
            state.files.insert(path, contents.into());
        }
        self
    }

    /// Contents of a file, if present.
    #[must_use]
    pub fn read(&self, path: &Path) -> Option<Vec<u8>> {
        self.lock().files.get(path).cloned()
    }

    /// Paths of every file, sorted.
    #[must_use]
    pub fn files(&self) -> Vec<PathBuf> {
        self.lock().files.keys().cloned().collect()
    }

    /// Every call made so far, in order.
    #[must_use]
    pub fn operations(&self) -> Vec<FsOperation> {
        self.lock().operations.clone()
    }

    /// How many times `path` was passed to `create_folder`.
    #[must_use]
    pub fn folder_creations(&self, path: &Path) -> usize {
        self.lock()
            .operations
            .iter()
            .filter(|op| matches!(op, FsOperation::CreateFolder(p) if p == path))
            .count()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        // State stays consistent even if a panicking test poisoned the lock.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn insert_with_ancestors(folders: &mut BTreeSet<PathBuf>, path: &Path) {
    for ancestor in path.ancestors() {
        if ancestor.as_os_str().is_empty() || !folders.insert(ancestor.to_path_buf()) {
            break;
        }
    }
}

fn require_parent(state: &MemoryState, path: &Path) -> io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !state.folders.contains(parent) => {
            Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("folder does not exist: {}", parent.display()),
            ))
        }
        _ => Ok(()),
    }
}

impl FileSystem for MemoryFileSystem {
    fn create_folder(&self, path: &Path) -> io::Result<()> {
        let mut state = self.lock();
        state.operations.push(FsOperation::CreateFolder(path.to_path_buf()));
        if state.files.contains_key(path) {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("a file exists at {}", path.display()),
            ));
        }
        insert_with_ancestors(&mut state.folders, path);
        Ok(())
    }

    fn write_file(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        let mut state = self.lock();
        state.operations.push(FsOperation::WriteFile(path.to_path_buf()));
        require_parent(&state, path)?;
        if state.folders.contains(path) {
            return Err(io::Error::new(
                io::ErrorKind::IsADirectory,
                format!("a folder exists at {}", path.display()),
            ));
        }
        state.files.insert(path.to_path_buf(), contents.to_vec());
        Ok(())
    }

    fn copy_file(&self, source: &Path, target: &Path) -> io::Result<()> {
        let mut state = self.lock();
        state.operations.push(FsOperation::CopyFile {
            source: source.to_path_buf(),
            target: target.to_path_buf(),
        });
        require_parent(&state, target)?;
        let contents = state.files.get(source).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such file: {}", source.display()),
            )
        })?;
        state.files.insert(target.to_path_buf(), contents);
        Ok(())
    }

    fn is_folder(&self, path: &Path) -> bool {
        let mut state = self.lock();
        state.operations.push(FsOperation::IsFolder(path.to_path_buf()));
        state.folders.contains(path)
    }

    fn list_files(&self, folder: &Path) -> io::Result<Vec<PathBuf>> {
        let mut state = self.lock();
        state.operations.push(FsOperation::ListFiles(folder.to_path_buf()));
        if !state.folders.contains(folder) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such folder: {}", folder.display()),
            ));
        }
        Ok(state
            .files
            .keys()
            .filter_map(|p| p.strip_prefix(folder).ok())
            .map(Path::to_path_buf)
            .collect())
    }
}

/// The output root of a run.
///
/// Creates parent folders on demand and remembers which ones it already
/// created, so each folder is requested from the file system at most once
/// per run even when many workers write into it. Distinct folders are
/// created in parallel.
pub struct OutputFolder {
    root: PathBuf,
    fs: Arc<dyn FileSystem>,
    created: Mutex<HashMap<PathBuf, Arc<Mutex<bool>>>>,
}

impl OutputFolder {
    pub fn new(root: impl Into<PathBuf>, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            root: root.into(),
            fs,
            created: Mutex::new(HashMap::new()),
        }
    }

    /// An output folder on the local disk.
    pub fn local(root: impl Into<PathBuf>) -> Self {
        Self::new(root, Arc::new(LocalFileSystem))
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn file_system(&self) -> &dyn FileSystem {
        self.fs.as_ref()
    }

    /// Absolute target of an output-relative path.
    #[must_use]
    pub fn target(&self, relative: &ContentPath) -> PathBuf {
        relative
            .segments()
            .fold(self.root.clone(), |path, segment| path.join(segment))
    }

    /// Write `contents` at `relative`, creating parent folders as needed.
    pub fn create_file(&self, relative: &ContentPath, contents: &[u8]) -> io::Result<PathBuf> {
        let target = self.target(relative);
        self.ensure_parent(&target)?;
        self.fs.write_file(&target, contents)?;
        debug!(path = %target.display(), bytes = contents.len(), "wrote file");
        Ok(target)
    }

    /// Copy `source` to `relative` inside the output.
    pub fn copy_file(&self, source: &Path, relative: &Path) -> io::Result<PathBuf> {
        let target = self.root.join(relative);
        self.ensure_parent(&target)?;
        self.fs.copy_file(source, &target)?;
        debug!(src = %source.display(), dest = %target.display(), "copied file");
        Ok(target)
    }

    fn ensure_parent(&self, target: &Path) -> io::Result<()> {
        let Some(parent) = target.parent() else {
            return Ok(());
        };
        let slot = {
            let mut created = self.created.lock().unwrap_or_else(PoisonError::into_inner);
            created.entry(parent.to_path_buf()).or_default().clone()
        };
        // Writers into one folder wait for its first creation; a failed
        // creation leaves the slot unset for the next writer to retry.
        let mut done = slot.lock().unwrap_or_else(PoisonError::into_inner);
        if !*done {
            self.fs.create_folder(parent)?;
            *done = true;
        }
        Ok(())
    }
}

impl std::fmt::Debug for OutputFolder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutputFolder")
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::atomic::{AtomicBool, AtomicUsize, Ordering},
        thread,
        time::{Duration, Instant},
    };

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_memory_write_requires_parent() {
        let fs = MemoryFileSystem::new();
        let err = fs.write_file(Path::new("/out/a/b.html"), b"x").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);

        fs.create_folder(Path::new("/out/a")).unwrap();
        fs.write_file(Path::new("/out/a/b.html"), b"x").unwrap();
        assert_eq!(fs.read(Path::new("/out/a/b.html")).unwrap(), b"x");
    }

    #[test]
    fn test_memory_create_folder_is_idempotent() {
        let fs = MemoryFileSystem::new();
        fs.create_folder(Path::new("/out/a")).unwrap();
        fs.create_folder(Path::new("/out/a")).unwrap();
        assert_eq!(fs.folder_creations(Path::new("/out/a")), 2);
        assert!(fs.is_folder(Path::new("/out")));
    }

    #[test]
    fn test_memory_copy_and_list() {
        let fs = MemoryFileSystem::new()
            .with_file("/theme/css/a.css", "a")
            .with_file("/theme/css/sub/b.css", "b");

        assert_eq!(
            fs.list_files(Path::new("/theme/css")).unwrap(),
            vec![PathBuf::from("a.css"), PathBuf::from("sub/b.css")]
        );

        fs.create_folder(Path::new("/out")).unwrap();
        fs.copy_file(Path::new("/theme/css/a.css"), Path::new("/out/a.css"))
            .unwrap();
        assert_eq!(fs.read(Path::new("/out/a.css")).unwrap(), b"a");

        let missing = fs
            .copy_file(Path::new("/theme/missing.css"), Path::new("/out/m.css"))
            .unwrap_err();
        assert_eq!(missing.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_output_folder_creates_each_parent_once() {
        let fs = Arc::new(MemoryFileSystem::new());
        let output = OutputFolder::new("/out", fs.clone());

        output.create_file(&ContentPath::new("blog/a.html"), b"a").unwrap();
        output.create_file(&ContentPath::new("blog/b.html"), b"b").unwrap();

        assert_eq!(fs.folder_creations(Path::new("/out/blog")), 1);
        assert_eq!(fs.files().len(), 2);
    }

    /// Blocks each folder creation until another one is in flight, or gives up.
    #[derive(Default)]
    struct OverlapGate {
        in_flight: AtomicUsize,
        overlapped: AtomicBool,
    }

    impl FileSystem for OverlapGate {
        fn create_folder(&self, _path: &Path) -> io::Result<()> {
            self.in_flight.fetch_add(1, Ordering::SeqCst);
            let deadline = Instant::now() + Duration::from_secs(2);
            while Instant::now() < deadline {
                if self.in_flight.load(Ordering::SeqCst) >= 2 {
                    self.overlapped.store(true, Ordering::SeqCst);
                    break;
                }
                thread::sleep(Duration::from_millis(1));
            }
            Ok(())
        }

        fn write_file(&self, _path: &Path, _contents: &[u8]) -> io::Result<()> {
            Ok(())
        }

        fn copy_file(&self, _source: &Path, _target: &Path) -> io::Result<()> {
            Ok(())
        }

        fn is_folder(&self, _path: &Path) -> bool {
            false
        }

        fn list_files(&self, _folder: &Path) -> io::Result<Vec<PathBuf>> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_output_folder_creates_distinct_folders_in_parallel() {
        let fs = Arc::new(OverlapGate::default());
        let output = OutputFolder::new("/out", fs.clone());

        thread::scope(|scope| {
            scope.spawn(|| output.create_file(&ContentPath::new("a/index.html"), b"a"));
            scope.spawn(|| output.create_file(&ContentPath::new("b/index.html"), b"b"));
        });

        assert!(fs.overlapped.load(Ordering::SeqCst));
    }

    #[test]
    fn test_output_folder_retries_failed_creation() {
        let fs = Arc::new(MemoryFileSystem::new());
        fs.create_folder(Path::new("/out")).unwrap();
        fs.write_file(Path::new("/out/blog"), b"file in the way").unwrap();
        let output = OutputFolder::new("/out", fs.clone());

        assert!(output.create_file(&ContentPath::new("blog/a.html"), b"a").is_err());
        assert!(output.create_file(&ContentPath::new("blog/a.html"), b"a").is_err());
        assert_eq!(fs.folder_creations(Path::new("/out/blog")), 2);
    }

    #[test]
    fn test_local_copy_onto_itself_is_rejected() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("style.css");
        fs::write(&file, "body {}").unwrap();

        let err = LocalFileSystem.copy_file(&file, &file).unwrap_err();

        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
        assert_eq!(fs::read_to_string(&file).unwrap(), "body {}");
    }

    #[test]
    fn test_output_folder_target() {
        let output = OutputFolder::local("/out");
        assert_eq!(
            output.target(&ContentPath::new("blog/post/index.html")),
            PathBuf::from("/out/blog/post/index.html")
        );
    }

    #[test]
    fn test_local_file_system_round_trip() {
        let dir = TempDir::new().unwrap();
        let output = OutputFolder::local(dir.path());

        let written = output
            .create_file(&ContentPath::new("a/b/c.html"), b"<p>hi</p>")
            .unwrap();
        assert_eq!(fs::read_to_string(written).unwrap(), "<p>hi</p>");

        let files = LocalFileSystem.list_files(dir.path()).unwrap();
        assert_eq!(files, vec![PathBuf::from("a/b/c.html")]);
        assert!(LocalFileSystem.is_folder(&dir.path().join("a/b")));
    }
}
