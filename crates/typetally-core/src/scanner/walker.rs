/// Directory walker built on `jwalk`.
///
/// Produces a lazy, single-pass stream of regular-file paths under a
/// validated root. Directories are descended but not yielded. Sockets,
/// device nodes, FIFOs and (unless `follow_links` is set) symbolic links are
/// silently ignored.
///
/// Entries that cannot be read (permission denied on a directory, a
/// symbolic link that loops back to an ancestor, an entry that vanished
/// mid-listing) become [`WalkEntry::Skipped`] and the walk carries on.
///
/// Entries are sorted by name within each directory so two walks of an
/// unchanged tree visit files in the same order.
use crate::error::{RunError, SkipReason, SkippedEntry};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::trace;

/// One item produced by the walker.
#[derive(Debug)]
pub enum WalkEntry {
    /// A regular file, to be stat'ed and classified.
    File(PathBuf),
    /// An entry the walker could not read.
    Skipped(SkippedEntry),
}

/// A validated walk, ready to be started on any thread.
///
/// Construction checks the root; iteration happens in [`Walk::entries`].
#[derive(Debug, Clone)]
pub struct Walk {
    root: PathBuf,
    follow_links: bool,
    threads: usize,
}

impl Walk {
    /// Validate `root` and prepare a walk over it.
    ///
    /// `threads` sets `jwalk`'s directory-reading parallelism; `1` reads
    /// directories serially on the iterating thread.
    pub fn new(root: impl Into<PathBuf>, follow_links: bool, threads: usize) -> Result<Self, RunError> {
        let root = root.into();
        validate_root(&root)?;
        Ok(Self {
            root,
            follow_links,
            threads: threads.max(1),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Start walking. Each call begins a fresh traversal.
    pub fn entries(&self) -> impl Iterator<Item = WalkEntry> {
        let parallelism = if self.threads <= 1 {
            jwalk::Parallelism::Serial
        } else {
            jwalk::Parallelism::RayonNewPool(self.threads)
        };

        let mut walk = jwalk::WalkDirGeneric::<WalkState>::new(&self.root)
            .skip_hidden(false)
            .follow_links(self.follow_links)
            .sort(true)
            .parallelism(parallelism);
        if self.follow_links {
            walk = walk.process_read_dir(mark_link_cycles);
        }
        walk.into_iter().filter_map(to_walk_entry)
    }
}

/// Canonical paths of the directory being read and all of its ancestors.
/// `jwalk` hands a copy down to every child directory read.
type Ancestors = Vec<PathBuf>;

/// Set on a followed link that resolves to one of its ancestors.
type CycleTarget = Option<PathBuf>;

type WalkState = (Ancestors, CycleTarget);

type JwalkEntry = jwalk::DirEntry<WalkState>;

/// Stop descent into links that lead back up the tree.
///
/// `jwalk`'s own check compares raw link text against ancestor paths, which
/// misses relative targets such as `..`. Comparing canonical paths catches
/// every spelling of the same directory.
fn mark_link_cycles(
    depth: Option<usize>,
    dir: &Path,
    ancestors: &mut Ancestors,
    children: &mut Vec<Result<JwalkEntry, jwalk::Error>>,
) {
    // The pseudo-read that produces the root entry has no ancestors yet.
    if depth.is_none() {
        return;
    }
    match fs::canonicalize(dir) {
        Ok(canonical) => ancestors.push(canonical),
        Err(err) => {
            trace!("Cannot resolve {}: {err}", dir.display());
            return;
        }
    }

    for child in children.iter_mut().flatten() {
        if child.read_children_path.is_none() {
            continue;
        }
        let path = child.path();
        let is_link = fs::symlink_metadata(&path)
            .map(|meta| meta.file_type().is_symlink())
            .unwrap_or(false);
        if !is_link {
            continue;
        }
        if let Ok(target) = fs::canonicalize(&path) {
            if ancestors.contains(&target) {
                child.read_children_path = None;
                child.client_state = Some(target);
            }
        }
    }
}

fn to_walk_entry(result: Result<JwalkEntry, jwalk::Error>) -> Option<WalkEntry> {
    let entry = match result {
        Ok(entry) => entry,
        Err(err) => {
            let path = err.path().map(Path::to_path_buf).unwrap_or_default();
            return Some(WalkEntry::Skipped(SkippedEntry::new(
                path,
                SkipReason::Walk(err.to_string()),
            )));
        }
    };

    if let Some(target) = &entry.client_state {
        return Some(WalkEntry::Skipped(SkippedEntry::new(
            entry.path(),
            SkipReason::LinkCycle(target.clone()),
        )));
    }

    let file_type = entry.file_type();
    if file_type.is_file() {
        return Some(WalkEntry::File(entry.path()));
    }
    if file_type.is_dir() {
        // A directory that could not be listed arrives as `Ok` with the
        // listing failure attached.
        return entry.read_children_error.as_ref().map(|err| {
            WalkEntry::Skipped(SkippedEntry::new(
                entry.path(),
                SkipReason::Walk(err.to_string()),
            ))
        });
    }
    trace!("Ignoring non-regular entry {}", entry.path().display());
    None
}

/// The root must exist, be a directory, and be listable.
pub fn validate_root(root: &Path) -> Result<(), RunError> {
    let meta = match fs::metadata(root) {
        Ok(meta) => meta,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Err(RunError::RootNotFound {
                path: root.to_path_buf(),
            })
        }
        Err(source) => {
            return Err(RunError::RootUnreadable {
                path: root.to_path_buf(),
                source,
            })
        }
    };
    if !meta.is_dir() {
        return Err(RunError::RootNotDirectory {
            path: root.to_path_buf(),
        });
    }
    fs::read_dir(root).map_err(|source| RunError::RootUnreadable {
        path: root.to_path_buf(),
        source,
    })?;
    Ok(())
}
