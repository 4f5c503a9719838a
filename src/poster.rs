//! Poster resolution with one-shot fallback handling.
//!
//! A poster "loads" when its file is present and non-empty; a zero-byte file
//! counts as a failed load the same way an image that decoded to zero height
//! would. The first failure swaps in the configured fallback and marks the
//! slot broken; later failures on the same slot are ignored, so a fallback
//! that itself fails to load cannot re-trigger the handler.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Outcome of probing a poster source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Probe {
    Ok,
    /// No file at the source path.
    Missing,
    /// File exists but is zero bytes.
    Empty,
}

/// Display status of a poster slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PosterStatus {
    Ok,
    /// Load failed at least once; rendered with the broken style.
    Broken,
}

/// Mutable poster slot for one movie.
#[derive(Debug, Clone)]
pub struct PosterSlot {
    /// Currently effective source: the primary until an error, the fallback after.
    pub src: Option<String>,
    pub fallback: Option<String>,
    pub status: PosterStatus,
    /// Set by the first error; all later errors are no-ops.
    handled: bool,
}

impl PosterSlot {
    pub fn new(src: Option<String>, fallback: Option<String>) -> Self {
        Self {
            src,
            fallback,
            status: PosterStatus::Ok,
            handled: false,
        }
    }

    /// One-shot load-error handler: swaps in the fallback when configured and
    /// marks the slot broken. Idempotent after the first call.
    pub fn mark_error(&mut self) {
        if self.handled {
            return;
        }
        self.handled = true;

        if let Some(fallback) = &self.fallback {
            self.src = Some(fallback.clone());
        }
        self.status = PosterStatus::Broken;
    }

    /// True once the fallback has been substituted for the primary source.
    pub fn fallback_applied(&self) -> bool {
        self.handled && self.fallback.is_some()
    }
}

/// Poster slots for the whole catalog, in movie order.
pub struct Gallery {
    slots: Vec<PosterSlot>,
}

impl Gallery {
    /// Builds one slot per movie and runs the eager check: slots without a
    /// source, or whose source fails the probe, get the error handler applied
    /// immediately.
    pub fn build<P>(posters: &[(Option<String>, Option<String>)], mut probe: P) -> Self
    where
        P: FnMut(&str) -> Probe,
    {
        let mut slots: Vec<PosterSlot> = posters
            .iter()
            .map(|(src, fallback)| PosterSlot::new(src.clone(), fallback.clone()))
            .collect();

        for slot in &mut slots {
            match &slot.src {
                None => slot.mark_error(),
                Some(src) => {
                    if probe(src) != Probe::Ok {
                        slot.mark_error();
                    }
                }
            }
        }

        Self { slots }
    }

    pub fn empty() -> Self {
        Self { slots: Vec::new() }
    }

    pub fn slot(&self, idx: usize) -> Option<&PosterSlot> {
        self.slots.get(idx)
    }

    pub fn slot_mut(&mut self, idx: usize) -> Option<&mut PosterSlot> {
        self.slots.get_mut(idx)
    }

    pub fn broken_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| slot.status == PosterStatus::Broken)
            .count()
    }
}

/// Probe backed by a single scan of a posters directory.
///
/// Sources are keyed by their path relative to the scanned root, so catalog
/// entries like `"posters/1.jpg"` resolve without touching the filesystem
/// again per movie.
pub struct DirProbe {
    files: foldhash::HashMap<String, u64>,
}

impl DirProbe {
    pub fn scan(dir: &Path) -> Self {
        let mut files = foldhash::HashMap::default();
        for entry in WalkDir::new(dir).into_iter().filter_map(|e| e.ok()) {
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(dir) else {
                continue;
            };
            let len = entry.metadata().map(|m| m.len()).unwrap_or(0);
            files.insert(relative.to_string_lossy().replace('\\', "/"), len);
        }
        Self { files }
    }

    pub fn probe(&self, src: &str) -> Probe {
        match self.files.get(src) {
            None => Probe::Missing,
            Some(0) => Probe::Empty,
            Some(_) => Probe::Ok,
        }
    }
}

/// Probe for the no-directory case: stats `src` relative to `base`.
pub fn fs_probe(base: &Path, src: &str) -> Probe {
    let path: PathBuf = base.join(src);
    match fs::metadata(&path) {
        Err(_) => Probe::Missing,
        Ok(meta) if meta.len() == 0 => Probe::Empty,
        Ok(_) => Probe::Ok,
    }
}
