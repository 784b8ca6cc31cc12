use std::path::{Path, PathBuf};

use crate::data::loader;

/// A file the user added to the session.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedFile {
    pub id: u64,
    pub path: PathBuf,
    pub name: String,
}

/// The files currently uploaded, in upload order.
///
/// Ids are never reused within a session, so settings keyed by id cannot
/// leak onto a file that is removed and added again.
#[derive(Debug, Default)]
pub struct UploadSet {
    files: Vec<UploadedFile>,
    next_id: u64,
    /// Bumped on every change so the pipeline knows when to reload.
    revision: u64,
}

impl UploadSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file. Returns `false` if the same path is already uploaded.
    pub fn add(&mut self, path: &Path) -> bool {
        if self.files.iter().any(|f| f.path == path) {
            return false;
        }
        self.next_id += 1;
        self.files.push(UploadedFile {
            id: self.next_id,
            path: path.to_path_buf(),
            name: loader::source_name(path),
        });
        self.revision += 1;
        true
    }

    pub fn remove(&mut self, id: u64) {
        let before = self.files.len();
        self.files.retain(|f| f.id != id);
        if self.files.len() != before {
            self.revision += 1;
        }
    }

    pub fn clear(&mut self) {
        if !self.files.is_empty() {
            self.files.clear();
            self.revision += 1;
        }
    }

    pub fn files(&self) -> &[UploadedFile] {
        &self.files
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Position of a file in upload order, used for default colors.
    pub fn upload_index(&self, id: u64) -> Option<usize> {
        self.files.iter().position(|f| f.id == id)
    }
}
