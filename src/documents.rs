// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const EXTENSION: &str = "png";

/// Binary documents keyed by the owning record's id, one file per record.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    dir: PathBuf,
}

impl DocumentStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, id: i64) -> PathBuf {
        self.dir.join(format!("{}.{}", id, EXTENSION))
    }

    pub fn store(&self, id: i64, content: &[u8]) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path_for(id), content)
    }

    pub fn retrieve(&self, id: i64) -> io::Result<Vec<u8>> {
        fs::read(self.path_for(id))
    }

    pub fn delete(&self, id: i64) -> io::Result<()> {
        fs::remove_file(self.path_for(id))
    }

    /// Moves the document aside so its removal can still be undone.
    /// `Ok(None)` when there is no document.
    pub fn stage_removal(&self, id: i64) -> io::Result<Option<PathBuf>> {
        let staged = self.dir.join(format!("{}.{}.removing", id, EXTENSION));
        match fs::rename(self.path_for(id), &staged) {
            Ok(()) => Ok(Some(staged)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub fn restore(&self, id: i64, staged: &Path) -> io::Result<()> {
        fs::rename(staged, self.path_for(id))
    }

    pub fn purge(&self, staged: &Path) -> io::Result<()> {
        fs::remove_file(staged)
    }
}
