//! Host-filesystem volume.
//!
//! Backs the [`Volume`] interface with `std::fs` so the launch sequence can
//! run against a directory tree on a development machine. This is a test
//! and demo stand-in, not the FAT driver the firmware uses.

use std::collections::VecDeque;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use stv_core::{DirEntry, FileId, ReadFault, Volume};

/// `std::fs`-backed volume rooted at a directory.
pub struct HostVolume {
    root: PathBuf,
    cwd: PathBuf,
    listing: VecDeque<DirEntry>,
    open_files: Vec<(FileId, File)>,
    next_id: u32,
}

impl HostVolume {
    /// Create a volume rooted at `root`. Nothing is checked until `mount`.
    #[must_use]
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            cwd: root.to_path_buf(),
            listing: VecDeque::new(),
            open_files: Vec::new(),
            next_id: 1,
        }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        let trimmed = path.trim_start_matches('/');
        if trimmed == "." {
            self.cwd.clone()
        } else {
            self.cwd.join(trimmed)
        }
    }
}

impl Volume for HostVolume {
    fn mount(&mut self) -> bool {
        self.cwd = self.root.clone();
        self.root.is_dir()
    }

    fn change_dir(&mut self, path: &str) -> bool {
        let target = self.root.join(path.trim_start_matches('/'));
        if target.is_dir() {
            self.cwd = target;
            true
        } else {
            false
        }
    }

    fn open_dir(&mut self, path: &str) -> bool {
        let Ok(entries) = std::fs::read_dir(self.resolve(path)) else {
            return false;
        };
        self.listing.clear();
        for entry in entries.flatten() {
            let name = entry.file_name().to_string_lossy().into_owned();
            let is_dir = entry.file_type().is_ok_and(|t| t.is_dir());
            self.listing.push_back(DirEntry { name, is_dir });
        }
        true
    }

    fn next_entry(&mut self) -> Option<DirEntry> {
        self.listing.pop_front()
    }

    fn open(&mut self, name: &str) -> Option<FileId> {
        let file = File::open(self.resolve(name)).ok()?;
        let id = FileId(self.next_id);
        self.next_id += 1;
        self.open_files.push((id, file));
        Some(id)
    }

    fn read_chunk(&mut self, file: FileId, buf: &mut [u8]) -> Result<usize, ReadFault> {
        let (_, handle) = self
            .open_files
            .iter_mut()
            .find(|(id, _)| *id == file)
            .ok_or(ReadFault)?;

        // Fill the buffer completely unless the file ends: a short chunk
        // means end of file to the loader, so partial reads must be retried.
        let mut filled = 0;
        while filled < buf.len() {
            match handle.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(err) if err.kind() == std::io::ErrorKind::Interrupted => {}
                Err(_) => return Err(ReadFault),
            }
        }
        Ok(filled)
    }

    fn close(&mut self, file: FileId) {
        self.open_files.retain(|(id, _)| *id != file);
    }
}
