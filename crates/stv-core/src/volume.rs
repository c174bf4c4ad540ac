//! Storage collaborator interface.
//!
//! A thin view of the FAT driver: mount, directory navigation, sequential
//! entry enumeration, and chunked reads from open files. The loader is the
//! only consumer. Enumeration order is whatever the filesystem yields —
//! not sorted, and not guaranteed stable if the volume's own metadata
//! reorders entries.

use std::fmt;

/// One directory entry, produced transiently during enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub is_dir: bool,
}

impl DirEntry {
    #[must_use]
    pub fn file(name: &str) -> Self {
        Self {
            name: name.to_string(),
            is_dir: false,
        }
    }

    #[must_use]
    pub fn dir(name: &str) -> Self {
        Self {
            name: name.to_string(),
            is_dir: true,
        }
    }
}

/// Handle to a file opened for reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileId(pub u32);

/// Device-level read failure on an open file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadFault;

impl fmt::Display for ReadFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "device read fault")
    }
}

impl std::error::Error for ReadFault {}

/// Mounted-volume operations consumed by the loader.
///
/// All calls block until they complete or fail. `mount` must succeed
/// before anything else is meaningful.
pub trait Volume {
    /// Mount the volume. Returns false on any underlying failure.
    fn mount(&mut self) -> bool;

    /// Set the active directory for subsequent opens and enumeration.
    /// Returns false if the path does not resolve to a directory.
    fn change_dir(&mut self, path: &str) -> bool;

    /// Open a directory for enumeration. Returns false on failure.
    fn open_dir(&mut self, path: &str) -> bool;

    /// Next entry of the directory opened by `open_dir`, or `None` at the
    /// end. Subdirectories are surfaced; callers skip them.
    fn next_entry(&mut self) -> Option<DirEntry>;

    /// Open the named file in the active directory for reading.
    fn open(&mut self, name: &str) -> Option<FileId>;

    /// Read up to `buf.len()` bytes from the open file. Returns the number
    /// of bytes read; fewer than requested means end of file.
    fn read_chunk(&mut self, file: FileId, buf: &mut [u8]) -> Result<usize, ReadFault>;

    /// Close an open file. Closing an already-closed handle is a no-op.
    fn close(&mut self, file: FileId);
}

/// Scripted in-memory volume for tests.
///
/// Entries enumerate in insertion order. Read faults can be injected per
/// file after a given number of successful chunks.
pub struct SimVolume {
    mount_ok: bool,
    dirs: Vec<String>,
    entries: Vec<DirEntry>,
    dir_open_ok: bool,
    cursor: Option<usize>,
    files: Vec<SimFile>,
    open_files: Vec<OpenFile>,
    next_id: u32,
    opened: Vec<String>,
}

struct SimFile {
    name: String,
    data: Vec<u8>,
    /// Chunks that succeed before a fault is reported, if any.
    fault_after: Option<usize>,
}

struct OpenFile {
    id: FileId,
    file: usize,
    pos: usize,
    chunks: usize,
}

impl SimVolume {
    #[must_use]
    pub fn new() -> Self {
        Self {
            mount_ok: true,
            dirs: Vec::new(),
            entries: Vec::new(),
            dir_open_ok: true,
            cursor: None,
            files: Vec::new(),
            open_files: Vec::new(),
            next_id: 1,
            opened: Vec::new(),
        }
    }

    /// Make `mount` fail.
    pub fn fail_mount(&mut self) {
        self.mount_ok = false;
    }

    /// Make `open_dir` fail.
    pub fn fail_open_dir(&mut self) {
        self.dir_open_ok = false;
    }

    /// Register a directory path that `change_dir` resolves.
    pub fn add_dir(&mut self, path: &str) {
        self.dirs.push(path.to_string());
    }

    /// Add a subdirectory to the enumeration listing.
    pub fn add_subdir(&mut self, name: &str) {
        self.entries.push(DirEntry::dir(name));
    }

    /// Register a file with the given contents, listed in the enumeration.
    pub fn add_file(&mut self, name: &str, data: Vec<u8>) {
        self.entries.push(DirEntry::file(name));
        self.files.push(SimFile {
            name: name.to_string(),
            data,
            fault_after: None,
        });
    }

    /// Register an openable file that does not appear in the enumeration
    /// (e.g. a BIOS image addressed by path rather than listed).
    pub fn add_unlisted_file(&mut self, name: &str, data: Vec<u8>) {
        self.files.push(SimFile {
            name: name.to_string(),
            data,
            fault_after: None,
        });
    }

    /// List a file in the enumeration without any backing contents, so
    /// opening it fails.
    pub fn add_missing_file(&mut self, name: &str) {
        self.entries.push(DirEntry::file(name));
    }

    /// Register a file whose reads fault after `chunks` successful chunks.
    pub fn add_faulty_file(&mut self, name: &str, data: Vec<u8>, chunks: usize) {
        self.entries.push(DirEntry::file(name));
        self.files.push(SimFile {
            name: name.to_string(),
            data,
            fault_after: Some(chunks),
        });
    }

    /// Names passed to `open`, in call order.
    #[must_use]
    pub fn opened(&self) -> &[String] {
        &self.opened
    }
}

impl Default for SimVolume {
    fn default() -> Self {
        Self::new()
    }
}

impl Volume for SimVolume {
    fn mount(&mut self) -> bool {
        self.mount_ok
    }

    fn change_dir(&mut self, path: &str) -> bool {
        self.mount_ok && self.dirs.iter().any(|d| d == path)
    }

    fn open_dir(&mut self, _path: &str) -> bool {
        if self.dir_open_ok {
            self.cursor = Some(0);
        }
        self.dir_open_ok
    }

    fn next_entry(&mut self) -> Option<DirEntry> {
        let index = self.cursor?;
        let entry = self.entries.get(index).cloned()?;
        self.cursor = Some(index + 1);
        Some(entry)
    }

    fn open(&mut self, name: &str) -> Option<FileId> {
        self.opened.push(name.to_string());
        let file = self.files.iter().position(|f| f.name == name)?;
        let id = FileId(self.next_id);
        self.next_id += 1;
        self.open_files.push(OpenFile {
            id,
            file,
            pos: 0,
            chunks: 0,
        });
        Some(id)
    }

    fn read_chunk(&mut self, file: FileId, buf: &mut [u8]) -> Result<usize, ReadFault> {
        let open = self
            .open_files
            .iter_mut()
            .find(|o| o.id == file)
            .ok_or(ReadFault)?;
        let spec = &self.files[open.file];
        if let Some(limit) = spec.fault_after {
            if open.chunks >= limit {
                return Err(ReadFault);
            }
        }
        let remaining = &spec.data[open.pos..];
        let n = remaining.len().min(buf.len());
        buf[..n].copy_from_slice(&remaining[..n]);
        open.pos += n;
        open.chunks += 1;
        Ok(n)
    }

    fn close(&mut self, file: FileId) {
        self.open_files.retain(|o| o.id != file);
    }
}
