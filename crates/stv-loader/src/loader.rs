//! File-to-memory copy.
//!
//! Files are read in 4096-byte chunks straight into successive physical
//! addresses. A short chunk marks end of file. The reported size is rounded
//! up to the next even number — the destination memory is 16-bit, so an
//! odd-length file occupies one implicit pad byte.

use std::fmt;

use stv_core::{Bus, Volume, map};

/// A file-load failure. The destination region is left as written so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// The named file does not exist or could not be opened.
    Open(String),
    /// A device read failed mid-file.
    Read(String),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open(name) => write!(f, "cannot open {name}"),
            Self::Read(name) => write!(f, "read failed on {name}"),
        }
    }
}

impl std::error::Error for LoadError {}

/// Copy the named file into physical memory at `address`.
///
/// Returns the number of bytes copied, rounded up to even.
///
/// # Errors
///
/// [`LoadError::Open`] if the file cannot be opened, [`LoadError::Read`] on
/// a device fault mid-file. Either way nothing already written is undone.
pub fn load_file(
    volume: &mut impl Volume,
    bus: &mut impl Bus,
    name: &str,
    address: u32,
) -> Result<u32, LoadError> {
    let Some(file) = volume.open(name) else {
        return Err(LoadError::Open(name.to_string()));
    };

    let mut buf = [0u8; map::LOAD_CHUNK];
    let mut copied = 0u32;
    loop {
        let n = match volume.read_chunk(file, &mut buf) {
            Ok(n) => n,
            Err(_) => {
                volume.close(file);
                return Err(LoadError::Read(name.to_string()));
            }
        };
        bus.write_block(address + copied, &buf[..n]);
        copied += n as u32;
        if n < map::LOAD_CHUNK {
            break;
        }
    }
    volume.close(file);

    Ok((copied + 1) & !1)
}

/// Physical-address cursor for sequentially loaded ROM files.
///
/// Advances monotonically; each file occupies a disjoint, contiguous,
/// even-aligned region. There is no capacity bound against the end of the
/// cartridge address space — the volume's contents are trusted to fit.
#[derive(Debug, Clone, Copy)]
pub struct LoadCursor {
    address: u32,
}

impl LoadCursor {
    #[must_use]
    pub const fn new(base: u32) -> Self {
        Self { address: base }
    }

    /// Destination address for the next file.
    #[must_use]
    pub const fn address(self) -> u32 {
        self.address
    }

    /// Advance past a loaded file of the given (even-rounded) size.
    pub fn advance(&mut self, size: u32) {
        self.address += size;
    }
}
