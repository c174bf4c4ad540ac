//! ST-V loader: copies a BIOS image and a directory of ROM files from the
//! storage volume into fixed physical memory, then hands execution to the
//! loaded image.
//!
//! The whole load phase is synchronous and single-threaded. Failures abort
//! the launch with one diagnostic and no rollback — memory already written
//! stays written, and a file that fails mid-read leaves its destination
//! region partially populated. Callers must treat a failed launch as
//! "memory contaminated" and reset before retrying.

mod launch;
mod loader;

pub use launch::{Launcher, LaunchError, LaunchState, launch};
pub use loader::{LoadCursor, LoadError, load_file};
