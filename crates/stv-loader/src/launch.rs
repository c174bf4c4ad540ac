//! Launch sequencing.
//!
//! `launch` drives the one-way sequence: mount, enter the game directory,
//! load the BIOS, load every regular file in enumeration order into the
//! cartridge space, switch the ports to direct I/O, and hand execution to
//! the BIOS entry point. Each step short-circuits on failure with a single
//! logged diagnostic.

use std::fmt;

use log::{debug, error, info};
use stv_core::{Bus, Volume, map};

use crate::loader::{LoadCursor, LoadError, load_file};

/// Launch state machine.
///
/// `HandoffExecuted` is terminal: on hardware it is never observed because
/// `Bus::transfer_control` does not return. `Aborted` is reachable from
/// every other state; the reason travels in the returned [`LaunchError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchState {
    Idle,
    Mounted,
    DirectorySet,
    BootLoaded,
    DirectoryOpen,
    GamesLoading,
    IoConfigured,
    HandoffExecuted,
    Aborted,
}

/// Why a launch aborted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchError {
    MountFailed,
    DirectoryNotFound(String),
    BiosLoad(LoadError),
    GameDirOpen,
    GameLoad(LoadError),
}

impl fmt::Display for LaunchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MountFailed => write!(f, "volume mount failed"),
            Self::DirectoryNotFound(path) => write!(f, "directory not found: {path}"),
            Self::BiosLoad(err) => write!(f, "BIOS load failed: {err}"),
            Self::GameDirOpen => write!(f, "cannot open game directory"),
            Self::GameLoad(err) => write!(f, "game load failed: {err}"),
        }
    }
}

impl std::error::Error for LaunchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::BiosLoad(err) | Self::GameLoad(err) => Some(err),
            _ => None,
        }
    }
}

/// Launch driver. Holds the state machine so the sequence is observable.
pub struct Launcher {
    state: LaunchState,
}

impl Launcher {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: LaunchState::Idle,
        }
    }

    /// Current state of the launch sequence.
    #[must_use]
    pub fn state(&self) -> LaunchState {
        self.state
    }

    /// Run the full launch sequence.
    ///
    /// On real hardware a successful launch diverges inside
    /// `Bus::transfer_control` and `Ok(())` is never observed; a simulated
    /// bus records the jump and returns. After an `Err` the destination
    /// memory is in an undefined partial state — do not retry without a
    /// reset.
    ///
    /// # Errors
    ///
    /// One [`LaunchError`] per failed step; the first failure aborts the
    /// whole sequence.
    pub fn launch(
        &mut self,
        volume: &mut impl Volume,
        bus: &mut impl Bus,
        bios_path: &str,
        game_dir: &str,
    ) -> Result<(), LaunchError> {
        let result = self.run(volume, bus, bios_path, game_dir);
        if let Err(ref err) = result {
            error!("launch aborted: {err}");
            self.state = LaunchState::Aborted;
        }
        result
    }

    fn run(
        &mut self,
        volume: &mut impl Volume,
        bus: &mut impl Bus,
        bios_path: &str,
        game_dir: &str,
    ) -> Result<(), LaunchError> {
        if !volume.mount() {
            return Err(LaunchError::MountFailed);
        }
        self.state = LaunchState::Mounted;

        if !volume.change_dir(game_dir) {
            return Err(LaunchError::DirectoryNotFound(game_dir.to_string()));
        }
        self.state = LaunchState::DirectorySet;

        let bios_size = load_file(volume, bus, bios_path, map::BIOS_ADDR)
            .map_err(LaunchError::BiosLoad)?;
        info!("BIOS loaded: {bios_size} bytes at {:08X}", map::BIOS_ADDR);
        self.state = LaunchState::BootLoaded;

        if !volume.open_dir(".") {
            return Err(LaunchError::GameDirOpen);
        }
        self.state = LaunchState::DirectoryOpen;

        self.state = LaunchState::GamesLoading;
        let mut cursor = LoadCursor::new(map::CART_BASE);
        while let Some(entry) = volume.next_entry() {
            if entry.is_dir {
                continue;
            }
            let size = load_file(volume, bus, &entry.name, cursor.address())
                .map_err(LaunchError::GameLoad)?;
            debug!("{}: {size} bytes at {:08X}", entry.name, cursor.address());
            cursor.advance(size);
        }
        info!(
            "ROM set loaded: {} bytes at {:08X}",
            cursor.address() - map::CART_BASE,
            map::CART_BASE
        );

        sega_smpc::configure_direct_io(bus);
        self.state = LaunchState::IoConfigured;

        info!("handing off to {:08X}", map::BIOS_ADDR);
        self.state = LaunchState::HandoffExecuted;
        sega_smpc::handoff(bus, map::BIOS_ADDR);
        Ok(())
    }
}

impl Default for Launcher {
    fn default() -> Self {
        Self::new()
    }
}

/// One-shot launch without keeping the state machine around.
///
/// # Errors
///
/// See [`Launcher::launch`].
pub fn launch(
    volume: &mut impl Volume,
    bus: &mut impl Bus,
    bios_path: &str,
    game_dir: &str,
) -> Result<(), LaunchError> {
    Launcher::new().launch(volume, bus, bios_path, game_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use stv_core::{SimBus, SimVolume};

    fn game_volume() -> SimVolume {
        let mut volume = SimVolume::new();
        volume.add_dir("STV/GAME");
        volume.add_unlisted_file("bios.bin", vec![0xB1; 0x100]);
        volume.add_file("ic22.bin", vec![1; 0x20]);
        volume.add_subdir("save");
        volume.add_file("ic24.bin", vec![2; 0x11]);
        volume.add_file("ic26.bin", vec![3; 0x40]);
        volume
    }

    #[test]
    fn full_launch_reaches_handoff() {
        let mut volume = game_volume();
        let mut bus = SimBus::new();
        let mut launcher = Launcher::new();
        launcher
            .launch(&mut volume, &mut bus, "bios.bin", "STV/GAME")
            .expect("launch should succeed");

        assert_eq!(launcher.state(), LaunchState::HandoffExecuted);
        assert!(bus.interrupts_disabled());
        assert_eq!(bus.jump_target(), Some(map::BIOS_ADDR));
        // BIOS at its fixed address, ROMs packed from the cartridge base
        assert_eq!(bus.memory(map::BIOS_ADDR, 1), vec![0xB1]);
        assert_eq!(bus.memory(map::CART_BASE, 1), vec![1]);
    }

    #[test]
    fn files_pack_in_enumeration_order_with_even_alignment() {
        let mut volume = game_volume();
        let mut bus = SimBus::new();
        launch(&mut volume, &mut bus, "bios.bin", "STV/GAME").expect("launch should succeed");

        // ic22 (0x20) at base, ic24 (0x11 → 0x12) next, ic26 after that
        assert_eq!(bus.memory(map::CART_BASE, 1), vec![1]);
        assert_eq!(bus.memory(map::CART_BASE + 0x20, 1), vec![2]);
        assert_eq!(bus.memory(map::CART_BASE + 0x20 + 0x12, 1), vec![3]);
    }

    #[test]
    fn directories_are_skipped_not_loaded() {
        let mut volume = game_volume();
        let mut bus = SimBus::new();
        launch(&mut volume, &mut bus, "bios.bin", "STV/GAME").expect("launch should succeed");

        // bios + three ROM files; the "save" subdirectory is never opened
        assert_eq!(
            volume.opened(),
            ["bios.bin", "ic22.bin", "ic24.bin", "ic26.bin"]
        );
    }

    #[test]
    fn mount_failure_aborts_before_any_open() {
        let mut volume = game_volume();
        volume.fail_mount();
        let mut bus = SimBus::new();
        let mut launcher = Launcher::new();
        let err = launcher
            .launch(&mut volume, &mut bus, "bios.bin", "STV/GAME")
            .expect_err("mount should fail");

        assert_eq!(err, LaunchError::MountFailed);
        assert_eq!(launcher.state(), LaunchState::Aborted);
        assert!(volume.opened().is_empty());
        assert!(!bus.memory_touched(map::BIOS_ADDR, 0x100));
    }

    #[test]
    fn unknown_directory_aborts_before_bios_load() {
        let mut volume = game_volume();
        let mut bus = SimBus::new();
        let err = launch(&mut volume, &mut bus, "bios.bin", "STV/NOPE")
            .expect_err("chdir should fail");

        assert_eq!(err, LaunchError::DirectoryNotFound("STV/NOPE".to_string()));
        assert!(volume.opened().is_empty());
        assert!(!bus.memory_touched(map::BIOS_ADDR, 0x100));
    }

    #[test]
    fn directory_open_failure_aborts_after_bios() {
        let mut volume = game_volume();
        volume.fail_open_dir();
        let mut bus = SimBus::new();
        let mut launcher = Launcher::new();
        let err = launcher
            .launch(&mut volume, &mut bus, "bios.bin", "STV/GAME")
            .expect_err("open_dir should fail");

        assert_eq!(err, LaunchError::GameDirOpen);
        assert_eq!(launcher.state(), LaunchState::Aborted);
        // The BIOS made it in; nothing reached the cartridge space
        assert!(bus.memory_touched(map::BIOS_ADDR, 0x100));
        assert!(!bus.memory_touched(map::CART_BASE, 0x100));
        assert_eq!(bus.jump_target(), None);
    }

    #[test]
    fn game_open_failure_keeps_earlier_files() {
        let mut volume = SimVolume::new();
        volume.add_dir("STV/GAME");
        volume.add_unlisted_file("bios.bin", vec![0xB1; 0x100]);
        volume.add_file("ic22.bin", vec![1; 0x20]);
        volume.add_file("ic24.bin", vec![2; 0x20]);
        // Listed but not openable
        volume.add_missing_file("ic26.bin");

        let mut bus = SimBus::new();
        let err = launch(&mut volume, &mut bus, "bios.bin", "STV/GAME")
            .expect_err("third file should fail to open");

        assert_eq!(err, LaunchError::GameLoad(LoadError::Open("ic26.bin".to_string())));
        // The two loaded files stay populated (non-transactional)
        assert_eq!(bus.memory(map::CART_BASE, 1), vec![1]);
        assert_eq!(bus.memory(map::CART_BASE + 0x20, 1), vec![2]);
        assert_eq!(bus.jump_target(), None);
    }

    #[test]
    fn missing_bios_aborts() {
        let mut volume = SimVolume::new();
        volume.add_dir("STV/GAME");
        let mut bus = SimBus::new();
        let err = launch(&mut volume, &mut bus, "bios.bin", "STV/GAME")
            .expect_err("bios open should fail");
        assert_eq!(err, LaunchError::BiosLoad(LoadError::Open("bios.bin".to_string())));
    }

    #[test]
    fn empty_game_directory_still_hands_off() {
        let mut volume = SimVolume::new();
        volume.add_dir("STV/GAME");
        volume.add_unlisted_file("bios.bin", vec![0xB1; 0x10]);
        let mut bus = SimBus::new();
        launch(&mut volume, &mut bus, "bios.bin", "STV/GAME").expect("launch should succeed");
        assert_eq!(bus.jump_target(), Some(map::BIOS_ADDR));
    }
}
