//! Save reconciler module.
//!
//! DOOM writes its save games into the engine's private filesystem, which
//! evaporates with the process. This module keeps up to six save slots
//! synchronized with durable files on disk: durable copies are preloaded
//! into the private filesystem before the engine starts, and the private
//! copies are written back to disk on an interval and at shutdown.
//!
//! The engine's save location inside the private filesystem depends on its
//! configuration and is not reliably known in advance, so `sync` probes a
//! fixed list of candidate directories and takes the first non-empty match
//! per slot. Stale data in an earlier candidate can shadow a later one;
//! this is carried-over observed behavior, not a guaranteed contract.

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use thiserror::Error;

use tui_doom_engine::Vfs;
use tui_doom_types::{save_slot_file_name, MAX_SAVE_SLOTS};

/// Candidate private-filesystem directories, probed in this order.
pub const VFS_CANDIDATE_DIRS: [&str; 5] = ["/", "/doom", "/home/web_user", "/root", "/tmp"];

/// Per-slot save failure.
#[derive(Debug, Error)]
pub enum SaveError {
    /// Programmer error: slot outside 0..=5. Rejected before any I/O.
    #[error("invalid save slot {0} (valid slots are 0..=5)")]
    InvalidSlot(u8),

    /// Read/write failure for one slot; other slots are unaffected.
    #[error("save slot {slot} I/O failed: {source}")]
    Io {
        slot: u8,
        #[source]
        source: io::Error,
    },
}

/// Outcome of one reconciliation pass.
#[derive(Debug, Default)]
pub struct SyncReport {
    /// Slots whose durable copy was (re)written.
    pub synced: Vec<u8>,
    /// Per-slot failures; sync continues past them.
    pub errors: Vec<SaveError>,
}

/// Resolve the durable save directory, creating it if missing.
///
/// `DOOM_SAVE_DIR` overrides the default `$HOME/.opentui-doom`.
pub fn resolve_save_dir() -> io::Result<PathBuf> {
    let dir = match env::var("DOOM_SAVE_DIR") {
        Ok(v) if !v.trim().is_empty() => PathBuf::from(v),
        _ => {
            let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
            Path::new(&home).join(".opentui-doom")
        }
    };
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

fn validate_slot(slot: u8) -> Result<(), SaveError> {
    if slot >= MAX_SAVE_SLOTS {
        return Err(SaveError::InvalidSlot(slot));
    }
    Ok(())
}

/// Parse `doomsav{0..5}.dsg`; anything else is None.
pub fn parse_slot_file_name(name: &str) -> Option<u8> {
    let digits = name.strip_prefix("doomsav")?.strip_suffix(".dsg")?;
    if digits.len() != 1 {
        return None;
    }
    let slot = digits.parse::<u8>().ok()?;
    (slot < MAX_SAVE_SLOTS).then_some(slot)
}

/// Write one slot's bytes to its durable file. Slot is validated before
/// any I/O happens.
pub fn write_slot(dir: &Path, slot: u8, bytes: &[u8]) -> Result<(), SaveError> {
    validate_slot(slot)?;
    let path = dir.join(save_slot_file_name(slot));
    fs::write(&path, bytes).map_err(|source| SaveError::Io { slot, source })
}

/// Read one slot's durable bytes, or None if the file does not exist.
pub fn read_slot(dir: &Path, slot: u8) -> Result<Option<Vec<u8>>, SaveError> {
    validate_slot(slot)?;
    let path = dir.join(save_slot_file_name(slot));
    match fs::read(&path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(SaveError::Io { slot, source }),
    }
}

/// Scan the durable directory for save files to feed into engine load.
///
/// Malformed file names and unreadable entries are skipped, not errors.
pub fn preload(dir: &Path) -> BTreeMap<u8, Vec<u8>> {
    let mut slots = BTreeMap::new();
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            debug!("save preload: cannot read {dir:?}: {e}");
            return slots;
        }
    };

    for entry in entries.flatten() {
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        let Some(slot) = parse_slot_file_name(name) else {
            continue;
        };
        match fs::read(entry.path()) {
            Ok(bytes) => {
                debug!("preloaded slot {slot} from {name} ({} bytes)", bytes.len());
                slots.insert(slot, bytes);
            }
            Err(e) => warn!("save preload: cannot read {name}: {e}"),
        }
    }

    slots
}

/// Reconcile the private filesystem to durable storage.
///
/// For each slot, the first candidate directory holding a non-empty file
/// wins and overwrites the durable copy. Slots with no match anywhere are
/// left untouched on disk. Idempotent: with no intervening engine writes a
/// second pass rewrites identical bytes. A failure on one slot does not
/// stop the others.
pub fn sync(vfs: &Vfs, dir: &Path) -> SyncReport {
    let mut report = SyncReport::default();

    for slot in 0..MAX_SAVE_SLOTS {
        let name = save_slot_file_name(slot);
        let found = VFS_CANDIDATE_DIRS.iter().find_map(|cand| {
            let path = if *cand == "/" {
                format!("/{name}")
            } else {
                format!("{cand}/{name}")
            };
            vfs.read_file(&path).filter(|bytes| !bytes.is_empty())
        });

        let Some(bytes) = found else { continue };
        match write_slot(dir, slot, bytes) {
            Ok(()) => {
                debug!("synced slot {slot} ({} bytes)", bytes.len());
                report.synced.push(slot);
            }
            Err(e) => {
                warn!("save sync: {e}");
                report.errors.push(e);
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn slot_validation_rejects_out_of_range_before_io() {
        let dir = TempDir::new().unwrap();
        for slot in [6u8, 7, 100, 255] {
            let err = write_slot(dir.path(), slot, b"data").unwrap_err();
            assert!(matches!(err, SaveError::InvalidSlot(s) if s == slot));
            let err = read_slot(dir.path(), slot).unwrap_err();
            assert!(matches!(err, SaveError::InvalidSlot(s) if s == slot));
        }
        // No files were created by the rejected writes.
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn write_then_read_round_trips_bytes() {
        let dir = TempDir::new().unwrap();
        let payload = b"\x00\x01\xFFsave blob".to_vec();
        write_slot(dir.path(), 3, &payload).unwrap();
        assert_eq!(read_slot(dir.path(), 3).unwrap(), Some(payload));
    }

    #[test]
    fn read_missing_slot_is_none() {
        let dir = TempDir::new().unwrap();
        assert_eq!(read_slot(dir.path(), 0).unwrap(), None);
    }

    #[test]
    fn parse_slot_file_name_accepts_only_the_fixed_shape() {
        assert_eq!(parse_slot_file_name("doomsav0.dsg"), Some(0));
        assert_eq!(parse_slot_file_name("doomsav5.dsg"), Some(5));
        assert_eq!(parse_slot_file_name("doomsav6.dsg"), None);
        assert_eq!(parse_slot_file_name("doomsav10.dsg"), None);
        assert_eq!(parse_slot_file_name("doomsav.dsg"), None);
        assert_eq!(parse_slot_file_name("junk.txt"), None);
        assert_eq!(parse_slot_file_name("doomsav2.sav"), None);
    }

    #[test]
    fn preload_picks_up_saves_and_ignores_junk() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("doomsav2.dsg"), b"0123456789").unwrap();
        fs::write(dir.path().join("junk.txt"), b"not a save").unwrap();

        let slots = preload(dir.path());
        assert_eq!(slots.len(), 1);
        assert_eq!(slots.get(&2).map(Vec::len), Some(10));
    }

    #[test]
    fn preload_of_missing_directory_is_empty() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        assert!(preload(&missing).is_empty());
    }

    #[test]
    fn sync_writes_first_non_empty_candidate() {
        let dir = TempDir::new().unwrap();
        let mut vfs = Vfs::new();
        vfs.write_file("/doom/doomsav1.dsg", b"from /doom");
        // An empty file earlier in the order must not shadow real content.
        vfs.write_file("/doomsav1.dsg", b"");

        let report = sync(&vfs, dir.path());
        assert_eq!(report.synced, vec![1]);
        assert!(report.errors.is_empty());
        assert_eq!(
            read_slot(dir.path(), 1).unwrap(),
            Some(b"from /doom".to_vec())
        );
    }

    #[test]
    fn sync_earlier_candidate_shadows_later_ones() {
        let dir = TempDir::new().unwrap();
        let mut vfs = Vfs::new();
        vfs.write_file("/doomsav0.dsg", b"root copy");
        vfs.write_file("/tmp/doomsav0.dsg", b"tmp copy");

        sync(&vfs, dir.path());
        assert_eq!(
            read_slot(dir.path(), 0).unwrap(),
            Some(b"root copy".to_vec())
        );
    }

    #[test]
    fn sync_leaves_unmatched_slots_untouched() {
        let dir = TempDir::new().unwrap();
        write_slot(dir.path(), 4, b"existing").unwrap();

        let vfs = Vfs::new();
        let report = sync(&vfs, dir.path());
        assert!(report.synced.is_empty());
        assert_eq!(read_slot(dir.path(), 4).unwrap(), Some(b"existing".to_vec()));
    }

    #[test]
    fn sync_twice_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let mut vfs = Vfs::new();
        vfs.write_file("/doomsav0.dsg", b"alpha");
        vfs.write_file("/doom/doomsav3.dsg", b"beta");

        sync(&vfs, dir.path());
        let first: Vec<_> = (0..MAX_SAVE_SLOTS)
            .map(|s| read_slot(dir.path(), s).unwrap())
            .collect();

        let report = sync(&vfs, dir.path());
        assert_eq!(report.synced, vec![0, 3]);
        let second: Vec<_> = (0..MAX_SAVE_SLOTS)
            .map(|s| read_slot(dir.path(), s).unwrap())
            .collect();
        assert_eq!(first, second);
    }
}
