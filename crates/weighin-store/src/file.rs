use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use weighin_types::{LedgerSnapshot, TournamentId};

use crate::error::{StoreError, StoreResult};
use crate::traits::SnapshotStore;

const EXTENSION: &str = "json";

/// Directory-backed snapshot store: one `<tournament>.json` file per record.
///
/// Writes land in a temporary file in the same directory and are renamed
/// over the target, so a reader never observes a half-written record.
#[derive(Debug, Clone)]
pub struct FileSnapshotStore {
    root: PathBuf,
}

impl FileSnapshotStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    pub fn open(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        if !root.is_dir() {
            return Err(StoreError::Directory(root));
        }
        debug!(root = %root.display(), "opened snapshot directory");
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the record for `tournament`.
    pub fn path_for(&self, tournament: &TournamentId) -> PathBuf {
        self.root
            .join(format!("{}.{EXTENSION}", encode_name(tournament.as_str())))
    }
}

impl SnapshotStore for FileSnapshotStore {
    fn load(&self, tournament: &TournamentId) -> StoreResult<Option<LedgerSnapshot>> {
        let path = self.path_for(tournament);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let snapshot = LedgerSnapshot::from_json(&bytes).map_err(|e| StoreError::Corrupt {
            tournament: tournament.clone(),
            reason: e.to_string(),
        })?;
        if snapshot.tournament_id != *tournament {
            return Err(StoreError::Corrupt {
                tournament: tournament.clone(),
                reason: format!("record belongs to tournament {}", snapshot.tournament_id),
            });
        }
        Ok(Some(snapshot))
    }

    fn write(&self, snapshot: &LedgerSnapshot) -> StoreResult<()> {
        let bytes = snapshot
            .to_json()
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        let path = self.path_for(&snapshot.tournament_id);

        let mut tmp = tempfile::NamedTempFile::new_in(&self.root)?;
        tmp.write_all(&bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path).map_err(|e| StoreError::Io(e.error))?;

        debug!(
            tournament = %snapshot.tournament_id,
            entries = snapshot.entry_count(),
            path = %path.display(),
            "wrote snapshot"
        );
        Ok(())
    }

    fn delete(&self, tournament: &TournamentId) -> StoreResult<bool> {
        match fs::remove_file(self.path_for(tournament)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn tournaments(&self) -> StoreResult<Vec<TournamentId>> {
        let mut ids = Vec::new();
        for dirent in fs::read_dir(&self.root)? {
            let path = dirent?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            match decode_name(stem).and_then(|name| TournamentId::new(name).ok()) {
                Some(id) => ids.push(id),
                None => warn!(path = %path.display(), "skipping unrecognized file in snapshot directory"),
            }
        }
        ids.sort();
        Ok(ids)
    }
}

fn is_plain(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_')
}

/// Percent-encode anything outside `[A-Za-z0-9_-]` so ids map to safe names.
fn encode_name(id: &str) -> String {
    let mut out = String::with_capacity(id.len());
    for b in id.bytes() {
        if is_plain(b) {
            out.push(b as char);
        } else {
            out.push_str(&format!("%{b:02X}"));
        }
    }
    out
}

fn decode_name(name: &str) -> Option<String> {
    let bytes = name.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'%' => {
                let hex = name.get(i + 1..i + 3)?;
                out.push(u8::from_str_radix(hex, 16).ok()?);
                i += 3;
            }
            b if is_plain(b) => {
                out.push(b);
                i += 1;
            }
            _ => return None,
        }
    }
    String::from_utf8(out).ok()
}
