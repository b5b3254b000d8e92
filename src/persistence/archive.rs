use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::round::Round;

/// Errors that can occur while reading or writing the round archive.
#[derive(Debug)]
pub enum ArchiveError {
    Io(io::Error),
    Serialize(String),
    Deserialize(String),
}

impl std::fmt::Display for ArchiveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArchiveError::Io(e) => write!(f, "I/O error: {}", e),
            ArchiveError::Serialize(e) => write!(f, "Serialization error: {}", e),
            ArchiveError::Deserialize(e) => write!(f, "Deserialization error: {}", e),
        }
    }
}

impl std::error::Error for ArchiveError {}

impl From<io::Error> for ArchiveError {
    fn from(e: io::Error) -> Self {
        ArchiveError::Io(e)
    }
}

/// Durable storage for the list of completed rounds.
///
/// Both operations are best-effort: failures are logged by the
/// implementation and never reach the caller.
pub trait RoundArchive {
    /// Stored rounds, newest first. Empty when nothing is stored or the
    /// stored content is unreadable.
    fn load(&self) -> Vec<Round>;

    /// Replace the stored collection with `rounds`.
    fn save(&mut self, rounds: &[Round]);
}

fn encode(rounds: &[Round]) -> Result<String, ArchiveError> {
    serde_json::to_string_pretty(rounds).map_err(|e| ArchiveError::Serialize(e.to_string()))
}

fn decode(data: &str) -> Result<Vec<Round>, ArchiveError> {
    serde_json::from_str(data).map_err(|e| ArchiveError::Deserialize(e.to_string()))
}

/// Read the archived rounds from `path`. A missing file is an empty archive.
pub fn read_rounds(path: &Path) -> Result<Vec<Round>, ArchiveError> {
    let data = match fs::read_to_string(path) {
        Ok(data) => data,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(ArchiveError::Io(e)),
    };
    if data.trim().is_empty() {
        return Ok(Vec::new());
    }
    decode(&data)
}

/// Write the archived rounds to `path` using an atomic replace.
///
/// Writes to a temporary sibling file first, then renames over the target so
/// a partial write never corrupts the existing archive.
pub fn write_rounds(path: &Path, rounds: &[Round]) -> Result<(), ArchiveError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let encoded = encode(rounds)?;
    let tmp = temp_path(path);

    if let Err(e) = fs::write(&tmp, encoded.as_bytes()) {
        let _ = fs::remove_file(&tmp);
        return Err(ArchiveError::Io(e));
    }

    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(ArchiveError::Io(e));
    }

    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("rounds.json");
    path.with_file_name(format!(".{}.tmp", name))
}

/// Archive backed by a single JSON file on disk.
#[derive(Debug, Clone)]
pub struct JsonFileArchive {
    path: PathBuf,
}

impl JsonFileArchive {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileArchive { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RoundArchive for JsonFileArchive {
    fn load(&self) -> Vec<Round> {
        match read_rounds(&self.path) {
            Ok(rounds) => {
                debug!(path = %self.path.display(), count = rounds.len(), "Loaded round archive");
                rounds
            }
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Cannot read round archive, starting with empty history"
                );
                Vec::new()
            }
        }
    }

    fn save(&mut self, rounds: &[Round]) {
        match write_rounds(&self.path, rounds) {
            Ok(()) => {
                debug!(path = %self.path.display(), count = rounds.len(), "Saved round archive");
            }
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Cannot save round archive, history kept in memory only"
                );
            }
        }
    }
}

/// In-process archive holding the serialized JSON, the same text a file
/// archive would write.
#[derive(Debug, Clone, Default)]
pub struct MemoryArchive {
    contents: Option<String>,
    saves: usize,
    fail_writes: bool,
}

impl MemoryArchive {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from raw stored text, valid or not.
    pub fn with_contents(contents: impl Into<String>) -> Self {
        MemoryArchive {
            contents: Some(contents.into()),
            ..Self::default()
        }
    }

    /// An archive whose writes always fail.
    pub fn failing() -> Self {
        MemoryArchive {
            fail_writes: true,
            ..Self::default()
        }
    }

    pub fn contents(&self) -> Option<&str> {
        self.contents.as_deref()
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl RoundArchive for MemoryArchive {
    fn load(&self) -> Vec<Round> {
        let Some(data) = self.contents.as_deref() else {
            return Vec::new();
        };
        match decode(data) {
            Ok(rounds) => rounds,
            Err(e) => {
                warn!(error = %e, "Cannot read round archive, starting with empty history");
                Vec::new()
            }
        }
    }

    fn save(&mut self, rounds: &[Round]) {
        if self.fail_writes {
            warn!("Cannot save round archive: storage unavailable");
            return;
        }
        match encode(rounds) {
            Ok(json) => {
                self.contents = Some(json);
                self.saves += 1;
            }
            Err(e) => warn!(error = %e, "Cannot save round archive"),
        }
    }
}
