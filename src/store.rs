use crate::app_dirs::AppDirs;
use crate::mistakes::MistakeRecord;
use chrono::{DateTime, Local};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Persisted progress for one ingested document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// Next unattempted line index; never decreases within a session.
    pub current_index: usize,
    /// Line count fixed at ingestion time.
    pub total_lines: usize,
    /// Running average accuracy over the lines attempted so far, in [0,100].
    pub score: f64,
    /// Running accuracy sum. Absent in files written by older versions,
    /// in which case resume reconstructs it as `score * current_index`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_score: Option<f64>,
    #[serde(with = "mistake_wire")]
    pub mistakes: Vec<MistakeRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_practiced: Option<DateTime<Local>>,
}

impl DocumentRecord {
    fn new(total_lines: usize) -> Self {
        Self {
            current_index: 0,
            total_lines,
            score: 0.0,
            total_score: None,
            mistakes: Vec::new(),
            last_practiced: None,
        }
    }
}

/// On-disk shape of one mistake entry. Current files store the flat
/// `"expected|typed"` string; files written before the format change
/// store an `{expected, typed}` object. Both must load.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawMistake {
    Flat(String),
    Legacy { expected: String, typed: String },
}

impl RawMistake {
    fn into_record(self) -> Option<MistakeRecord> {
        let (expected, typed) = match self {
            RawMistake::Flat(s) => {
                let (e, t) = s.split_once('|')?;
                (e.chars().next()?, t.chars().next()?)
            }
            RawMistake::Legacy { expected, typed } => {
                (expected.chars().next()?, typed.chars().next()?)
            }
        };
        Some(MistakeRecord { expected, typed })
    }
}

/// Decodes both wire shapes into the canonical in-memory record at the
/// store boundary, dropping entries that cannot be parsed into a pair.
/// Always re-serializes in the flat format.
mod mistake_wire {
    use super::{MistakeRecord, RawMistake};
    use serde::ser::SerializeSeq;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        mistakes: &[MistakeRecord],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(mistakes.len()))?;
        for m in mistakes {
            seq.serialize_element(&format!("{}|{}", m.expected, m.typed))?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<MistakeRecord>, D::Error> {
        let raw = Vec::<RawMistake>::deserialize(deserializer)?;
        Ok(raw.into_iter().filter_map(RawMistake::into_record).collect())
    }
}

/// Durable filename → [`DocumentRecord`] mapping backed by a single JSON
/// file, read wholesale at open and rewritten wholesale on every mutation.
/// Last writer wins; the design assumes a single process.
#[derive(Debug)]
pub struct ProgressDb {
    path: PathBuf,
    data: BTreeMap<String, DocumentRecord>,
}

impl ProgressDb {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = AppDirs::progress_path()
            .unwrap_or_else(|| PathBuf::from("typedrill_progress.json"));
        Self::with_path(path)
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        let path = p.as_ref().to_path_buf();
        let data = Self::load(&path);
        Self { path, data }
    }

    /// A missing or unreadable file yields an empty mapping rather than an
    /// error: practice must stay available even if history is lost.
    fn load(path: &Path) -> BTreeMap<String, DocumentRecord> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(_) => return BTreeMap::new(),
        };
        match serde_json::from_slice(&bytes) {
            Ok(data) => data,
            Err(e) => {
                warn!("progress file {} is corrupt, starting empty: {e}", path.display());
                BTreeMap::new()
            }
        }
    }

    fn persist(&self) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(&self.data).unwrap_or_default();
        fs::write(&self.path, data)
    }

    /// Creates a fresh record for `filename` unless one already exists;
    /// re-ingesting a known document never touches its progress.
    pub fn add_file(&mut self, filename: &str, total_lines: usize) -> io::Result<()> {
        if self.data.contains_key(filename) {
            return Ok(());
        }
        self.data
            .insert(filename.to_string(), DocumentRecord::new(total_lines));
        debug!("registered document {filename} ({total_lines} lines)");
        self.persist()
    }

    /// Overwrites the mutable fields of an existing record. Silently does
    /// nothing when `filename` was never ingested.
    // TODO: decide whether an absent filename should upsert instead;
    // tracked in DESIGN.md as an open product question.
    pub fn update_progress(
        &mut self,
        filename: &str,
        index: usize,
        score: f64,
        total_score: f64,
        mistakes: &[MistakeRecord],
    ) -> io::Result<()> {
        let Some(record) = self.data.get_mut(filename) else {
            return Ok(());
        };
        record.current_index = index;
        record.score = score;
        record.total_score = Some(total_score);
        record.mistakes = mistakes.to_vec();
        record.last_practiced = Some(Local::now());
        self.persist()
    }

    pub fn get_file_info(&self, filename: &str) -> Option<&DocumentRecord> {
        self.data.get(filename)
    }

    pub fn get_all_files(&self) -> &BTreeMap<String, DocumentRecord> {
        &self.data
    }
}
