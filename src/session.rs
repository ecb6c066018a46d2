use crate::mistakes::{self, MistakeCount, MistakeRecord};
use crate::scoring::calculate_accuracy;
use crate::store::ProgressDb;
use log::debug;
use std::io;
use thiserror::Error;

/// What the user asked for when submitting a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Advance,
    Stop,
}

/// Where the practice run currently stands. `Stopped` and `Complete` are
/// both terminal; a stopped run resumes from its persisted index next time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    InProgress,
    Stopped,
    Complete,
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("session is no longer in progress")]
    Finished,
    #[error("failed to persist progress: {0}")]
    Persist(#[from] io::Error),
}

/// End-of-session report.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub final_score: f64,
    pub ranked_mistakes: Vec<MistakeCount>,
    pub total_lines: usize,
    pub typed_lines: usize,
}

/// One active practice run over a document. Ephemeral: the caller owns it
/// for the duration of the run and everything durable goes through the
/// [`ProgressDb`] on each submission.
#[derive(Debug)]
pub struct Session {
    filename: String,
    lines: Vec<String>,
    current_index: usize,
    total_score: f64,
    mistakes: Vec<MistakeRecord>,
    status: Status,
}

impl Session {
    /// Starts a fresh run or resumes a previous one from the document's
    /// persisted record. The running sum is taken from the record when it
    /// carries one, and otherwise reconstructed as `score * current_index`
    /// for records written before the sum was persisted.
    pub fn start_or_resume(db: &ProgressDb, filename: &str, lines: Vec<String>) -> Self {
        let (current_index, total_score, mistakes) = match db.get_file_info(filename) {
            Some(record) => (
                record.current_index,
                record
                    .total_score
                    .unwrap_or(record.score * record.current_index as f64),
                record.mistakes.clone(),
            ),
            None => (0, 0.0, Vec::new()),
        };

        let status = if current_index >= lines.len() {
            Status::Complete
        } else {
            Status::InProgress
        };

        debug!(
            "session for {filename}: resuming at line {current_index}/{}",
            lines.len()
        );

        Self {
            filename: filename.to_string(),
            lines,
            current_index,
            total_score,
            mistakes,
            status,
        }
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn total_lines(&self) -> usize {
        self.lines.len()
    }

    /// The line the user should type next. None once the run is terminal.
    pub fn current_line(&self) -> Option<&str> {
        if self.status != Status::InProgress {
            return None;
        }
        self.lines.get(self.current_index).map(String::as_str)
    }

    /// Running average over the lines attempted so far, 0 before the first.
    pub fn average_score(&self) -> f64 {
        if self.current_index == 0 {
            0.0
        } else {
            self.total_score / self.current_index as f64
        }
    }

    /// Scores one typed line and persists the result. Accuracy accumulation
    /// and index advancement happen together: `Stop` updates the sum but
    /// leaves the index where it was, `Advance` updates both. The persisted
    /// average is recomputed from the sum on every submission rather than
    /// nudged incrementally.
    pub fn submit(
        &mut self,
        db: &mut ProgressDb,
        typed: &str,
        action: Action,
    ) -> Result<Status, SubmitError> {
        if self.status != Status::InProgress {
            return Err(SubmitError::Finished);
        }

        let target = &self.lines[self.current_index];
        let accuracy = calculate_accuracy(target, typed);
        mistakes::record_mismatches(target, typed, &mut self.mistakes);

        self.total_score += accuracy;
        let lines_typed = self.current_index + 1;
        let avg_score = self.total_score / lines_typed as f64;

        match action {
            Action::Stop => {
                db.update_progress(
                    &self.filename,
                    self.current_index,
                    avg_score,
                    self.total_score,
                    &self.mistakes,
                )?;
                self.status = Status::Stopped;
            }
            Action::Advance => {
                self.current_index += 1;
                db.update_progress(
                    &self.filename,
                    self.current_index,
                    avg_score,
                    self.total_score,
                    &self.mistakes,
                )?;
                if self.current_index >= self.lines.len() {
                    self.status = Status::Complete;
                }
            }
        }

        Ok(self.status)
    }

    /// Final score is the running sum over `current_index`. After a stop
    /// the just-submitted line is in the sum but not the index, matching
    /// what gets persisted.
    pub fn summary(&self) -> Summary {
        let typed_lines = self.current_index;
        let final_score = if typed_lines == 0 {
            0.0
        } else {
            self.total_score / typed_lines as f64
        };

        Summary {
            final_score,
            ranked_mistakes: mistakes::aggregate(&self.mistakes),
            total_lines: self.lines.len(),
            typed_lines,
        }
    }
}
