use serde::Serialize;
use std::collections::HashMap;

/// One observed mismatch: the character the line expected and the
/// character the user typed in its place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MistakeRecord {
    pub expected: char,
    pub typed: char,
}

/// Aggregated view of one (expected, typed) pair across a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MistakeCount {
    pub expected: char,
    pub typed: char,
    pub count: usize,
}

/// How many distinct mistake pairs the summary report shows.
pub const REPORT_LIMIT: usize = 10;

/// Appends one record per mismatching position, zipping over the shorter
/// of the two strings. The untyped tail of a line is not a mismatch; it
/// already costs accuracy in the scorer.
pub fn record_mismatches(target: &str, typed: &str, mistakes: &mut Vec<MistakeRecord>) {
    for (expected, typed) in target.chars().zip(typed.chars()) {
        if expected != typed {
            mistakes.push(MistakeRecord { expected, typed });
        }
    }
}

/// Groups raw mistake records by (expected, typed) pair and returns the
/// top [`REPORT_LIMIT`] pairs by count, descending. Ties keep
/// first-encountered order: the sort is stable and pairs enter the list
/// in the order they first appear in `mistakes`.
pub fn aggregate(mistakes: &[MistakeRecord]) -> Vec<MistakeCount> {
    let mut counts: HashMap<MistakeRecord, usize> = HashMap::new();
    let mut order: Vec<MistakeRecord> = Vec::new();

    for &m in mistakes {
        let entry = counts.entry(m).or_insert(0);
        if *entry == 0 {
            order.push(m);
        }
        *entry += 1;
    }

    let mut ranked: Vec<MistakeCount> = order
        .into_iter()
        .map(|m| MistakeCount {
            expected: m.expected,
            typed: m.typed,
            count: counts[&m],
        })
        .collect();

    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked.truncate(REPORT_LIMIT);
    ranked
}
