/*!
 * Bilingual merge of two independently parsed subtitle streams.
 *
 * The primary stream owns the timestamps. Cue numbers are the join key:
 * the output covers the union of numbers from both streams in ascending
 * numeric order, and a number that the primary stream does not carry is
 * dropped, because a bilingual cue without an authoritative time range is
 * worse than a missing one.
 */

use std::collections::{BTreeMap, BTreeSet};
use log::warn;

use crate::subtitle_processor::SubtitleEntry;

/// Result of a merge: the bilingual entries plus the cue numbers that were
/// dropped for lacking a primary-side timestamp.
#[derive(Debug)]
pub struct MergeOutcome {
    /// Merged entries, ascending by cue number
    pub entries: Vec<SubtitleEntry>,

    /// Cue numbers present only in the secondary stream
    pub dropped: Vec<usize>,
}

/// Merges two subtitle streams into one bilingual stream
pub struct SubtitleMerger;

impl SubtitleMerger {
    /// Merge `primary` and `secondary` keyed by cue number.
    ///
    /// For every number in either stream: the time range comes from the
    /// primary entry, and the text is the primary text over the secondary
    /// text when both are present, otherwise whichever side has one. When a
    /// number repeats within one stream, the later occurrence wins.
    pub fn merge(primary: &[SubtitleEntry], secondary: &[SubtitleEntry]) -> MergeOutcome {
        let primary_by_num = Self::index_by_num(primary);
        let secondary_by_num = Self::index_by_num(secondary);

        let all_numbers: BTreeSet<usize> = primary_by_num
            .keys()
            .chain(secondary_by_num.keys())
            .copied()
            .collect();

        let mut entries = Vec::with_capacity(all_numbers.len());
        let mut dropped = Vec::new();

        for number in all_numbers {
            let Some(primary_entry) = primary_by_num.get(&number) else {
                warn!(
                    "Cue {} has no timestamp in the primary stream, dropping it",
                    number
                );
                dropped.push(number);
                continue;
            };

            let secondary_text = secondary_by_num
                .get(&number)
                .map(|entry| entry.text.as_str())
                .unwrap_or("");

            let text = if !primary_entry.text.is_empty() && !secondary_text.is_empty() {
                format!("{}\n{}", primary_entry.text, secondary_text)
            } else if !primary_entry.text.is_empty() {
                primary_entry.text.clone()
            } else {
                secondary_text.to_string()
            };

            entries.push(SubtitleEntry::new(
                number,
                primary_entry.start_time_ms,
                primary_entry.end_time_ms,
                text,
            ));
        }

        MergeOutcome { entries, dropped }
    }

    fn index_by_num(entries: &[SubtitleEntry]) -> BTreeMap<usize, &SubtitleEntry> {
        entries.iter().map(|entry| (entry.seq_num, entry)).collect()
    }
}
