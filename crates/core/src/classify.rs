use std::collections::{HashMap, HashSet};

use crate::record::{normalize, Record};
use crate::ruleset::{CategoryRuleset, UNCATEGORIZED};

/// Assigns a category to every record and returns the new dataset.
///
/// With a snapshot, categories come exclusively from the snapshot's
/// details → category relation (a left join; misses fall back to
/// "Uncategorized") — keyword rules are bypassed so that hand-corrected
/// categories survive a re-upload of overlapping data. Without a snapshot,
/// keyword rules apply.
pub fn classify(
    dataset: Vec<Record>,
    ruleset: &CategoryRuleset,
    snapshot: Option<&[Record]>,
) -> Vec<Record> {
    match snapshot {
        Some(snapshot) => reconcile(dataset, snapshot),
        None => match_keywords(dataset, ruleset),
    }
}

fn reconcile(mut dataset: Vec<Record>, snapshot: &[Record]) -> Vec<Record> {
    // Later snapshot occurrences of the same details win.
    let mut known: HashMap<String, &str> = HashMap::new();
    for record in snapshot {
        known.insert(record.normalized_details(), record.category.as_str());
    }

    for record in &mut dataset {
        record.category = known
            .get(&record.normalized_details())
            .map(|c| (*c).to_string())
            .unwrap_or_else(|| UNCATEGORIZED.to_string());
    }
    dataset
}

/// Exact-match keyword classification. Categories are visited in the
/// ruleset's sorted order; if two categories ever share a keyword, the
/// later one wins — the add-keyword duplicate check makes that unlikely
/// but nothing structurally prevents it.
fn match_keywords(mut dataset: Vec<Record>, ruleset: &CategoryRuleset) -> Vec<Record> {
    for record in &mut dataset {
        record.category = UNCATEGORIZED.to_string();
    }

    for (category, keywords) in ruleset.iter() {
        if category == UNCATEGORIZED || keywords.is_empty() {
            continue;
        }
        let lowered: HashSet<String> = keywords.iter().map(|k| normalize(k)).collect();
        for record in &mut dataset {
            if lowered.contains(&record.normalized_details()) {
                record.category = category.to_string();
            }
        }
    }
    dataset
}
