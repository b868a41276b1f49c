use crate::record::Record;
use crate::ruleset::CategoryRuleset;

/// A user's category override for one dataset row.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryEdit {
    pub row: usize,
    pub category: String,
}

/// Applies user recategorizations and teaches the ruleset from them.
///
/// Edits are processed in encounter order. An edit whose category equals
/// the record's current category is a no-op. For a real change the record
/// is updated first, then the record's raw details are appended as a
/// keyword under the new category — best-effort: a duplicate keyword or an
/// unknown category never blocks the record update itself. Edits pointing
/// past the end of the dataset are ignored.
///
/// The caller is expected to persist the ruleset and replace its snapshot
/// with the returned dataset afterwards.
pub fn apply_edits(
    mut dataset: Vec<Record>,
    edits: &[CategoryEdit],
    ruleset: &mut CategoryRuleset,
) -> Vec<Record> {
    for edit in edits {
        let Some(record) = dataset.get_mut(edit.row) else {
            continue;
        };
        if record.category == edit.category {
            continue;
        }
        record.category = edit.category.clone();
        let _ = ruleset.add_keyword(&edit.category, &record.details);
    }
    dataset
}
