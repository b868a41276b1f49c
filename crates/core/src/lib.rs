pub mod classify;
pub mod learn;
pub mod record;
pub mod ruleset;

pub use classify::classify;
pub use learn::{apply_edits, CategoryEdit};
pub use record::{normalize, Amount, Direction, Record};
pub use ruleset::{CategoryRuleset, RuleError, UNCATEGORIZED};
