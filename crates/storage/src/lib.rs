pub mod store;

pub use store::{JsonFileStore, MemoryStore, RulesetStore, StoreError};
