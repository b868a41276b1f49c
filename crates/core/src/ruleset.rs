use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// The catch-all category. Always present, never matched automatically.
pub const UNCATEGORIZED: &str = "Uncategorized";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuleError {
    #[error("name is empty")]
    EmptyName,
    #[error("category already exists: {0}")]
    DuplicateCategory(String),
    #[error("unknown category: {0}")]
    UnknownCategory(String),
    #[error("keyword '{keyword}' already present under '{category}'")]
    DuplicateKeyword { category: String, keyword: String },
}

/// Category name → ordered keyword list. Serializes as a bare JSON object,
/// which is also the on-disk ruleset format.
///
/// Categories iterate in sorted order, so classification is deterministic
/// per run. Keywords are stored with their original casing; the duplicate
/// check is case-sensitive on trimmed text even though match-time
/// comparison is case-insensitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryRuleset {
    categories: BTreeMap<String, Vec<String>>,
}

impl Default for CategoryRuleset {
    fn default() -> Self {
        let mut categories = BTreeMap::new();
        categories.insert(UNCATEGORIZED.to_string(), Vec::new());
        CategoryRuleset { categories }
    }
}

impl CategoryRuleset {
    /// Re-establishes the catch-all category, e.g. after deserializing a
    /// hand-edited ruleset file.
    pub fn ensure_uncategorized(&mut self) {
        self.categories.entry(UNCATEGORIZED.to_string()).or_default();
    }

    pub fn create_category(&mut self, name: &str) -> Result<(), RuleError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RuleError::EmptyName);
        }
        if self.categories.contains_key(name) {
            return Err(RuleError::DuplicateCategory(name.to_string()));
        }
        self.categories.insert(name.to_string(), Vec::new());
        Ok(())
    }

    pub fn add_keyword(&mut self, category: &str, keyword: &str) -> Result<(), RuleError> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(RuleError::EmptyName);
        }
        let keywords = self
            .categories
            .get_mut(category)
            .ok_or_else(|| RuleError::UnknownCategory(category.to_string()))?;
        if keywords.iter().any(|k| k == keyword) {
            return Err(RuleError::DuplicateKeyword {
                category: category.to_string(),
                keyword: keyword.to_string(),
            });
        }
        keywords.push(keyword.to_string());
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.categories.contains_key(name)
    }

    pub fn keywords(&self, category: &str) -> Option<&[String]> {
        self.categories.get(category).map(|k| k.as_slice())
    }

    /// Categories with their keyword lists, in sorted (deterministic) order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.categories
            .iter()
            .map(|(name, keywords)| (name.as_str(), keywords.as_slice()))
    }

    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(|n| n.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_has_only_uncategorized() {
        let rules = CategoryRuleset::default();
        assert!(rules.contains(UNCATEGORIZED));
        assert_eq!(rules.category_names().count(), 1);
    }

    #[test]
    fn create_category_trims_name() {
        let mut rules = CategoryRuleset::default();
        rules.create_category("  Groceries  ").unwrap();
        assert!(rules.contains("Groceries"));
    }

    #[test]
    fn create_category_rejects_empty_and_duplicate() {
        let mut rules = CategoryRuleset::default();
        assert_eq!(rules.create_category("   "), Err(RuleError::EmptyName));
        rules.create_category("Dining").unwrap();
        assert_eq!(
            rules.create_category("Dining"),
            Err(RuleError::DuplicateCategory("Dining".to_string()))
        );
    }

    #[test]
    fn add_keyword_trims_and_appends() {
        let mut rules = CategoryRuleset::default();
        rules.create_category("Dining").unwrap();
        rules.add_keyword("Dining", "  COFFEE SHOP  ").unwrap();
        assert_eq!(rules.keywords("Dining").unwrap(), ["COFFEE SHOP"]);
    }

    #[test]
    fn add_keyword_rejects_duplicate_without_growing() {
        let mut rules = CategoryRuleset::default();
        rules.create_category("Dining").unwrap();
        rules.add_keyword("Dining", "COFFEE SHOP").unwrap();
        let err = rules.add_keyword("Dining", "COFFEE SHOP ").unwrap_err();
        assert!(matches!(err, RuleError::DuplicateKeyword { .. }));
        assert_eq!(rules.keywords("Dining").unwrap().len(), 1);
    }

    #[test]
    fn duplicate_check_is_case_sensitive() {
        // Stored text is compared verbatim; only match-time comparison in
        // the classifier is case-insensitive.
        let mut rules = CategoryRuleset::default();
        rules.create_category("Dining").unwrap();
        rules.add_keyword("Dining", "COFFEE SHOP").unwrap();
        rules.add_keyword("Dining", "coffee shop").unwrap();
        assert_eq!(rules.keywords("Dining").unwrap().len(), 2);
    }

    #[test]
    fn add_keyword_unknown_category() {
        let mut rules = CategoryRuleset::default();
        assert_eq!(
            rules.add_keyword("Nope", "x"),
            Err(RuleError::UnknownCategory("Nope".to_string()))
        );
    }

    #[test]
    fn serializes_as_bare_object() {
        let mut rules = CategoryRuleset::default();
        rules.create_category("Dining").unwrap();
        rules.add_keyword("Dining", "COFFEE SHOP").unwrap();
        let json = serde_json::to_string(&rules).unwrap();
        assert_eq!(json, r#"{"Dining":["COFFEE SHOP"],"Uncategorized":[]}"#);
    }

    #[test]
    fn ensure_uncategorized_restores_invariant() {
        let mut rules: CategoryRuleset =
            serde_json::from_str(r#"{"Dining":["CAFE"]}"#).unwrap();
        assert!(!rules.contains(UNCATEGORIZED));
        rules.ensure_uncategorized();
        assert!(rules.contains(UNCATEGORIZED));
        assert_eq!(rules.keywords("Dining").unwrap(), ["CAFE"]);
    }
}
