//! Category assignment for reported class labels

use serde::{Deserialize, Serialize};

/// Maps every label containing `pattern` (case-insensitive) to `category`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub pattern: String,
    pub category: String,
}

impl CategoryRule {
    pub fn new(pattern: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            category: category.into(),
        }
    }
}

/// Ordered rule table; the first matching rule wins, otherwise `fallback`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRules {
    pub rules: Vec<CategoryRule>,
    pub fallback: String,
}

impl CategoryRules {
    /// MASTER, WOMEN and JUNIOR labels get their own category, everything
    /// else plays in OPEN.
    pub fn standard() -> Self {
        Self {
            rules: vec![
                CategoryRule::new("MASTER", "MASTERS"),
                CategoryRule::new("WOMEN", "WOMEN"),
                CategoryRule::new("JUNIOR", "JUNIOR"),
            ],
            fallback: "OPEN".to_string(),
        }
    }

    pub fn assign(&self, label: &str) -> String {
        let label = label.to_uppercase();
        self.rules
            .iter()
            .find(|rule| label.contains(&rule.pattern.to_uppercase()))
            .map(|rule| rule.category.clone())
            .unwrap_or_else(|| self.fallback.clone())
    }

    /// Every category this table can produce, in rule order
    pub fn categories(&self) -> Vec<String> {
        let mut categories: Vec<String> = Vec::new();
        for name in self
            .rules
            .iter()
            .map(|r| &r.category)
            .chain(std::iter::once(&self.fallback))
        {
            if !categories.contains(name) {
                categories.push(name.clone());
            }
        }
        categories
    }
}

impl Default for CategoryRules {
    fn default() -> Self {
        Self::standard()
    }
}

/// How a result's reported class label becomes a ranking category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum CategoryMapping {
    /// Use the reported label as-is
    Raw,
    Rules(CategoryRules),
}

impl Default for CategoryMapping {
    fn default() -> Self {
        CategoryMapping::Rules(CategoryRules::standard())
    }
}

impl CategoryMapping {
    pub fn assign(&self, label: &str) -> String {
        match self {
            CategoryMapping::Raw => label.to_string(),
            CategoryMapping::Rules(rules) => rules.assign(label),
        }
    }
}
