//! Topic categories
//!
//! A fixed set of domain labels used to bias source selection and credibility
//! weighting. `General` is the fallback when no keyword matches.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::AdapterId;
use crate::ResearchMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum Category {
    Technology,
    Health,
    Science,
    Business,
    Finance,
    Education,
    Environment,
    Politics,
    Sports,
    Entertainment,
    Travel,
    Food,
    Automotive,
    History,
    General,
}

impl Category {
    pub const ALL: [Category; 15] = [
        Category::Technology,
        Category::Health,
        Category::Science,
        Category::Business,
        Category::Finance,
        Category::Education,
        Category::Environment,
        Category::Politics,
        Category::Sports,
        Category::Entertainment,
        Category::Travel,
        Category::Food,
        Category::Automotive,
        Category::History,
        Category::General,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Technology => "technology",
            Category::Health => "health",
            Category::Science => "science",
            Category::Business => "business",
            Category::Finance => "finance",
            Category::Education => "education",
            Category::Environment => "environment",
            Category::Politics => "politics",
            Category::Sports => "sports",
            Category::Entertainment => "entertainment",
            Category::Travel => "travel",
            Category::Food => "food",
            Category::Automotive => "automotive",
            Category::History => "history",
            Category::General => "general",
        }
    }

    /// Adapters queried for this category, in start priority order.
    ///
    /// Technology and science use every adapter; other categories skip code
    /// search. `Technical` forces code search in, `Academic` forces it out and
    /// leads with the encyclopedia.
    pub fn adapters(&self, mode: ResearchMode) -> Vec<AdapterId> {
        let with_code = match mode {
            ResearchMode::Technical => true,
            ResearchMode::Academic => false,
            _ => matches!(self, Category::Technology | Category::Science),
        };

        let mut adapters: Vec<AdapterId> = AdapterId::PRIORITY
            .iter()
            .copied()
            .filter(|a| with_code || *a != AdapterId::Code)
            .collect();

        if mode == ResearchMode::Academic {
            adapters.sort_by_key(|a| (*a != AdapterId::Encyclopedia, a.priority()));
        }

        adapters
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == needle)
            .ok_or_else(|| format!("unknown category: {}", s))
    }
}

impl TryFrom<String> for Category {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
