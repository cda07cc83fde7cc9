//! Search query model handed to every source client.

use serde::{Deserialize, Serialize};

use crate::config::YearRange;
use crate::criteria::CombinationLogic;

/// Query parameters for one database search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Search keywords (joined per-provider according to `logic`)
    pub keywords: Vec<String>,

    /// How keywords combine in the provider query (`AND`/`OR`)
    pub logic: CombinationLogic,

    /// Maximum number of records to request (providers cap this further)
    pub page_size: usize,

    /// Publication-year window, when the provider can filter server-side
    pub year_range: Option<YearRange>,

    /// API key for providers that take one
    pub api_key: Option<String>,
}

impl SearchQuery {
    /// Create a query with default page size and no filters.
    pub fn new(keywords: Vec<String>) -> Self {
        Self {
            keywords,
            logic: CombinationLogic::Or,
            page_size: 100,
            year_range: None,
            api_key: None,
        }
    }

    /// Set the combination logic
    pub fn logic(mut self, logic: CombinationLogic) -> Self {
        self.logic = logic;
        self
    }

    /// Set the page size
    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Set the year window
    pub fn year_range(mut self, range: YearRange) -> Self {
        self.year_range = Some(range);
        self
    }

    /// Set the API key
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Keywords joined with the provider-agnostic boolean operator.
    pub fn joined_keywords(&self, and_sep: &str, or_sep: &str) -> String {
        match self.logic {
            CombinationLogic::And => self.keywords.join(and_sep),
            CombinationLogic::Or => self.keywords.join(or_sep),
        }
    }
}
