//! Course search queries.
//!
//! The search endpoint takes a raw Elasticsearch request. Matching is a
//! phrase prefix on the course code or the course name, limited to one
//! academic year.

use chrono::NaiveDate;
use osiris_core::calendar::academic_year;
use serde_json::{Value, json};

/// Number of hits requested.
pub const PAGE_SIZE: u32 = 25;

/// A course search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseQuery {
    text: String,
    academic_year: i32,
    size: u32,
}

impl CourseQuery {
    /// Searches `text` in the academic year of `today`.
    pub fn new(text: impl Into<String>, today: NaiveDate) -> Self {
        Self {
            text: text.into(),
            academic_year: academic_year(today),
            size: PAGE_SIZE,
        }
    }

    /// Overrides the academic year.
    #[must_use]
    pub fn in_year(mut self, year: i32) -> Self {
        self.academic_year = year;
        self
    }

    /// The searched text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The academic year searched in.
    pub fn academic_year(&self) -> i32 {
        self.academic_year
    }

    /// Builds the request body.
    pub fn to_body(&self) -> Value {
        json!({
            "from": 0,
            "size": self.size,
            "sort": [
                {"cursus_korte_naam.raw": {"order": "asc"}},
                {"cursus": {"order": "asc"}},
                {"collegejaar": {"order": "desc"}},
                {"blok": {"order": "asc"}}
            ],
            "post_filter": {
                "terms": {"collegejaar": [self.academic_year]}
            },
            "query": {
                "bool": {
                    "should": [
                        {"match_phrase_prefix": {"cursus": self.text}},
                        {"match_phrase_prefix": {"cursus_korte_naam": self.text}}
                    ],
                    "minimum_should_match": 1
                }
            }
        })
    }
}
