//! Course search (`cursussen_voor_cursusinschrijving/zoeken`).
//!
//! The search endpoint is an Elasticsearch proxy, so responses follow the
//! usual `hits.total` / `hits.hits[]._source` layout.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::lenient;

/// Top-level search response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Hit container.
    #[serde(default)]
    pub hits: SearchHits,
}

/// Hit container.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchHits {
    /// Total number of matches.
    #[serde(default)]
    pub total: HitTotal,
    /// Returned page of matches.
    #[serde(default)]
    pub hits: Vec<SearchHit>,
}

/// `hits.total`, a bare count on older Elasticsearch versions and an object
/// on newer ones.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HitTotal {
    /// `"total": 12`
    Count(u64),
    /// `"total": {"value": 12, "relation": "eq"}`
    Detailed {
        /// Number of matches.
        value: u64,
        /// `eq` or `gte`.
        #[serde(default)]
        relation: Option<String>,
    },
}

impl HitTotal {
    /// Number of matches.
    pub fn count(&self) -> u64 {
        match self {
            Self::Count(n) | Self::Detailed { value: n, .. } => *n,
        }
    }
}

impl Default for HitTotal {
    fn default() -> Self {
        Self::Count(0)
    }
}

/// A single search hit.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchHit {
    /// The matched course offering.
    #[serde(rename = "_source", default)]
    pub source: CourseOffering,
}

/// A course offering as indexed for registration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CourseOffering {
    /// Block-specific course id (`id_cursus_blok`), used to register.
    #[serde(rename = "id_cursus_blok", default, deserialize_with = "lenient::integer")]
    pub course_block_id: Option<i64>,
    /// Course id (`id_cursus`).
    #[serde(rename = "id_cursus", default, deserialize_with = "lenient::integer")]
    pub course_id: Option<i64>,
    /// Academic year (`collegejaar`).
    #[serde(rename = "collegejaar", default, deserialize_with = "lenient::integer")]
    pub academic_year: Option<i64>,
    /// Block/period (`blok`).
    #[serde(rename = "blok", default, deserialize_with = "lenient::string")]
    pub block: Option<String>,
    /// Course code (`cursus`).
    #[serde(rename = "cursus", default)]
    pub course_code: String,
    /// Short course name (`cursus_korte_naam`).
    #[serde(rename = "cursus_korte_naam", default)]
    pub course_name: String,
    /// Study credits (`punten`).
    #[serde(rename = "punten", default, deserialize_with = "lenient::number")]
    pub credits: Option<f64>,
    /// Registration periods currently attached (`inschrijfperiodes`).
    #[serde(rename = "inschrijfperiodes", default)]
    pub registration_periods: Vec<Value>,
}

impl CourseOffering {
    /// Returns true if any registration period is attached.
    pub fn registration_open(&self) -> bool {
        !self.registration_periods.is_empty()
    }
}
