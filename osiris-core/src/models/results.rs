//! Course results (`resultaten`).

use serde::{Deserialize, Serialize};

use super::lenient;

/// A single course result.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Grade {
    /// Course code (`cursus`).
    #[serde(rename = "cursus", default)]
    pub course_code: String,
    /// Short course name (`cursus_korte_naam`).
    #[serde(rename = "cursus_korte_naam", default)]
    pub course_name: String,
    /// Academic year (`collegejaar`).
    #[serde(rename = "collegejaar", default, deserialize_with = "lenient::integer")]
    pub academic_year: Option<i64>,
    /// Block/period (`blok`).
    #[serde(rename = "blok", default, deserialize_with = "lenient::string")]
    pub block: Option<String>,
    /// Weight of the result (`weging`).
    #[serde(rename = "weging", default, deserialize_with = "lenient::string")]
    pub weight: Option<String>,
    /// The grade itself (`resultaat`).
    #[serde(rename = "resultaat", default, deserialize_with = "lenient::string")]
    pub result: Option<String>,
    /// Pass flag (`voldoende`), `"J"` when passed.
    #[serde(rename = "voldoende", default, deserialize_with = "lenient::string")]
    pub sufficient: Option<String>,
}

impl Grade {
    /// Returns true if the portal marks this result as sufficient.
    pub fn is_passed(&self) -> bool {
        self.sufficient.as_deref() == Some("J")
    }
}
