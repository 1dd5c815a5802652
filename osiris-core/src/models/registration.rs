//! Course and test registrations.
//!
//! [`Course`] and [`Exam`] are read-only list rows. [`CourseInfo`] and
//! [`TestOccasion`] are sent back to the portal when registering, so they keep
//! the full JSON object and expose typed accessors on top of it.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::lenient::{self, display_value};
use crate::error::CoreError;

// ============================================================================
// Registered Courses
// ============================================================================

/// A course the student is registered, waitlisted or pre-registered for.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Course {
    /// Academic year (`collegejaar`).
    #[serde(rename = "collegejaar", default, deserialize_with = "lenient::integer")]
    pub academic_year: Option<i64>,
    /// Block/period (`blok`).
    #[serde(rename = "blok", default, deserialize_with = "lenient::string")]
    pub block: Option<String>,
    /// Course id (`id_cursus`).
    #[serde(rename = "id_cursus", default, deserialize_with = "lenient::integer")]
    pub course_id: Option<i64>,
    /// Course code (`cursus`).
    #[serde(rename = "cursus", default)]
    pub course_code: String,
    /// Short course name (`cursus_korte_naam`).
    #[serde(rename = "cursus_korte_naam", default)]
    pub course_name: String,
    /// Study credits (`punten`).
    #[serde(rename = "punten", default, deserialize_with = "lenient::number")]
    pub credits: Option<f64>,
}

impl Course {
    /// Sort key: year, then block, then course id.
    pub fn sort_key(&self) -> (Option<i64>, Option<String>, Option<i64>) {
        (self.academic_year, self.block.clone(), self.course_id)
    }

    /// Returns true for a standard 6 EC course.
    pub fn is_full_course(&self) -> bool {
        self.credits.is_some_and(|ec| (ec - 6.0).abs() < f64::EPSILON)
    }
}

// ============================================================================
// Registered Exams
// ============================================================================

/// A test occasion the student is registered for.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Exam {
    /// Academic year (`collegejaar`).
    #[serde(rename = "collegejaar", default, deserialize_with = "lenient::integer")]
    pub academic_year: Option<i64>,
    /// Block/period (`blok`).
    #[serde(rename = "blok", default, deserialize_with = "lenient::string")]
    pub block: Option<String>,
    /// Course id (`id_cursus`).
    #[serde(rename = "id_cursus", default, deserialize_with = "lenient::integer")]
    pub course_id: Option<i64>,
    /// Course code (`cursus`).
    #[serde(rename = "cursus", default)]
    pub course_code: String,
    /// Short course name (`cursus_korte_naam`).
    #[serde(rename = "cursus_korte_naam", default)]
    pub course_name: String,
    /// Test occasion id (`id_toets_gelegenheid`).
    #[serde(rename = "id_toets_gelegenheid", default, deserialize_with = "lenient::integer")]
    pub occasion_id: Option<i64>,
    /// Test description (`toets_omschrijving`).
    #[serde(rename = "toets_omschrijving", default, deserialize_with = "lenient::string")]
    pub description: Option<String>,
    /// Attempt number (`gelegenheid`), 1 for the first sitting.
    #[serde(rename = "gelegenheid", default, deserialize_with = "lenient::integer")]
    pub attempt: Option<i64>,
    /// Test date (`toetsdatum`).
    #[serde(rename = "toetsdatum", default, deserialize_with = "lenient::string")]
    pub date: Option<String>,
    /// Weekday (`dag`).
    #[serde(rename = "dag", default, deserialize_with = "lenient::string")]
    pub day: Option<String>,
}

impl Exam {
    /// Returns true for a first sitting.
    pub fn is_first_attempt(&self) -> bool {
        self.attempt == Some(1)
    }
}

// ============================================================================
// Course Info (registration payload)
// ============================================================================

/// Fields that must be emptied before a course registration is sent.
const RESET_TO_EMPTY_LIST: &[&str] = &[
    "toets_voorzieningen",
    "toetsen",
    "werkvorm_groepen",
    "werkvormen",
    "werkvorm_voorzieningen",
    "blokken",
    "kosten",
    "inschrijfperiodes",
    "groepen",
];

/// Full course record from `cursussen_voor_cursusinschrijving/<id>`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CourseInfo(pub Map<String, Value>);

impl CourseInfo {
    /// Returns a field formatted for display (empty if absent).
    pub fn field(&self, name: &str) -> String {
        self.0.get(name).map(display_value).unwrap_or_default()
    }

    /// The block-specific course id (`id_cursus_blok`).
    ///
    /// # Errors
    ///
    /// Returns `CoreError::MissingField` if the record has no id.
    pub fn course_block_id(&self) -> Result<String, CoreError> {
        match self.0.get("id_cursus_blok") {
            Some(Value::Null) | None => Err(CoreError::MissingField("id_cursus_blok".to_string())),
            Some(v) => Ok(display_value(v)),
        }
    }

    /// Study types offered (`werkvorm_voorzieningen`) as `(code, description)`.
    pub fn study_types(&self) -> Vec<(String, String)> {
        self.pairs("werkvorm_voorzieningen", "werkvorm", "werkvorm_omschrijving")
    }

    /// Test types offered (`toets_voorzieningen`) as `(code, description)`.
    pub fn test_types(&self) -> Vec<(String, String)> {
        self.pairs("toets_voorzieningen", "toets", "toets_omschrijving")
    }

    fn pairs(&self, list: &str, code: &str, description: &str) -> Vec<(String, String)> {
        self.0
            .get(list)
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .map(|item| {
                        let get = |k: &str| item.get(k).map(display_value).unwrap_or_default();
                        (get(code), get(description))
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Builds the body for a course registration.
    ///
    /// Selection lists are emptied, the enrollment type is set to `regular`
    /// and every other field is sent back unchanged.
    pub fn to_registration(&self) -> CourseInfo {
        let mut body = self.0.clone();
        for key in RESET_TO_EMPTY_LIST {
            body.insert((*key).to_string(), Value::Array(Vec::new()));
        }
        body.insert("enrollment_type".to_string(), Value::from("regular"));
        body.insert("onderdeel_van".to_string(), Value::from(""));
        body.insert("is_in_enrolment_period".to_string(), Value::Bool(false));
        CourseInfo(body)
    }
}

// ============================================================================
// Tests open for registration
// ============================================================================

/// Test occasions for a course, from `toetsen_voor_toetsinschrijving/<id>`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CourseTests {
    /// Academic year (`collegejaar`).
    #[serde(rename = "collegejaar", default, deserialize_with = "lenient::integer")]
    pub academic_year: Option<i64>,
    /// Course code (`cursus`).
    #[serde(rename = "cursus", default)]
    pub course_code: String,
    /// Short course name (`cursus_korte_naam`).
    #[serde(rename = "cursus_korte_naam", default)]
    pub course_name: String,
    /// Available test occasions (`toetsen`).
    #[serde(rename = "toetsen", default)]
    pub tests: Vec<TestOccasion>,
}

impl CourseTests {
    /// Finds a test occasion by its `id_toets_gelegenheid`.
    pub fn find(&self, occasion_id: &str) -> Option<&TestOccasion> {
        let wanted = occasion_id.trim();
        self.tests.iter().find(|t| t.occasion_id() == wanted)
    }
}

/// A single test occasion; sent back verbatim when registering.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TestOccasion(pub Map<String, Value>);

impl TestOccasion {
    /// Returns a field formatted for display (empty if absent).
    pub fn field(&self, name: &str) -> String {
        self.0.get(name).map(display_value).unwrap_or_default()
    }

    /// The occasion id (`id_toets_gelegenheid`) as text.
    pub fn occasion_id(&self) -> String {
        self.field("id_toets_gelegenheid")
    }
}
