//! Serde tests for portal payloads.
//!
//! Payloads are modelled on real `resultaten`, `rooster` and registration
//! responses, including the places where the portal mixes strings and numbers.

use serde_json::json;

use crate::{Course, CourseInfo, Exam, Grade, ScheduleWeek, SearchResponse, TestOccasion};

// ============================================================================
// Grades
// ============================================================================

#[test]
fn test_grades_list_deserialize() {
    let items = json!([
        {"cursus": "NWI-IPC002", "cursus_korte_naam": "Programming", "collegejaar": "2019",
         "blok": 1, "weging": "1", "resultaat": "8,5", "voldoende": "J", "extra": {"ignored": true}},
        {"cursus": "NWI-IBC019", "collegejaar": 2019, "resultaat": null}
    ]);

    let grades: Vec<Grade> = serde_json::from_value(items).unwrap();
    assert_eq!(grades.len(), 2);
    assert_eq!(grades[0].academic_year, Some(2019));
    assert_eq!(grades[0].block.as_deref(), Some("1"));
    assert_eq!(grades[0].result.as_deref(), Some("8,5"));
    assert!(grades[1].course_name.is_empty());
    assert!(grades[1].result.is_none());
}

#[test]
fn test_grade_serializes_portal_names() {
    let grade = Grade {
        course_code: "NWI-IPC002".to_string(),
        result: Some("7".to_string()),
        ..Default::default()
    };
    let value = serde_json::to_value(&grade).unwrap();
    assert_eq!(value["cursus"], json!("NWI-IPC002"));
    assert_eq!(value["resultaat"], json!("7"));
}

// ============================================================================
// Schedule
// ============================================================================

#[test]
fn test_schedule_week_missing_fields() {
    let week: ScheduleWeek = serde_json::from_value(json!({"dagen": [{}]})).unwrap();
    assert!(week.week.is_none());
    assert!(week.is_empty());
}

#[test]
fn test_schedule_week_survives_cache_roundtrip() {
    let week: ScheduleWeek = serde_json::from_value(json!({
        "week": "37",
        "dagen": [{"datum": "2019-09-09", "rooster": [
            {"onderwerp": "NWI-IBC019 Operating Systems", "soort_rooster": "LAB",
             "tijd_vanaf": "13:30", "tijd_tm": "15:15", "locatie": "HG00.023"}
        ]}]
    }))
    .unwrap();

    let cached = serde_json::to_string(&week).unwrap();
    let restored: ScheduleWeek = serde_json::from_str(&cached).unwrap();
    assert_eq!(restored.week, Some(37));
    assert_eq!(restored.days[0].date.as_deref(), Some("2019-09-09"));
    assert_eq!(restored.days[0].entries[0].title(), "Operating Systems");
}

// ============================================================================
// Registrations
// ============================================================================

#[test]
fn test_course_credits_as_string() {
    let course: Course =
        serde_json::from_value(json!({"id_cursus": "88", "punten": "6,0"})).unwrap();
    assert_eq!(course.course_id, Some(88));
    assert!(course.is_full_course());
}

#[test]
fn test_exam_deserialize() {
    let exam: Exam = serde_json::from_value(json!({
        "collegejaar": 2019, "cursus": "NWI-IBC019", "cursus_korte_naam": "Operating Systems",
        "id_toets_gelegenheid": 901, "toets_omschrijving": "Written exam",
        "gelegenheid": 2, "toetsdatum": "2020-01-24", "dag": "vr"
    }))
    .unwrap();
    assert_eq!(exam.occasion_id, Some(901));
    assert!(!exam.is_first_attempt());
    assert_eq!(exam.day.as_deref(), Some("vr"));
}

#[test]
fn test_course_info_is_passed_through() {
    let raw = json!({"id_cursus_blok": 1, "nested": {"a": [1, 2]}, "onbekend": "x"});
    let info: CourseInfo = serde_json::from_value(raw.clone()).unwrap();
    assert_eq!(serde_json::to_value(&info).unwrap(), raw);
}

#[test]
fn test_test_occasion_is_passed_through() {
    let raw = json!({"id_toets_gelegenheid": 5, "toets": "TT", "ingeschreven": "N"});
    let occasion: TestOccasion = serde_json::from_value(raw.clone()).unwrap();
    assert_eq!(occasion.occasion_id(), "5");
    assert_eq!(serde_json::to_value(&occasion).unwrap(), raw);
}

// ============================================================================
// Search
// ============================================================================

#[test]
fn test_search_empty_body() {
    let resp: SearchResponse = serde_json::from_value(json!({})).unwrap();
    assert_eq!(resp.hits.total.count(), 0);
    assert!(resp.hits.hits.is_empty());
}
