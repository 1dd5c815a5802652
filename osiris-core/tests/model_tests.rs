//! Integration tests for portal models.

use chrono::NaiveDate;
use osiris_core::calendar::{academic_year, same_iso_week};
use osiris_core::{ActivityKind, CourseInfo, ScheduleWeek};

#[test]
fn test_registration_payload_from_portal_record() {
    let info: CourseInfo = serde_json::from_str(
        r#"{"id_cursus_blok": 147435, "cursus": "NWI-IBC019",
            "kosten": [{"bedrag": 0}], "werkvormen": [{"werkvorm": "HC"}],
            "is_in_enrolment_period": true}"#,
    )
    .unwrap();

    let body = info.to_registration();
    assert_eq!(body.course_block_id().unwrap(), "147435");
    assert_eq!(body.field("enrollment_type"), "regular");
    assert_eq!(body.field("is_in_enrolment_period"), "false");
    assert!(body.0["kosten"].as_array().unwrap().is_empty());
    // Original is untouched
    assert_eq!(info.field("is_in_enrolment_period"), "true");
}

#[test]
fn test_schedule_activity_kinds() {
    let week: ScheduleWeek = serde_json::from_str(
        r#"{"week": 2, "dagen": [{"rooster": [
            {"onderwerp": "A Lab", "soort_rooster": "LAB"},
            {"onderwerp": "B Response", "soort_rooster": "RSP"},
            {"onderwerp": "C Thing", "soort_rooster": "XYZ"}
        ]}]}"#,
    )
    .unwrap();

    let kinds: Vec<_> = week.days[0].entries.iter().map(|e| e.activity()).collect();
    assert_eq!(kinds[0], ActivityKind::Lab);
    assert_eq!(kinds[1], ActivityKind::Response);
    assert_eq!(kinds[2].to_string(), "XYZ");
}

#[test]
fn test_calendar_helpers() {
    let sept = NaiveDate::from_ymd_opt(2024, 9, 2).unwrap();
    assert_eq!(academic_year(sept), 2024);
    assert!(same_iso_week(sept, NaiveDate::from_ymd_opt(2024, 9, 8).unwrap()));
}
