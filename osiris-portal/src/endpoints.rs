//! Fixed URLs and identifiers of the Radboud Osiris deployment.

// ============================================================================
// Sign-in
// ============================================================================

/// OAuth authorize endpoint. Used for the first and the last sign-in hop.
pub const AUTHORIZE_URL: &str = "https://auth-app-ruprd-ruprd.xpaas.caci.nl/oauth2/authorize";

/// OAuth client id of the student app.
pub const CLIENT_ID: &str = "osiris-student-mobile-ruprd";

/// Redirect URI registered for the student app.
pub const REDIRECT_URI: &str = "https://ru.osiris-student.nl";

/// Username/password form of the university identity provider.
pub const LOGIN_URL: &str =
    "https://conext.authenticatie.ru.nl/simplesaml/module.php/core/loginuserpass.php?";

/// SAML assertion consumer of the federation hub.
pub const CONSUME_ASSERTION_URL: &str =
    "https://engine.surfconext.nl/authentication/sp/consume-assertion";

/// Cookies the assertion consumer needs; anything else is left out.
pub const ASSERTION_COOKIES: &[&str] = &["main", "HTTPSERVERID"];

/// Domains the sign-in flow and the student API live on.
pub const ALLOWED_DOMAINS: &[&str] = &[
    "xpaas.caci.nl",
    "authenticatie.ru.nl",
    "surfconext.nl",
    "osiris-student.nl",
];

// ============================================================================
// Student API
// ============================================================================

/// Base URL of the student API.
pub const API_BASE: &str = "https://ru.osiris-student.nl/student/osiris/student/";

/// Results.
pub const GRADES: &str = "resultaten";
/// Timetable grouped per week.
pub const SCHEDULE: &str = "rooster/per_week";
/// Registered courses.
pub const COURSE_REGISTRATIONS: &str = "inschrijvingen/cursussen";
/// Courses on a waiting list.
pub const COURSE_WAITLISTS: &str = "inschrijvingen/wachtlijsten_cursus";
/// Pre-registered courses.
pub const COURSE_PREREGISTRATIONS: &str = "inschrijvingen/voorinschrijvingen_cursus";
/// Registered tests.
pub const TEST_REGISTRATIONS: &str = "inschrijvingen/toetsen";
/// Courses open for registration; `/zoeken` to search, `/<id>` for details.
pub const COURSES_FOR_REGISTRATION: &str = "cursussen_voor_cursusinschrijving";
/// Tests open for registration, per course id.
pub const TESTS_FOR_REGISTRATION: &str = "toetsen_voor_toetsinschrijving";

/// Builds a student API URL from a path.
pub fn api_url(path: &str) -> String {
    format!("{API_BASE}{}", path.trim_start_matches('/'))
}

/// Domains as owned strings, for
/// [`HttpTransport::with_allowed_domains`](osiris_fetch::HttpTransport::with_allowed_domains).
pub fn allowed_domains() -> Vec<String> {
    ALLOWED_DOMAINS.iter().map(|d| (*d).to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_url() {
        assert_eq!(
            api_url("resultaten"),
            "https://ru.osiris-student.nl/student/osiris/student/resultaten"
        );
        assert_eq!(api_url("/rooster/per_week"), api_url(SCHEDULE));
    }

    #[test]
    fn test_all_hosts_are_allowed() {
        for url in [AUTHORIZE_URL, LOGIN_URL, CONSUME_ASSERTION_URL, API_BASE] {
            let host = url.split('/').nth(2).unwrap();
            assert!(
                ALLOWED_DOMAINS.iter().any(|d| host.ends_with(d)),
                "{host} is not allowed"
            );
        }
    }
}
