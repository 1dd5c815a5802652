//! Student API client.
//!
//! Every call goes through [`PortalClient::request`], which refuses to touch
//! the network without a bearer token and maps `401` to
//! [`PortalError::Unauthorized`].

use osiris_core::{
    BearerToken, Course, CourseInfo, CourseTests, Exam, Grade, ScheduleWeek, SearchResponse,
    TestOccasion,
};
use osiris_fetch::{HttpRequest, HttpResponse, Method, Transport};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::endpoints::{self, api_url};
use crate::error::PortalError;
use crate::search::CourseQuery;

/// Default value of the `taal` header.
pub const DEFAULT_LANGUAGE: &str = "EN";

/// List responses wrap their rows in `items`.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "R: DeserializeOwned"))]
struct Items<R> {
    #[serde(default)]
    items: Vec<R>,
}

/// Result of a registration request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistrationOutcome {
    /// HTTP status returned by the portal.
    pub status: u16,
}

impl RegistrationOutcome {
    /// Returns true if the portal accepted the registration.
    pub fn accepted(&self) -> bool {
        self.status == 200
    }
}

// ============================================================================
// Portal Client
// ============================================================================

/// Authenticated client for the student API.
#[derive(Debug)]
pub struct PortalClient<T> {
    transport: T,
    token: Option<BearerToken>,
    language: String,
}

impl<T: Transport> PortalClient<T> {
    /// Creates a client. Without a token every call fails with
    /// [`PortalError::NoCredentials`].
    pub fn new(transport: T, token: Option<BearerToken>) -> Self {
        Self {
            transport,
            token,
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }

    /// Sets the `taal` header value.
    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Returns true if a token is available.
    pub fn is_signed_in(&self) -> bool {
        self.token.is_some()
    }

    /// The underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    // ------------------------------------------------------------------------
    // Request helpers
    // ------------------------------------------------------------------------

    /// Sends an authenticated request to an API path.
    ///
    /// # Errors
    ///
    /// Returns `NoCredentials` without sending anything if there is no token,
    /// and `Unauthorized` if the portal answers `401`.
    #[instrument(skip(self, query, body), fields(method = %method))]
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<Value>,
    ) -> Result<HttpResponse, PortalError> {
        let token = self.token.as_ref().ok_or(PortalError::NoCredentials)?;

        let mut request = HttpRequest::new(method, api_url(path))
            .header("Authorization", token.authorization())
            .header("taal", self.language.as_str());
        for (name, value) in query {
            request = request.query(*name, value.as_str());
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = self.transport.send(request).await?;
        debug!(status = response.status, "API response");

        if response.status == 401 {
            return Err(PortalError::Unauthorized);
        }
        Ok(response)
    }

    async fn fetch_json<R: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<Value>,
    ) -> Result<R, PortalError> {
        let response = self.request(method, path, query, body).await?;
        if !response.is_success() {
            return Err(PortalError::UnexpectedStatus {
                status: response.status,
                path: path.to_string(),
            });
        }
        Ok(response.json()?)
    }

    async fn get_json<R: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<R, PortalError> {
        self.fetch_json(Method::Get, path, query, None).await
    }

    async fn get_items<R: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<R>, PortalError> {
        let page: Items<R> = self.get_json(path, query).await?;
        Ok(page.items)
    }

    async fn put(&self, path: &str, body: Value) -> Result<RegistrationOutcome, PortalError> {
        let response = self.request(Method::Put, path, &[], Some(body)).await?;
        Ok(RegistrationOutcome {
            status: response.status,
        })
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    /// Course results.
    ///
    /// # Errors
    ///
    /// Returns a `PortalError` if the request fails or the response is invalid.
    pub async fn grades(&self, limit: u32) -> Result<Vec<Grade>, PortalError> {
        self.get_items(endpoints::GRADES, &[("limit", limit.to_string())])
            .await
    }

    /// The next `n_weeks` weeks of the timetable.
    ///
    /// # Errors
    ///
    /// Returns a `PortalError` if the request fails or the response is invalid.
    pub async fn schedule(&self, n_weeks: u32) -> Result<Vec<ScheduleWeek>, PortalError> {
        self.get_items(endpoints::SCHEDULE, &[("limit", n_weeks.to_string())])
            .await
    }

    /// Registered, waitlisted and pre-registered courses, in that order.
    ///
    /// # Errors
    ///
    /// Returns the first failing request's error.
    pub async fn registered_courses(&self) -> Result<Vec<Course>, PortalError> {
        let mut courses = Vec::new();
        for path in [
            endpoints::COURSE_REGISTRATIONS,
            endpoints::COURSE_WAITLISTS,
            endpoints::COURSE_PREREGISTRATIONS,
        ] {
            courses.extend(self.get_items::<Course>(path, &[]).await?);
        }
        Ok(courses)
    }

    /// Registered tests.
    ///
    /// # Errors
    ///
    /// Returns a `PortalError` if the request fails or the response is invalid.
    pub async fn registered_exams(&self, limit: u32) -> Result<Vec<Exam>, PortalError> {
        self.get_items(endpoints::TEST_REGISTRATIONS, &[("limit", limit.to_string())])
            .await
    }

    /// Searches courses open for registration.
    ///
    /// # Errors
    ///
    /// Returns a `PortalError` if the request fails or the response is invalid.
    pub async fn search_courses(&self, query: &CourseQuery) -> Result<SearchResponse, PortalError> {
        let path = format!("{}/zoeken", endpoints::COURSES_FOR_REGISTRATION);
        self.fetch_json(Method::Post, &path, &[], Some(query.to_body()))
            .await
    }

    /// Full record of a course offering.
    ///
    /// # Errors
    ///
    /// Returns a `PortalError` if the request fails or the response is invalid.
    pub async fn course_info(&self, course_block_id: &str) -> Result<CourseInfo, PortalError> {
        let path = format!(
            "{}/{}",
            endpoints::COURSES_FOR_REGISTRATION,
            course_block_id.trim()
        );
        self.get_json(&path, &[]).await
    }

    /// Registers for a course offering fetched with [`course_info`](Self::course_info).
    ///
    /// # Errors
    ///
    /// Returns `CoreError::MissingField` (wrapped) if the record has no
    /// `id_cursus_blok`, or a `PortalError` if the request fails.
    pub async fn register_for_course(
        &self,
        info: &CourseInfo,
    ) -> Result<RegistrationOutcome, PortalError> {
        let id = info.course_block_id()?;
        let body = serde_json::to_value(info.to_registration())?;
        self.put(&format!("{}/{id}", endpoints::COURSE_REGISTRATIONS), body)
            .await
    }

    /// Test occasions of a course that are open for registration.
    ///
    /// # Errors
    ///
    /// Returns a `PortalError` if the request fails or the response is invalid.
    pub async fn course_tests(&self, course_id: &str) -> Result<CourseTests, PortalError> {
        let path = format!("{}/{}", endpoints::TESTS_FOR_REGISTRATION, course_id.trim());
        self.get_json(&path, &[]).await
    }

    /// Registers for a test occasion.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::MissingField` (wrapped) if the occasion has no id,
    /// or a `PortalError` if the request fails.
    pub async fn register_for_test(
        &self,
        test: &TestOccasion,
    ) -> Result<RegistrationOutcome, PortalError> {
        let id = test.occasion_id();
        if id.is_empty() {
            return Err(osiris_core::CoreError::MissingField("id_toets_gelegenheid".to_string()).into());
        }
        let body = serde_json::to_value(test)?;
        self.put(&format!("{}/{id}", endpoints::TEST_REGISTRATIONS), body)
            .await
    }
}

// ============================================================================
// Tests
// ============================================================================
