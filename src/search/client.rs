//! golfcourseapi.com client.
//!
//! Searches the public course directory by free text and fetches single
//! course records.

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

pub const DEFAULT_API_URL: &str = "https://api.golfcourseapi.com/v1";

/// Errors from the course directory.
#[derive(Debug)]
pub enum SearchError {
    MissingApiKey,
    Http(reqwest::Error),
    Status(u16),
    Decode(String),
}

impl std::fmt::Display for SearchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchError::MissingApiKey => write!(
                f,
                "No course API key configured. Set course_api_key or GOLFTRACKER_API_KEY"
            ),
            SearchError::Http(e) => write!(f, "HTTP error: {}", e),
            SearchError::Status(code) => write!(f, "Course API returned status {}", code),
            SearchError::Decode(e) => write!(f, "Cannot decode course API response: {}", e),
        }
    }
}

impl std::error::Error for SearchError {}

impl From<reqwest::Error> for SearchError {
    fn from(e: reqwest::Error) -> Self {
        SearchError::Http(e)
    }
}

// --- Course API response types ---

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TeeBox {
    #[serde(default)]
    pub tee_name: String,
    #[serde(default)]
    pub course_rating: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TeeSets {
    #[serde(default)]
    pub female: Vec<TeeBox>,
    #[serde(default)]
    pub male: Vec<TeeBox>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CourseLocation {
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GolfCourse {
    pub id: u64,
    #[serde(default)]
    pub club_name: String,
    #[serde(default)]
    pub course_name: String,
    #[serde(default)]
    pub location: CourseLocation,
    #[serde(default)]
    pub tees: TeeSets,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    courses: Vec<GolfCourse>,
}

/// Client for the course directory API.
#[derive(Debug, Clone)]
pub struct CourseSearchClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl CourseSearchClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, SearchError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(CourseSearchClient {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    fn headers(&self) -> Result<HeaderMap, SearchError> {
        if self.api_key.trim().is_empty() {
            return Err(SearchError::MissingApiKey);
        }
        let mut headers = HeaderMap::new();
        let value = HeaderValue::from_str(&format!("Key {}", self.api_key))
            .map_err(|e| SearchError::Decode(e.to_string()))?;
        headers.insert(AUTHORIZATION, value);
        Ok(headers)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, SearchError> {
        let response = self
            .client
            .get(url)
            .headers(self.headers()?)
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            error!(url, status = status.as_u16(), "Course API request failed");
            return Err(SearchError::Status(status.as_u16()));
        }

        response.json::<T>().await.map_err(|e| {
            if e.is_decode() {
                SearchError::Decode(e.to_string())
            } else {
                SearchError::Http(e)
            }
        })
    }

    /// Courses matching a free-text query, in the order the API returns them.
    pub async fn search_courses(&self, query: &str) -> Result<Vec<GolfCourse>, SearchError> {
        let url = format!("{}/search", self.base_url);
        let response: SearchResponse = self.get_json(&url, &[("search_query", query)]).await?;
        debug!(query, results = response.courses.len(), "Course search finished");
        Ok(response.courses)
    }

    pub async fn course_by_id(&self, id: u64) -> Result<GolfCourse, SearchError> {
        let url = format!("{}/courses/{}", self.base_url, id);
        self.get_json(&url, &[]).await
    }
}
