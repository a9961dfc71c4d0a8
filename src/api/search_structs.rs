use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use validator::{Validate, ValidationError};

pub const DEFAULT_TOP_K: u32 = 10;
pub const DEFAULT_MIN_SCORE: f64 = 0.4;

/// Parameters for one search request. Built fresh from the current field
/// values every time a search starts.
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct SearchParameters {
    #[validate(range(min = 1))]
    pub top_k: u32,
    #[validate(range(min = 0.0, max = 1.0), custom(function = "finite_score"))]
    pub min_score: f64,
    pub filters: PatentFilters,
}

/// Rejects NaN, which `range` lets through.
pub(crate) fn finite_score(value: f64) -> Result<(), ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::new("finite")
            .with_message("min_score must be a finite number".into()))
    }
}

impl Default for SearchParameters {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            min_score: DEFAULT_MIN_SCORE,
            filters: PatentFilters::default(),
        }
    }
}

impl SearchParameters {
    #[must_use]
    pub fn new(top_k: u32, min_score: f64) -> Self {
        Self {
            top_k,
            min_score,
            filters: PatentFilters::default(),
        }
    }

    #[must_use]
    pub fn with_filters(mut self, filters: PatentFilters) -> Self {
        self.filters = filters;
        self
    }

    /// Fields every search sends.
    #[must_use]
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("top_k", self.top_k.to_string()),
            ("min_score", self.min_score.to_string()),
        ]
    }
}

/// Optional design-patent filters. Absent filters are left out of the request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatentFilters {
    pub keyword: Option<String>,
    pub loc_class: Option<String>,
    pub applicant: Option<String>,
}

impl PatentFilters {
    /// Build filters from raw field values. Blank values count as absent,
    /// anything else is sent as typed.
    #[must_use]
    pub fn from_fields(keyword: &str, loc_class: &str, applicant: &str) -> Self {
        Self {
            keyword: non_blank(keyword),
            loc_class: non_blank(loc_class),
            applicant: non_blank(applicant),
        }
    }

    #[must_use]
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        [
            ("keyword", &self.keyword),
            ("loc_class", &self.loc_class),
            ("applicant", &self.applicant),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.clone().map(|v| (name, v)))
        .collect()
    }
}

fn non_blank(value: &str) -> Option<String> {
    (!value.trim().is_empty()).then(|| value.to_string())
}

/// Response envelope shared by every json endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub code: i64,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
}

/// A 2xx response whose `code` is nonzero.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ApplicationError {
    pub code: i64,
    pub message: String,
}

impl<T> ApiEnvelope<T> {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.code == 0
    }

    /// Branch on the application status code.
    ///
    /// # Errors
    /// If `code` is nonzero, or a successful envelope carries no data.
    pub fn into_data(self) -> Result<T, ApplicationError> {
        if self.code != 0 {
            let message = self
                .message
                .unwrap_or_else(|| format!("Request failed with code {}", self.code));
            return Err(ApplicationError {
                code: self.code,
                message,
            });
        }
        self.data.ok_or_else(|| ApplicationError {
            code: self.code,
            message: "response contained no data".to_string(),
        })
    }
}

/// Stage name to duration in milliseconds.
pub type Timing = BTreeMap<String, f64>;

/// The parameters the server reports it used.
pub type QueryEcho = Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchData<R> {
    pub results: Vec<R>,
    #[serde(default)]
    pub timing: Timing,
    #[serde(default)]
    pub query_info: QueryEcho,
}

pub type SearchResponse<R> = ApiEnvelope<SearchData<R>>;

// General collection

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseMatch {
    pub patent_id: String,
    pub max_score: f64,
    pub pages: Vec<BasePage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasePage {
    pub id: i64,
    pub file_name: String,
    /// Page label as stored, e.g. `001`.
    pub page_num: String,
    pub score: f64,
    pub thumbnail_url: String,
}

// Design patents

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatentMatch {
    pub patent_id: String,
    pub max_score: f64,
    pub pages: Vec<PatentPage>,
    #[serde(flatten)]
    pub metadata: PatentMetadata,
}

impl PatentMatch {
    #[must_use]
    pub fn page_scores(&self) -> Vec<f64> {
        self.pages.iter().map(|p| p.score).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatentPage {
    pub id: i64,
    pub image_index: i64,
    pub file_name: String,
    pub file_path: String,
    pub score: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatentMetadata {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub loc_class: Option<String>,
    /// `YYYYMMDD`
    #[serde(default)]
    pub pub_date: Option<i64>,
    /// `YYYYMMDD`
    #[serde(default)]
    pub filing_date: Option<i64>,
    #[serde(default)]
    pub applicant_name: Option<String>,
    #[serde(default)]
    pub applicant_country: Option<String>,
    #[serde(default)]
    pub inventor_names: Option<String>,
    #[serde(default)]
    pub claim_text: Option<String>,
    #[serde(default)]
    pub image_count: Option<i64>,
}

/// Parse an 8 digit `YYYYMMDD` integer.
#[must_use]
pub fn parse_patent_date(value: i64) -> Option<NaiveDate> {
    if !(10_000_000..=99_999_999).contains(&value) {
        return None;
    }
    let year = i32::try_from(value / 10_000).ok()?;
    let month = u32::try_from(value / 100 % 100).ok()?;
    let day = u32::try_from(value % 100).ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// `YYYY-MM-DD`, or the raw number when it isn't a valid date.
#[must_use]
pub fn format_patent_date(value: i64) -> String {
    parse_patent_date(value).map_or_else(|| value.to_string(), |d| d.format("%Y-%m-%d").to_string())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatentDetail {
    pub patent_id: String,
    pub images: Vec<Value>,
    pub metadata: PatentMetadata,
}

// Stats

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsData {
    pub collection: CollectionStats,
    #[serde(default)]
    pub model: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionStats {
    #[serde(default)]
    pub name: Option<String>,
    pub num_entities: i64,
    #[serde(default)]
    pub has_index: Option<bool>,
    #[serde(default)]
    pub connected: Option<bool>,
    #[serde(default)]
    pub error: Option<String>,
}
