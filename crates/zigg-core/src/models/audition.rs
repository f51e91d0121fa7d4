use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::media::{ImageContent, MediaImage, MediaVideo};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Audition {
    pub id: i64,
    pub title: String,
    pub company: String,
    pub qualification: String,
    #[serde(default)]
    pub thumbnail: Option<ImageContent>,
    pub start_date: String,
    pub end_date: String,
}

impl Audition {
    /// Calendar start date. Accepts both `yyyy-MM-dd` and full ISO timestamps.
    pub fn start_day(&self) -> Option<NaiveDate> {
        parse_day(&self.start_date)
    }

    /// Calendar end date. Accepts both `yyyy-MM-dd` and full ISO timestamps.
    pub fn end_day(&self) -> Option<NaiveDate> {
        parse_day(&self.end_date)
    }

    /// An audition is ongoing until the end of its end date. Auditions whose
    /// end date cannot be parsed are treated as ongoing.
    pub fn is_ongoing(&self, today: NaiveDate) -> bool {
        self.end_day().map(|end| end >= today).unwrap_or(true)
    }
}

/// Split auditions into (ongoing, completed), preserving order.
pub fn partition_by_status(auditions: Vec<Audition>, today: NaiveDate) -> (Vec<Audition>, Vec<Audition>) {
    auditions.into_iter().partition(|a| a.is_ongoing(today))
}

pub(crate) fn parse_day(raw: &str) -> Option<NaiveDate> {
    let day = raw.get(..10)?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

/// Body of `POST /auditions` and `PATCH /auditions/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditionPayload {
    pub title: String,
    pub company: String,
    pub qualification: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_id: Option<i64>,
}

/// Applicant list filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicantFilter {
    #[default]
    All,
    Scrap,
    Like,
}

impl ApplicantFilter {
    pub fn as_str(self) -> &'static str {
        match self {
            ApplicantFilter::All => "all",
            ApplicantFilter::Scrap => "scrap",
            ApplicantFilter::Like => "like",
        }
    }
}

impl std::str::FromStr for ApplicantFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(ApplicantFilter::All),
            "scrap" => Ok(ApplicantFilter::Scrap),
            "like" => Ok(ApplicantFilter::Like),
            other => Err(format!("Invalid filter '{}'. Must be: all, scrap, like", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantProfile {
    pub id: i64,
    pub name: String,
    pub age_or_year: String,
    pub height: String,
    pub weight: String,
    pub gender: String,
    pub nation: String,
    pub desired_position: String,
    #[serde(default)]
    pub images: Vec<MediaImage>,
    #[serde(default)]
    pub videos: Vec<MediaVideo>,
    pub instagram_id: String,
    pub contact_info: String,
    pub is_liked: bool,
    pub is_scrap: bool,
    pub user_id: i64,
    pub audition_id: i64,
    pub created_at: String,
}

/// One page of applicants. Pages are 0-based on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantPage {
    pub content: Vec<ApplicantProfile>,
    pub total_pages: u32,
}
