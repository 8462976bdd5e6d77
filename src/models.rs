//! Typed wire models for the public portfolio surface.
//!
//! The admin console treats records as opaque JSON driven by the field
//! schema; the read-mostly public page gets real types. Field names match
//! the collaborator's snake_case wire format, and everything optional on the
//! server side is optional or defaulted here so a sparse record still
//! deserializes.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: i64,
    #[serde(default)]
    pub user: Option<i64>,
    pub full_name: String,
    #[serde(default)]
    pub bio_summary: String,
    #[serde(default)]
    pub resume_link: String,
    #[serde(default)]
    pub profile_picture: Option<String>,
    #[serde(default)]
    pub profile_picture_url: Option<String>,
    #[serde(default)]
    pub profile_photo: Option<String>,
    #[serde(default)]
    pub location: String,
}

impl Profile {
    /// Photo resolution chain: rendered photo, then the external URL, then
    /// the uploaded file path.
    pub fn photo(&self) -> Option<&str> {
        self.profile_photo
            .as_deref()
            .or(self.profile_picture_url.as_deref())
            .or(self.profile_picture.as_deref())
            .filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    #[serde(default)]
    pub user: Option<i64>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub technologies: Vec<i64>,
    #[serde(default)]
    pub live_link: String,
    #[serde(default)]
    pub github_link: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub display_order: i64,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Skill {
    pub id: i64,
    #[serde(default)]
    pub user: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub proficiency_level: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub certification_url: Option<String>,
}

impl Skill {
    pub fn proficiency_label(&self) -> &str {
        match self.proficiency_level.as_str() {
            "beg" => "Beginner",
            "int" => "Intermediate",
            "adv" => "Advanced",
            other => other,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Experience {
    pub id: i64,
    #[serde(default)]
    pub user: Option<i64>,
    pub job_title: String,
    pub company_name: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub responsibilities: String,
    #[serde(default)]
    pub is_current: bool,
}

impl Experience {
    /// "Mar 2021 - Present" style range for display.
    pub fn date_range(&self) -> String {
        let start = format_date(&self.start_date);
        let end = if self.is_current {
            "Present".to_string()
        } else {
            self.end_date.as_deref().map(format_date).unwrap_or_default()
        };
        if end.is_empty() {
            start
        } else {
            format!("{start} - {end}")
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Technology {
    pub id: i64,
    pub name: String,
}

/// Contact message submission from the public surface. `is_read` always
/// posts as false; the collaborator assigns everything else.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactMessagePayload {
    pub sender_name: String,
    pub sender_email: String,
    pub subject: String,
    pub message_content: String,
    pub is_read: bool,
}

impl ContactMessagePayload {
    pub fn new(
        sender_name: impl Into<String>,
        sender_email: impl Into<String>,
        subject: impl Into<String>,
        message_content: impl Into<String>,
    ) -> Self {
        Self {
            sender_name: sender_name.into(),
            sender_email: sender_email.into(),
            subject: subject.into(),
            message_content: message_content.into(),
            is_read: false,
        }
    }
}

/// Humanize a wire date (`2024-03-01` or RFC 3339) as "Mar 2024". Unknown
/// formats pass through unchanged.
pub fn format_date(raw: &str) -> String {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.format("%b %Y").to_string();
    }
    if let Ok(stamp) = DateTime::parse_from_rfc3339(raw) {
        return stamp.format("%b %e, %Y").to_string();
    }
    raw.to_string()
}
