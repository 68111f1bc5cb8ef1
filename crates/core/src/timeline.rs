//! Hackathon timeline records shown alongside the voyage path.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    #[default]
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub title: String,
    pub role: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub description: String,
    #[serde(default)]
    pub outcome: Option<String>,
    #[serde(default)]
    pub repo: Option<String>,
    #[serde(default)]
    pub side: Side,
}

#[derive(Debug, Error)]
pub enum TimelineError {
    #[error("invalid timeline JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("entry {index} has an empty title")]
    EmptyTitle { index: usize },
}

/// Parse a JSON array of entries.
pub fn load_entries(data: &[u8]) -> Result<Vec<TimelineEntry>, TimelineError> {
    let entries: Vec<TimelineEntry> = serde_json::from_slice(data)?;
    if let Some(index) = entries.iter().position(|e| e.title.trim().is_empty()) {
        return Err(TimelineError::EmptyTitle { index });
    }
    Ok(entries)
}

fn entry(
    title: &str,
    role: &str,
    tags: &[&str],
    description: &str,
    outcome: Option<&str>,
    repo: &str,
    side: Side,
) -> TimelineEntry {
    TimelineEntry {
        title: title.to_owned(),
        role: role.to_owned(),
        tags: tags.iter().map(|&t| t.to_owned()).collect(),
        description: description.to_owned(),
        outcome: outcome.map(str::to_owned),
        repo: Some(repo.to_owned()),
        side,
    }
}

/// The hackathons and major projects listed on the portfolio page.
pub fn default_entries() -> Vec<TimelineEntry> {
    vec![
        entry(
            "PyExpo 2025",
            "Team Lead",
            &["Django", "Python"],
            "Built a local marketplace for farmers using Django.",
            None,
            "T043_CODECRAFTERS",
            Side::Left,
        ),
        entry(
            "Hack BIT 2025",
            "Team Member",
            &["AI/ML", "Computer Vision"],
            "Facial attendance system with AI/ML.",
            Some("Winners in AI/ML"),
            "BIT-25",
            Side::Right,
        ),
        entry(
            "KPR Hackathon",
            "Participant",
            &["AI", "Chatbot"],
            "AI-powered virtual patient chat for psychology students.",
            None,
            "KPR-Hackathon",
            Side::Left,
        ),
        entry(
            "IteliFlow",
            "Participant",
            &["UI Path", "Automation"],
            "Automated hackathon candidate selection with UI Path.",
            None,
            "Selection_Automation",
            Side::Right,
        ),
        entry(
            "IEEE Hackathon",
            "Participant",
            &["IoT", "Hardware"],
            "Portable milk analyzer device for dairy supply chains.",
            None,
            "Portable-Milk-Analyzer",
            Side::Left,
        ),
    ]
}
