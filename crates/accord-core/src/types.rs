use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ── Dispute ──────────────────────────────────────────────────────────────

/// Lifecycle status of a dispute. Membership in this enum is the only
/// constraint — any status may follow any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisputeStatus {
    Submitted,
    UnderReview,
    Mediated,
    Resolved,
}

impl DisputeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Submitted => "submitted",
            Self::UnderReview => "under_review",
            Self::Mediated => "mediated",
            Self::Resolved => "resolved",
        }
    }

    /// Parse a status string. Returns None for anything outside the enum.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "submitted" => Some(Self::Submitted),
            "under_review" => Some(Self::UnderReview),
            "mediated" => Some(Self::Mediated),
            "resolved" => Some(Self::Resolved),
            _ => None,
        }
    }
}

/// The two named parties to a dispute.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parties {
    pub plaintiff: String,
    pub defendant: String,
}

/// A dispute case as stored in the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dispute {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub category: String,
    /// Disputed amount in dollars. None when the submitter left it blank.
    pub amount: Option<f64>,
    pub parties: Parties,
    /// One extracted text block per accepted upload, in upload order.
    /// Each block starts with a source-file (or extraction-failure) header.
    pub evidence_texts: Vec<String>,
    pub status: DisputeStatus,
    pub ai_analysis: Option<String>,
    pub settlement_suggestions: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields supplied by the submitter; the store assigns id and timestamps.
#[derive(Debug, Clone)]
pub struct NewDispute {
    pub title: String,
    pub description: String,
    pub category: String,
    pub amount: Option<f64>,
    pub parties: Parties,
    pub evidence_texts: Vec<String>,
}

// ── Chat ─────────────────────────────────────────────────────────────────

/// One chat interaction with the AI mediator. Immutable once written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: i64,
    pub dispute_id: i64,
    pub user_message: String,
    pub ai_response: String,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parse_round_trip() {
        for s in ["submitted", "under_review", "mediated", "resolved"] {
            let status = DisputeStatus::parse(s);
            assert!(status.is_some());
            assert_eq!(status.map(|st| st.as_str()), Some(s));
        }
    }

    #[test]
    fn status_parse_rejects_unknown() {
        assert!(DisputeStatus::parse("archived").is_none());
        assert!(DisputeStatus::parse("").is_none());
        assert!(DisputeStatus::parse("Submitted").is_none());
    }
}
