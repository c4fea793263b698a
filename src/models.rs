use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A filter or role value that does not name any known variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}' (expected one of: {expected})")]
pub struct ParseValueError {
    pub kind: &'static str,
    pub value: String,
    pub expected: String,
}

fn normalize(raw: &str) -> String {
    raw.trim()
        .chars()
        .map(|c| match c {
            '-' | '_' => ' ',
            other => other.to_ascii_lowercase(),
        })
        .collect()
}

/// Declares a categorical record field.
///
/// Record sources may carry values this build does not know about; those land
/// in `Unrecognized` instead of failing the load. Filter input goes through
/// `FromStr`, which only accepts known values.
macro_rules! categorical {
    ($(#[$meta:meta])* $name:ident, $kind:literal { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            $($variant,)+
            Unrecognized(String),
        }

        impl $name {
            pub fn known() -> Vec<Self> {
                vec![$(Self::$variant),+]
            }

            pub fn as_str(&self) -> &str {
                match self {
                    $(Self::$variant => $label,)+
                    Self::Unrecognized(raw) => raw.as_str(),
                }
            }

            pub fn is_recognized(&self) -> bool {
                !matches!(self, Self::Unrecognized(_))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl From<String> for $name {
            fn from(raw: String) -> Self {
                let key = normalize(&raw);
                $(
                    if key == normalize($label) {
                        return Self::$variant;
                    }
                )+
                Self::Unrecognized(raw)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> String {
                match value {
                    $name::Unrecognized(raw) => raw,
                    known => known.as_str().to_string(),
                }
            }
        }

        impl FromStr for $name {
            type Err = ParseValueError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match Self::from(s.to_string()) {
                    Self::Unrecognized(value) => Err(ParseValueError {
                        kind: $kind,
                        value,
                        expected: [$($label),+].join(", "),
                    }),
                    known => Ok(known),
                }
            }
        }
    };
}

categorical!(
    /// Lifecycle state of an investigation case.
    CaseStatus, "case status" {
        Open => "Open",
        InProgress => "In Progress",
        UnderReview => "Under Review",
        Closed => "Closed",
    }
);

categorical!(
    CasePriority, "case priority" {
        Low => "Low",
        Medium => "Medium",
        High => "High",
        Critical => "Critical",
    }
);

categorical!(
    /// Kind of cybercrime a case concerns. Display only.
    CaseCategory, "case category" {
        UpiFraud => "UPI Fraud",
        SocialMedia => "Social Media",
        Cryptocurrency => "Cryptocurrency",
        IdentityTheft => "Identity Theft",
        OnlineBanking => "Online Banking",
    }
);

categorical!(
    ReportStatus, "report status" {
        Draft => "Draft",
        Final => "Final",
        Reviewed => "Reviewed",
    }
);

categorical!(
    ReportType, "report type" {
        Summary => "Summary",
        Detailed => "Detailed",
        Timeline => "Timeline",
        Financial => "Financial",
    }
);

/// Access level of the caller, supplied by the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Investigator,
    /// Unauthenticated visitor. Sees no case or report data.
    Public,
}

impl Role {
    pub fn from_label(raw: &str) -> Option<Self> {
        match normalize(raw).as_str() {
            "admin" => Some(Self::Admin),
            "investigator" => Some(Self::Investigator),
            "public" => Some(Self::Public),
            _ => None,
        }
    }

    /// Role used whenever the supplied value cannot be trusted.
    pub const fn most_restrictive() -> Self {
        Self::Public
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Investigator => "investigator",
            Self::Public => "public",
        }
    }

    pub const fn title(self) -> &'static str {
        match self {
            Self::Admin => "Administrator",
            Self::Investigator => "Investigator",
            Self::Public => "Public",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Confidentiality {
    Confidential,
    NonConfidential,
}

impl Confidentiality {
    pub fn from_label(raw: &str) -> Option<Self> {
        match normalize(raw).as_str() {
            "confidential" => Some(Self::Confidential),
            "non confidential" => Some(Self::NonConfidential),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Confidential => "confidential",
            Self::NonConfidential => "non-confidential",
        }
    }

    pub const fn is_confidential(self) -> bool {
        matches!(self, Self::Confidential)
    }
}

impl fmt::Display for Confidentiality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Confidentiality {
    type Err = ParseValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s).ok_or_else(|| ParseValueError {
            kind: "confidentiality",
            value: s.to_string(),
            expected: "confidential, non-confidential".to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseRecord {
    pub id: String,
    pub title: String,
    pub status: CaseStatus,
    pub priority: CasePriority,
    #[serde(rename = "type")]
    pub confidentiality: Confidentiality,
    pub category: CaseCategory,
    pub investigator: String,
    pub date_created: NaiveDate,
    pub last_updated: NaiveDate,
    pub amount: Option<String>,
    pub location: String,
    /// Percent complete. Shown as a ratio, never validated.
    pub progress: i32,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub total_amount: String,
    pub mule_accounts: u32,
    pub final_beneficiary: String,
    pub resolution_status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEntry {
    #[serde(with = "minute_timestamp")]
    pub at: NaiveDateTime,
    pub action: String,
    pub actor: String,
    pub details: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseReport {
    pub id: String,
    /// Linked case. Informational, not checked against the case collection.
    pub case_id: String,
    pub title: String,
    pub investigator: String,
    pub date_generated: NaiveDate,
    pub status: ReportStatus,
    #[serde(rename = "type")]
    pub report_type: ReportType,
    pub pages: u32,
    pub confidential: bool,
    pub summary: ReportSummary,
    #[serde(default)]
    pub timeline: Vec<TimelineEntry>,
}

impl CaseReport {
    pub fn confidentiality(&self) -> Confidentiality {
        if self.confidential {
            Confidentiality::Confidential
        } else {
            Confidentiality::NonConfidential
        }
    }

    /// Timeline entries ordered oldest first.
    pub fn chronological_timeline(&self) -> Vec<&TimelineEntry> {
        let mut entries: Vec<&TimelineEntry> = self.timeline.iter().collect();
        entries.sort_by_key(|entry| entry.at);
        entries
    }
}

/// `YYYY-MM-DD HH:MM`, the timestamp layout used in report timelines.
pub mod minute_timestamp {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%d %H:%M";

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_loose_spellings() {
        assert_eq!("in-progress".parse::<CaseStatus>(), Ok(CaseStatus::InProgress));
        assert_eq!("UNDER_REVIEW".parse::<CaseStatus>(), Ok(CaseStatus::UnderReview));
        assert_eq!(" Closed ".parse::<CaseStatus>(), Ok(CaseStatus::Closed));
    }

    #[test]
    fn strict_parse_rejects_unknown_values() {
        let err = "Escalated".parse::<CaseStatus>().unwrap_err();
        assert_eq!(err.kind, "case status");
        assert_eq!(err.value, "Escalated");
        assert!(err.to_string().contains("Under Review"));
    }

    #[test]
    fn lenient_conversion_keeps_unknown_values() {
        let status = CaseStatus::from("Escalated".to_string());
        assert_eq!(status, CaseStatus::Unrecognized("Escalated".to_string()));
        assert!(!status.is_recognized());
        assert_eq!(status.as_str(), "Escalated");
        assert_eq!(String::from(status), "Escalated");
    }

    #[test]
    fn known_lists_every_variant_in_declaration_order() {
        let labels: Vec<String> = ReportType::known()
            .iter()
            .map(|kind| kind.to_string())
            .collect();
        assert_eq!(labels, ["Summary", "Detailed", "Timeline", "Financial"]);
    }

    #[test]
    fn role_labels_are_case_insensitive() {
        assert_eq!(Role::from_label("Admin"), Some(Role::Admin));
        assert_eq!(Role::from_label("INVESTIGATOR"), Some(Role::Investigator));
        assert_eq!(Role::from_label("public"), Some(Role::Public));
        assert_eq!(Role::from_label("superuser"), None);
        assert_eq!(Role::most_restrictive(), Role::Public);
    }

    #[test]
    fn confidentiality_round_trips_through_labels() {
        assert_eq!(
            Confidentiality::from_label("non-confidential"),
            Some(Confidentiality::NonConfidential)
        );
        assert_eq!(
            Confidentiality::from_label("Confidential"),
            Some(Confidentiality::Confidential)
        );
        assert!("secret".parse::<Confidentiality>().is_err());
    }

    #[test]
    fn report_json_uses_minute_timestamps() {
        let raw = r#"{
            "id": "RPT-9",
            "case_id": "CYB-9",
            "title": "Ledger trace",
            "investigator": "Asha Rao",
            "date_generated": "2024-02-01",
            "status": "Draft",
            "type": "Financial",
            "pages": 3,
            "confidential": false,
            "summary": {
                "total_amount": "₹10,000",
                "mule_accounts": 0,
                "final_beneficiary": "Unknown",
                "resolution_status": "Open"
            },
            "timeline": [
                {"at": "2024-02-01 12:30", "action": "Drafted", "actor": "Asha Rao", "details": "First pass"},
                {"at": "2024-01-31 09:05", "action": "Assigned", "actor": "Admin", "details": "Routed"}
            ]
        }"#;

        let report: CaseReport = serde_json::from_str(raw).unwrap();
        assert_eq!(report.report_type, ReportType::Financial);
        assert_eq!(report.confidentiality(), Confidentiality::NonConfidential);

        let actions: Vec<&str> = report
            .chronological_timeline()
            .iter()
            .map(|entry| entry.action.as_str())
            .collect();
        assert_eq!(actions, ["Assigned", "Drafted"]);

        let encoded = serde_json::to_value(&report).unwrap();
        assert_eq!(encoded["timeline"][0]["at"], "2024-02-01 12:30");
        assert_eq!(encoded["status"], "Draft");
    }
}
