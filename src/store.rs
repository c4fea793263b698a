use std::collections::HashSet;
use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;

use crate::models::{CaseRecord, CaseReport, Confidentiality};
use crate::visibility::Classified;

const SAMPLE_CASES: &str = include_str!("../data/sample_cases.csv");
const SAMPLE_REPORTS: &str = include_str!("../data/sample_reports.json");

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed case data: {0}")]
    Csv(#[from] csv::Error),
    #[error("malformed report data: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{collection} record at position {position} has an empty identifier")]
    EmptyId {
        collection: &'static str,
        position: usize,
    },
    #[error("{collection} record {id} has an empty title")]
    EmptyTitle { collection: &'static str, id: String },
    #[error("duplicate {collection} identifier {id}")]
    DuplicateId { collection: &'static str, id: String },
}

/// Read-only records for one session.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub cases: Vec<CaseRecord>,
    pub reports: Vec<CaseReport>,
}

impl Snapshot {
    /// Built-in sample data: four cases and two reports.
    pub fn sample() -> Result<Self, StoreError> {
        Ok(Self {
            cases: read_cases_csv(SAMPLE_CASES.as_bytes())?,
            reports: read_reports_json(SAMPLE_REPORTS.as_bytes())?,
        })
    }

    /// Loads whichever collections have a path and fills the rest from the sample.
    pub fn load(cases: Option<&Path>, reports: Option<&Path>) -> Result<Self, StoreError> {
        if cases.is_none() && reports.is_none() {
            return Self::sample();
        }

        let cases = match cases {
            Some(path) => load_cases_csv(path)?,
            None => read_cases_csv(SAMPLE_CASES.as_bytes())?,
        };
        let reports = match reports {
            Some(path) => load_reports_json(path)?,
            None => read_reports_json(SAMPLE_REPORTS.as_bytes())?,
        };

        tracing::debug!(
            cases = cases.len(),
            reports = reports.len(),
            "snapshot loaded"
        );
        Ok(Self { cases, reports })
    }

    pub fn find_case(&self, id: &str) -> Option<&CaseRecord> {
        self.cases.iter().find(|case| case.id == id)
    }

    pub fn find_report(&self, id: &str) -> Option<&CaseReport> {
        self.reports.iter().find(|report| report.id == id)
    }
}

pub fn load_cases_csv(path: &Path) -> Result<Vec<CaseRecord>, StoreError> {
    let file = std::fs::File::open(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_cases_csv(file)
}

pub fn load_reports_json(path: &Path) -> Result<Vec<CaseReport>, StoreError> {
    let file = std::fs::File::open(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_reports_json(file)
}

pub fn read_cases_csv<R: Read>(input: R) -> Result<Vec<CaseRecord>, StoreError> {
    #[derive(Deserialize)]
    struct CsvRow {
        id: String,
        title: String,
        status: String,
        priority: String,
        #[serde(rename = "type")]
        confidentiality: String,
        category: String,
        investigator: String,
        date_created: NaiveDate,
        last_updated: NaiveDate,
        amount: Option<String>,
        location: String,
        progress: i32,
        description: String,
    }

    let mut reader = csv::Reader::from_reader(input);
    let mut cases = Vec::new();

    for result in reader.deserialize::<CsvRow>() {
        let row = result?;
        let confidentiality = match Confidentiality::from_label(&row.confidentiality) {
            Some(value) => value,
            None => {
                tracing::warn!(
                    case = %row.id,
                    value = %row.confidentiality,
                    "unrecognized confidentiality, treating case as confidential"
                );
                Confidentiality::Confidential
            }
        };

        let case = CaseRecord {
            status: row.status.into(),
            priority: row.priority.into(),
            category: row.category.into(),
            confidentiality,
            id: row.id,
            title: row.title,
            investigator: row.investigator,
            date_created: row.date_created,
            last_updated: row.last_updated,
            amount: row.amount.filter(|amount| !amount.trim().is_empty()),
            location: row.location,
            progress: row.progress,
            description: row.description,
        };

        for (field, recognized, value) in [
            ("status", case.status.is_recognized(), case.status.as_str()),
            ("priority", case.priority.is_recognized(), case.priority.as_str()),
            ("category", case.category.is_recognized(), case.category.as_str()),
        ] {
            if !recognized {
                tracing::warn!(case = %case.id, field, value, "unrecognized value kept as-is");
            }
        }

        cases.push(case);
    }

    validate_collection("case", &cases)?;
    Ok(cases)
}

pub fn read_reports_json<R: Read>(input: R) -> Result<Vec<CaseReport>, StoreError> {
    let reports: Vec<CaseReport> = serde_json::from_reader(input)?;

    for report in &reports {
        for (field, recognized, value) in [
            ("status", report.status.is_recognized(), report.status.as_str()),
            ("type", report.report_type.is_recognized(), report.report_type.as_str()),
        ] {
            if !recognized {
                tracing::warn!(report = %report.id, field, value, "unrecognized value kept as-is");
            }
        }
    }

    validate_collection("report", &reports)?;
    Ok(reports)
}

fn validate_collection<R: Classified>(
    collection: &'static str,
    records: &[R],
) -> Result<(), StoreError> {
    let mut seen = HashSet::new();

    for (position, record) in records.iter().enumerate() {
        let id = record.identifier();
        if id.trim().is_empty() {
            return Err(StoreError::EmptyId {
                collection,
                position,
            });
        }
        if record.title().trim().is_empty() {
            return Err(StoreError::EmptyTitle {
                collection,
                id: id.to_string(),
            });
        }
        if !seen.insert(id) {
            return Err(StoreError::DuplicateId {
                collection,
                id: id.to_string(),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CaseCategory, CasePriority, CaseStatus, ReportStatus};
    use std::io::Write;

    const HEADER: &str = "id,title,status,priority,type,category,investigator,date_created,last_updated,amount,location,progress,description\n";

    #[test]
    fn sample_snapshot_matches_reference_data() {
        let snapshot = Snapshot::sample().unwrap();
        let ids: Vec<&str> = snapshot.cases.iter().map(|case| case.id.as_str()).collect();
        assert_eq!(ids, ["CYB-2024-001", "CYB-2024-002", "CYB-2024-003", "CYB-2024-004"]);

        let first = &snapshot.cases[0];
        assert_eq!(first.status, CaseStatus::InProgress);
        assert_eq!(first.priority, CasePriority::High);
        assert_eq!(first.category, CaseCategory::UpiFraud);
        assert_eq!(first.confidentiality, Confidentiality::Confidential);
        assert_eq!(first.amount.as_deref(), Some("₹2,45,000"));
        assert_eq!(first.location, "Mumbai, Maharashtra");

        assert_eq!(snapshot.reports.len(), 2);
        assert_eq!(snapshot.reports[1].status, ReportStatus::Reviewed);
        assert_eq!(snapshot.find_report("RPT-2024-001").map(|r| r.timeline.len()), Some(5));
    }

    #[test]
    fn unknown_categorical_values_are_kept() {
        let data = format!(
            "{HEADER}CYB-9,Wallet drain,Escalated,Urgent,non-confidential,SIM Swap,Asha Rao,2024-02-01,2024-02-02,,Chennai,5,Unlisted values\n"
        );
        let cases = read_cases_csv(data.as_bytes()).unwrap();
        assert_eq!(cases[0].status, CaseStatus::Unrecognized("Escalated".to_string()));
        assert_eq!(cases[0].priority, CasePriority::Unrecognized("Urgent".to_string()));
        assert!(!cases[0].category.is_recognized());
        assert_eq!(cases[0].amount, None);
    }

    #[test]
    fn unknown_confidentiality_is_treated_as_confidential() {
        let data = format!(
            "{HEADER}CYB-9,Wallet drain,Open,Low,restricted,UPI Fraud,Asha Rao,2024-02-01,2024-02-02,,Chennai,5,Odd tag\n"
        );
        let cases = read_cases_csv(data.as_bytes()).unwrap();
        assert_eq!(cases[0].confidentiality, Confidentiality::Confidential);
    }

    #[test]
    fn duplicate_identifiers_are_rejected() {
        let row = "CYB-1,Phishing kit,Open,Low,confidential,Online Banking,Asha Rao,2024-02-01,2024-02-02,,Chennai,5,Dup\n";
        let data = format!("{HEADER}{row}{row}");
        let err = read_cases_csv(data.as_bytes()).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateId { collection: "case", ref id } if id == "CYB-1"));
    }

    #[test]
    fn empty_titles_are_rejected() {
        let data = format!(
            "{HEADER}CYB-1,,Open,Low,confidential,Online Banking,Asha Rao,2024-02-01,2024-02-02,,Chennai,5,No title\n"
        );
        let err = read_cases_csv(data.as_bytes()).unwrap_err();
        assert!(matches!(err, StoreError::EmptyTitle { .. }));
    }

    #[test]
    fn load_falls_back_to_sample_for_missing_paths() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "{HEADER}CYB-7,Loan app extortion,Open,High,non-confidential,Identity Theft,Asha Rao,2024-03-01,2024-03-04,,Hyderabad,15,Harassment calls\n"
        )
        .unwrap();

        let snapshot = Snapshot::load(Some(file.path()), None).unwrap();
        assert_eq!(snapshot.cases.len(), 1);
        assert!(snapshot.find_case("CYB-7").is_some());
        assert_eq!(snapshot.reports.len(), 2);
    }

    #[test]
    fn progress_outside_percent_range_is_kept() {
        let data = format!(
            "{HEADER}CYB-1,Mule network,Open,Low,non-confidential,UPI Fraud,Asha Rao,2024-02-01,2024-02-02,,Chennai,300,Over\n\
             CYB-2,Refund scam,Open,Low,non-confidential,UPI Fraud,Asha Rao,2024-02-01,2024-02-02,,Chennai,-5,Under\n"
        );
        let cases = read_cases_csv(data.as_bytes()).unwrap();
        let progress: Vec<i32> = cases.iter().map(|case| case.progress).collect();
        assert_eq!(progress, [300, -5]);
    }

    #[test]
    fn missing_file_reports_its_path() {
        let err = load_reports_json(Path::new("/nonexistent/reports.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/reports.json"));
    }
}
