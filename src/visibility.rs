use std::fmt;
use std::str::FromStr;

use crate::models::{
    CasePriority, CaseRecord, CaseReport, CaseStatus, Confidentiality, ReportStatus, ReportType,
    Role,
};

/// Field accessors the filter engine needs from a record collection.
pub trait Classified {
    type Status: PartialEq;
    type Kind: PartialEq;

    fn identifier(&self) -> &str;
    fn title(&self) -> &str;
    fn confidentiality(&self) -> Confidentiality;
    fn status(&self) -> &Self::Status;
    /// Secondary categorical field: priority for cases, report type for reports.
    fn kind(&self) -> &Self::Kind;

    /// `needle` is already lowercased and non-empty.
    fn matches_text(&self, needle: &str) -> bool {
        contains_folded(self.title(), needle) || contains_folded(self.identifier(), needle)
    }
}

fn contains_folded(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

impl Classified for CaseRecord {
    type Status = CaseStatus;
    type Kind = CasePriority;

    fn identifier(&self) -> &str {
        &self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn confidentiality(&self) -> Confidentiality {
        self.confidentiality
    }

    fn status(&self) -> &CaseStatus {
        &self.status
    }

    fn kind(&self) -> &CasePriority {
        &self.priority
    }
}

impl Classified for CaseReport {
    type Status = ReportStatus;
    type Kind = ReportType;

    fn identifier(&self) -> &str {
        &self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn confidentiality(&self) -> Confidentiality {
        CaseReport::confidentiality(self)
    }

    fn status(&self) -> &ReportStatus {
        &self.status
    }

    fn kind(&self) -> &ReportType {
        &self.report_type
    }

    fn matches_text(&self, needle: &str) -> bool {
        contains_folded(&self.title, needle)
            || contains_folded(&self.id, needle)
            || contains_folded(&self.case_id, needle)
    }
}

/// One categorical filter: the `all` sentinel or an exact value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection<T> {
    All,
    Only(T),
}

impl<T: PartialEq> Selection<T> {
    pub fn admits(&self, value: &T) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == value,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Self::Only(_))
    }
}

impl<T: FromStr> FromStr for Selection<T> {
    type Err = T::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(Self::All)
        } else {
            s.parse().map(Self::Only)
        }
    }
}

impl<T: fmt::Display> fmt::Display for Selection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Only(value) => fmt::Display::fmt(value, f),
        }
    }
}

/// Active filter selections for one screen.
///
/// Screens hold one of these and replace it wholesale on every input change;
/// the `with_*` builders return the replacement.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCriteria<S, K> {
    pub search_text: String,
    pub status: Selection<S>,
    pub kind: Selection<K>,
    pub confidentiality: Selection<Confidentiality>,
}

pub type CaseCriteria = FilterCriteria<CaseStatus, CasePriority>;
pub type ReportCriteria = FilterCriteria<ReportStatus, ReportType>;

impl<S, K> Default for FilterCriteria<S, K> {
    fn default() -> Self {
        Self {
            search_text: String::new(),
            status: Selection::All,
            kind: Selection::All,
            confidentiality: Selection::All,
        }
    }
}

impl<S, K> FilterCriteria<S, K> {
    pub fn with_search_text(self, search_text: impl Into<String>) -> Self {
        Self {
            search_text: search_text.into(),
            ..self
        }
    }

    pub fn with_status(self, status: Selection<S>) -> Self {
        Self { status, ..self }
    }

    pub fn with_kind(self, kind: Selection<K>) -> Self {
        Self { kind, ..self }
    }

    pub fn with_confidentiality(self, confidentiality: Selection<Confidentiality>) -> Self {
        Self {
            confidentiality,
            ..self
        }
    }
}

/// Role gate on its own. Confidentiality is checked before any filter and
/// nothing else can re-admit a record it rejects.
pub fn can_view<R: Classified>(role: Role, record: &R) -> bool {
    match role {
        Role::Admin => true,
        Role::Investigator => !record.confidentiality().is_confidential(),
        Role::Public => false,
    }
}

/// Whether an edit affordance may be offered for `record`.
pub fn can_mutate<R: Classified>(role: Role, record: &R) -> bool {
    match role {
        Role::Admin => true,
        Role::Investigator => record.confidentiality() == Confidentiality::NonConfidential,
        Role::Public => false,
    }
}

/// The records `role` may see that match every active criterion, in input order.
pub fn visible_records<'a, R: Classified>(
    role: Role,
    records: &'a [R],
    criteria: &FilterCriteria<R::Status, R::Kind>,
) -> Vec<&'a R> {
    let needle = criteria.search_text.to_lowercase();

    let visible: Vec<&R> = records
        .iter()
        .filter(|record| can_view(role, *record))
        .filter(|record| needle.is_empty() || record.matches_text(&needle))
        .filter(|record| criteria.status.admits(record.status()))
        .filter(|record| criteria.kind.admits(record.kind()))
        .filter(|record| criteria.confidentiality.admits(&record.confidentiality()))
        .collect();

    tracing::debug!(
        role = %role,
        total = records.len(),
        visible = visible.len(),
        "filtered records"
    );
    visible
}
