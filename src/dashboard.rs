use std::fmt::Write;

use serde::Serialize;

use crate::models::{CaseRecord, CaseReport, CaseStatus, Role};
use crate::visibility::{self, CaseCriteria, ReportCriteria};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusCount {
    pub status: CaseStatus,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub role: Role,
    pub visible_cases: usize,
    pub active_cases: usize,
    pub closed_cases: usize,
    pub average_progress: f64,
    pub visible_reports: usize,
    pub status_mix: Vec<StatusCount>,
    pub recent_cases: Vec<CaseRecord>,
}

/// Counts per status, largest first. Ties keep status declaration order and
/// unrecognized statuses follow the known ones.
pub fn summarize_by_status(cases: &[&CaseRecord]) -> Vec<StatusCount> {
    let mut counts: Vec<StatusCount> = CaseStatus::known()
        .into_iter()
        .map(|status| StatusCount { status, count: 0 })
        .collect();

    for case in cases {
        match counts.iter_mut().find(|entry| entry.status == case.status) {
            Some(entry) => entry.count += 1,
            None => counts.push(StatusCount {
                status: case.status.clone(),
                count: 1,
            }),
        }
    }

    counts.retain(|entry| entry.count > 0);
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

pub fn summarize(
    role: Role,
    cases: &[CaseRecord],
    reports: &[CaseReport],
    recent: usize,
) -> DashboardSummary {
    let cases = visibility::visible_records(role, cases, &CaseCriteria::default());
    let reports = visibility::visible_records(role, reports, &ReportCriteria::default());

    let closed_cases = cases
        .iter()
        .filter(|case| case.status == CaseStatus::Closed)
        .count();
    let average_progress = if cases.is_empty() {
        0.0
    } else {
        cases.iter().map(|case| f64::from(case.progress)).sum::<f64>() / cases.len() as f64
    };

    let mut recent_cases: Vec<CaseRecord> = cases.iter().map(|case| (*case).clone()).collect();
    recent_cases.sort_by(|a, b| b.last_updated.cmp(&a.last_updated));
    recent_cases.truncate(recent);

    DashboardSummary {
        role,
        visible_cases: cases.len(),
        active_cases: cases.len() - closed_cases,
        closed_cases,
        average_progress,
        visible_reports: reports.len(),
        status_mix: summarize_by_status(&cases),
        recent_cases,
    }
}

pub fn build_dashboard(summary: &DashboardSummary) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Case Desk Dashboard");
    let _ = writeln!(output, "Welcome back, {}", summary.role.title());
    let _ = writeln!(output);
    let _ = writeln!(output, "## Overview");
    let _ = writeln!(output, "- Active cases: {}", summary.active_cases);
    let _ = writeln!(output, "- Cases resolved: {}", summary.closed_cases);
    let _ = writeln!(output, "- Visible cases: {}", summary.visible_cases);
    let _ = writeln!(output, "- Average progress: {:.0}%", summary.average_progress);
    let _ = writeln!(output, "- Visible reports: {}", summary.visible_reports);
    let _ = writeln!(output);
    let _ = writeln!(output, "## Status Mix");

    if summary.status_mix.is_empty() {
        let _ = writeln!(output, "No cases visible to this role.");
    } else {
        for entry in summary.status_mix.iter() {
            let _ = writeln!(output, "- {}: {} cases", entry.status, entry.count);
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Recent Cases");

    if summary.visible_cases == 0 {
        let _ = writeln!(output, "No cases visible to this role.");
    } else if summary.recent_cases.is_empty() {
        let _ = writeln!(output, "Recent cases hidden (limit 0).");
    } else {
        for case in summary.recent_cases.iter() {
            let _ = writeln!(
                output,
                "- {} {} ({}, {}, {}) assigned to {}, {}% complete, updated {}",
                case.id,
                case.title,
                case.status,
                case.priority,
                case.confidentiality,
                case.investigator,
                case.progress,
                case.last_updated
            );
        }
    }

    output
}
