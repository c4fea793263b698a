use std::fmt::Write;

use serde::Serialize;

use crate::models::{minute_timestamp, CaseRecord, CaseReport, Role};
use crate::navigation::{self, Screen};
use crate::visibility::{self, Classified};

/// A record as listed to a caller, with its edit affordance resolved.
#[derive(Debug, Serialize)]
pub struct Listed<'a, R> {
    #[serde(flatten)]
    pub record: &'a R,
    pub can_edit: bool,
}

pub fn listed<'a, R: Classified>(role: Role, records: &[&'a R]) -> Vec<Listed<'a, R>> {
    records
        .iter()
        .map(|record| Listed {
            record: *record,
            can_edit: visibility::can_mutate(role, *record),
        })
        .collect()
}

fn actions<R: Classified>(role: Role, record: &R) -> &'static str {
    if visibility::can_mutate(role, record) {
        "view, edit"
    } else {
        "view"
    }
}

pub fn case_list(role: Role, cases: &[&CaseRecord]) -> String {
    let mut output = String::new();

    if navigation::can_create_cases(role) {
        let _ = writeln!(output, "[new case available]");
    }

    if cases.is_empty() {
        let _ = writeln!(output, "No cases match the current filters.");
        return output;
    }

    for case in cases {
        let _ = writeln!(
            output,
            "{}  {}  [{} | {} | {}]  {} {}%  ({})",
            case.id,
            case.title,
            case.status,
            case.priority,
            case.confidentiality,
            case.investigator,
            case.progress,
            actions(role, *case)
        );
    }
    let _ = writeln!(output, "{} cases", cases.len());
    output
}

pub fn case_detail(role: Role, case: &CaseRecord) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "{} {}", case.id, case.title);
    let _ = writeln!(output, "Status: {}", case.status);
    let _ = writeln!(output, "Priority: {}", case.priority);
    let _ = writeln!(output, "Type: {}", case.confidentiality);
    let _ = writeln!(output, "Category: {}", case.category);
    let _ = writeln!(output, "Investigator: {}", case.investigator);
    let _ = writeln!(output, "Location: {}", case.location);
    if let Some(amount) = &case.amount {
        let _ = writeln!(output, "Amount: {amount}");
    }
    let _ = writeln!(
        output,
        "Opened {} / updated {}",
        case.date_created, case.last_updated
    );
    let _ = writeln!(output, "Progress: {}/100", case.progress);
    let _ = writeln!(output);
    let _ = writeln!(output, "{}", case.description);
    let _ = writeln!(output);
    let _ = writeln!(output, "Actions: {}", actions(role, case));
    output
}

pub fn report_list(role: Role, reports: &[&CaseReport]) -> String {
    let mut output = String::new();

    if reports.is_empty() {
        let _ = writeln!(output, "No reports match the current filters.");
        return output;
    }

    for report in reports {
        let _ = writeln!(
            output,
            "{}  {}  [{} | {}{}]  case {}  {} pages  ({})",
            report.id,
            report.title,
            report.status,
            report.report_type,
            if report.confidential { " | confidential" } else { "" },
            report.case_id,
            report.pages,
            actions(role, *report)
        );
    }
    let _ = writeln!(output, "{} reports", reports.len());
    output
}

pub fn report_detail(role: Role, report: &CaseReport) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# {}", report.title);
    let _ = writeln!(
        output,
        "{} for case {} by {}, generated {}",
        report.id, report.case_id, report.investigator, report.date_generated
    );
    let _ = writeln!(
        output,
        "{} {} report, {} pages",
        report.status, report.report_type, report.pages
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Summary");
    let _ = writeln!(output, "- Total amount: {}", report.summary.total_amount);
    let _ = writeln!(output, "- Mule accounts: {}", report.summary.mule_accounts);
    let _ = writeln!(
        output,
        "- Final beneficiary: {}",
        report.summary.final_beneficiary
    );
    let _ = writeln!(output, "- Resolution: {}", report.summary.resolution_status);
    let _ = writeln!(output);
    let _ = writeln!(output, "## Timeline");

    let timeline = report.chronological_timeline();
    if timeline.is_empty() {
        let _ = writeln!(output, "No timeline entries recorded.");
    } else {
        for entry in timeline {
            let _ = writeln!(
                output,
                "- {} {} ({}): {}",
                entry.at.format(minute_timestamp::FORMAT),
                entry.action,
                entry.actor,
                entry.details
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "Actions: {}", actions(role, report));
    output
}

pub fn navigation(role: Role, screens: &[Screen]) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "Signed in as {}", role.title());
    if screens.is_empty() {
        let _ = writeln!(output, "No screens available.");
    }
    for screen in screens {
        let _ = writeln!(output, "{:<22}{}", screen.label(), screen.path());
    }
    output
}
