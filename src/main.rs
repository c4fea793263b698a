use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;

use case_desk::models::{
    CasePriority, CaseStatus, Confidentiality, ReportStatus, ReportType, Role,
};
use case_desk::store::Snapshot;
use case_desk::visibility::{CaseCriteria, ReportCriteria, Selection};
use case_desk::{dashboard, navigation, render, visibility};

#[derive(Parser)]
#[command(name = "case-desk", version)]
#[command(about = "Role-gated case library and reports for cybercrime investigations", long_about = None)]
struct Cli {
    /// Caller role: admin, investigator or public
    #[arg(long, global = true, env = "CASE_DESK_ROLE", default_value = "investigator")]
    role: String,
    /// Case snapshot (CSV). Defaults to the built-in sample cases
    #[arg(long, global = true, env = "CASE_DESK_CASES")]
    cases: Option<PathBuf>,
    /// Report snapshot (JSON). Defaults to the built-in sample reports
    #[arg(long, global = true, env = "CASE_DESK_REPORTS")]
    reports: Option<PathBuf>,
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    json: bool,
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,
    #[arg(short, long, global = true)]
    quiet: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize the cases and reports visible to the role
    Dashboard {
        #[arg(long, default_value_t = 5)]
        recent: usize,
        /// Write the summary (markdown, or JSON with --json) to a file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Browse the case library
    Cases {
        #[command(subcommand)]
        command: CaseCommands,
    },
    /// Browse investigation reports
    Reports {
        #[command(subcommand)]
        command: ReportCommands,
    },
    /// List the screens the role can open
    Nav,
}

#[derive(Subcommand)]
enum CaseCommands {
    List {
        #[arg(long)]
        search: Option<String>,
        #[arg(long, default_value = "all")]
        status: Selection<CaseStatus>,
        #[arg(long, default_value = "all")]
        priority: Selection<CasePriority>,
        #[arg(long, default_value = "all")]
        confidentiality: Selection<Confidentiality>,
    },
    Show {
        id: String,
    },
}

#[derive(Subcommand)]
enum ReportCommands {
    List {
        #[arg(long)]
        search: Option<String>,
        #[arg(long, default_value = "all")]
        status: Selection<ReportStatus>,
        #[arg(long = "type", default_value = "all")]
        report_type: Selection<ReportType>,
    },
    Show {
        id: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    let role = resolve_role(&cli.role);
    let snapshot = Snapshot::load(cli.cases.as_deref(), cli.reports.as_deref())
        .context("failed to load record snapshot")?;

    match cli.command {
        Commands::Dashboard { recent, out } => {
            let summary = dashboard::summarize(role, &snapshot.cases, &snapshot.reports, recent);
            let rendered = if cli.json {
                let mut encoded = serde_json::to_string_pretty(&summary)
                    .context("failed to encode JSON output")?;
                encoded.push('\n');
                encoded
            } else {
                dashboard::build_dashboard(&summary)
            };

            match out {
                Some(path) => {
                    std::fs::write(&path, rendered)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    println!("Dashboard written to {}.", path.display());
                }
                None => print!("{rendered}"),
            }
        }
        Commands::Cases {
            command:
                CaseCommands::List {
                    search,
                    status,
                    priority,
                    confidentiality,
                },
        } => {
            let confidentiality = if confidentiality.is_active()
                && !navigation::can_filter_by_confidentiality(role)
            {
                tracing::warn!(%role, "confidentiality filter is not offered to this role; ignoring it");
                Selection::All
            } else {
                confidentiality
            };
            let criteria = CaseCriteria::default()
                .with_search_text(search.unwrap_or_default())
                .with_status(status)
                .with_kind(priority)
                .with_confidentiality(confidentiality);

            let cases = visibility::visible_records(role, &snapshot.cases, &criteria);
            if cli.json {
                print_json(&render::listed(role, &cases))?;
            } else {
                print!("{}", render::case_list(role, &cases));
            }
        }
        Commands::Cases {
            command: CaseCommands::Show { id },
        } => {
            // Hidden records are reported exactly like missing ones.
            let case = snapshot
                .find_case(&id)
                .filter(|case| visibility::can_view(role, *case))
                .with_context(|| format!("case {id} not found"))?;
            if cli.json {
                print_json(&render::listed(role, &[case]))?;
            } else {
                print!("{}", render::case_detail(role, case));
            }
        }
        Commands::Reports {
            command:
                ReportCommands::List {
                    search,
                    status,
                    report_type,
                },
        } => {
            let criteria = ReportCriteria::default()
                .with_search_text(search.unwrap_or_default())
                .with_status(status)
                .with_kind(report_type);

            let reports = visibility::visible_records(role, &snapshot.reports, &criteria);
            if cli.json {
                print_json(&render::listed(role, &reports))?;
            } else {
                print!("{}", render::report_list(role, &reports));
            }
        }
        Commands::Reports {
            command: ReportCommands::Show { id },
        } => {
            let report = snapshot
                .find_report(&id)
                .filter(|report| visibility::can_view(role, *report))
                .with_context(|| format!("report {id} not found"))?;
            if cli.json {
                print_json(&render::listed(role, &[report]))?;
            } else {
                print!("{}", render::report_detail(role, report));
            }
        }
        Commands::Nav => {
            let screens = navigation::navigation_for(role);
            if cli.json {
                #[derive(Serialize)]
                struct NavEntry {
                    screen: navigation::Screen,
                    label: &'static str,
                    path: &'static str,
                }

                let entries: Vec<NavEntry> = screens
                    .iter()
                    .map(|screen| NavEntry {
                        screen: *screen,
                        label: screen.label(),
                        path: screen.path(),
                    })
                    .collect();
                print_json(&entries)?;
            } else {
                print!("{}", render::navigation(role, &screens));
            }
        }
    }

    Ok(())
}

/// Unknown roles get the most restrictive access rather than an error.
fn resolve_role(raw: &str) -> Role {
    Role::from_label(raw).unwrap_or_else(|| {
        tracing::warn!(role = raw, "unrecognized role; falling back to public access");
        Role::most_restrictive()
    })
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let encoded = serde_json::to_string_pretty(value).context("failed to encode JSON output")?;
    println!("{encoded}");
    Ok(())
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("CASE_DESK_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn unknown_roles_resolve_to_public() {
        assert_eq!(resolve_role("Admin"), Role::Admin);
        assert_eq!(resolve_role("root"), Role::Public);
        assert_eq!(resolve_role(""), Role::Public);
    }

    #[test]
    fn filters_parse_from_command_line() {
        let cli = Cli::try_parse_from([
            "case-desk",
            "--role",
            "admin",
            "cases",
            "list",
            "--status",
            "in-progress",
            "--priority",
            "High",
        ])
        .unwrap();

        match cli.command {
            Commands::Cases {
                command:
                    CaseCommands::List {
                        status,
                        priority,
                        confidentiality,
                        ..
                    },
            } => {
                assert_eq!(status, Selection::Only(CaseStatus::InProgress));
                assert_eq!(priority, Selection::Only(CasePriority::High));
                assert_eq!(confidentiality, Selection::All);
            }
            _ => panic!("expected cases list"),
        }
    }

    #[test]
    fn unknown_filter_values_are_rejected() {
        let result = Cli::try_parse_from(["case-desk", "reports", "list", "--type", "Forensic"]);
        assert!(result.is_err());
    }
}
