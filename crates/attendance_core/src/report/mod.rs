//! Attendance summary and plain-text report export.
//!
//! # Responsibility
//! - Partition current participants into present/absent for one session.
//! - Render the fixed report template and derive its file name.
//!
//! # Invariants
//! - Only current participants are counted; dangling attendance entries are
//!   ignored.
//! - Rate is `0` when there are no participants.
//! - Rendering has no side effects; only [`write_report`] touches disk.

use crate::model::participant::Participant;
use crate::model::session::Session;
use crate::service::StoreError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::path::{Path, PathBuf};

static FILE_NAME_SEPARATOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\s/\\]+").expect("valid file name separator regex"));

/// Present/absent split of current participants for one session.
#[derive(Debug, Clone, PartialEq)]
pub struct AttendanceSummary {
    pub total: usize,
    pub present_count: usize,
    pub absent_count: usize,
    /// Percentage present, rounded to one decimal place.
    pub rate: f64,
}

impl AttendanceSummary {
    fn from_counts(present_count: usize, total: usize) -> Self {
        let rate = if total == 0 {
            0.0
        } else {
            (present_count as f64 * 1000.0 / total as f64).round() / 10.0
        };
        Self {
            total,
            present_count,
            absent_count: total - present_count,
            rate,
        }
    }

    /// Rate rounded to a whole percent, as shown in session lists.
    pub fn rate_whole(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        (self.present_count as f64 * 100.0 / self.total as f64).round() as u32
    }

    /// Rate as printed in reports: `0` with no participants, else one decimal.
    pub fn rate_label(&self) -> String {
        if self.total == 0 {
            "0".to_string()
        } else {
            format!("{:.1}", self.rate)
        }
    }
}

/// Rendered report ready to be saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceReport {
    pub file_name: String,
    pub body: String,
}

#[derive(Debug)]
pub enum ExportError {
    Store(StoreError),
    Io(std::io::Error),
}

impl Display for ExportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "failed to write report: {err}"),
        }
    }
}

impl Error for ExportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::Io(err) => Some(err),
        }
    }
}

impl From<StoreError> for ExportError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<std::io::Error> for ExportError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// Splits `participants` into (present, absent), preserving order.
pub fn partition<'a>(
    session: &Session,
    participants: &'a [Participant],
) -> (Vec<&'a Participant>, Vec<&'a Participant>) {
    participants
        .iter()
        .partition(|participant| session.is_present(&participant.id))
}

pub fn summarize(session: &Session, participants: &[Participant]) -> AttendanceSummary {
    let present_count = participants
        .iter()
        .filter(|participant| session.is_present(&participant.id))
        .count();
    AttendanceSummary::from_counts(present_count, participants.len())
}

/// Renders the plain-text report for `session`.
pub fn generate_report(session: &Session, participants: &[Participant]) -> AttendanceReport {
    let (present, absent) = partition(session, participants);
    let summary = AttendanceSummary::from_counts(present.len(), participants.len());
    let description = session
        .description
        .as_deref()
        .map(|description| format!("Description: {description}"))
        .unwrap_or_default();

    let body = format!(
        "NGO ATTENDANCE REPORT
=====================

Session: {name}
Date: {date}
Time: {start} - {end}
Location: {location}
{description}

ATTENDANCE SUMMARY
------------------
Total Participants: {total}
Present: {present_count}
Absent: {absent_count}
Attendance Rate: {rate}%

Present ({present_count})
{present_lines}

Absent ({absent_count})
{absent_lines}",
        name = session.name,
        date = session.date,
        start = session.start_time,
        end = session.end_time,
        location = session.location,
        total = summary.total,
        present_count = summary.present_count,
        absent_count = summary.absent_count,
        rate = summary.rate_label(),
        present_lines = render_list(&present),
        absent_lines = render_list(&absent),
    );

    AttendanceReport {
        file_name: report_file_name(session),
        body: body.trim().to_string(),
    }
}

/// `attendance-<name>-<date>.txt`, with whitespace and path separator runs in
/// the name collapsed to single hyphens.
pub fn report_file_name(session: &Session) -> String {
    let name = FILE_NAME_SEPARATOR_RE.replace_all(&session.name, "-");
    format!("attendance-{name}-{}.txt", session.date)
}

/// Writes `report` into `dir` (created if missing) and returns the file path.
pub fn write_report(report: &AttendanceReport, dir: &Path) -> std::io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(&report.file_name);
    fs::write(&path, &report.body)?;
    Ok(path)
}

fn render_list(participants: &[&Participant]) -> String {
    participants
        .iter()
        .map(|participant| format!("- {}", participant.contact_line()))
        .collect::<Vec<_>>()
        .join("\n")
}
