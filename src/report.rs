//! CSV downloads of a user's incomes or expenses over a recent period.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Path, State},
    http::header,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use time::{Date, Duration};

use crate::{
    AppState, Error,
    auth::UserID,
    ledger::{Ledger, Record, RecordKind},
    timezone::local_today,
};

const CSV_HEADER: [&str; 6] = ["Sr.No.", "Name", "Category", "Amount", "Date", "Note"];

/// How far back a report reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportDuration {
    Daily,
    Weekly,
    Monthly,
    All,
}

impl ReportDuration {
    pub const ALL: [ReportDuration; 4] = [
        ReportDuration::Daily,
        ReportDuration::Weekly,
        ReportDuration::Monthly,
        ReportDuration::All,
    ];

    /// Any keyword other than "daily", "weekly" or "monthly" means all records.
    pub fn from_keyword(keyword: &str) -> Self {
        match keyword {
            "daily" => ReportDuration::Daily,
            "weekly" => ReportDuration::Weekly,
            "monthly" => ReportDuration::Monthly,
            _ => ReportDuration::All,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            ReportDuration::Daily => "daily",
            ReportDuration::Weekly => "weekly",
            ReportDuration::Monthly => "monthly",
            ReportDuration::All => "all",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ReportDuration::Daily => "Daily",
            ReportDuration::Weekly => "Weekly",
            ReportDuration::Monthly => "Monthly",
            ReportDuration::All => "All",
        }
    }

    /// The earliest date included in the report, or `None` for no limit.
    pub fn cutoff(self, today: Date) -> Option<Date> {
        let days = match self {
            ReportDuration::Daily => 1,
            ReportDuration::Weekly => 7,
            ReportDuration::Monthly => 30,
            ReportDuration::All => return None,
        };

        Some(today - Duration::days(days))
    }
}

/// The state needed to build a report.
#[derive(Debug, Clone)]
pub struct ReportState {
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for ReportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

pub async fn get_income_report(
    State(state): State<ReportState>,
    Extension(user_id): Extension<UserID>,
    Path(duration): Path<String>,
) -> Result<Response, Error> {
    get_report(RecordKind::Income, &state, user_id, &duration)
}

pub async fn get_expense_report(
    State(state): State<ReportState>,
    Extension(user_id): Extension<UserID>,
    Path(duration): Path<String>,
) -> Result<Response, Error> {
    get_report(RecordKind::Expense, &state, user_id, &duration)
}

fn get_report(
    kind: RecordKind,
    state: &ReportState,
    user_id: UserID,
    keyword: &str,
) -> Result<Response, Error> {
    let since = ReportDuration::from_keyword(keyword).cutoff(local_today(&state.local_timezone)?);

    let records = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        Ledger::new(&connection, user_id).records_since(kind, since)?
    };

    let csv = write_csv(&records).inspect_err(|error| {
        tracing::error!("could not write {kind} report for user {user_id}: {error}")
    })?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_owned()),
            (
                header::CONTENT_DISPOSITION,
                format!(
                    "attachment; filename=\"{}_{}_report.csv\"",
                    kind.plural(),
                    filename_keyword(keyword)
                ),
            ),
        ],
        csv,
    )
        .into_response())
}

/// Keywords end up in a header, so only plain words are passed through.
fn filename_keyword(keyword: &str) -> &str {
    if !keyword.is_empty() && keyword.chars().all(|c| c.is_ascii_alphanumeric()) {
        keyword
    } else {
        "all"
    }
}

fn write_csv(records: &[Record]) -> Result<Vec<u8>, Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;

    for (index, record) in records.iter().enumerate() {
        writer.write_record([
            (index + 1).to_string(),
            record.name.clone(),
            record.category_name.to_string(),
            format!("{:.2}", record.amount),
            record.date.to_string(),
            record.note.clone().unwrap_or_default(),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|error| Error::CsvError(error.to_string()))
}
