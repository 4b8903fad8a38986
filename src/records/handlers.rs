//! Route handlers for incomes and expenses.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Redirect, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::UserID,
    form::{FormResult, accept_form},
    ledger::{Ledger, RecordId, RecordKind},
    records::{
        form::{RecordForm, RecordFormDefaults},
        list_endpoint,
        view::{edit_record_view, records_view},
    },
    timezone::local_today,
};

/// The state needed for the income and expense pages.
#[derive(Debug, Clone)]
pub struct RecordsState {
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for RecordsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

type RecordFormResult = FormResult<RecordForm>;

pub async fn get_incomes_page(
    State(state): State<RecordsState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Response, Error> {
    records_page(RecordKind::Income, &state, user_id)
}

pub async fn get_expenses_page(
    State(state): State<RecordsState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Response, Error> {
    records_page(RecordKind::Expense, &state, user_id)
}

pub async fn create_income(
    State(state): State<RecordsState>,
    Extension(user_id): Extension<UserID>,
    form: RecordFormResult,
) -> Result<Response, Error> {
    create_record(RecordKind::Income, &state, user_id, form)
}

pub async fn create_expense(
    State(state): State<RecordsState>,
    Extension(user_id): Extension<UserID>,
    form: RecordFormResult,
) -> Result<Response, Error> {
    create_record(RecordKind::Expense, &state, user_id, form)
}

pub async fn get_edit_income_page(
    State(state): State<RecordsState>,
    Extension(user_id): Extension<UserID>,
    Path(income_id): Path<RecordId>,
) -> Result<Response, Error> {
    edit_record_page(RecordKind::Income, &state, user_id, income_id)
}

pub async fn get_edit_expense_page(
    State(state): State<RecordsState>,
    Extension(user_id): Extension<UserID>,
    Path(expense_id): Path<RecordId>,
) -> Result<Response, Error> {
    edit_record_page(RecordKind::Expense, &state, user_id, expense_id)
}

pub async fn edit_income(
    State(state): State<RecordsState>,
    Extension(user_id): Extension<UserID>,
    Path(income_id): Path<RecordId>,
    form: RecordFormResult,
) -> Result<Response, Error> {
    edit_record(RecordKind::Income, &state, user_id, income_id, form)
}

pub async fn edit_expense(
    State(state): State<RecordsState>,
    Extension(user_id): Extension<UserID>,
    Path(expense_id): Path<RecordId>,
    form: RecordFormResult,
) -> Result<Response, Error> {
    edit_record(RecordKind::Expense, &state, user_id, expense_id, form)
}

pub async fn delete_income(
    State(state): State<RecordsState>,
    Extension(user_id): Extension<UserID>,
    Path(income_id): Path<RecordId>,
) -> Result<Response, Error> {
    delete_record(RecordKind::Income, &state, user_id, income_id)
}

pub async fn delete_expense(
    State(state): State<RecordsState>,
    Extension(user_id): Extension<UserID>,
    Path(expense_id): Path<RecordId>,
) -> Result<Response, Error> {
    delete_record(RecordKind::Expense, &state, user_id, expense_id)
}

/// Run `f` against the user's ledger while holding the database lock.
fn with_ledger<T>(
    state: &RecordsState,
    user_id: UserID,
    f: impl FnOnce(&Ledger) -> Result<T, Error>,
) -> Result<T, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    f(&Ledger::new(&connection, user_id))
}

fn records_page(kind: RecordKind, state: &RecordsState, user_id: UserID) -> Result<Response, Error> {
    let today = local_today(&state.local_timezone)?;

    let (records, categories) = with_ledger(state, user_id, |ledger| {
        Ok((ledger.records(kind)?, ledger.categories(kind)?))
    })
    .inspect_err(|error| tracing::error!("could not get {kind}: {error}"))?;

    Ok(records_view(
        kind,
        &records,
        &categories,
        &RecordFormDefaults::empty(today),
    )
    .into_response())
}

fn create_record(
    kind: RecordKind,
    state: &RecordsState,
    user_id: UserID,
    form: RecordFormResult,
) -> Result<Response, Error> {
    let new_record = accept_form(form)?
        .into_new_record()
        .inspect_err(|error| tracing::warn!("rejected new {kind}: {error}"))?;

    let record_id = with_ledger(state, user_id, |ledger| {
        ledger.create_record(kind, &new_record)
    })?;
    tracing::debug!("Created {kind} {record_id} for user {user_id}");

    Ok(Redirect::to(list_endpoint(kind)).into_response())
}

fn edit_record_page(
    kind: RecordKind,
    state: &RecordsState,
    user_id: UserID,
    record_id: RecordId,
) -> Result<Response, Error> {
    let (record, categories) = with_ledger(state, user_id, |ledger| {
        Ok((ledger.record(kind, record_id)?, ledger.categories(kind)?))
    })?;

    Ok(edit_record_view(kind, &record, &categories).into_response())
}

fn edit_record(
    kind: RecordKind,
    state: &RecordsState,
    user_id: UserID,
    record_id: RecordId,
    form: RecordFormResult,
) -> Result<Response, Error> {
    let new_record = accept_form(form)?
        .into_new_record()
        .inspect_err(|error| tracing::warn!("rejected edit of {kind} {record_id}: {error}"))?;

    with_ledger(state, user_id, |ledger| {
        ledger.update_record(kind, record_id, &new_record)
    })?;

    Ok(Redirect::to(list_endpoint(kind)).into_response())
}

fn delete_record(
    kind: RecordKind,
    state: &RecordsState,
    user_id: UserID,
    record_id: RecordId,
) -> Result<Response, Error> {
    with_ledger(state, user_id, |ledger| ledger.delete_record(kind, record_id))?;
    tracing::debug!("Deleted {kind} {record_id} for user {user_id}");

    Ok(Redirect::to(list_endpoint(kind)).into_response())
}
