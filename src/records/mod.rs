//! The pages for listing, creating, editing and deleting incomes and expenses.
//!
//! Both kinds share the same handlers, the exported route handlers only pick the [RecordKind].

mod form;
mod handlers;
mod view;

pub use handlers::{
    create_expense, create_income, delete_expense, delete_income, edit_expense,
    edit_income, get_edit_expense_page, get_edit_income_page, get_expenses_page,
    get_incomes_page,
};

use crate::{
    endpoints::{self, format_endpoint},
    ledger::{RecordId, RecordKind},
};

/// The page listing the records of `kind`.
pub fn list_endpoint(kind: RecordKind) -> &'static str {
    match kind {
        RecordKind::Income => endpoints::INCOMES,
        RecordKind::Expense => endpoints::EXPENSES,
    }
}

pub fn edit_endpoint(kind: RecordKind, record_id: RecordId) -> String {
    let path = match kind {
        RecordKind::Income => endpoints::EDIT_INCOME,
        RecordKind::Expense => endpoints::EDIT_EXPENSE,
    };

    format_endpoint(path, record_id)
}

pub fn delete_endpoint(kind: RecordKind, record_id: RecordId) -> String {
    let path = match kind {
        RecordKind::Income => endpoints::DELETE_INCOME,
        RecordKind::Expense => endpoints::DELETE_EXPENSE,
    };

    format_endpoint(path, record_id)
}

/// The CSV download of the records of `kind` for `duration`, e.g. "weekly".
pub fn report_endpoint(kind: RecordKind, duration: &str) -> String {
    let path = match kind {
        RecordKind::Income => endpoints::INCOME_REPORT,
        RecordKind::Expense => endpoints::EXPENSE_REPORT,
    };

    format_endpoint(path, duration)
}

#[cfg(test)]
mod tests {
    use crate::ledger::RecordKind;

    use super::{delete_endpoint, edit_endpoint, list_endpoint, report_endpoint};

    #[test]
    fn endpoints_follow_kind() {
        assert_eq!(list_endpoint(RecordKind::Income), "/incomes");
        assert_eq!(edit_endpoint(RecordKind::Expense, 4), "/expenses/4/edit");
        assert_eq!(delete_endpoint(RecordKind::Income, 7), "/incomes/7/delete");
        assert_eq!(
            report_endpoint(RecordKind::Expense, "monthly"),
            "/reports/expense/monthly"
        );
    }
}
