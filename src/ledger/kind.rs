//! Incomes and expenses share one schema and one set of handlers, told apart by [RecordKind].

use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Whether a record is money earned or money spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Income,
    Expense,
}

impl RecordKind {
    /// Both kinds, incomes first.
    pub const ALL: [RecordKind; 2] = [RecordKind::Income, RecordKind::Expense];

    /// The table the records of this kind are stored in.
    pub fn record_table(self) -> &'static str {
        match self {
            RecordKind::Income => "income",
            RecordKind::Expense => "expense",
        }
    }

    /// The table the categories of this kind are stored in.
    pub fn category_table(self) -> &'static str {
        match self {
            RecordKind::Income => "income_category",
            RecordKind::Expense => "expense_category",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RecordKind::Income => "Income",
            RecordKind::Expense => "Expense",
        }
    }

    pub fn plural(self) -> &'static str {
        match self {
            RecordKind::Income => "Incomes",
            RecordKind::Expense => "Expenses",
        }
    }

    /// The effect an `amount` of this kind has on the balance.
    pub fn signed(self, amount: f64) -> f64 {
        match self {
            RecordKind::Income => amount,
            RecordKind::Expense => -amount,
        }
    }
}

impl Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.record_table())
    }
}

#[cfg(test)]
mod tests {
    use super::RecordKind;

    #[test]
    fn expenses_reduce_the_balance() {
        assert_eq!(RecordKind::Income.signed(12.5), 12.5);
        assert_eq!(RecordKind::Expense.signed(12.5), -12.5);
    }

    #[test]
    fn tables_are_distinct() {
        assert_ne!(
            RecordKind::Income.category_table(),
            RecordKind::Expense.category_table()
        );
        assert_ne!(
            RecordKind::Income.record_table(),
            RecordKind::Expense.record_table()
        );
    }
}
