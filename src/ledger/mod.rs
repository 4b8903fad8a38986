//! A user's incomes, expenses and their categories.
//!
//! Everything goes through [Ledger], which binds the user's ID to every query
//! so one user can never see or change another user's data.

mod category;
mod kind;
mod record;

pub use category::{
    Category, CategoryId, CategoryName, CategoryTotal, create_category_tables,
};
pub use kind::RecordKind;
pub use record::{NewRecord, Record, RecordId, create_record_tables};

use rusqlite::Connection;
use time::Date;

use crate::{
    Error,
    auth::UserID,
    balance::{BalanceChange, apply_balance_delta, get_balance},
};

/// The records and categories of one user.
pub struct Ledger<'c> {
    connection: &'c Connection,
    user_id: UserID,
}

impl<'c> Ledger<'c> {
    pub fn new(connection: &'c Connection, user_id: UserID) -> Self {
        Self {
            connection,
            user_id,
        }
    }

    /// The user's categories of `kind`, ordered by name.
    pub fn categories(&self, kind: RecordKind) -> Result<Vec<Category>, Error> {
        category::get_categories(kind, self.user_id, self.connection)
    }

    /// # Errors
    ///
    /// Returns [Error::DuplicateCategoryName] if the user already has a category of `kind` called `name`.
    pub fn add_category(&self, kind: RecordKind, name: CategoryName) -> Result<Category, Error> {
        category::insert_category(kind, self.user_id, name, self.connection)
    }

    /// # Errors
    ///
    /// Returns [Error::NotFound] if the user has no such category, or
    /// [Error::CategoryInUse] if records are still filed under it.
    pub fn remove_category(&self, kind: RecordKind, category_id: CategoryId) -> Result<(), Error> {
        let transaction = self.connection.unchecked_transaction()?;

        category::get_category(kind, self.user_id, category_id, &transaction)?;
        if category::is_category_in_use(kind, self.user_id, category_id, &transaction)? {
            return Err(Error::CategoryInUse);
        }
        category::delete_category(kind, self.user_id, category_id, &transaction)?;

        transaction.commit()?;

        Ok(())
    }

    /// All of the user's records of `kind`, oldest first.
    pub fn records(&self, kind: RecordKind) -> Result<Vec<Record>, Error> {
        self.records_since(kind, None)
    }

    /// The user's records of `kind` dated on or after `since`, oldest first.
    ///
    /// Passing `None` returns all records.
    pub fn records_since(&self, kind: RecordKind, since: Option<Date>) -> Result<Vec<Record>, Error> {
        record::get_records(kind, self.user_id, since, self.connection)
    }

    pub fn record(&self, kind: RecordKind, record_id: RecordId) -> Result<Record, Error> {
        record::get_record(kind, self.user_id, record_id, self.connection)
    }

    /// Add a record and update the balance to match.
    ///
    /// # Errors
    ///
    /// Returns [Error::NotFound] if the category is not one of the user's
    /// categories of `kind`. Nothing is changed on error.
    pub fn create_record(&self, kind: RecordKind, new_record: &NewRecord) -> Result<RecordId, Error> {
        let transaction = self.connection.unchecked_transaction()?;

        category::get_category(kind, self.user_id, new_record.category_id, &transaction)?;
        let record_id = record::insert_record(kind, self.user_id, new_record, &transaction)?;
        apply_balance_delta(
            self.user_id,
            BalanceChange::Created(new_record.amount).delta(kind),
            &transaction,
        )?;

        transaction.commit()?;

        Ok(record_id)
    }

    /// Replace a record's values and update the balance by the change in amount.
    ///
    /// # Errors
    ///
    /// Returns [Error::NotFound] if the record or the category does not belong
    /// to the user. Nothing is changed on error.
    pub fn update_record(
        &self,
        kind: RecordKind,
        record_id: RecordId,
        new_record: &NewRecord,
    ) -> Result<(), Error> {
        let transaction = self.connection.unchecked_transaction()?;

        let old_record = record::get_record(kind, self.user_id, record_id, &transaction)?;
        category::get_category(kind, self.user_id, new_record.category_id, &transaction)?;
        record::update_record(kind, self.user_id, record_id, new_record, &transaction)?;
        apply_balance_delta(
            self.user_id,
            BalanceChange::Edited {
                old: old_record.amount,
                new: new_record.amount,
            }
            .delta(kind),
            &transaction,
        )?;

        transaction.commit()?;

        Ok(())
    }

    /// Remove a record and take its amount back out of the balance.
    ///
    /// # Errors
    ///
    /// Returns [Error::NotFound] if the record does not belong to the user.
    pub fn delete_record(&self, kind: RecordKind, record_id: RecordId) -> Result<(), Error> {
        let transaction = self.connection.unchecked_transaction()?;

        let amount = record::delete_record(kind, self.user_id, record_id, &transaction)?;
        apply_balance_delta(
            self.user_id,
            BalanceChange::Deleted(amount).delta(kind),
            &transaction,
        )?;

        transaction.commit()?;

        Ok(())
    }

    /// The total of each of the user's categories of `kind`, ordered by category name.
    pub fn category_totals(&self, kind: RecordKind) -> Result<Vec<CategoryTotal>, Error> {
        category::get_category_totals(kind, self.user_id, self.connection)
    }

    /// The total amount per day for the days from `from` to `to` inclusive that have records.
    pub fn daily_totals(
        &self,
        kind: RecordKind,
        from: Date,
        to: Date,
    ) -> Result<Vec<(Date, f64)>, Error> {
        record::get_daily_totals(kind, self.user_id, from, to, self.connection)
    }

    pub fn balance(&self) -> Result<f64, Error> {
        get_balance(self.user_id, self.connection)
    }
}

#[cfg(test)]
mod ledger_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        auth::{PasswordHash, UserDetails, UserID, create_user},
        balance::create_account,
        db::initialize,
    };

    use super::{CategoryName, Ledger, NewRecord, RecordKind};

    fn get_test_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        connection
    }

    fn create_test_user(email: &str, connection: &Connection) -> UserID {
        let user = create_user(
            UserDetails::new("Ada", "Lovelace", email).unwrap(),
            PasswordHash::new_unchecked("hunter2"),
            connection,
        )
        .unwrap();
        create_account(user.id, &user.first_name, connection).unwrap();

        user.id
    }

    fn record(category_id: i64, amount: f64) -> NewRecord {
        NewRecord::new("Test", category_id, amount, date!(2025 - 10 - 01), None).unwrap()
    }

    fn sum_amounts(ledger: &Ledger, kind: RecordKind) -> f64 {
        ledger
            .records(kind)
            .unwrap()
            .iter()
            .map(|record| record.amount)
            .sum()
    }

    #[track_caller]
    fn assert_balance_matches_records(ledger: &Ledger) {
        let want = sum_amounts(ledger, RecordKind::Income) - sum_amounts(ledger, RecordKind::Expense);
        let got = ledger.balance().unwrap();

        assert!(
            (got - want).abs() < 1e-9,
            "balance {got} does not match incomes minus expenses {want}"
        );
    }

    #[test]
    fn balance_follows_every_mutation() {
        let connection = get_test_connection();
        let ledger = Ledger::new(&connection, create_test_user("ada@example.com", &connection));
        let salary = ledger
            .add_category(RecordKind::Income, CategoryName::new_unchecked("Salary"))
            .unwrap();
        let rent = ledger
            .add_category(RecordKind::Expense, CategoryName::new_unchecked("Rent"))
            .unwrap();

        let income = ledger
            .create_record(RecordKind::Income, &record(salary.id, 1000.0))
            .unwrap();
        assert_balance_matches_records(&ledger);

        let expense = ledger
            .create_record(RecordKind::Expense, &record(rent.id, 400.0))
            .unwrap();
        assert_balance_matches_records(&ledger);

        ledger
            .update_record(RecordKind::Expense, expense, &record(rent.id, 450.25))
            .unwrap();
        assert_balance_matches_records(&ledger);

        ledger
            .update_record(RecordKind::Income, income, &record(salary.id, 900.0))
            .unwrap();
        assert_balance_matches_records(&ledger);

        ledger.delete_record(RecordKind::Expense, expense).unwrap();
        assert_balance_matches_records(&ledger);
        assert_eq!(ledger.balance(), Ok(900.0));
    }

    #[test]
    fn editing_applies_the_difference() {
        let connection = get_test_connection();
        let ledger = Ledger::new(&connection, create_test_user("ada@example.com", &connection));
        let salary = ledger
            .add_category(RecordKind::Income, CategoryName::new_unchecked("Salary"))
            .unwrap();

        let income = ledger
            .create_record(RecordKind::Income, &record(salary.id, 100.0))
            .unwrap();
        assert_eq!(ledger.balance(), Ok(100.0));

        ledger
            .update_record(RecordKind::Income, income, &record(salary.id, 150.0))
            .unwrap();

        assert_eq!(ledger.balance(), Ok(150.0));
    }

    #[test]
    fn create_then_delete_leaves_balance_unchanged() {
        let connection = get_test_connection();
        let ledger = Ledger::new(&connection, create_test_user("ada@example.com", &connection));
        let food = ledger
            .add_category(RecordKind::Expense, CategoryName::new_unchecked("Food"))
            .unwrap();

        let expense = ledger
            .create_record(RecordKind::Expense, &record(food.id, 12.34))
            .unwrap();
        ledger.delete_record(RecordKind::Expense, expense).unwrap();

        assert_eq!(ledger.balance(), Ok(0.0));
    }

    #[test]
    fn create_record_rejects_unknown_category() {
        let connection = get_test_connection();
        let ledger = Ledger::new(&connection, create_test_user("ada@example.com", &connection));
        let food = ledger
            .add_category(RecordKind::Expense, CategoryName::new_unchecked("Food"))
            .unwrap();
        ledger
            .add_category(RecordKind::Income, CategoryName::new_unchecked("Salary"))
            .unwrap();

        let result = ledger.create_record(RecordKind::Income, &record(food.id + 100, 1.0));

        assert_eq!(result, Err(Error::NotFound));
        assert_eq!(ledger.balance(), Ok(0.0));
    }

    #[test]
    fn users_cannot_see_or_change_each_others_data() {
        let connection = get_test_connection();
        let ada = Ledger::new(&connection, create_test_user("ada@example.com", &connection));
        let bob = Ledger::new(&connection, create_test_user("bob@example.com", &connection));
        let salary = ada
            .add_category(RecordKind::Income, CategoryName::new_unchecked("Salary"))
            .unwrap();
        let income = ada
            .create_record(RecordKind::Income, &record(salary.id, 10.0))
            .unwrap();

        assert_eq!(bob.record(RecordKind::Income, income), Err(Error::NotFound));
        assert_eq!(
            bob.delete_record(RecordKind::Income, income),
            Err(Error::NotFound)
        );
        assert_eq!(
            bob.create_record(RecordKind::Income, &record(salary.id, 10.0)),
            Err(Error::NotFound)
        );
        assert_eq!(
            bob.remove_category(RecordKind::Income, salary.id),
            Err(Error::NotFound)
        );
        assert!(bob.records(RecordKind::Income).unwrap().is_empty());
        assert_eq!(bob.balance(), Ok(0.0));
        assert_eq!(ada.balance(), Ok(10.0));
    }

    #[test]
    fn duplicate_category_names_are_per_user_and_kind() {
        let connection = get_test_connection();
        let ada = Ledger::new(&connection, create_test_user("ada@example.com", &connection));
        let bob = Ledger::new(&connection, create_test_user("bob@example.com", &connection));
        let name = CategoryName::new_unchecked("Gifts");

        ada.add_category(RecordKind::Income, name.clone()).unwrap();

        assert_eq!(
            ada.add_category(RecordKind::Income, name.clone()),
            Err(Error::DuplicateCategoryName)
        );
        assert!(ada.add_category(RecordKind::Expense, name.clone()).is_ok());
        assert!(bob.add_category(RecordKind::Income, name).is_ok());
    }

    #[test]
    fn category_in_use_cannot_be_removed() {
        let connection = get_test_connection();
        let ledger = Ledger::new(&connection, create_test_user("ada@example.com", &connection));
        let food = ledger
            .add_category(RecordKind::Expense, CategoryName::new_unchecked("Food"))
            .unwrap();
        let expense = ledger
            .create_record(RecordKind::Expense, &record(food.id, 5.0))
            .unwrap();

        assert_eq!(
            ledger.remove_category(RecordKind::Expense, food.id),
            Err(Error::CategoryInUse)
        );

        ledger.delete_record(RecordKind::Expense, expense).unwrap();
        assert_eq!(ledger.remove_category(RecordKind::Expense, food.id), Ok(()));
        assert!(ledger.categories(RecordKind::Expense).unwrap().is_empty());
    }

    #[test]
    fn category_totals_include_empty_categories() {
        let connection = get_test_connection();
        let ledger = Ledger::new(&connection, create_test_user("ada@example.com", &connection));
        let rent = ledger
            .add_category(RecordKind::Expense, CategoryName::new_unchecked("Rent"))
            .unwrap();
        ledger
            .add_category(RecordKind::Expense, CategoryName::new_unchecked("Books"))
            .unwrap();
        ledger
            .create_record(RecordKind::Expense, &record(rent.id, 300.0))
            .unwrap();
        ledger
            .create_record(RecordKind::Expense, &record(rent.id, 50.0))
            .unwrap();

        let totals = ledger.category_totals(RecordKind::Expense).unwrap();

        let totals: Vec<(&str, f64)> = totals
            .iter()
            .map(|total| (total.name.as_ref(), total.total))
            .collect();
        assert_eq!(totals, vec![("Books", 0.0), ("Rent", 350.0)]);
    }

    #[test]
    fn records_since_filters_and_orders_by_date() {
        let connection = get_test_connection();
        let ledger = Ledger::new(&connection, create_test_user("ada@example.com", &connection));
        let food = ledger
            .add_category(RecordKind::Expense, CategoryName::new_unchecked("Food"))
            .unwrap();
        for (amount, date) in [
            (3.0, date!(2025 - 10 - 03)),
            (1.0, date!(2025 - 09 - 30)),
            (2.0, date!(2025 - 10 - 01)),
        ] {
            let new_record = NewRecord::new("Lunch", food.id, amount, date, None).unwrap();
            ledger.create_record(RecordKind::Expense, &new_record).unwrap();
        }

        let records = ledger
            .records_since(RecordKind::Expense, Some(date!(2025 - 10 - 01)))
            .unwrap();

        let amounts: Vec<f64> = records.iter().map(|record| record.amount).collect();
        assert_eq!(amounts, vec![2.0, 3.0]);
        assert_eq!(records[0].category_name.as_ref(), "Food");
        assert_eq!(ledger.records(RecordKind::Expense).unwrap().len(), 3);
    }

    #[test]
    fn daily_totals_group_by_date() {
        let connection = get_test_connection();
        let ledger = Ledger::new(&connection, create_test_user("ada@example.com", &connection));
        let food = ledger
            .add_category(RecordKind::Expense, CategoryName::new_unchecked("Food"))
            .unwrap();
        for (amount, date) in [
            (3.0, date!(2025 - 10 - 03)),
            (4.0, date!(2025 - 10 - 03)),
            (1.0, date!(2025 - 09 - 20)),
        ] {
            let new_record = NewRecord::new("Lunch", food.id, amount, date, None).unwrap();
            ledger.create_record(RecordKind::Expense, &new_record).unwrap();
        }

        let totals = ledger
            .daily_totals(
                RecordKind::Expense,
                date!(2025 - 09 - 25),
                date!(2025 - 10 - 04),
            )
            .unwrap();

        assert_eq!(totals, vec![(date!(2025 - 10 - 03), 7.0)]);
    }
}
