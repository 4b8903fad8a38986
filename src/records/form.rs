use maud::{Markup, html};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    html::{FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, text_input},
    ledger::{Category, CategoryId, NewRecord, Record},
};

/// The raw values submitted by the income and expense forms.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordForm {
    pub name: String,
    /// The ID of the category the record is filed under.
    pub category: CategoryId,
    pub amount: f64,
    pub date: Date,
    pub note: Option<String>,
}

impl RecordForm {
    /// Validate the submitted values.
    pub fn into_new_record(self) -> Result<NewRecord, Error> {
        NewRecord::new(
            &self.name,
            self.category,
            self.amount,
            self.date,
            self.note.as_deref(),
        )
    }
}

/// The values shown in the record form.
pub struct RecordFormDefaults<'a> {
    pub name: &'a str,
    pub category_id: Option<CategoryId>,
    pub amount: Option<f64>,
    pub date: Date,
    pub note: Option<&'a str>,
}

impl<'a> RecordFormDefaults<'a> {
    /// An empty form dated `today`.
    pub fn empty(today: Date) -> Self {
        Self {
            name: "",
            category_id: None,
            amount: None,
            date: today,
            note: None,
        }
    }

    pub fn from_record(record: &'a Record) -> Self {
        Self {
            name: &record.name,
            category_id: Some(record.category_id),
            amount: Some(record.amount),
            date: record.date,
            note: record.note.as_deref(),
        }
    }
}

pub fn record_form_fields(defaults: &RecordFormDefaults<'_>, categories: &[Category]) -> Markup {
    let amount_str = defaults.amount.map(|amount| format!("{amount:.2}"));

    html! {
        (text_input("name", "Name", "name", "text", defaults.name))

        div
        {
            label
                for="category"
                class=(FORM_LABEL_STYLE)
            {
                "Category"
            }

            select
                name="category"
                id="category"
                required
                class=(FORM_TEXT_INPUT_STYLE)
            {
                @for category in categories {
                    option
                        value=(category.id)
                        selected[defaults.category_id == Some(category.id)]
                    {
                        (category.name)
                    }
                }
            }
        }

        div
        {
            label
                for="amount"
                class=(FORM_LABEL_STYLE)
            {
                "Amount"
            }

            input
                name="amount"
                id="amount"
                type="number"
                step="0.01"
                placeholder="0.01"
                min="0.01"
                required
                value=[amount_str.as_deref()]
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label
                for="date"
                class=(FORM_LABEL_STYLE)
            {
                "Date"
            }

            input
                name="date"
                id="date"
                type="date"
                value=(defaults.date)
                required
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label
                for="note"
                class=(FORM_LABEL_STYLE)
            {
                "Note (optional)"
            }

            input
                name="note"
                id="note"
                type="text"
                value=[defaults.note]
                class=(FORM_TEXT_INPUT_STYLE);
        }
    }
}
