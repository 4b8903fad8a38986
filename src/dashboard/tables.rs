//! Table views for dashboard data display.

use maud::{Markup, html};

use crate::{
    html::{TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, format_currency},
    ledger::{CategoryTotal, RecordKind},
};

const TABLE_CELL_GREEN_STYLE: &str = "text-green-600 dark:text-green-400";
const TABLE_CELL_RED_STYLE: &str = "text-red-600 dark:text-red-400";

/// Gets the CSS class for coloring amounts (green for positive, red for negative).
fn amount_color_class(amount: f64) -> &'static str {
    if amount >= 0.0 {
        TABLE_CELL_GREEN_STYLE
    } else {
        TABLE_CELL_RED_STYLE
    }
}

/// Renders the balance next to the incomes, expenses and net income of the last ten days.
pub(super) fn summary_table(balance: f64, income_total: f64, expense_total: f64) -> Markup {
    let net_income = income_total - expense_total;

    html! {
        div id="summary" {
            h3 class="text-xl font-semibold mb-4" { "Summary" }

            div class="overflow-x-auto rounded-lg shadow" {
                table class="w-full text-sm text-left text-gray-500 dark:text-gray-400" {
                    tbody {
                        tr class=(TABLE_ROW_STYLE) {
                            th scope="row" class=(TABLE_CELL_STYLE) { "Balance" }
                            td
                                id="balance"
                                class={(TABLE_CELL_STYLE) " font-bold " (amount_color_class(balance))}
                            {
                                (format_currency(balance))
                            }
                        }
                        tr class=(TABLE_ROW_STYLE) {
                            th scope="row" class=(TABLE_CELL_STYLE) { "Income, last ten days" }
                            td class={(TABLE_CELL_STYLE) " " (TABLE_CELL_GREEN_STYLE)} {
                                (format_currency(income_total))
                            }
                        }
                        tr class=(TABLE_ROW_STYLE) {
                            th scope="row" class=(TABLE_CELL_STYLE) { "Expenses, last ten days" }
                            td class={(TABLE_CELL_STYLE) " " (TABLE_CELL_RED_STYLE)} {
                                (format_currency(expense_total))
                            }
                        }
                        tr class=(TABLE_ROW_STYLE) {
                            th scope="row" class=(TABLE_CELL_STYLE) { "Net income, last ten days" }
                            td class={(TABLE_CELL_STYLE) " " (amount_color_class(net_income))} {
                                (format_currency(net_income))
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Renders the total of every category of `kind`, including those without records.
pub(super) fn category_totals_table(kind: RecordKind, totals: &[CategoryTotal]) -> Markup {
    let table_id = format!("{kind}-category-totals");

    html! {
        div {
            h3 class="text-xl font-semibold mb-4" { (kind.plural()) " by category" }

            div class="overflow-x-auto rounded-lg shadow" {
                table id=(table_id) class="w-full text-sm text-left text-gray-500 dark:text-gray-400" {
                    thead class=(TABLE_HEADER_STYLE) {
                        tr {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Total" }
                        }
                    }
                    tbody {
                        @for total in totals {
                            tr class=(TABLE_ROW_STYLE) {
                                td class=(TABLE_CELL_STYLE) { (total.name) }
                                td class=(TABLE_CELL_STYLE) { (format_currency(total.total)) }
                            }
                        }

                        @if totals.is_empty() {
                            tr class=(TABLE_ROW_STYLE) {
                                td colspan="2" class=(TABLE_CELL_STYLE) { "No categories yet." }
                            }
                        }
                    }
                }
            }
        }
    }
}
