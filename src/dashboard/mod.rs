//! Dashboard module
//!
//! Provides an overview page with the user's balance, category totals and the
//! incomes and expenses of the last ten days.

mod aggregation;
mod charts;
mod handlers;
mod tables;

pub use handlers::get_dashboard_page;
