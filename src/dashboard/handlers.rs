//! Dashboard HTTP handlers and view rendering.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use time::Date;

use crate::{
    AppState, Error,
    auth::UserID,
    dashboard::{
        aggregation::{RollingSeries, rolling_daily_totals, rolling_window_start},
        charts::{
            DashboardChart, category_totals_chart, charts_script, charts_view, rolling_chart,
        },
        tables::{category_totals_table, summary_table},
    },
    endpoints,
    html::{HeadElement, PAGE_CONTAINER_STYLE, base, link},
    ledger::{CategoryTotal, Ledger, RecordKind},
    navigation::NavBar,
    timezone::local_today,
};

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Holds all the data needed to render the dashboard.
struct DashboardData {
    balance: f64,
    income_totals: Vec<CategoryTotal>,
    expense_totals: Vec<CategoryTotal>,
    incomes: RollingSeries,
    expenses: RollingSeries,
}

/// Display a page with an overview of the user's data.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Response, Error> {
    let today = local_today(&state.local_timezone)?;

    let data = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        build_dashboard_data(&Ledger::new(&connection, user_id), today)
            .inspect_err(|error| tracing::error!("could not build dashboard data: {error}"))?
    };

    Ok(dashboard_view(&data).into_response())
}

fn build_dashboard_data(ledger: &Ledger, today: Date) -> Result<DashboardData, Error> {
    let window_start = rolling_window_start(today);
    let rolling_series = |kind: RecordKind| -> Result<RollingSeries, Error> {
        let daily_totals = ledger.daily_totals(kind, window_start, today)?;
        Ok(rolling_daily_totals(&daily_totals, today))
    };

    Ok(DashboardData {
        balance: ledger.balance()?,
        income_totals: ledger.category_totals(RecordKind::Income)?,
        expense_totals: ledger.category_totals(RecordKind::Expense)?,
        incomes: rolling_series(RecordKind::Income)?,
        expenses: rolling_series(RecordKind::Expense)?,
    })
}

fn build_dashboard_charts(data: &DashboardData) -> [DashboardChart; 3] {
    [
        DashboardChart {
            id: "rolling-chart",
            options: rolling_chart(&data.incomes, &data.expenses).to_string(),
        },
        DashboardChart {
            id: "income-category-chart",
            options: category_totals_chart("Incomes by category", &data.income_totals).to_string(),
        },
        DashboardChart {
            id: "expense-category-chart",
            options: category_totals_chart("Expenses by category", &data.expense_totals)
                .to_string(),
        },
    ]
}

fn dashboard_view(data: &DashboardData) -> Markup {
    let nav_bar = NavBar::new(endpoints::DASHBOARD).into_html();
    let charts = build_dashboard_charts(data);
    let has_categories = !data.income_totals.is_empty() || !data.expense_totals.is_empty();

    let content = html!(
        (nav_bar)

        div
            id="dashboard-content"
            class={(PAGE_CONTAINER_STYLE) " max-w-screen-xl gap-4"}
        {
            @if !has_categories {
                p
                {
                    "Charts will fill up once you add some records. Start by creating categories in "
                    (link(endpoints::SETTINGS, "settings"))
                    "."
                }
            }

            (charts_view(&charts))

            div class="grid grid-cols-1 xl:grid-cols-3 gap-4 w-full"
            {
                (summary_table(
                    data.balance,
                    data.incomes.values.iter().sum(),
                    data.expenses.values.iter().sum(),
                ))
                (category_totals_table(RecordKind::Income, &data.income_totals))
                (category_totals_table(RecordKind::Expense, &data.expense_totals))
            }
        }
    );

    let scripts = [
        HeadElement::ScriptLink("/static/echarts.6.0.0.min.js".to_owned()),
        charts_script(&charts),
    ];

    base("Dashboard", &scripts, &content)
}
