//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router,
    extract::FromRef,
    middleware,
    routing::{get, post},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    auth::{AuthState, auth_guard, get_landing_page, get_log_out, post_log_in, post_sign_up},
    dashboard::get_dashboard_page,
    endpoints,
    not_found::get_404_not_found,
    profile::{get_profile_page, post_profile},
    records::{
        create_expense, create_income, delete_expense, delete_income, edit_expense, edit_income,
        get_edit_expense_page, get_edit_income_page, get_expenses_page, get_incomes_page,
    },
    report::{get_expense_report, get_income_report},
    settings::{
        add_expense_category, add_income_category, get_settings_page, post_settings,
        remove_expense_category, remove_income_category,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::ROOT, get(get_landing_page))
        .route(endpoints::SIGN_UP, post(post_sign_up))
        .route(endpoints::LOG_IN, post(post_log_in))
        .route(endpoints::LOG_OUT, get(get_log_out));

    let protected_routes = Router::new()
        .route(endpoints::DASHBOARD, get(get_dashboard_page))
        .route(
            endpoints::INCOMES,
            get(get_incomes_page).post(create_income),
        )
        .route(
            endpoints::EDIT_INCOME,
            get(get_edit_income_page).post(edit_income),
        )
        .route(endpoints::DELETE_INCOME, post(delete_income))
        .route(
            endpoints::EXPENSES,
            get(get_expenses_page).post(create_expense),
        )
        .route(
            endpoints::EDIT_EXPENSE,
            get(get_edit_expense_page).post(edit_expense),
        )
        .route(endpoints::DELETE_EXPENSE, post(delete_expense))
        .route(endpoints::INCOME_REPORT, get(get_income_report))
        .route(endpoints::EXPENSE_REPORT, get(get_expense_report))
        .route(
            endpoints::SETTINGS,
            get(get_settings_page).post(post_settings),
        )
        .route(endpoints::ADD_INCOME_CATEGORY, post(add_income_category))
        .route(
            endpoints::REMOVE_INCOME_CATEGORY,
            post(remove_income_category),
        )
        .route(endpoints::ADD_EXPENSE_CATEGORY, post(add_expense_category))
        .route(
            endpoints::REMOVE_EXPENSE_CATEGORY,
            post(remove_expense_category),
        )
        .route(endpoints::PROFILE, get(get_profile_page).post(post_profile))
        .layer(middleware::from_fn_with_state(
            AuthState::from_ref(&state),
            auth_guard,
        ));

    protected_routes
        .merge(unprotected_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}
