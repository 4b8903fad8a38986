//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/incomes/{income_id}/edit', use [format_endpoint].

/// The landing page with the log-in and sign-up forms.
pub const ROOT: &str = "/";
/// Where the client is sent after a failed log-in attempt.
pub const LOG_IN_FAILED: &str = "/?error=credentials";
/// The route for creating a new user.
pub const SIGN_UP: &str = "/signup";
/// The route for logging in a user.
pub const LOG_IN: &str = "/login";
/// The route for the client to log out the current user.
pub const LOG_OUT: &str = "/logout";
/// The landing page for logged in users.
pub const DASHBOARD: &str = "/dashboard";
/// The page for listing and creating incomes.
pub const INCOMES: &str = "/incomes";
/// The page for editing an existing income.
pub const EDIT_INCOME: &str = "/incomes/{income_id}/edit";
/// The route to delete an income.
pub const DELETE_INCOME: &str = "/incomes/{income_id}/delete";
/// The page for listing and creating expenses.
pub const EXPENSES: &str = "/expenses";
/// The page for editing an existing expense.
pub const EDIT_EXPENSE: &str = "/expenses/{expense_id}/edit";
/// The route to delete an expense.
pub const DELETE_EXPENSE: &str = "/expenses/{expense_id}/delete";
/// The route to download incomes as CSV.
pub const INCOME_REPORT: &str = "/reports/income/{duration}";
/// The route to download expenses as CSV.
pub const EXPENSE_REPORT: &str = "/reports/expense/{duration}";
/// The page for changing user details and managing categories.
pub const SETTINGS: &str = "/settings";
/// The route to add an income category.
pub const ADD_INCOME_CATEGORY: &str = "/settings/categories/income/add";
/// The route to remove an income category.
pub const REMOVE_INCOME_CATEGORY: &str = "/settings/categories/income/remove/{category_id}";
/// The route to add an expense category.
pub const ADD_EXPENSE_CATEGORY: &str = "/settings/categories/expense/add";
/// The route to remove an expense category.
pub const REMOVE_EXPENSE_CATEGORY: &str = "/settings/categories/expense/remove/{category_id}";
/// The page showing the user's details and balance.
pub const PROFILE: &str = "/profile";
/// The route for static files.
pub const STATIC: &str = "/static";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/incomes/{income_id}/edit', '{income_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: impl ToString) -> String {
    let mut param_start = None;
    let mut param_end = None;

    for (i, c) in endpoint_path.chars().enumerate() {
        if c == '{' {
            param_start = Some(i);
        } else if param_start.is_some() && c == '}' {
            param_end = Some(i + 1);
            break;
        }
    }

    let param_start = match param_start {
        Some(start) => start,
        None => return endpoint_path.to_string(),
    };

    let param_end = param_end.unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id.to_string(),
        &endpoint_path[param_end..]
    )
}

// These tests are here so that we know when we call `Uri::from_shared` it will not panic.
#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::endpoints;

    use super::format_endpoint;

    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok());
    }

    #[test]
    fn endpoints_are_valid_uris() {
        assert_endpoint_is_valid_uri(endpoints::ROOT);
        assert_endpoint_is_valid_uri(endpoints::LOG_IN_FAILED);
        assert_endpoint_is_valid_uri(endpoints::SIGN_UP);
        assert_endpoint_is_valid_uri(endpoints::LOG_IN);
        assert_endpoint_is_valid_uri(endpoints::LOG_OUT);
        assert_endpoint_is_valid_uri(endpoints::DASHBOARD);
        assert_endpoint_is_valid_uri(endpoints::INCOMES);
        assert_endpoint_is_valid_uri(endpoints::EDIT_INCOME);
        assert_endpoint_is_valid_uri(endpoints::DELETE_INCOME);
        assert_endpoint_is_valid_uri(endpoints::EXPENSES);
        assert_endpoint_is_valid_uri(endpoints::EDIT_EXPENSE);
        assert_endpoint_is_valid_uri(endpoints::DELETE_EXPENSE);
        assert_endpoint_is_valid_uri(endpoints::INCOME_REPORT);
        assert_endpoint_is_valid_uri(endpoints::EXPENSE_REPORT);
        assert_endpoint_is_valid_uri(endpoints::SETTINGS);
        assert_endpoint_is_valid_uri(endpoints::ADD_INCOME_CATEGORY);
        assert_endpoint_is_valid_uri(endpoints::REMOVE_INCOME_CATEGORY);
        assert_endpoint_is_valid_uri(endpoints::ADD_EXPENSE_CATEGORY);
        assert_endpoint_is_valid_uri(endpoints::REMOVE_EXPENSE_CATEGORY);
        assert_endpoint_is_valid_uri(endpoints::PROFILE);
        assert_endpoint_is_valid_uri(endpoints::STATIC);
    }

    #[test]
    fn produces_valid_uri() {
        let formatted_path = format_endpoint("/hello/{world_id}", 1);

        assert_eq!(formatted_path, "/hello/1");
        assert!(formatted_path.parse::<Uri>().is_ok());

        // Parameter with single word should also work.
        let formatted_path = format_endpoint("/hello/{world}", 1);

        assert_eq!(formatted_path, "/hello/1");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }

    #[test]
    fn returns_original_path_with_no_parameter() {
        let formatted_path = format_endpoint("/hello/world", 1);

        assert_eq!(formatted_path, "/hello/world");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }

    #[test]
    fn parameter_in_middle() {
        let formatted_path = format_endpoint("/hello/{world}/bye", 1);

        assert_eq!(formatted_path, "/hello/1/bye");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }

    #[test]
    fn accepts_text_parameter() {
        let formatted_path = format_endpoint(endpoints::EXPENSE_REPORT, "weekly");

        assert_eq!(formatted_path, "/reports/expense/weekly");
    }
}
