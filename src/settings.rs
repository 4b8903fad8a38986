//! The settings page, where users change their details and manage their categories.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Redirect, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    auth::{User, UserID, get_user_by_id},
    endpoints::{self, format_endpoint},
    form::{FormResult, accept_form},
    html::{
        BUTTON_DELETE_STYLE, BUTTON_PRIMARY_STYLE, CATEGORY_BADGE_STYLE, FORM_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE, PAGE_CONTAINER_STYLE, base,
    },
    ledger::{Category, CategoryId, CategoryName, Ledger, RecordKind},
    navigation::NavBar,
    profile::{ProfileForm, ProfileState, profile_form, update_profile},
};

/// The state needed for the settings page.
#[derive(Debug, Clone)]
pub struct SettingsState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for SettingsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The name of a new category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryForm {
    pub name: String,
}

pub async fn get_settings_page(
    State(state): State<SettingsState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Response, Error> {
    let (user, income_categories, expense_categories) = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;
        let ledger = Ledger::new(&connection, user_id);

        (
            get_user_by_id(user_id, &connection)?,
            ledger.categories(RecordKind::Income)?,
            ledger.categories(RecordKind::Expense)?,
        )
    };

    Ok(settings_view(&user, &income_categories, &expense_categories).into_response())
}

/// Save the user's details from the settings page.
pub async fn post_settings(
    State(state): State<SettingsState>,
    Extension(user_id): Extension<UserID>,
    form: FormResult<ProfileForm>,
) -> Result<Response, Error> {
    let form = accept_form(form)?;
    let state = ProfileState {
        db_connection: state.db_connection,
    };

    update_profile(&state, user_id, &form)
}

pub async fn add_income_category(
    State(state): State<SettingsState>,
    Extension(user_id): Extension<UserID>,
    form: FormResult<CategoryForm>,
) -> Result<Response, Error> {
    add_category(RecordKind::Income, &state, user_id, &accept_form(form)?)
}

pub async fn add_expense_category(
    State(state): State<SettingsState>,
    Extension(user_id): Extension<UserID>,
    form: FormResult<CategoryForm>,
) -> Result<Response, Error> {
    add_category(RecordKind::Expense, &state, user_id, &accept_form(form)?)
}

pub async fn remove_income_category(
    State(state): State<SettingsState>,
    Extension(user_id): Extension<UserID>,
    Path(category_id): Path<CategoryId>,
) -> Result<Response, Error> {
    remove_category(RecordKind::Income, &state, user_id, category_id)
}

pub async fn remove_expense_category(
    State(state): State<SettingsState>,
    Extension(user_id): Extension<UserID>,
    Path(category_id): Path<CategoryId>,
) -> Result<Response, Error> {
    remove_category(RecordKind::Expense, &state, user_id, category_id)
}

fn add_category(
    kind: RecordKind,
    state: &SettingsState,
    user_id: UserID,
    form: &CategoryForm,
) -> Result<Response, Error> {
    let name = CategoryName::new(&form.name)?;

    let category = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        Ledger::new(&connection, user_id).add_category(kind, name)?
    };
    tracing::debug!("Added {kind} category {} for user {user_id}", category.id);

    Ok(Redirect::to(endpoints::SETTINGS).into_response())
}

fn remove_category(
    kind: RecordKind,
    state: &SettingsState,
    user_id: UserID,
    category_id: CategoryId,
) -> Result<Response, Error> {
    {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        Ledger::new(&connection, user_id)
            .remove_category(kind, category_id)
            .inspect_err(|error| {
                tracing::warn!("could not remove {kind} category {category_id}: {error}")
            })?;
    }

    Ok(Redirect::to(endpoints::SETTINGS).into_response())
}

fn add_category_endpoint(kind: RecordKind) -> &'static str {
    match kind {
        RecordKind::Income => endpoints::ADD_INCOME_CATEGORY,
        RecordKind::Expense => endpoints::ADD_EXPENSE_CATEGORY,
    }
}

fn remove_category_endpoint(kind: RecordKind, category_id: CategoryId) -> String {
    let path = match kind {
        RecordKind::Income => endpoints::REMOVE_INCOME_CATEGORY,
        RecordKind::Expense => endpoints::REMOVE_EXPENSE_CATEGORY,
    };

    format_endpoint(path, category_id)
}

fn categories_section(kind: RecordKind, categories: &[Category]) -> Markup {
    let input_id = format!("{kind}-category-name");

    html! {
        section id=(format!("{kind}-categories")) class="w-full space-y-4"
        {
            h2 class="text-xl font-semibold" { (kind.label()) " categories" }

            @if categories.is_empty() {
                p { "No " (kind.label().to_lowercase()) " categories yet." }
            } @else {
                ul class="space-y-2"
                {
                    @for category in categories {
                        li class="flex items-center justify-between gap-4"
                        {
                            span class=(CATEGORY_BADGE_STYLE) { (category.name) }

                            form
                                method="post"
                                action=(remove_category_endpoint(kind, category.id))
                            {
                                button type="submit" class=(BUTTON_DELETE_STYLE) { "Remove" }
                            }
                        }
                    }
                }
            }

            form
                id=(format!("add-{kind}-category-form"))
                method="post"
                action=(add_category_endpoint(kind))
                class="space-y-4"
            {
                div
                {
                    label for=(input_id) class=(FORM_LABEL_STYLE) { "New category" }

                    input
                        type="text"
                        name="name"
                        id=(input_id)
                        placeholder="Category name"
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Add category" }
            }
        }
    }
}

fn settings_view(
    user: &User,
    income_categories: &[Category],
    expense_categories: &[Category],
) -> Markup {
    let nav_bar = NavBar::new(endpoints::SETTINGS).into_html();

    let content = html!(
        (nav_bar)

        div class={(PAGE_CONTAINER_STYLE) " max-w-md gap-8"}
        {
            section class="w-full space-y-4"
            {
                h1 class="text-2xl font-bold" { "Settings" }

                (profile_form(endpoints::SETTINGS, user))
            }

            (categories_section(RecordKind::Income, income_categories))
            (categories_section(RecordKind::Expense, expense_categories))
        }
    );

    base("Settings", &[], &content)
}
