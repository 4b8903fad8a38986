//! User accounts, passwords and cookie based sessions.

mod cookie;
mod landing;
mod log_in;
mod log_out;
mod middleware;
mod password;
mod session;
mod sign_up;
mod token;
mod user;

pub use cookie::DEFAULT_COOKIE_DURATION;
pub use landing::get_landing_page;
pub use log_in::post_log_in;
pub use log_out::get_log_out;
pub use middleware::{AuthState, auth_guard};
pub use password::{PasswordHash, ValidatedPassword};
pub use session::Session;
pub use sign_up::post_sign_up;
pub use user::{
    User, UserDetails, UserID, create_user_table, get_user_by_email, get_user_by_id,
    parse_email, update_password, update_user_details,
};

#[cfg(test)]
pub(crate) use cookie::COOKIE_TOKEN;
#[cfg(test)]
pub(crate) use user::create_user;
