#![allow(missing_docs)]

pub(crate) mod app;
pub(crate) mod form;
pub(crate) mod html;
pub(crate) mod http;

pub(crate) use app::{
    TEST_EMAIL, create_test_user, create_test_user_with_email, get_test_connection,
    get_test_server, log_in,
};
pub(crate) use form::{
    assert_form_action, assert_form_input, assert_form_input_with_value,
    assert_form_submit_button_with_text, must_get_form_by_id,
};
pub(crate) use html::{assert_valid_html, parse_html_document};
pub(crate) use http::{assert_redirect, get_header};
