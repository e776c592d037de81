//! HTTP protocol layer module
//!
//! Response builders and form/query-string parsing, decoupled from the user
//! endpoint logic.

pub mod form;
pub mod response;

pub use response::{
    build_404_response, build_413_response, build_html_response, build_json_literal,
    build_json_response, build_plain_response,
};
