//! JSON support for formwork.
//!
//! [`json_to_params`] and [`params_to_json`] move submitted parameter trees
//! in and out of JSON, and [`JsonObject`] binds a JSON object to a form.

mod convert;
mod error;
mod object;

pub use convert::{json_to_params, json_to_value, params_to_json, value_to_json};
pub use error::Error;
pub use object::JsonObject;
