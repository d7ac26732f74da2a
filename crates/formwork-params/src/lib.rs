//! Submitted parameter trees.
//!
//! A web framework's request parser turns a form-urlencoded body such as
//! `user[name]=Jane&user[tags][]=a&user[tags][]=b` into a nested tree of maps,
//! arrays and strings. This crate owns that tree ([`Params`]), the bracket
//! naming convention ([`ParamPath`]), and the conversion between flat
//! `(name, value)` pairs and the nested tree ([`parse_query`], [`Params::from_pairs`],
//! [`Params::to_pairs`]).

/// The nested parameter value and its ordered map.
pub mod params;

/// Bracket-annotated parameter names.
pub mod path;

/// Flat name/value pairs to nested params and back.
pub mod query;

mod error;

pub use error::QueryError;
pub use params::{ParamKind, ParamMap, Params};
pub use path::{ParamPath, ParamSegment};
pub use query::{PARAM_DEPTH_LIMIT, ParamsBuilder, parse_query};
