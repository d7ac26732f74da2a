//! A data-binding form engine.
//!
//! A [`Form`] binds an object (anything implementing [`Bindable`]) or a bare key
//! to a tree of [`Namespace`]s, [`NamespaceCollection`]s and [`Field`]s. Every
//! node resolves a DOM id and a bracketed submission name from its ancestor
//! chain, fields infer presentation metadata from the bound object, and the
//! same tree turns a submitted parameter tree back into structured values via
//! [`Form::extract_input`].

pub mod choices;
pub mod component;
pub mod config;
pub mod dom;
mod error;
pub mod field;
pub mod field_collection;
pub mod form;
mod inflect;
pub mod namespace;
pub mod namespace_collection;
pub mod node;
pub mod object;
pub mod value;

pub use choices::{ChoiceList, Choices, ChoicesMapper, GroupedChoicesMapper};
pub use component::{Attributes, Component, ComponentKind};
pub use config::{CONFIG_FILENAME, ConfigError, ErrorMethod, FormConfig};
pub use error::{FormError, KeyError};
pub use field::{
    EMAIL_PATTERN, Field, FieldOptions, InputComponent, InputKind, InputOptions, InputType,
};
pub use field_collection::{CollectionRange, FieldCollection, FieldCollectionBuilder};
pub use form::{Form, FormContext, FormOptions, Method, SubmitType};
pub use formwork_params::{ParamMap, Params};
pub use namespace::{Child, Namespace};
pub use namespace_collection::{NamespaceBlock, NamespaceCollection};
pub use node::{Key, Node, NodeKind};
pub use object::{
    Association, AssociationKind, AttributeKind, AttributeType, Bindable, Lifecycle, ModelName,
    NumericBounds, Validator, ValidatorKind,
};
pub use value::{Number, Step, Value};

pub(crate) mod prelude_internal {
    pub use std::rc::Rc;

    pub use formwork_params::{ParamMap, Params};
    pub use indexmap::IndexMap;
    pub use num_bigint::BigInt;

    pub use crate::choices::{Choices, ChoicesMapper};
    pub use crate::dom::DomPath;
    pub use crate::error::{FormError, KeyError};
    pub use crate::form::FormContext;
    pub use crate::node::{Key, Node, NodeKind};
    pub use crate::object::Bindable;
    pub use crate::value::{Number, Step, Value};
}
