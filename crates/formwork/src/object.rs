//! The capability interface a bound object exposes to the form engine.
//!
//! Every capability but attribute reads has a default that reports "not
//! available"; inference falls back to generic defaults whenever a capability
//! returns `None`.

use core::fmt::Debug;

use crate::prelude_internal::*;

pub trait Bindable: Debug {
    /// Reads the attribute named `key`, or `None` when the object has no such attribute.
    fn read_attribute(&self, key: &str) -> Option<Value>;

    /// Declared storage type of an attribute.
    fn attribute_type(&self, _key: &str) -> Option<AttributeType> {
        None
    }

    /// Validation rules declared on an attribute.
    ///
    /// `Some(vec![])` means the object supports validators but declares none
    /// for `key`, which is different from not supporting them at all.
    fn validators_for(&self, _key: &str) -> Option<Vec<Validator>> {
        None
    }

    fn is_persisted(&self) -> Option<bool> {
        None
    }

    fn errors_for(&self, _key: &str) -> Option<Vec<String>> {
        None
    }

    fn full_errors_for(&self, _key: &str) -> Option<Vec<String>> {
        None
    }

    fn association(&self, _key: &str) -> Option<Association> {
        None
    }

    fn human_attribute_name(&self, _key: &str) -> Option<String> {
        None
    }

    /// Names of the values of an enum-backed attribute.
    fn enum_values(&self, _key: &str) -> Option<Vec<String>> {
        None
    }

    fn model_name(&self) -> Option<ModelName> {
        None
    }

    /// The primary key value; `Some(Value::Null)` for an unsaved object.
    fn primary_key(&self) -> Option<Value> {
        None
    }

    /// Identifier used when the object itself is submitted as a value.
    fn to_param(&self) -> Option<String> {
        None
    }

    /// Display text used when the object is offered as a choice.
    fn to_label(&self) -> Option<String> {
        None
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelName {
    /// Key used as the root of submission names, e.g. `user`
    pub param_key: String,
    /// Human readable singular, e.g. `User`
    pub human: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeKind {
    String,
    Text,
    Integer,
    Float,
    Decimal,
    Boolean,
    Date,
    DateTime,
    Time,
    Json,
    Hstore,
    Binary,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeType {
    pub kind: AttributeKind,
    /// Array-typed column
    pub array: bool,
    /// Digits after the decimal point
    pub scale: Option<u32>,
    /// Declared size limit
    pub limit: Option<usize>,
}

impl AttributeType {
    pub fn new(kind: AttributeKind) -> Self {
        Self {
            kind,
            array: false,
            scale: None,
            limit: None,
        }
    }

    pub fn array(mut self) -> Self {
        self.array = true;
        self
    }

    pub fn with_scale(mut self, scale: u32) -> Self {
        self.scale = Some(scale);
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lifecycle {
    Create,
    Update,
}

#[derive(Debug, Clone)]
pub struct Validator {
    pub kind: ValidatorKind,
    /// Guarded by an `if`/`unless` condition
    pub conditional: bool,
    /// Restricted to one lifecycle phase
    pub on: Option<Lifecycle>,
}

impl Validator {
    pub fn new(kind: ValidatorKind) -> Self {
        Self {
            kind,
            conditional: false,
            on: None,
        }
    }

    pub fn on(mut self, lifecycle: Lifecycle) -> Self {
        self.on = Some(lifecycle);
        self
    }

    pub fn conditional(mut self) -> Self {
        self.conditional = true;
        self
    }

    /// Unconditional and either phase-agnostic or matching the object's phase.
    pub fn applies_to(&self, persisted: bool) -> bool {
        if self.conditional {
            return false;
        }
        match self.on {
            None => true,
            Some(Lifecycle::Create) => !persisted,
            Some(Lifecycle::Update) => persisted,
        }
    }
}

#[derive(Debug, Clone)]
pub enum ValidatorKind {
    Presence,
    Numericality(NumericBounds),
    Length {
        minimum: Option<usize>,
        maximum: Option<usize>,
        is: Option<usize>,
    },
    Inclusion {
        within: Choices,
        /// Several values of `within` may be chosen at once
        multiple: bool,
    },
    /// A regular expression source
    Format { with: String },
}

impl ValidatorKind {
    pub fn name(&self) -> &'static str {
        match self {
            ValidatorKind::Presence => "presence",
            ValidatorKind::Numericality(_) => "numericality",
            ValidatorKind::Length { .. } => "length",
            ValidatorKind::Inclusion { .. } => "inclusion",
            ValidatorKind::Format { .. } => "format",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NumericBounds {
    pub greater_than: Option<Number>,
    pub greater_than_or_equal_to: Option<Number>,
    pub less_than: Option<Number>,
    pub less_than_or_equal_to: Option<Number>,
    pub only_integer: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssociationKind {
    BelongsTo,
    HasOne,
    HasMany,
    HasAndBelongsToMany,
}

impl AssociationKind {
    pub fn is_plural(&self) -> bool {
        matches!(
            self,
            AssociationKind::HasMany | AssociationKind::HasAndBelongsToMany
        )
    }
}

#[derive(Debug, Clone)]
pub struct Association {
    pub kind: AssociationKind,
    pub name: String,
    pub target_type: String,
    pub foreign_key: Option<String>,
    /// Records that may be associated, offered as choices
    pub candidates: Option<Choices>,
}

impl Association {
    pub fn new(kind: AssociationKind, name: impl Into<String>, target_type: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            target_type: target_type.into(),
            foreign_key: None,
            candidates: None,
        }
    }

    pub fn with_foreign_key(mut self, foreign_key: impl Into<String>) -> Self {
        self.foreign_key = Some(foreign_key.into());
        self
    }

    pub fn with_candidates(mut self, candidates: impl Into<Choices>) -> Self {
        self.candidates = Some(candidates.into());
        self
    }
}
