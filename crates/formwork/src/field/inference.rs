//! Metadata inferred from the bound object when not configured explicitly.

use std::sync::LazyLock;

use regex::Regex;

use super::{Field, InputKind, InputType};
use crate::choices::{ChoiceList, GroupedChoicesMapper};
use crate::inflect::humanize;
use crate::object::{
    Association, AssociationKind, AttributeKind, AttributeType, NumericBounds, Validator,
    ValidatorKind,
};
use crate::prelude_internal::*;

/// Source of the email format validator recognised when guessing input types.
pub const EMAIL_PATTERN: &str = r"\A[a-zA-Z0-9.!\#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*\z";

static KEY_HEURISTICS: LazyLock<Vec<(Regex, InputType)>> = LazyLock::new(|| {
    [
        (r"url$|^link|^site", InputType::Url),
        (r"^email", InputType::Email),
        (r"^search", InputType::Search),
        (r"phone|tel(ephone)?", InputType::Tel),
        (r"^time", InputType::Time),
        (r"^date", InputType::Date),
        (r"^number|_count$|_amount$", InputType::Number),
        (r"^color", InputType::Color),
    ]
    .into_iter()
    .filter_map(|(pattern, input_type)| Some((Regex::new(pattern).ok()?, input_type)))
    .collect()
});

fn is_password_key(key: &str) -> bool {
    key == "password"
        || key.starts_with("encrypted_")
        || ["_password", "_digest", "_hash"]
            .iter()
            .any(|suffix| key.ends_with(suffix))
}

impl Field {
    pub fn label(&self) -> String {
        if let Some(label) = &self.options.label {
            return label.clone();
        }
        let key = self.key_name();
        self.object
            .as_ref()
            .and_then(|object| object.human_attribute_name(&key))
            .unwrap_or_else(|| humanize(&key))
    }

    pub fn attribute_type(&self) -> Option<&AttributeType> {
        self.cache
            .attribute_type
            .get_or_init(|| self.object.as_ref()?.attribute_type(&self.key_name()))
            .as_ref()
    }

    pub fn association(&self) -> Option<&Association> {
        self.cache
            .association
            .get_or_init(|| self.object.as_ref()?.association(&self.key_name()))
            .as_ref()
    }

    /// Validators on the attribute and on its association, if any.
    pub fn validators(&self) -> Option<&[Validator]> {
        self.cache
            .validators
            .get_or_init(|| {
                let object = self.object.as_ref()?;
                let key = self.key_name();
                let mut validators = object.validators_for(&key)?;
                if let Some(association) = self.association().filter(|a| a.name != key) {
                    validators.extend(object.validators_for(&association.name).unwrap_or_default());
                }
                Some(validators)
            })
            .as_deref()
    }

    /// The first validator that applies to the object's lifecycle phase and
    /// that `select` accepts.
    fn find_validator<'a, T>(&'a self, select: impl Fn(&'a ValidatorKind) -> Option<T>) -> Option<T> {
        let persisted = self.is_persisted();
        self.validators()?
            .iter()
            .filter(|validator| validator.applies_to(persisted))
            .find_map(|validator| select(&validator.kind))
    }

    fn numeric_bounds(&self) -> Option<&NumericBounds> {
        self.find_validator(|kind| match kind {
            ValidatorKind::Numericality(bounds) => Some(bounds),
            _ => None,
        })
    }

    fn length_bounds(&self) -> Option<(Option<usize>, Option<usize>, Option<usize>)> {
        self.find_validator(|kind| match kind {
            ValidatorKind::Length {
                minimum,
                maximum,
                is,
            } => Some((*minimum, *maximum, *is)),
            _ => None,
        })
    }

    fn inclusion(&self) -> Option<(&Choices, bool)> {
        self.find_validator(|kind| match kind {
            ValidatorKind::Inclusion { within, multiple } => Some((within, *multiple)),
            _ => None,
        })
    }

    /// Whether the bound object is already saved. Objects that cannot tell are new.
    pub fn is_persisted(&self) -> bool {
        self.object
            .as_ref()
            .and_then(|object| object.is_persisted())
            .unwrap_or(false)
    }

    /// Required when an unconditional presence validator applies to the
    /// object's lifecycle phase. Without validators, falls back to the
    /// configured default.
    pub fn required(&self) -> bool {
        if let Some(required) = self.options.required {
            return required;
        }
        *self.cache.required.get_or_init(|| match self.validators() {
            Some(validators) => {
                let persisted = self.is_persisted();
                validators.iter().any(|validator| {
                    matches!(validator.kind, ValidatorKind::Presence) && validator.applies_to(persisted)
                })
            }
            None => self.context.config().required_by_default,
        })
    }

    /// Declared storage kind, or one guessed from the current value.
    pub fn storage_kind(&self) -> AttributeKind {
        if let Some(attribute_type) = self.attribute_type() {
            return attribute_type.kind;
        }
        match &self.value {
            Value::Integer(_) => AttributeKind::Integer,
            Value::Float(_) => AttributeKind::Float,
            Value::Bool(_) => AttributeKind::Boolean,
            _ => AttributeKind::String,
        }
    }

    pub fn input_type(&self) -> InputType {
        if let Some(input_type) = self.options.input_type {
            return input_type;
        }
        *self.cache.input_type.get_or_init(|| match self.storage_kind() {
            AttributeKind::String => self.infer_string_input_type(),
            AttributeKind::Integer | AttributeKind::Float | AttributeKind::Decimal => {
                InputType::Number
            }
            AttributeKind::Date => InputType::Date,
            AttributeKind::DateTime => InputType::DatetimeLocal,
            AttributeKind::Time => InputType::Time,
            AttributeKind::Boolean => InputType::Checkbox,
            AttributeKind::Binary => InputType::File,
            AttributeKind::Text | AttributeKind::Json | AttributeKind::Hstore => InputType::Text,
        })
    }

    fn infer_string_input_type(&self) -> InputType {
        let key = self.key_name();
        if is_password_key(&key) {
            return InputType::Password;
        }
        if let Some((_, input_type)) = KEY_HEURISTICS.iter().find(|(rule, _)| rule.is_match(&key)) {
            return *input_type;
        }
        if self.numeric_bounds().is_some() {
            return InputType::Number;
        }
        let email_format = self.find_validator(|kind| match kind {
            ValidatorKind::Format { with } if with == EMAIL_PATTERN => Some(()),
            _ => None,
        });
        if email_format.is_some() {
            return InputType::Email;
        }
        InputType::Text
    }

    /// The input component a renderer should use when the caller does not pick one.
    pub fn inferred_component(&self) -> InputKind {
        if let Some(association) = self.association() {
            return match association.kind {
                AssociationKind::BelongsTo => InputKind::BelongsTo,
                AssociationKind::HasOne => InputKind::Select,
                AssociationKind::HasMany | AssociationKind::HasAndBelongsToMany => {
                    InputKind::HasMany
                }
            };
        }
        if self.options.grouped_choices.is_some() || self.choices().is_some() {
            return InputKind::Select;
        }
        match self.storage_kind() {
            AttributeKind::Text | AttributeKind::Json | AttributeKind::Hstore => InputKind::Textarea,
            AttributeKind::Boolean => InputKind::Checkbox,
            AttributeKind::Binary => InputKind::FileInput,
            _ if self.multiple() => InputKind::InputArray,
            _ => InputKind::Input,
        }
    }

    pub fn multiple(&self) -> bool {
        if let Some(multiple) = self.options.multiple {
            return multiple;
        }
        if self.attribute_type().is_some_and(|attribute| attribute.array) {
            return true;
        }
        if self.inclusion().is_some_and(|(within, multiple)| {
            multiple && matches!(within, Choices::Values(_) | Choices::Map(_))
        }) {
            return true;
        }
        let counts_characters = matches!(
            self.storage_kind(),
            AttributeKind::String | AttributeKind::Text
        ) && !matches!(self.value, Value::Array(_));
        !counts_characters
            && self
                .length_bounds()
                .and_then(|(_, maximum, _)| maximum)
                .is_some_and(|maximum| maximum > 1)
    }

    /// `>= n` is used as-is; `> n` becomes `n + 1`.
    pub fn min(&self) -> Option<Number> {
        if let Some(min) = &self.options.min {
            return Some(min.clone());
        }
        let bounds = self.numeric_bounds()?;
        bounds
            .greater_than
            .as_ref()
            .map(Number::succ)
            .or_else(|| bounds.greater_than_or_equal_to.clone())
    }

    /// `<= n` is used as-is; `< n` becomes `n - 1`.
    pub fn max(&self) -> Option<Number> {
        if let Some(max) = &self.options.max {
            return Some(max.clone());
        }
        let bounds = self.numeric_bounds()?;
        bounds
            .less_than
            .as_ref()
            .map(Number::pred)
            .or_else(|| bounds.less_than_or_equal_to.clone())
    }

    pub fn step(&self) -> Option<Step> {
        if let Some(step) = &self.options.step {
            return Some(step.clone());
        }
        if let Some(scale) = self.attribute_type().and_then(|attribute| attribute.scale) {
            let exponent = i32::try_from(scale).unwrap_or(i32::MAX);
            return Some(Step::By(Number::Float(1.0 / 10f64.powi(exponent))));
        }
        match self.storage_kind() {
            AttributeKind::Integer => Some(Step::By(Number::from(1))),
            AttributeKind::Float | AttributeKind::Decimal => Some(Step::Any),
            _ if self.min().is_some() || self.max().is_some() => Some(Step::By(Number::from(1))),
            _ => None,
        }
    }

    pub fn minlength(&self) -> Option<usize> {
        self.options.minlength.or_else(|| {
            let (minimum, _, is) = self.length_bounds()?;
            is.or(minimum)
        })
    }

    pub fn maxlength(&self) -> Option<usize> {
        self.options.maxlength.or_else(|| {
            let (_, maximum, is) = self.length_bounds()?;
            is.or(maximum)
        })
    }

    /// Regular expression source from a format validator.
    pub fn pattern(&self) -> Option<String> {
        self.options.pattern.clone().or_else(|| {
            self.find_validator(|kind| match kind {
                ValidatorKind::Format { with } => Some(with.clone()),
                _ => None,
            })
        })
    }

    /// How many entries a multi-valued field may hold (a select's `size`).
    pub fn limit(&self) -> Option<usize> {
        if let Some(limit) = self.options.limit {
            return Some(limit);
        }
        if !self.multiple() {
            return None;
        }
        let from_length = self.length_bounds().and_then(|(_, maximum, _)| maximum);
        let from_inclusion = self.inclusion().and_then(|(within, _)| match within {
            Choices::Values(values) => Some(values.len()),
            Choices::Map(map) => Some(map.len()),
            Choices::Range { .. } | Choices::Lazy(_) => None,
        });
        let from_validators = match (from_length, from_inclusion) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        from_validators.or_else(|| self.attribute_type().and_then(|attribute| attribute.limit))
    }

    /// The choice source: explicit, then enum values, then association
    /// candidates, then an inclusion validator's list.
    pub fn choices(&self) -> Option<Choices> {
        if let Some(choices) = &self.options.choices {
            return Some(choices.clone());
        }
        if let Some(values) = self
            .object
            .as_ref()
            .and_then(|object| object.enum_values(&self.key_name()))
        {
            return Some(Choices::from(values));
        }
        if let Some(candidates) = self.association().and_then(|a| a.candidates.clone()) {
            return Some(candidates);
        }
        self.inclusion().map(|(within, _)| within.clone())
    }

    /// The materialized permitted values, built once.
    pub fn choice_list(&self) -> Result<Option<&ChoiceList>, FormError> {
        if let Some(list) = self.cache.choices.get() {
            return Ok(list.as_ref());
        }
        let list = match &self.options.grouped_choices {
            Some(groups) => Some(ChoiceList::Grouped(GroupedChoicesMapper::try_new(
                groups.iter().cloned(),
            )?)),
            None => self
                .choices()
                .map(|choices| ChoicesMapper::try_new(&choices))
                .transpose()?
                .map(ChoiceList::Flat),
        };
        Ok(self.cache.choices.get_or_init(|| list).as_ref())
    }
}
