//! Positional expansion of one field into sibling child fields.

use core::ops::RangeInclusive;

use crate::component::Attributes;
use crate::field::{Field, InputType};
use crate::prelude_internal::*;

/// Which positions a [`FieldCollection`] yields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionRange {
    /// Keys `1..=n`
    Count(usize),
    Range(RangeInclusive<i64>),
    Keys(Vec<String>),
    /// One position per element of the field's current value
    Inferred,
}

impl From<usize> for CollectionRange {
    fn from(count: usize) -> Self {
        CollectionRange::Count(count)
    }
}

impl From<RangeInclusive<i64>> for CollectionRange {
    fn from(range: RangeInclusive<i64>) -> Self {
        CollectionRange::Range(range)
    }
}

impl From<Vec<String>> for CollectionRange {
    fn from(keys: Vec<String>) -> Self {
        CollectionRange::Keys(keys)
    }
}

impl From<Vec<&str>> for CollectionRange {
    fn from(keys: Vec<&str>) -> Self {
        CollectionRange::Keys(keys.into_iter().map(str::to_string).collect())
    }
}

impl From<Option<usize>> for CollectionRange {
    fn from(count: Option<usize>) -> Self {
        count.map_or(CollectionRange::Inferred, CollectionRange::Count)
    }
}

#[derive(Debug, Clone)]
pub struct FieldCollection<'a> {
    field: &'a Field,
    keys: Vec<String>,
}

impl<'a> FieldCollection<'a> {
    pub(crate) fn new(field: &'a Field, range: CollectionRange) -> Self {
        let keys = match range {
            CollectionRange::Count(count) => (1..=count).map(|key| key.to_string()).collect(),
            CollectionRange::Range(range) => range.map(|key| key.to_string()).collect(),
            CollectionRange::Keys(keys) => keys,
            CollectionRange::Inferred => (1..=field.value().to_array().len())
                .map(|key| key.to_string())
                .collect(),
        };
        Self { field, keys }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }

    pub fn builders(&self) -> impl Iterator<Item = FieldCollectionBuilder<'a>> + '_ {
        self.keys
            .iter()
            .enumerate()
            .map(|(index, key)| FieldCollectionBuilder {
                key: key.clone(),
                index,
                parent: self.field,
            })
    }

    /// Every child field, in position order.
    pub fn fields(&self) -> Result<Vec<Field>, FormError> {
        self.builders().map(|builder| builder.field()).collect()
    }

    /// A hidden input submitting an empty entry under the parent's array
    /// name, so that a group with nothing selected still submits its key.
    /// Renderers emit it once, before the first position.
    pub fn hidden_marker(&self) -> Attributes {
        Attributes {
            name: self.field.dom().multiple_name(),
            value: Some(String::new()),
            input_type: Some(InputType::Hidden),
            ..Attributes::default()
        }
    }
}

/// One position of a [`FieldCollection`].
#[derive(Debug, Clone)]
pub struct FieldCollectionBuilder<'a> {
    pub key: String,
    /// 0-based position
    pub index: usize,
    parent: &'a Field,
}

impl FieldCollectionBuilder<'_> {
    /// A child field keyed by this position, valued with the parent's element at the same index.
    pub fn field(&self) -> Result<Field, FormError> {
        let value = self
            .parent
            .value()
            .to_array()
            .get(self.index)
            .cloned()
            .unwrap_or_default();
        Ok(self.parent.child(Key::name(self.key.clone())?, value))
    }
}

impl Field {
    /// One position per permitted choice value, keyed by the value itself.
    pub fn repeated_choices(&self) -> Result<FieldCollection<'_>, FormError> {
        let keys = self
            .choice_list()?
            .map(|list| list.values().into_iter().map(str::to_string).collect())
            .unwrap_or_default();
        Ok(FieldCollection::new(self, CollectionRange::Keys(keys)))
    }
}
