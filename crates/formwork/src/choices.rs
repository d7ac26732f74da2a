//! Choice sources and their materialized value to label mappings.

use core::fmt::Debug;
use core::ops::{Bound, Range, RangeFrom, RangeInclusive};

use thisisplural::Plural;
use tracing::debug;

use crate::prelude_internal::*;

pub type ChoiceSupplier = Rc<dyn Fn() -> Choices>;

/// Where the permitted values of a field come from.
#[derive(Clone)]
pub enum Choices {
    /// Ordered value to label mapping
    Map(IndexMap<String, String>),
    /// `[label, value]` pairs, bound objects, or plain scalars
    Values(Vec<Value>),
    Range { start: Bound<BigInt>, end: Bound<BigInt> },
    /// Evaluated once, when a mapper materializes it
    Lazy(ChoiceSupplier),
}

impl Debug for Choices {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Choices::Map(map) => f.debug_tuple("Map").field(map).finish(),
            Choices::Values(values) => f.debug_tuple("Values").field(values).finish(),
            Choices::Range { start, end } => f
                .debug_struct("Range")
                .field("start", start)
                .field("end", end)
                .finish(),
            Choices::Lazy(_) => f.write_str("Lazy(..)"),
        }
    }
}

impl Choices {
    pub fn lazy(supplier: impl Fn() -> Choices + 'static) -> Self {
        Choices::Lazy(Rc::new(supplier))
    }

    /// `[label, value]` pairs.
    pub fn pairs<L: Into<Value>, V: Into<Value>>(pairs: impl IntoIterator<Item = (L, V)>) -> Self {
        Choices::Values(
            pairs
                .into_iter()
                .map(|(label, value)| Value::Array(vec![label.into(), value.into()]))
                .collect(),
        )
    }
}

impl From<IndexMap<String, String>> for Choices {
    fn from(map: IndexMap<String, String>) -> Self {
        Choices::Map(map)
    }
}

impl From<Vec<Value>> for Choices {
    fn from(values: Vec<Value>) -> Self {
        Choices::Values(values)
    }
}

impl From<Vec<&str>> for Choices {
    fn from(values: Vec<&str>) -> Self {
        Choices::Values(values.into_iter().map(Value::from).collect())
    }
}

impl From<Vec<String>> for Choices {
    fn from(values: Vec<String>) -> Self {
        Choices::Values(values.into_iter().map(Value::from).collect())
    }
}

impl From<RangeInclusive<i64>> for Choices {
    fn from(range: RangeInclusive<i64>) -> Self {
        Choices::Range {
            start: Bound::Included(BigInt::from(*range.start())),
            end: Bound::Included(BigInt::from(*range.end())),
        }
    }
}

impl From<Range<i64>> for Choices {
    fn from(range: Range<i64>) -> Self {
        Choices::Range {
            start: Bound::Included(BigInt::from(range.start)),
            end: Bound::Excluded(BigInt::from(range.end)),
        }
    }
}

impl From<RangeFrom<i64>> for Choices {
    fn from(range: RangeFrom<i64>) -> Self {
        Choices::Range {
            start: Bound::Included(BigInt::from(range.start)),
            end: Bound::Unbounded,
        }
    }
}

/// A materialized, ordered value to label mapping.
///
/// Values and labels are strings. The source is read exactly once, when the
/// mapper is built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Plural)]
#[plural(len, is_empty, iter)]
pub struct ChoicesMapper(IndexMap<String, String>);

impl ChoicesMapper {
    pub fn try_new(source: &Choices) -> Result<Self, FormError> {
        Self::with_accessors(source, None, None)
    }

    /// Like [`ChoicesMapper::try_new`], reading values and labels of bound
    /// objects from the named attributes instead of probing.
    pub fn with_accessors(
        source: &Choices,
        value_attribute: Option<&str>,
        label_attribute: Option<&str>,
    ) -> Result<Self, FormError> {
        materialize(source, value_attribute, label_attribute).map(ChoicesMapper)
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.0.values().map(String::as_str)
    }

    /// The label of `value`.
    pub fn get(&self, value: &str) -> Option<&str> {
        self.0.get(value).map(String::as_str)
    }

    pub fn contains(&self, value: &str) -> bool {
        self.0.contains_key(value)
    }
}

fn materialize(
    source: &Choices,
    value_attribute: Option<&str>,
    label_attribute: Option<&str>,
) -> Result<IndexMap<String, String>, FormError> {
    match source {
        Choices::Map(map) => Ok(map.clone()),
        Choices::Values(items) => Ok(values_to_map(items, value_attribute, label_attribute)),
        Choices::Range { start, end } => range_to_map(start, end),
        Choices::Lazy(supplier) => materialize(&supplier(), value_attribute, label_attribute),
    }
}

/// Largest number of entries a range choice source may expand to.
pub const MAX_RANGE_CHOICES: usize = 10_000;

fn range_to_map(start: &Bound<BigInt>, end: &Bound<BigInt>) -> Result<IndexMap<String, String>, FormError> {
    let mut current = match start {
        Bound::Included(start) => start.clone(),
        Bound::Excluded(start) => start + BigInt::from(1),
        Bound::Unbounded => return Err(FormError::UnboundedRange),
    };
    let last = match end {
        Bound::Included(end) => end.clone(),
        Bound::Excluded(end) => end - BigInt::from(1),
        Bound::Unbounded => return Err(FormError::UnboundedRange),
    };
    if &last - &current >= BigInt::from(MAX_RANGE_CHOICES) {
        return Err(FormError::RangeTooLarge {
            limit: MAX_RANGE_CHOICES,
        });
    }
    let mut map = IndexMap::new();
    while current <= last {
        let text = current.to_string();
        map.insert(text.clone(), text);
        current += BigInt::from(1);
    }
    Ok(map)
}

/// How one side (value or label) of a choice is read from an element.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Accessor {
    PairLast,
    PairFirst,
    Attribute(String),
    ToParam,
    ToLabel,
    Scalar,
}

impl Accessor {
    fn for_value(sample: Option<&Value>, custom: Option<&str>) -> Accessor {
        match sample {
            Some(Value::Array(_)) => Accessor::PairLast,
            Some(Value::Object(object)) => {
                if let Some(custom) = custom {
                    Accessor::Attribute(custom.to_string())
                } else if object.to_param().is_some() {
                    Accessor::ToParam
                } else if object.read_attribute("id").is_some() {
                    Accessor::Attribute("id".to_string())
                } else {
                    Accessor::Scalar
                }
            }
            _ => Accessor::Scalar,
        }
    }

    fn for_label(sample: Option<&Value>, custom: Option<&str>) -> Accessor {
        match sample {
            Some(Value::Array(_)) => Accessor::PairFirst,
            Some(Value::Object(object)) => {
                if let Some(custom) = custom {
                    return Accessor::Attribute(custom.to_string());
                }
                if object.to_label().is_some() {
                    return Accessor::ToLabel;
                }
                ["name", "title"]
                    .into_iter()
                    .find(|attribute| object.read_attribute(attribute).is_some())
                    .map_or(Accessor::Scalar, |attribute| Accessor::Attribute(attribute.to_string()))
            }
            _ => Accessor::Scalar,
        }
    }

    fn read(&self, item: &Value) -> Option<String> {
        match (self, item) {
            (Accessor::PairLast, Value::Array(pair)) => pair.last().and_then(Value::to_param),
            (Accessor::PairFirst, Value::Array(pair)) => pair.first().and_then(Value::to_param),
            (Accessor::Attribute(attribute), Value::Object(object)) => object
                .read_attribute(attribute)
                .as_ref()
                .and_then(Value::to_param),
            (Accessor::ToParam, Value::Object(object)) => object.to_param(),
            (Accessor::ToLabel, Value::Object(object)) => object.to_label(),
            (_, item) => item.to_param(),
        }
    }
}

fn values_to_map(
    items: &[Value],
    value_attribute: Option<&str>,
    label_attribute: Option<&str>,
) -> IndexMap<String, String> {
    let sample = items.first().or(items.last());
    let value_accessor = Accessor::for_value(sample, value_attribute);
    let label_accessor = Accessor::for_label(sample, label_attribute);
    let mut map = IndexMap::new();
    for item in items {
        let Some(value) = value_accessor.read(item) else {
            debug!(?item, "skipping choice without a value");
            continue;
        };
        let label = label_accessor.read(item).unwrap_or_else(|| value.clone());
        map.insert(value, label);
    }
    map
}

/// Choices split into labelled groups.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupedChoicesMapper {
    groups: IndexMap<String, ChoicesMapper>,
}

impl GroupedChoicesMapper {
    pub fn try_new<L: Into<String>>(
        groups: impl IntoIterator<Item = (L, Choices)>,
    ) -> Result<Self, FormError> {
        let groups = groups
            .into_iter()
            .map(|(label, choices)| {
                Ok::<_, FormError>((label.into(), ChoicesMapper::try_new(&choices)?))
            })
            .collect::<Result<IndexMap<String, ChoicesMapper>, FormError>>()?;
        Ok(Self { groups })
    }

    /// Groups bound objects by the `to_param` of their `group_attribute`.
    pub fn group_by(items: &[Value], group_attribute: &str) -> Result<Self, FormError> {
        let mut buckets: IndexMap<String, Vec<Value>> = IndexMap::new();
        for item in items {
            let group = item
                .as_object()
                .and_then(|object| object.read_attribute(group_attribute))
                .and_then(|group| group.to_param())
                .unwrap_or_default();
            buckets.entry(group).or_default().push(item.clone());
        }
        Self::try_new(
            buckets
                .into_iter()
                .map(|(label, items)| (label, Choices::Values(items))),
        )
    }

    pub fn groups(&self) -> impl Iterator<Item = (&str, &ChoicesMapper)> {
        self.groups.iter().map(|(label, mapper)| (label.as_str(), mapper))
    }

    /// Values of every group, in group order.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.groups.values().flat_map(ChoicesMapper::values)
    }

    pub fn get(&self, value: &str) -> Option<&str> {
        self.groups.values().find_map(|mapper| mapper.get(value))
    }

    pub fn contains(&self, value: &str) -> bool {
        self.groups.values().any(|mapper| mapper.contains(value))
    }
}

/// The permitted values a choice-backed input filters against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChoiceList {
    Flat(ChoicesMapper),
    Grouped(GroupedChoicesMapper),
}

impl ChoiceList {
    pub fn contains(&self, value: &str) -> bool {
        match self {
            ChoiceList::Flat(mapper) => mapper.contains(value),
            ChoiceList::Grouped(mapper) => mapper.contains(value),
        }
    }

    pub fn get(&self, value: &str) -> Option<&str> {
        match self {
            ChoiceList::Flat(mapper) => mapper.get(value),
            ChoiceList::Grouped(mapper) => mapper.get(value),
        }
    }

    pub fn values(&self) -> Vec<&str> {
        match self {
            ChoiceList::Flat(mapper) => mapper.values().collect(),
            ChoiceList::Grouped(mapper) => mapper.values().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Country {
        code: &'static str,
        name: &'static str,
        region: &'static str,
    }

    impl Bindable for Country {
        fn read_attribute(&self, key: &str) -> Option<Value> {
            match key {
                "code" => Some(self.code.into()),
                "name" => Some(self.name.into()),
                "region" => Some(self.region.into()),
                _ => None,
            }
        }

        fn to_param(&self) -> Option<String> {
            Some(self.code.to_lowercase())
        }
    }

    fn countries() -> Vec<Value> {
        [("NO", "Norway", "Europe"), ("JP", "Japan", "Asia"), ("SE", "Sweden", "Europe")]
            .into_iter()
            .map(|(code, name, region)| {
                Value::Object(Rc::new(Country { code, name, region }) as Rc<dyn Bindable>)
            })
            .collect()
    }

    #[test]
    fn test_map_source() {
        let mut map = IndexMap::new();
        map.insert("a".to_string(), "Alpha".to_string());
        map.insert("b".to_string(), "Beta".to_string());
        let mapper = ChoicesMapper::try_new(&Choices::Map(map)).unwrap();
        assert_eq!(mapper.values().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(mapper.labels().collect::<Vec<_>>(), vec!["Alpha", "Beta"]);
        assert_eq!(mapper.get("b"), Some("Beta"));
    }

    #[test]
    fn test_pairs_are_label_then_value() {
        let mapper =
            ChoicesMapper::try_new(&Choices::pairs([("Integer", Value::from(1)), ("String", Value::from("2"))]))
                .unwrap();
        assert_eq!(mapper.get("1"), Some("Integer"));
        assert_eq!(mapper.get("2"), Some("String"));
        assert_eq!(mapper.len(), 2);
    }

    #[test]
    fn test_scalars_map_to_themselves() {
        let mapper = ChoicesMapper::try_new(&Choices::from(vec!["red", "green"])).unwrap();
        assert_eq!(mapper.get("red"), Some("red"));
        assert!(!mapper.contains("blue"));
    }

    #[test]
    fn test_range_source() {
        let mapper = ChoicesMapper::try_new(&Choices::from(1..=5_i64)).unwrap();
        assert_eq!(mapper.values().collect::<Vec<_>>(), vec!["1", "2", "3", "4", "5"]);
        let exclusive = ChoicesMapper::try_new(&Choices::from(1..3_i64)).unwrap();
        assert_eq!(exclusive.values().collect::<Vec<_>>(), vec!["1", "2"]);
    }

    #[test]
    fn test_unbounded_range_fails_fast() {
        assert_eq!(
            ChoicesMapper::try_new(&Choices::from(1_i64..)),
            Err(FormError::UnboundedRange)
        );
    }

    #[test]
    fn test_oversized_range_is_rejected() {
        assert_eq!(
            ChoicesMapper::try_new(&Choices::from(0..=i64::MAX)),
            Err(FormError::RangeTooLarge {
                limit: MAX_RANGE_CHOICES
            })
        );
        let limit = i64::try_from(MAX_RANGE_CHOICES).unwrap();
        let largest = ChoicesMapper::try_new(&Choices::from(1..=limit)).unwrap();
        assert_eq!(largest.values().count(), MAX_RANGE_CHOICES);
        assert!(ChoicesMapper::try_new(&Choices::from(0..=limit)).is_err());
    }

    #[test]
    fn test_lazy_source_is_materialized() {
        let mapper = ChoicesMapper::try_new(&Choices::lazy(|| Choices::from(vec!["x"]))).unwrap();
        assert_eq!(mapper.values().collect::<Vec<_>>(), vec!["x"]);
    }

    #[test]
    fn test_objects_use_conventional_accessors() {
        let mapper = ChoicesMapper::try_new(&Choices::Values(countries())).unwrap();
        assert_eq!(mapper.values().collect::<Vec<_>>(), vec!["no", "jp", "se"]);
        assert_eq!(mapper.get("jp"), Some("Japan"));
    }

    #[test]
    fn test_objects_with_custom_accessors() {
        let mapper = ChoicesMapper::with_accessors(
            &Choices::Values(countries()),
            Some("code"),
            Some("region"),
        )
        .unwrap();
        assert_eq!(mapper.get("NO"), Some("Europe"));
    }

    #[test]
    fn test_grouped_choices() {
        let grouped = GroupedChoicesMapper::group_by(&countries(), "region").unwrap();
        let groups: Vec<_> = grouped.groups().map(|(label, m)| (label, m.len())).collect();
        assert_eq!(groups, vec![("Europe", 2), ("Asia", 1)]);
        assert_eq!(grouped.values().collect::<Vec<_>>(), vec!["no", "se", "jp"]);
        assert!(grouped.contains("jp"));
        assert_eq!(grouped.get("se"), Some("Sweden"));
    }
}
