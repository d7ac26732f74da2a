use indexmap::IndexMap;
use thisisplural::Plural;

/// A node of a submitted parameter tree.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Params {
    #[default]
    Null,
    Text(String),
    Array(Vec<Params>),
    Map(ParamMap),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamKind {
    Null,
    Text,
    Array,
    Map,
}

impl std::fmt::Display for ParamKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ParamKind::Null => "null",
            ParamKind::Text => "text",
            ParamKind::Array => "array",
            ParamKind::Map => "map",
        };
        write!(f, "{name}")
    }
}

impl Params {
    pub fn text(value: impl Into<String>) -> Self {
        Params::Text(value.into())
    }

    pub fn kind(&self) -> ParamKind {
        match self {
            Params::Null => ParamKind::Null,
            Params::Text(_) => ParamKind::Text,
            Params::Array(_) => ParamKind::Array,
            Params::Map(_) => ParamKind::Map,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Params::Null)
    }

    /// Null, whitespace-only text, or an empty container.
    pub fn is_blank(&self) -> bool {
        match self {
            Params::Null => true,
            Params::Text(text) => text.trim().is_empty(),
            Params::Array(items) => items.is_empty(),
            Params::Map(map) => map.is_empty(),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Params::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Params]> {
        match self {
            Params::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&ParamMap> {
        match self {
            Params::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Looks up `key` when this node is a map.
    pub fn get(&self, key: &str) -> Option<&Params> {
        self.as_map().and_then(|map| map.get(key))
    }

    /// Same as [`Params::get`] but treats a missing key as [`Params::Null`].
    pub fn get_or_null(&self, key: &str) -> &Params {
        self.get(key).unwrap_or(&Params::Null)
    }

    /// The positional children of a collection submission.
    ///
    /// Arrays yield their elements, maps keyed by index (`"0"`, `"1"`, ...)
    /// yield their values in submission order, and anything else yields nothing.
    pub fn positional(&self) -> Vec<&Params> {
        match self {
            Params::Array(items) => items.iter().collect(),
            Params::Map(map) => map.values().collect(),
            Params::Null | Params::Text(_) => Vec::new(),
        }
    }
}

impl From<&str> for Params {
    fn from(value: &str) -> Self {
        Params::Text(value.to_string())
    }
}

impl From<String> for Params {
    fn from(value: String) -> Self {
        Params::Text(value)
    }
}

impl From<Vec<Params>> for Params {
    fn from(value: Vec<Params>) -> Self {
        Params::Array(value)
    }
}

impl From<ParamMap> for Params {
    fn from(value: ParamMap) -> Self {
        Params::Map(value)
    }
}

impl<T: Into<Params>> From<Option<T>> for Params {
    fn from(value: Option<T>) -> Self {
        value.map_or(Params::Null, Into::into)
    }
}

/// Insertion-ordered map from parameter keys to values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Plural)]
#[plural(len, is_empty, iter, into_iter, into_iter_ref, new)]
pub struct ParamMap(IndexMap<String, Params>);

impl FromIterator<(String, Params)> for ParamMap {
    fn from_iter<T: IntoIterator<Item = (String, Params)>>(iter: T) -> Self {
        Self(IndexMap::from_iter(iter))
    }
}

impl<'a> FromIterator<(&'a str, Params)> for ParamMap {
    fn from_iter<T: IntoIterator<Item = (&'a str, Params)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.to_string(), value))
                .collect(),
        )
    }
}

impl Extend<(String, Params)> for ParamMap {
    fn extend<T: IntoIterator<Item = (String, Params)>>(&mut self, iter: T) {
        self.0.extend(iter);
    }
}

impl ParamMap {
    pub fn get(&self, key: &str) -> Option<&Params> {
        self.0.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Params> {
        self.0.get_mut(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Params>) -> Option<Params> {
        self.0.insert(key.into(), value.into())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// O(n) removal, preserves submission order.
    pub fn remove(&mut self, key: &str) -> Option<Params> {
        self.0.shift_remove(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn values(&self) -> impl Iterator<Item = &Params> {
        self.0.values()
    }

    /// Returns the slot for `key`, inserting `default()` first when absent.
    pub fn get_or_insert_with(
        &mut self,
        key: &str,
        default: impl FnOnce() -> Params,
    ) -> &mut Params {
        self.0.entry(key.to_string()).or_insert_with(default)
    }

    /// Moves every entry of `other` into `self`; later keys win.
    pub fn merge(&mut self, other: ParamMap) {
        self.0.extend(other.0);
    }
}
