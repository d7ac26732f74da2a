use tracing::trace;

use crate::{
    error::QueryError,
    params::{ParamKind, ParamMap, Params},
    path::{ParamPath, ParamSegment},
};

/// Names with more bracket segments than this are rejected.
pub const PARAM_DEPTH_LIMIT: usize = 100;

/// Folds flat `(name, value)` pairs into a nested [`Params`] tree.
///
/// `a[b]=1` nests maps, `a[]=1` appends to an array, and `a[][b]=1&a[][c]=2`
/// collects both keys into one map inside the array until a key repeats.
#[derive(Debug)]
pub struct ParamsBuilder {
    root: ParamMap,
    depth_limit: usize,
}

impl Default for ParamsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ParamsBuilder {
    pub fn new() -> Self {
        Self {
            root: ParamMap::new(),
            depth_limit: PARAM_DEPTH_LIMIT,
        }
    }

    pub fn with_depth_limit(depth_limit: usize) -> Self {
        Self {
            root: ParamMap::new(),
            depth_limit,
        }
    }

    pub fn insert(&mut self, name: &str, value: impl Into<Params>) -> Result<(), QueryError> {
        let path = ParamPath::parse(name);
        let Some((ParamSegment::Key(head), rest)) = path.segments().split_first() else {
            trace!(param = name, "skipping param without a key");
            return Ok(());
        };
        if head.is_empty() {
            return Ok(());
        }
        if path.segments().len() > self.depth_limit {
            return Err(QueryError::TooDeep {
                limit: self.depth_limit,
            });
        }
        normalize(&mut self.root, head, rest, value.into())
    }

    pub fn finish(self) -> Params {
        Params::Map(self.root)
    }
}

fn normalize(
    map: &mut ParamMap,
    key: &str,
    rest: &[ParamSegment],
    value: Params,
) -> Result<(), QueryError> {
    match rest {
        [] => {
            map.insert(key, value);
            Ok(())
        }
        [ParamSegment::Push, child @ ..] => {
            let slot = map.get_or_insert_with(key, || Params::Array(Vec::new()));
            let actual = slot.kind();
            let Params::Array(items) = slot else {
                return Err(conflict(key, ParamKind::Array, actual));
            };
            match child.split_first() {
                None => items.push(value),
                Some((ParamSegment::Key(child_key), grand)) => {
                    if let Some(Params::Map(last)) = items.last_mut() {
                        if !has_path(last, child) {
                            return normalize(last, child_key, grand, value);
                        }
                    }
                    let mut fresh = ParamMap::new();
                    normalize(&mut fresh, child_key, grand, value)?;
                    items.push(Params::Map(fresh));
                }
                Some((ParamSegment::Push, _)) => items.push(nest(child, value)),
            }
            Ok(())
        }
        [ParamSegment::Key(child_key), grand @ ..] => {
            let slot = map.get_or_insert_with(key, || Params::Map(ParamMap::new()));
            let actual = slot.kind();
            let Params::Map(inner) = slot else {
                return Err(conflict(key, ParamKind::Map, actual));
            };
            normalize(inner, child_key, grand, value)
        }
    }
}

fn conflict(key: &str, expected: ParamKind, actual: ParamKind) -> QueryError {
    QueryError::TypeConflict {
        key: key.to_string(),
        expected,
        actual,
    }
}

/// Whether every key of `segments` already exists below `map`.
fn has_path(map: &ParamMap, segments: &[ParamSegment]) -> bool {
    let mut current = map;
    for (i, segment) in segments.iter().enumerate() {
        let ParamSegment::Key(key) = segment else {
            return false;
        };
        match current.get(key) {
            Some(Params::Map(inner)) => current = inner,
            Some(_) if i + 1 == segments.len() => return true,
            _ => return false,
        }
    }
    true
}

fn nest(segments: &[ParamSegment], value: Params) -> Params {
    match segments.split_first() {
        None => value,
        Some((ParamSegment::Push, rest)) => Params::Array(vec![nest(rest, value)]),
        Some((ParamSegment::Key(key), rest)) => {
            let mut map = ParamMap::new();
            map.insert(key.clone(), nest(rest, value));
            Params::Map(map)
        }
    }
}

/// Parses a form-urlencoded query string (leading `?` allowed) into nested params.
pub fn parse_query(query: &str) -> Result<Params, QueryError> {
    let query = query.strip_prefix('?').unwrap_or(query);
    Params::from_pairs(url::form_urlencoded::parse(query.as_bytes()))
}

impl Params {
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Params, QueryError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut builder = ParamsBuilder::new();
        for (name, value) in pairs {
            builder.insert(name.as_ref(), Params::Text(value.into()))?;
        }
        Ok(builder.finish())
    }

    /// Flattens this tree into bracket-named pairs.
    ///
    /// Array elements are named with `[]`, null becomes an empty string and
    /// empty containers produce no pairs at all. Only a map root yields pairs.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Params::Map(map) = self {
            for (key, value) in map {
                flatten(&ParamPath::root().key(key.as_str()), value, &mut pairs);
            }
        }
        pairs
    }

    /// [`Params::to_pairs`] encoded as `application/x-www-form-urlencoded`.
    pub fn to_query(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.to_pairs())
            .finish()
    }
}

fn flatten(path: &ParamPath, params: &Params, pairs: &mut Vec<(String, String)>) {
    match params {
        Params::Null => pairs.push((path.to_string(), String::new())),
        Params::Text(text) => pairs.push((path.to_string(), text.clone())),
        Params::Array(items) => {
            let element = path.push();
            for item in items {
                flatten(&element, item, pairs);
            }
        }
        Params::Map(map) => {
            for (key, value) in map {
                flatten(&path.key(key.as_str()), value, pairs);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(entries: Vec<(&str, Params)>) -> Params {
        Params::Map(entries.into_iter().collect())
    }

    fn text(value: &str) -> Params {
        Params::text(value)
    }

    #[test]
    fn test_parse_flat() {
        let params = parse_query("a=1&b=two+words").unwrap();
        assert_eq!(params, map(vec![("a", text("1")), ("b", text("two words"))]));
    }

    #[test]
    fn test_parse_strips_question_mark() {
        assert_eq!(parse_query("?a=1").unwrap(), map(vec![("a", text("1"))]));
    }

    #[test]
    fn test_parse_nested_map() {
        let params = parse_query("user%5Bname%5D=Jane&user[address][city]=Oslo").unwrap();
        assert_eq!(
            params,
            map(vec![(
                "user",
                map(vec![
                    ("name", text("Jane")),
                    ("address", map(vec![("city", text("Oslo"))])),
                ])
            )])
        );
    }

    #[test]
    fn test_parse_array() {
        let params = parse_query("tags[]=a&tags[]=b").unwrap();
        assert_eq!(
            params,
            map(vec![("tags", Params::Array(vec![text("a"), text("b")]))])
        );
    }

    #[test]
    fn test_parse_array_of_maps() {
        let params = parse_query("a[][x]=1&a[][y]=2&a[][x]=3").unwrap();
        assert_eq!(
            params,
            map(vec![(
                "a",
                Params::Array(vec![
                    map(vec![("x", text("1")), ("y", text("2"))]),
                    map(vec![("x", text("3"))]),
                ])
            )])
        );
    }

    #[test]
    fn test_parse_repeated_scalar_overwrites() {
        assert_eq!(parse_query("a=1&a=2").unwrap(), map(vec![("a", text("2"))]));
    }

    #[test]
    fn test_parse_type_conflict() {
        let err = parse_query("a=1&a[]=2").unwrap_err();
        assert_eq!(
            err,
            QueryError::TypeConflict {
                key: "a".to_string(),
                expected: ParamKind::Array,
                actual: ParamKind::Text,
            }
        );
        assert_eq!(
            err.to_string(),
            "expected array (got text) for param `a`"
        );
        assert!(matches!(
            parse_query("a[]=1&a[b]=2"),
            Err(QueryError::TypeConflict { .. })
        ));
    }

    #[test]
    fn test_parse_skips_empty_names() {
        assert_eq!(parse_query("=1&&a=2").unwrap(), map(vec![("a", text("2"))]));
    }

    #[test]
    fn test_depth_limit() {
        let mut builder = ParamsBuilder::with_depth_limit(3);
        assert!(builder.insert("a[b][c]", "1").is_ok());
        assert_eq!(
            builder.insert("a[b][c][d]", "1"),
            Err(QueryError::TooDeep { limit: 3 })
        );
    }

    #[test]
    fn test_to_pairs() {
        let params = map(vec![(
            "user",
            map(vec![
                ("name", text("Jane")),
                ("nickname", Params::Null),
                ("tags", Params::Array(vec![text("a"), text("b")])),
                ("empty", Params::Array(vec![])),
            ]),
        )]);
        assert_eq!(
            params.to_pairs(),
            vec![
                ("user[name]".to_string(), "Jane".to_string()),
                ("user[nickname]".to_string(), String::new()),
                ("user[tags][]".to_string(), "a".to_string()),
                ("user[tags][]".to_string(), "b".to_string()),
            ]
        );
    }

    #[test]
    fn test_query_reparses() {
        let params = map(vec![(
            "post",
            map(vec![
                ("title", text("a & b")),
                ("tags", Params::Array(vec![text("x"), text("y")])),
            ]),
        )]);
        assert_eq!(parse_query(&params.to_query()).unwrap(), params);
    }
}
