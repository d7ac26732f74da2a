use core::fmt::Display;

use thisisplural::Plural;

/// A parameter name split into its bracket segments.
///
/// `user[addresses][][street]` is `[Key("user"), Key("addresses"), Push, Key("street")]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Plural)]
pub struct ParamPath(pub Vec<ParamSegment>);

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParamSegment {
    /// A named (or index-named) map entry, `[key]`
    Key(String),
    /// Append to an array, `[]`
    Push,
}

impl ParamPath {
    pub fn root() -> Self {
        ParamPath(Vec::new())
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns a copy of this path extended with `[key]`.
    pub fn key(&self, key: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(ParamSegment::Key(key.into()));
        ParamPath(segments)
    }

    /// Returns a copy of this path extended with `[]`.
    pub fn push(&self) -> Self {
        let mut segments = self.0.clone();
        segments.push(ParamSegment::Push);
        ParamPath(segments)
    }

    pub fn segments(&self) -> &[ParamSegment] {
        &self.0
    }

    /// Splits a submitted field name into segments.
    ///
    /// The part before the first `[` is the leading key. A bracket suffix that
    /// does not parse as a sequence of `[key]`/`[]` groups makes the whole name
    /// a single plain key. An empty name yields the root path.
    pub fn parse(name: &str) -> Self {
        if name.is_empty() {
            return ParamPath::root();
        }
        let Some((start, _)) = name.char_indices().skip(1).find(|(_, c)| *c == '[') else {
            return ParamPath(vec![ParamSegment::Key(name.to_string())]);
        };
        let (head, mut rest) = name.split_at(start);
        let mut segments = vec![ParamSegment::Key(head.to_string())];
        while !rest.is_empty() {
            if let Some(after) = rest.strip_prefix("[]") {
                segments.push(ParamSegment::Push);
                rest = after;
            } else if let Some(end) = rest.strip_prefix('[').and_then(|r| r.find(']')) {
                segments.push(ParamSegment::Key(rest[1..=end].to_string()));
                rest = &rest[end + 2..];
            } else {
                return ParamPath(vec![ParamSegment::Key(name.to_string())]);
            }
        }
        ParamPath(segments)
    }
}

impl Display for ParamPath {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                ParamSegment::Key(key) if i == 0 => write!(f, "{key}")?,
                ParamSegment::Key(key) => write!(f, "[{key}]")?,
                ParamSegment::Push => write!(f, "[]")?,
            }
        }
        Ok(())
    }
}
