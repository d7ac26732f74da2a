#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyError {
    #[error("node key must not be empty")]
    Empty,
}

/// Programming errors raised while building a form or extracting input.
///
/// Untrusted submitted data never produces one of these; it is normalized instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("field {name} did not define an input component")]
    NoInputComponent { name: String },
    #[error("field {name} already has an input component ({existing})")]
    InputAlreadyDefined { name: String, existing: String },
    #[error("cannot safely materialize an unbounded range")]
    UnboundedRange,
    #[error("range choices would expand to more than {limit} entries")]
    RangeTooLarge { limit: usize },
    #[error("child `{key}` is a {existing}, not a {requested}")]
    ChildKindMismatch {
        key: String,
        existing: &'static str,
        requested: &'static str,
    },
    #[error("field {name} has no association to render as {component}")]
    MissingAssociation { name: String, component: String },
    #[error("cannot derive a form key: pass one explicitly or bind an object with a model name")]
    MissingFormKey,
    #[error(transparent)]
    Key(#[from] KeyError),
}
