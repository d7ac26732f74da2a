use crate::params::ParamKind;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("expected {expected} (got {actual}) for param `{key}`")]
    TypeConflict {
        key: String,
        expected: ParamKind,
        actual: ParamKind,
    },
    #[error("params nested deeper than {limit} levels")]
    TooDeep { limit: usize },
}
