use thiserror::Error;

/// A field name was used that the type does not declare.
///
/// Returned by the dynamic accessors on [`Tracked`](crate::Tracked) (`get`, `set`, `is_modified`, ...).
/// The failing call has no effect on the object.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("type `{type_name}` does not declare a field named `{field}`")]
pub struct SchemaMismatchError {
    /// The type that was accessed
    pub type_name: &'static str,
    /// The field name that was requested
    pub field: String,
}

/// A list element could not be identified by its merge key.
///
/// Strategic merge patches match list elements by their merge key, so an element without one
/// cannot be patched safely. Patch generation is aborted for the whole object instead of
/// falling back to a positional replace.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("element {index} of `{type_name}.{field}` has no value for merge key `{merge_key}`")]
pub struct MissingMergeKeyError {
    /// The type declaring the list field
    pub type_name: &'static str,
    /// Wire name of the list field
    pub field: &'static str,
    /// The declared merge key
    pub merge_key: &'static str,
    /// Position of the offending element in the list
    pub index: usize,
}

/// Possible errors when working with tracked objects and patches
#[derive(Error, Debug)]
pub enum Error {
    /// A field name that the type does not declare
    #[error(transparent)]
    SchemaMismatch(#[from] SchemaMismatchError),

    /// A merge-keyed list element without its merge key
    #[error(transparent)]
    MissingMergeKey(#[from] MissingMergeKeyError),

    /// Failed to serialize or deserialize a JSON value
    #[error("failed to (de)serialize JSON: {0}")]
    SerdeError(#[from] serde_json::Error),

    /// Failed to serialize or deserialize YAML
    #[error("failed to (de)serialize YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Failed to build a request
    #[error("failed to build request: {0}")]
    HttpError(#[from] http::Error),

    /// Parameters or patch documents failed client-side validation
    #[error("validation error: {0}")]
    Validation(String),
}
