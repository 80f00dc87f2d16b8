pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Xml(#[from] roxmltree::Error),

    #[error("Invalid path data {value:?}: {message}")]
    PathData { value: String, message: String },

    #[error("Invalid transform {value:?}: {message}")]
    Transform { value: String, message: String },

    #[error("Document nesting exceeds the configured limit of {max_depth} levels")]
    TooDeep { max_depth: usize },
}
