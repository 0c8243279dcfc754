use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unknown filter category '{0}'")]
    UnknownCategory(String),
    #[error("unknown backend '{0}' (expected 'rdf' or 'ml')")]
    UnknownBackend(String),
}
