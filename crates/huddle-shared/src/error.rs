use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HuddleError {
    #[error("Unknown table: {0}")]
    UnknownTable(String),
}
