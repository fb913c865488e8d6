use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} must not be blank")]
    Blank(&'static str),

    #[error("Username must be 3-32 letters, digits, '.', '_' or '-'")]
    InvalidUsername,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown vote state: {0}")]
pub struct UnknownVoteState(pub String);
