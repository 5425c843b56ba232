//! Story Context - Errors

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoryError {
    #[error("field is required: {0}")]
    MissingField(&'static str),

    #[error("field is not valid UTF-8: {0}")]
    InvalidEncoding(&'static str),
}
