use std::error::Error;
use std::fmt;

#[derive(Debug, PartialEq)]
pub enum CueError {
    NotFound(String),
    InvalidInput(String),
    ParseError(String),
}

impl Error for CueError {}

impl fmt::Display for CueError {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CueError::NotFound(msg) => write!(fmt, "not found: {}", msg),
            CueError::InvalidInput(msg) => write!(fmt, "invalid input: {}", msg),
            CueError::ParseError(msg) => write!(fmt, "{}", msg),
        }
    }
}
