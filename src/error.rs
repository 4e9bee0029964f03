use std::io::{Error as IoError, ErrorKind};
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("IO error: {0}")]
    IO(#[from] IoError),
    #[error("Invalid root {path}: {source}")]
    InvalidRoot {
        path: PathBuf,
        #[source]
        source: IoError,
    },
    #[error("Root {0} is not a directory")]
    RootNotDirectory(PathBuf),
}

#[derive(Error, Debug)]
pub enum ConnectionError {
    #[error("IO error: {0}")]
    IO(#[from] IoError),
    #[error("Connection closed before a request line was sent")]
    EmptyRequest,
    #[error("Request did not end with LF")]
    MissingLineFeed,
    #[error("Request line longer than {0} bytes")]
    RequestLineTooLong(usize),
    #[error("Bad request {0:?}")]
    BadRequest(String),
    #[error("Unknown verb {verb} in {line:?}")]
    UnknownVerb { verb: String, line: String },
}

#[derive(Error, Debug)]
pub enum OpenError {
    #[error("Not found")]
    NotFound,
    #[error("Path escapes the root")]
    Escape,
    #[error(transparent)]
    IO(IoError),
}

impl From<IoError> for OpenError {
    fn from(err: IoError) -> Self {
        match err.kind() {
            ErrorKind::NotFound | ErrorKind::NotADirectory => OpenError::NotFound,
            _ => OpenError::IO(err),
        }
    }
}
