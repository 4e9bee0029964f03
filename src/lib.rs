//! A static content server speaking a one-line `VERB PATH` protocol.
//!
//! Each connection carries exactly one request. `GET` requests are answered
//! with a file, a directory listing or an error message, then the connection
//! is closed.

pub mod config;
pub mod connection;
pub mod error;
pub mod fs;
pub mod request;
pub mod resolver;
pub mod response;
pub mod server;

pub use server::Server;
