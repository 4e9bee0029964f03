use std::path::PathBuf;

use clap::builder::RangedU64ValueParser;
use clap::Parser;

use crate::request::DEFAULT_MAX_REQUEST_LINE;

/// Serves a directory over a one-line `VERB PATH` protocol
#[derive(Debug, Clone, Parser)]
#[command(name = "oghttpd", version)]
pub struct Config {
    /// WWW root
    #[arg(long, default_value = "./pub", env = "OGHTTPD_ROOT")]
    pub root: PathBuf,

    /// Address to listen on
    #[arg(long, default_value = "0.0.0.0:80", env = "OGHTTPD_ADDR")]
    pub addr: String,

    /// Longest accepted request line in bytes, line feed included
    #[arg(
        long,
        default_value_t = DEFAULT_MAX_REQUEST_LINE,
        env = "OGHTTPD_MAX_REQUEST_LINE",
        value_parser = RangedU64ValueParser::<usize>::new().range(1..)
    )]
    pub max_request_line: usize,
}
