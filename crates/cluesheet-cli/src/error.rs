use std::{io, path::PathBuf};

use crate::script::ParseError;

/// Errors that stop the command-line tool.
#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum CliError {
    /// Reading or writing a file failed.
    #[display("{}: {source}", path.display())]
    File {
        /// The file involved.
        path: PathBuf,
        /// The underlying I/O error.
        source: io::Error,
    },
    /// Reading the script from standard input failed.
    #[display("failed to read script from stdin: {_0}")]
    Stdin(io::Error),
    /// A JSON document could not be read or written.
    #[display("{}: invalid JSON: {source}", path.display())]
    Json {
        /// The file involved.
        path: PathBuf,
        /// The underlying JSON error.
        source: serde_json::Error,
    },
    /// The script could not be parsed.
    #[display("{_0}")]
    #[from]
    Parse(ParseError),
}
