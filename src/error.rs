use std::path::PathBuf;

use thiserror::Error;

use crate::inline::Decoration;

/// Errors raised while converting markdown to HTML.
#[derive(Debug, Error)]
pub enum Error {
    /// An inline decoration was opened on a line and never closed.
    #[error("Line {line}: unterminated `{marker}` decoration")]
    MalformedDecoration { line: usize, marker: Decoration },

    #[error("Missing {}", path.display())]
    InputNotFound { path: PathBuf },

    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
