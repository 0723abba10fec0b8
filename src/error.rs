//! Error types for the gazette library.

use std::fmt;
use std::io;
use thiserror::Error;

/// Result type alias for gazette operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Pipeline stage a failure is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Locating the Sumário block.
    RangeDetection,
    /// Parsing summary items.
    ItemParsing,
    /// Detecting body headers and slicing the body.
    BodySlicing,
    /// Linking items to slices and assembling docs.
    LinkingOrAssembly,
}

impl Stage {
    /// Stable kebab-case name of the stage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::RangeDetection => "range-detection",
            Stage::ItemParsing => "item-parsing",
            Stage::BodySlicing => "body-slicing",
            Stage::LinkingOrAssembly => "linking-or-assembly",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error types that can occur while recovering gazette structure.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A pipeline stage failed; the run was aborted.
    #[error("{stage} failed: {source}")]
    Stage {
        /// Stage that failed
        stage: Stage,
        /// Underlying cause
        #[source]
        source: Box<Error>,
    },

    /// A computed summary range broke `0 <= start < end <= len`.
    #[error("Invalid summary range {start}..{end} for {len} lines")]
    InvalidRange {
        /// Range start
        start: usize,
        /// Range end (exclusive)
        end: usize,
        /// Number of input lines
        len: usize,
    },

    /// A header index does not point into the line sequence.
    #[error("Header line {index} is out of range (input has {len} lines)")]
    HeaderOutOfBounds {
        /// Offending header index
        index: usize,
        /// Number of input lines
        len: usize,
    },

    /// The tagger returned spans that break its contract.
    #[error("Malformed entity tags: {0}")]
    MalformedTags(String),

    /// An internal invariant was violated.
    #[error("Invariant violated: {0}")]
    Invariant(String),

    /// A publication date could not be parsed.
    #[error("Invalid publication date: {0}")]
    InvalidDate(String),

    /// Error during rendering or reloading (JSON, text).
    #[error("Rendering error: {0}")]
    Render(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Attribute this error to a pipeline stage.
    ///
    /// Errors that already carry a stage keep it.
    pub fn in_stage(self, stage: Stage) -> Self {
        match self {
            Error::Stage { .. } => self,
            other => Error::Stage {
                stage,
                source: Box::new(other),
            },
        }
    }

    /// The stage this error was attributed to, if any.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Error::Stage { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::HeaderOutOfBounds { index: 10, len: 5 };
        assert_eq!(
            err.to_string(),
            "Header line 10 is out of range (input has 5 lines)"
        );

        let err = Error::InvalidRange {
            start: 4,
            end: 4,
            len: 9,
        };
        assert_eq!(err.to_string(), "Invalid summary range 4..4 for 9 lines");
    }

    #[test]
    fn test_stage_wrapping() {
        let err = Error::MalformedTags("span 3..2".into()).in_stage(Stage::ItemParsing);
        assert_eq!(err.stage(), Some(Stage::ItemParsing));
        assert_eq!(
            err.to_string(),
            "item-parsing failed: Malformed entity tags: span 3..2"
        );

        // A second attribution does not overwrite the first.
        let err = err.in_stage(Stage::BodySlicing);
        assert_eq!(err.stage(), Some(Stage::ItemParsing));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert_eq!(err.stage(), None);
    }
}
