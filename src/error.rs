//! Error types for the ofx_statement library.

use std::io;
use thiserror::Error;

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while turning an OFX file into a statement.
///
/// Every variant is terminal for the input that produced it: parsing is
/// deterministic, so nothing is retried and no partial document is returned.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error occurred while reading the input.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error writing CSV output.
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// The normalized document could not be read as XML.
    #[error("XML parsing error: {0}")]
    XmlError(String),

    /// No bank or credit-card message set, or an account type name outside
    /// the supported set.
    #[error("Unsupported account type: {0}")]
    UnsupportedAccountType(String),

    /// A section name outside the supported set was requested.
    #[error("Unsupported section: {0}")]
    UnsupportedSection(String),

    /// A required statement section is absent.
    #[error("Missing section: {0}")]
    MissingSection(String),

    /// A required date is absent or not an OFX datetime.
    #[error("Malformed date: {0}")]
    MalformedDate(String),

    /// Legacy SGML markup could not be turned into a tree.
    #[error("Normalization failure: {0}")]
    NormalizationFailure(String),

    /// Invalid amount format.
    #[error("Invalid amount format: {0}")]
    InvalidAmount(String),

    /// Missing required field.
    #[error("Missing required field: {0}")]
    MissingField(String),

    /// A field holds a value outside its closed set of codes.
    #[error("Invalid value for {field}: {value}")]
    InvalidField { field: String, value: String },

    /// The caller asked for an encoding label that is not recognised.
    #[error("Unknown encoding: {0}")]
    UnknownEncoding(String),

    /// Invalid export format specified.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::XmlError(err.to_string())
    }
}

impl From<sgmlish::Error> for Error {
    fn from(err: sgmlish::Error) -> Self {
        Error::NormalizationFailure(err.to_string())
    }
}
