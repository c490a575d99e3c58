use std::borrow::Cow;
use std::error::Error as StdError;
use std::fmt::{self, Display};
use std::io;
use std::result::Result as StdResult;

/// A specialized `Result` type for sqlsplice.
pub type Result<T> = StdResult<T, Error>;

// Convenience type alias for usage within the crate.
pub(crate) type BoxDynError = Box<dyn StdError + 'static + Send + Sync>;

/// Represents all the ways a method can fail within sqlsplice.
///
/// Callers can rely on three disjoint families: configuration and IO errors
/// come only from connection plumbing, [`Parse`][Error::Parse] comes only
/// from the templater (and always before anything is executed), and
/// [`Database`][Error::Database] comes only from the server after an
/// already-rendered statement was sent.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Error occurred while parsing a connection string.
    #[error("error occurred while parsing a connection string: {0}")]
    Configuration(#[source] BoxDynError),

    /// Error communicating with the database backend.
    #[error("error communicating with the server: {0}")]
    Io(#[from] io::Error),

    /// A query template could not be rendered. The statement was never sent.
    #[error("error occurred while rendering a query template: {0}")]
    Parse(#[from] ParseError),

    /// Error returned from the database.
    #[error("error returned from database: {0}")]
    Database(Box<dyn DatabaseError>),

    /// Unexpected or invalid data encountered while communicating with the
    /// database. Indicates a bug in a connection implementation or a
    /// corrupted session.
    #[error("encountered unexpected or invalid data: {0}")]
    Protocol(String),

    /// No rows returned by a query that expected to return at least one row.
    #[error("no rows returned by a query that expected to return at least one row")]
    RowNotFound,

    /// Column index was out of bounds.
    #[error("column index out of bounds: the len is {len}, but the index is {index}")]
    ColumnIndexOutOfBounds { index: usize, len: usize },

    /// No column found for the given name.
    #[error("no column found for name: {0}")]
    ColumnNotFound(String),
}

impl Error {
    pub(crate) fn config(err: impl StdError + Send + Sync + 'static) -> Self {
        Error::Configuration(err.into())
    }

    #[allow(dead_code)]
    pub(crate) fn protocol(err: impl Display) -> Self {
        Error::Protocol(err.to_string())
    }
}

/// An error raised while rendering a query template.
///
/// Always a programmer error at the call site: the template and the supplied
/// arguments do not agree. Rendering fails on the first offending argument
/// and produces no partial output.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ParseError {
    /// The count of markers in the template does not match the count of
    /// supplied arguments.
    #[error("template contains {markers} placeholder(s) but {arguments} argument(s) were supplied")]
    ArityMismatch { markers: usize, arguments: usize },

    /// An argument's runtime type is not accepted by its placeholder kind.
    #[error("argument {index} for `{marker}` must be {expected}; got {actual}")]
    TypeMismatch {
        index: usize,
        marker: &'static str,
        expected: &'static str,
        actual: &'static str,
    },

    /// A string argument for `?i` is not a plain decimal number.
    #[error("argument {index} for `?i` is not a plain decimal number: {text:?}")]
    MalformedNumber { index: usize, text: String },

    /// An argument cannot be used as an identifier.
    #[error("argument {index} for `{marker}` is not a usable identifier: {reason}")]
    InvalidIdentifier {
        index: usize,
        marker: &'static str,
        reason: String,
    },

    /// An `?a` or `?u` argument was an empty container.
    #[error("argument {index} for `{marker}` must not be empty")]
    EmptyContainer { index: usize, marker: &'static str },
}

/// An error that was returned from the database.
pub trait DatabaseError: 'static + Send + Sync + StdError {
    /// The primary, human-readable error message.
    fn message(&self) -> &str;

    /// The (SQLSTATE) code for the error.
    fn code(&self) -> Option<Cow<'_, str>> {
        None
    }
}

impl<E> From<E> for Error
where
    E: DatabaseError,
{
    #[inline]
    fn from(error: E) -> Self {
        Error::Database(Box::new(error))
    }
}

/// A database-reported failure: error number, SQLSTATE and message.
#[derive(Debug)]
pub struct ServerError {
    number: u16,
    sqlstate: Option<String>,
    message: String,
}

impl ServerError {
    pub fn new(number: u16, sqlstate: Option<&str>, message: &str) -> Self {
        Self {
            number,
            sqlstate: sqlstate.map(str::to_owned),
            message: message.to_owned(),
        }
    }

    /// The dialect-specific error number, e.g. `1146` for an unknown table.
    pub fn number(&self) -> u16 {
        self.number
    }
}

impl Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.message())
    }
}

impl StdError for ServerError {}

impl DatabaseError for ServerError {
    fn message(&self) -> &str {
        &self.message
    }

    fn code(&self) -> Option<Cow<'_, str>> {
        self.sqlstate.as_deref().map(Cow::Borrowed)
    }
}
