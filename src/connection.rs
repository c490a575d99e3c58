use futures_core::future::BoxFuture;

use crate::done::Done;
use crate::error::Result;
use crate::options::ConnectOptions;
use crate::row::ResultSet;

/// What the server sent back for one executed statement: either a tabular
/// result, or the affected-row / insert-id pair of a rowless statement.
#[derive(Debug)]
pub enum QueryOutcome {
    Rows(ResultSet),
    Done(Done),
}

impl QueryOutcome {
    /// The result set, if the statement produced one.
    pub fn into_rows(self) -> Option<ResultSet> {
        match self {
            QueryOutcome::Rows(rows) => Some(rows),
            QueryOutcome::Done(_) => None,
        }
    }

    /// The rowless outcome, if the statement produced one.
    pub fn done(&self) -> Option<&Done> {
        match self {
            QueryOutcome::Rows(_) => None,
            QueryOutcome::Done(done) => Some(done),
        }
    }
}

/// A single connection (also known as a session) with a specific database.
///
/// This is the collaborator boundary of the crate: the templater renders a
/// fully literal statement and hands it here. Implementations wrap whatever
/// client library actually speaks to the server; this crate ships only the
/// scripted [`MockConnection`][crate::mock::MockConnection].
pub trait Connection: Send {
    /// Executes a fully literal SQL string.
    fn execute<'c>(&'c mut self, sql: &'c str) -> BoxFuture<'c, Result<QueryOutcome>>;

    /// Checks if the connection to the database is still valid.
    fn ping(&mut self) -> BoxFuture<'_, Result<()>>;

    /// Explicitly closes the connection.
    fn close(self) -> BoxFuture<'static, Result<()>>
    where
        Self: Sized;
}

/// A [`Connection`] that can establish itself from [`ConnectOptions`].
pub trait Connect: Connection + Sized {
    /// Establishes from already-parsed options.
    fn connect_with(options: &ConnectOptions) -> BoxFuture<'_, Result<Self>>;

    /// Establishes from a `mysql://` URL.
    fn connect(url: &str) -> BoxFuture<'_, Result<Self>> {
        Box::pin(async move {
            let options = url.parse::<ConnectOptions>()?;

            Self::connect_with(&options).await
        })
    }
}
