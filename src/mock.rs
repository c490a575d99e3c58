//! A scripted in-memory [`Connection`] for tests.
//!
//! Expectations are queued in order; each executed statement is compared
//! against the next expectation's text and answered with its scripted
//! response. An unexpected or mismatched statement fails the execution with
//! [`Error::Protocol`], and every statement that reaches the connection is
//! recorded for inspection.

use std::collections::VecDeque;

use futures_core::future::BoxFuture;

use crate::connection::{Connect, Connection, QueryOutcome};
use crate::done::Done;
use crate::error::{Error, Result, ServerError};
use crate::options::ConnectOptions;
use crate::row::ResultSet;

enum MockResponse {
    Rows {
        columns: Vec<String>,
        rows: Vec<Vec<Option<String>>>,
    },
    Done {
        rows_affected: u64,
        last_insert_id: u64,
    },
    Error(ServerError),
}

struct Expectation {
    sql: String,
    response: MockResponse,
}

/// A scripted in-memory connection.
#[derive(Default)]
pub struct MockConnection {
    expected: VecDeque<Expectation>,
    executed: Vec<String>,
}

impl MockConnection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expects `sql` next and answers with a result set.
    pub fn expect_rows(
        mut self,
        sql: &str,
        columns: &[&str],
        rows: Vec<Vec<Option<String>>>,
    ) -> Self {
        self.expected.push_back(Expectation {
            sql: sql.to_owned(),
            response: MockResponse::Rows {
                columns: columns.iter().map(|&name| name.to_owned()).collect(),
                rows,
            },
        });
        self
    }

    /// Expects `sql` next and answers with a rowless outcome.
    pub fn expect_done(mut self, sql: &str, rows_affected: u64, last_insert_id: u64) -> Self {
        self.expected.push_back(Expectation {
            sql: sql.to_owned(),
            response: MockResponse::Done {
                rows_affected,
                last_insert_id,
            },
        });
        self
    }

    /// Expects `sql` next and answers with a database error.
    pub fn expect_error(mut self, sql: &str, error: ServerError) -> Self {
        self.expected.push_back(Expectation {
            sql: sql.to_owned(),
            response: MockResponse::Error(error),
        });
        self
    }

    /// Every statement that reached the connection, in execution order.
    pub fn executed(&self) -> &[String] {
        &self.executed
    }

    fn respond(&mut self, sql: &str) -> Result<QueryOutcome> {
        self.executed.push(sql.to_owned());

        let expectation = self
            .expected
            .pop_front()
            .ok_or_else(|| Error::Protocol(format!("unexpected statement: {:?}", sql)))?;

        if expectation.sql != sql {
            return Err(Error::Protocol(format!(
                "expected statement {:?}, got {:?}",
                expectation.sql, sql
            )));
        }

        Ok(match expectation.response {
            MockResponse::Rows { columns, rows } => {
                QueryOutcome::Rows(ResultSet::new(&columns, rows))
            }

            MockResponse::Done {
                rows_affected,
                last_insert_id,
            } => QueryOutcome::Done(Done::new(rows_affected, last_insert_id)),

            MockResponse::Error(error) => return Err(error.into()),
        })
    }
}

impl Connection for MockConnection {
    fn execute<'c>(&'c mut self, sql: &'c str) -> BoxFuture<'c, Result<QueryOutcome>> {
        Box::pin(async move { self.respond(sql) })
    }

    fn ping(&mut self) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move { Ok(()) })
    }

    fn close(self) -> BoxFuture<'static, Result<()>> {
        Box::pin(async move { Ok(()) })
    }
}

impl Connect for MockConnection {
    fn connect_with(_options: &ConnectOptions) -> BoxFuture<'_, Result<Self>> {
        Box::pin(async move { Ok(Self::new()) })
    }
}
