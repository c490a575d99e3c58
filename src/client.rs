use crate::connection::{Connection, QueryOutcome};
use crate::error::{Error, Result};
use crate::escape::{Escaper, MySqlEscaper};
use crate::logger::QueryLogger;
use crate::row::{ResultSet, Row};
use crate::template;
use crate::value::Value;

/// A connection paired with the dialect escaper, plus per-statement
/// bookkeeping.
///
/// Templates are rendered with [`parse`][Client::parse] and executed with
/// [`query`][Client::query] or the fetch helpers. Rendering failures are
/// [`Error::Parse`] and never reach the connection.
pub struct Client<C> {
    connection: C,
    escaper: Box<dyn Escaper>,
    rows_affected: u64,
    last_insert_id: u64,
}

impl<C> Client<C>
where
    C: Connection,
{
    /// Wraps a connection with the stock [`MySqlEscaper`].
    pub fn new(connection: C) -> Self {
        Self {
            connection,
            escaper: Box::new(MySqlEscaper::new()),
            rows_affected: 0,
            last_insert_id: 0,
        }
    }

    /// Replaces the escaper, e.g. for a session running with
    /// `NO_BACKSLASH_ESCAPES`.
    pub fn with_escaper(mut self, escaper: impl Escaper + 'static) -> Self {
        self.escaper = Box::new(escaper);
        self
    }

    /// Renders a template against `args` into a fully literal statement
    /// without executing it.
    pub fn parse(&self, query: &str, args: &[Value]) -> Result<String> {
        Ok(template::render(query, args, &*self.escaper)?)
    }

    /// Renders and executes a template.
    ///
    /// A rowless outcome updates [`rows_affected`][Client::rows_affected]
    /// and [`last_insert_id`][Client::last_insert_id]; a row-producing
    /// outcome resets both to zero.
    pub async fn query(&mut self, query: &str, args: &[Value]) -> Result<QueryOutcome> {
        let sql = self.parse(query, args)?;
        let mut logger = QueryLogger::new(&sql);

        let outcome = self.connection.execute(&sql).await?;

        match &outcome {
            QueryOutcome::Done(done) => {
                self.rows_affected = done.rows_affected();
                self.last_insert_id = done.last_insert_id();
                logger.increase_rows_affected(done.rows_affected());
            }

            QueryOutcome::Rows(rows) => {
                self.rows_affected = 0;
                self.last_insert_id = 0;
                logger.set_rows_returned(rows.len() as u64);
            }
        }

        Ok(outcome)
    }

    /// Executes and buffers every row of the result.
    pub async fn fetch_all(&mut self, query: &str, args: &[Value]) -> Result<Vec<Row>> {
        let mut result = self.expect_rows(query, args).await?;
        let mut rows = Vec::with_capacity(result.len());

        while let Some(row) = result.next_row() {
            rows.push(row);
        }

        Ok(rows)
    }

    /// Executes and returns the first row; [`Error::RowNotFound`] if the
    /// result is empty.
    pub async fn fetch_one(&mut self, query: &str, args: &[Value]) -> Result<Row> {
        self.fetch_optional(query, args)
            .await?
            .ok_or(Error::RowNotFound)
    }

    /// Executes and returns the first row, if any. Remaining rows are
    /// released.
    pub async fn fetch_optional(&mut self, query: &str, args: &[Value]) -> Result<Option<Row>> {
        let mut result = self.expect_rows(query, args).await?;
        let row = result.next_row();

        result.release();

        Ok(row)
    }

    /// Executes and returns the first column of the first row;
    /// [`Error::RowNotFound`] if the result is empty, `None` for a SQL
    /// `NULL`.
    pub async fn fetch_scalar(&mut self, query: &str, args: &[Value]) -> Result<Option<String>> {
        let mut result = self.expect_rows(query, args).await?;
        let scalar = result.next_scalar().ok_or(Error::RowNotFound)?;

        result.release();

        Ok(scalar)
    }

    async fn expect_rows(&mut self, query: &str, args: &[Value]) -> Result<ResultSet> {
        self.query(query, args)
            .await?
            .into_rows()
            .ok_or_else(|| Error::Protocol("statement did not produce a result set".into()))
    }

    /// Rows affected by the most recent rowless statement.
    pub fn rows_affected(&self) -> u64 {
        self.rows_affected
    }

    /// `AUTO_INCREMENT` id generated by the most recent rowless statement,
    /// or `0`.
    pub fn last_insert_id(&self) -> u64 {
        self.last_insert_id
    }

    /// The underlying connection.
    pub fn connection(&self) -> &C {
        &self.connection
    }

    /// Checks the underlying connection.
    pub async fn ping(&mut self) -> Result<()> {
        self.connection.ping().await
    }

    /// Closes the underlying connection.
    pub async fn close(self) -> Result<()> {
        self.connection.close().await
    }
}
