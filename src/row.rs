use std::collections::VecDeque;
use std::sync::Arc;

use crate::error::{Error, Result};

/// A column of a result set: name and 0-based ordinal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub(crate) ordinal: usize,
    pub(crate) name: String,
}

impl Column {
    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A single row of a result set. Values are in the text shape the server
/// sends for a literal statement: a string or NULL per cell.
#[derive(Debug, Clone)]
pub struct Row {
    pub(crate) columns: Arc<[Column]>,
    pub(crate) values: Vec<Option<String>>,
}

impl Row {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Returns the value at the given column ordinal or name; `None` for a
    /// SQL `NULL`.
    ///
    /// Fails with [`Error::ColumnIndexOutOfBounds`] or
    /// [`Error::ColumnNotFound`].
    pub fn try_get<I>(&self, index: I) -> Result<Option<&str>>
    where
        I: ColumnIndex,
    {
        let index = index.index(self)?;

        Ok(self.values[index].as_deref())
    }

    /// Like [`try_get`][Row::try_get], but panics on a bad index.
    pub fn get<I>(&self, index: I) -> Option<&str>
    where
        I: ColumnIndex,
    {
        self.try_get(index).unwrap()
    }
}

/// A type usable to index into a [`Row`]: a column ordinal or a column name.
pub trait ColumnIndex {
    fn index(&self, row: &Row) -> Result<usize>;
}

impl ColumnIndex for usize {
    fn index(&self, row: &Row) -> Result<usize> {
        let len = row.len();

        if *self >= len {
            return Err(Error::ColumnIndexOutOfBounds { len, index: *self });
        }

        Ok(*self)
    }
}

impl ColumnIndex for &str {
    fn index(&self, row: &Row) -> Result<usize> {
        row.columns
            .iter()
            .find(|column| column.name == **self)
            .map(|column| column.ordinal)
            .ok_or_else(|| Error::ColumnNotFound((*self).into()))
    }
}

/// A buffered tabular result from a single statement.
///
/// Rows are consumed front-to-back with [`next_row`][ResultSet::next_row] or
/// [`next_scalar`][ResultSet::next_scalar]; [`release`][ResultSet::release]
/// drops whatever remains and may be called any number of times.
#[derive(Debug, Default)]
pub struct ResultSet {
    columns: Arc<[Column]>,
    rows: VecDeque<Vec<Option<String>>>,
}

impl ResultSet {
    /// Builds a result set from column names and text-protocol row values.
    ///
    /// Intended for [`Connection`][crate::Connection] implementations.
    pub fn new<N>(names: &[N], rows: Vec<Vec<Option<String>>>) -> Self
    where
        N: AsRef<str>,
    {
        let columns: Arc<[Column]> = names
            .iter()
            .enumerate()
            .map(|(ordinal, name)| Column {
                ordinal,
                name: name.as_ref().to_owned(),
            })
            .collect();

        Self {
            columns,
            rows: rows.into(),
        }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// The count of rows not yet consumed.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Takes the next row, or `None` at the end of the set.
    pub fn next_row(&mut self) -> Option<Row> {
        let values = self.rows.pop_front()?;

        Some(Row {
            columns: Arc::clone(&self.columns),
            values,
        })
    }

    /// Takes the first column of the next row, or `None` at the end of the
    /// set. The inner `Option` is `None` for a SQL `NULL`.
    pub fn next_scalar(&mut self) -> Option<Option<String>> {
        let mut values = self.rows.pop_front()?;

        Some(if values.is_empty() {
            None
        } else {
            values.swap_remove(0)
        })
    }

    /// Discards any rows not yet consumed. Idempotent.
    pub fn release(&mut self) {
        self.rows.clear();
    }
}
