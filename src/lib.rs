//! Literal SQL templating and escaping for MySQL-flavored databases.
//!
//! The core of the crate is the [`template`] module: a template string
//! carries typed placeholder markers (`?s`, `?i`, `?n`, `?a`, `?u`, `?p`)
//! that are substituted with safely escaped literal values, validating both
//! arity and the runtime type of every argument. The output is a fully
//! literal statement ready for direct execution.
//!
//! Around that core sits a thin client layer: the [`Connection`] trait is
//! the boundary to whatever library actually speaks to the server, and
//! [`Client`] pairs a connection with the dialect [`Escaper`] plus
//! row-count / insert-id bookkeeping and fetch helpers.
//!
//! ```
//! use sqlsplice::{template, MySqlEscaper, Value};
//!
//! let sql = template::render(
//!     "SELECT * FROM ?n WHERE id IN (?a)",
//!     &["users".into(), vec![1i64, 2, 3].into()],
//!     &MySqlEscaper::new(),
//! )
//! .unwrap();
//!
//! assert_eq!(sql, "SELECT * FROM `users` WHERE id IN ('1', '2', '3')");
//! ```

pub mod error;
pub mod mock;
pub mod template;

mod client;
mod connection;
mod done;
mod escape;
mod logger;
mod options;
mod row;
mod value;

#[doc(inline)]
pub use self::{
    client::Client,
    connection::{Connect, Connection, QueryOutcome},
    done::Done,
    error::{DatabaseError, Error, ParseError, Result, ServerError},
    escape::{Escaper, MySqlEscaper},
    options::ConnectOptions,
    row::{Column, ColumnIndex, ResultSet, Row},
    template::{parse_template, render, Marker, MarkerKind, ParsedTemplate},
    value::Value,
};
