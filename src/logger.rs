use std::time::Instant;

/// Logs one executed statement when dropped: a short summary, the row
/// counts, and the elapsed wall time.
pub(crate) struct QueryLogger<'q> {
    sql: &'q str,
    rows_returned: u64,
    rows_affected: u64,
    start: Instant,
}

impl<'q> QueryLogger<'q> {
    pub(crate) fn new(sql: &'q str) -> Self {
        Self {
            sql,
            rows_returned: 0,
            rows_affected: 0,
            start: Instant::now(),
        }
    }

    pub(crate) fn set_rows_returned(&mut self, n: u64) {
        self.rows_returned = n;
    }

    pub(crate) fn increase_rows_affected(&mut self, n: u64) {
        self.rows_affected += n;
    }

    fn finish(&self) {
        if !log::log_enabled!(target: "sqlsplice::query", log::Level::Debug) {
            return;
        }

        let elapsed = self.start.elapsed();
        let mut summary = parse_query_summary(self.sql);

        if summary != self.sql {
            summary.push_str(" …");
        }

        log::debug!(
            target: "sqlsplice::query",
            "{}; rows affected: {}, rows returned: {}, elapsed: {:.3?}",
            summary,
            self.rows_affected,
            self.rows_returned,
            elapsed,
        );
    }
}

impl Drop for QueryLogger<'_> {
    fn drop(&mut self) {
        self.finish();
    }
}

fn parse_query_summary(sql: &str) -> String {
    // For now, just take the first 4 words
    sql.split_whitespace()
        .take(4)
        .collect::<Vec<&str>>()
        .join(" ")
}
