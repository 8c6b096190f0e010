//! Pull-based row cursor over one adapter scan.

use log::debug;

use crate::adapter::{Adapter, Row, RowStream, ScanOptions};
use crate::value::Value;

use super::errors::ScanResult;
use super::materialize::ScanSpec;

/// One scan's worth of rows, consumed front to back. Non-restartable;
/// a new predicate set means a new plan and a new cursor.
///
/// Scan options are only forwarded to the adapter when it declares the
/// matching capability; the cursor applies the rest itself, so callers
/// get the same rows either way.
pub struct ScanCursor<'a> {
    stream: Option<RowStream<'a>>,
    current: Option<Row>,
    remaining: Option<usize>,
    projection: Option<Vec<String>>,
}

impl<'a> ScanCursor<'a> {
    /// Opens a cursor and positions it on the first row.
    ///
    /// When any bound is `Impossible` the scan is known to be empty and
    /// the adapter is never called. Adapter failures while fetching the
    /// first row surface here; later ones surface from [`advance`].
    ///
    /// [`advance`]: ScanCursor::advance
    pub fn open(
        adapter: &'a dyn Adapter,
        spec: &ScanSpec,
        options: &ScanOptions,
    ) -> ScanResult<Self> {
        if spec.is_impossible() {
            debug!("Impossible bound, short-circuiting to an empty scan");
            return Ok(Self {
                stream: None,
                current: None,
                remaining: None,
                projection: None,
            });
        }

        let mut pushed = options.clone();
        let mut skip = 0;
        if !adapter.supports_offset() {
            skip = pushed.offset.take().unwrap_or(0);
        }
        // A limit counts rows after the offset; once the offset stays
        // host-side the limit must stay with it.
        let remaining = if adapter.supports_limit() && skip == 0 {
            None
        } else {
            pushed.limit.take()
        };
        let projection = if adapter.supports_requested_columns() {
            None
        } else {
            pushed.requested_columns.take()
        };

        let mut stream = adapter.scan(&spec.bounds, &spec.order, &pushed)?;
        for _ in 0..skip {
            if stream.next().transpose()?.is_none() {
                break;
            }
        }
        let mut cursor = Self {
            stream: Some(stream),
            current: None,
            remaining,
            projection,
        };
        cursor.current = cursor.next_row()?;
        Ok(cursor)
    }

    fn next_row(&mut self) -> ScanResult<Option<Row>> {
        if self.remaining == Some(0) {
            return Ok(None);
        }
        let row = match &mut self.stream {
            Some(stream) => stream.next().transpose()?,
            None => None,
        };
        let Some(mut row) = row else {
            return Ok(None);
        };
        if let Some(remaining) = &mut self.remaining {
            *remaining -= 1;
        }
        if let Some(projection) = &self.projection {
            row.values
                .retain(|name, _| projection.iter().any(|keep| keep == name));
        }
        Ok(Some(row))
    }

    /// True once the sequence is exhausted.
    pub fn eof(&self) -> bool {
        self.current.is_none()
    }

    /// Row id of the current row.
    pub fn rowid(&self) -> Option<i64> {
        self.current.as_ref().and_then(|row| row.rowid)
    }

    /// Cell of the current row; `None` at EOF or for unknown columns.
    pub fn column(&self, name: &str) -> Option<&Value> {
        self.current.as_ref().and_then(|row| row.get(name))
    }

    /// Moves to the next row, propagating adapter failures opaquely.
    pub fn advance(&mut self) -> ScanResult<()> {
        self.current = self.next_row()?;
        Ok(())
    }
}
