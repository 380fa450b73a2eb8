//! Paged table requests.

use evalboard_filter::Column;
use serde_json::{Map, Value};

use crate::api::TableRequest;
use crate::backend::DashboardBackend;
use crate::error::{DashboardError, DashboardResult};
use crate::store::Snapshot;

/// One table row, keyed by column id.
pub type Row = Map<String, Value>;

/// Which slice of the table to fetch and how to order it.
#[derive(Debug, Clone, PartialEq)]
pub struct TablePage {
    /// First row to return.
    pub offset: usize,
    /// Number of rows.
    pub limit: usize,
    /// Sort column, if any.
    pub sort_by: Option<Column>,
    /// Ascending order when sorting.
    pub ascending: bool,
}

impl TablePage {
    /// The first page of `limit` rows in backend order.
    pub fn first(limit: usize) -> Self {
        Self {
            offset: 0,
            limit,
            sort_by: None,
            ascending: true,
        }
    }

    /// Orders the rows by `column`.
    pub fn sorted_by(mut self, column: Column, ascending: bool) -> Self {
        self.sort_by = Some(column);
        self.ascending = ascending;
        self
    }

    /// The page after this one.
    pub fn next(&self) -> Self {
        Self {
            offset: self.offset + self.limit,
            ..self.clone()
        }
    }

    /// The page before this one, or `None` on the first page.
    pub fn previous(&self) -> Option<Self> {
        if self.offset == 0 {
            return None;
        }
        Some(Self {
            offset: self.offset.saturating_sub(self.limit),
            ..self.clone()
        })
    }

    /// Zero-based page number.
    pub fn index(&self) -> usize {
        if self.limit == 0 {
            0
        } else {
            self.offset / self.limit
        }
    }
}

impl TableRequest {
    /// Request for `page` of `columns` under the current selection state.
    pub fn for_page(columns: Vec<Column>, snapshot: &Snapshot, page: &TablePage) -> Self {
        Self {
            columns,
            filter_predicates: snapshot.composed.clone(),
            sort: (page.sort_by.clone(), page.ascending),
            offset: page.offset,
            limit: page.limit,
            data_ids: snapshot.data_ids.clone(),
        }
    }
}

/// Fetches one page of rows.
///
/// The backend answers with a JSON-encoded string holding an array of row
/// objects.
pub async fn fetch_table(
    backend: &dyn DashboardBackend,
    request: &TableRequest,
) -> DashboardResult<Vec<Row>> {
    let payload = backend.table(request).await?;
    decode_rows(&payload)
}

/// Decodes the table payload into rows.
pub fn decode_rows(payload: &str) -> DashboardResult<Vec<Row>> {
    match serde_json::from_str::<Value>(payload)? {
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::Object(row) => Ok(row),
                other => Err(DashboardError::Protocol(format!(
                    "expected a row object, got {}",
                    other
                ))),
            })
            .collect(),
        other => Err(DashboardError::Protocol(format!(
            "expected an array of rows, got {}",
            other
        ))),
    }
}
