//! Page collection.
//!
//! List endpoints paginate with `page`/`per_page` query parameters and
//! terminate the cursor by returning an empty page. [`collect`] drains such
//! a cursor into a single ordered sequence, tolerating backends that return
//! a bare object where a page array is expected.

use serde_json::Value;

use crate::error::RivetError;
use crate::zammad_client::Connection;

/// Items requested per page.
pub(crate) const PER_PAGE: u32 = 100;

/// Upper bound on pages fetched for one collection.
///
/// A backend that never terminates its cursor would otherwise spin forever;
/// hitting the cap stops collection with whatever was gathered.
const MAX_PAGES: u32 = 10_000;

/// One fetched page of a paginated listing, able to fetch its successor.
pub struct Page<'a> {
    conn: &'a Connection,
    path: String,
    query: Vec<(String, String)>,
    number: u32,
    items: Vec<Value>,
}

impl<'a> Page<'a> {
    /// Fetches the first page of a listing. `None` means the listing is
    /// empty.
    pub(crate) async fn first(
        conn: &'a Connection,
        path: &str,
        query: &[(String, String)],
    ) -> Result<Option<Page<'a>>, RivetError> {
        Self::fetch(conn, path, query, 1).await
    }

    async fn fetch(
        conn: &'a Connection,
        path: &str,
        query: &[(String, String)],
        number: u32,
    ) -> Result<Option<Page<'a>>, RivetError> {
        let mut paged_query = query.to_vec();
        paged_query.push(("page".to_string(), number.to_string()));
        paged_query.push(("per_page".to_string(), PER_PAGE.to_string()));

        let value = conn.get_value(path, &paged_query).await?;
        let items = items_from_value(value);
        if items.is_empty() {
            return Ok(None);
        }

        Ok(Some(Page {
            conn,
            path: path.to_string(),
            query: query.to_vec(),
            number,
            items,
        }))
    }

    /// Fetches the successor page. `None` means the cursor is exhausted.
    async fn next(&self) -> Result<Option<Page<'a>>, RivetError> {
        Self::fetch(self.conn, &self.path, &self.query, self.number + 1).await
    }
}

/// Drains a paginated cursor into one ordered sequence.
///
/// Items are returned in page order, and within a page in their original
/// order. Collection stops at the first empty page, or at [`MAX_PAGES`].
pub async fn collect(first: Option<Page<'_>>) -> Result<Vec<Value>, RivetError> {
    let mut items = Vec::new();
    let Some(mut page) = first else {
        return Ok(items);
    };

    for _ in 0..MAX_PAGES {
        items.append(&mut page.items);
        match page.next().await? {
            Some(next) => page = next,
            None => return Ok(items),
        }
    }

    tracing::warn!(
        pages = MAX_PAGES,
        "pagination cap reached, returning items collected so far"
    );
    Ok(items)
}

/// Shapes one response body into page items.
///
/// Backends are inconsistent here: a page is usually a JSON array, but some
/// endpoints return a single record and an empty page may arrive as `null`.
fn items_from_value(value: Value) -> Vec<Value> {
    match value {
        Value::Null => Vec::new(),
        Value::Array(items) => items,
        other => vec![other],
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_items_from_null() {
        assert_eq!(items_from_value(Value::Null), Vec::<Value>::new());
    }

    #[test]
    fn test_items_from_array_preserves_order() {
        let items = items_from_value(serde_json::json!([{"id": 1}, {"id": 2}, {"id": 3}]));
        assert_eq!(items.len(), 3);
        assert_eq!(items[0]["id"], 1);
        assert_eq!(items[2]["id"], 3);
    }

    #[test]
    fn test_items_from_single_object_is_singleton() {
        let items = items_from_value(serde_json::json!({"id": 1}));
        assert_eq!(items, vec![serde_json::json!({"id": 1})]);
    }

    #[test]
    fn test_items_from_empty_array() {
        assert_eq!(
            items_from_value(serde_json::json!([])),
            Vec::<Value>::new()
        );
    }
}
