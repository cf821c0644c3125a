use crate::models::CertificateRow;
use serde_json::Value;
use tracing::warn;

/// One page of search results.
#[derive(Debug, Default)]
pub struct ResultPage {
    /// Rows that were JSON objects, in response order
    pub rows: Vec<CertificateRow>,
    /// Length of the `rows` array as sent, including skipped elements.
    /// Pagination decisions are made on this count.
    pub received: usize,
    /// Elements of `rows` that were not objects
    pub skipped: usize,
}

/// Extracts the `rows` array from a search response body.
///
/// A body that is not JSON, or has no `rows` array, is treated as an empty
/// page. Array elements that are not objects are skipped.
pub fn parse_rows(body: &str) -> ResultPage {
    let data: Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(e) => {
            warn!(error = %e, "Response body is not valid JSON, treating as empty page");
            return ResultPage::default();
        }
    };

    let rows = match data.get("rows") {
        Some(Value::Array(rows)) => rows,
        _ => return ResultPage::default(),
    };

    let mut parsed = Vec::with_capacity(rows.len());
    for (index, row) in rows.iter().enumerate() {
        match row {
            Value::Object(map) => parsed.push(map.clone()),
            other => warn!(index, value = %other, "Skipping non-object row"),
        }
    }
    ResultPage {
        skipped: rows.len() - parsed.len(),
        rows: parsed,
        received: rows.len(),
    }
}
