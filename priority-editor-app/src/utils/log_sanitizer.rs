//! Response body summaries
//!
//! Backends answer errors with anything from a short JSON object to a full HTML page.
//! Bodies are flattened to one line and capped before they reach logs or `ServiceError`
//! messages.

/// Maximum number of bytes kept from a body.
const SUMMARY_LIMIT: usize = 256;

/// Single-line, length-capped rendering of a response body.
///
/// The cut lands on a char boundary; the suffix reports the size of the original body.
pub(crate) fn summarize_body(body: &str) -> String {
    let flat: String = body
        .chars()
        .map(|c| if matches!(c, '\r' | '\n') { ' ' } else { c })
        .collect();
    if flat.len() <= SUMMARY_LIMIT {
        return flat;
    }
    let cut = (0..=SUMMARY_LIMIT)
        .rev()
        .find(|&i| flat.is_char_boundary(i))
        .unwrap_or(0);
    format!("{}... [truncated, total {} bytes]", &flat[..cut], body.len())
}
