//! Shared query parameter types for API handlers.

/// Raw, ordered query pairs as sent by the client.
///
/// List handlers extract the full pair list rather than a typed struct
/// because filter keys are open-ended (`average_cost[gte]=5000`-style);
/// parsing lives in `campdex_core::query` and execution in
/// `campdex_db::paged`.
pub type RawQueryPairs = Vec<(String, String)>;
