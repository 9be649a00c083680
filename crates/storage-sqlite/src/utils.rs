//! Helpers for building SQLite queries.

/// Upper bound for bind parameters in a single `IN (...)` clause.
///
/// SQLite builds commonly cap statements at 999 variables; 500 leaves room
/// for the other filters of a query.
pub const SQLITE_MAX_PARAMS_CHUNK: usize = 500;

/// Splits ids into slices small enough for one `IN (...)` query each.
pub fn chunk_for_sqlite<T>(items: &[T]) -> impl Iterator<Item = &[T]> {
    items.chunks(SQLITE_MAX_PARAMS_CHUNK)
}
