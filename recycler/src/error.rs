/// Recoverable acquisition failures.
///
/// None of these abort a visibility pass: the pass logs them, counts the row as skipped and
/// moves on. They are surfaced as values only from direct calls such as
/// [`crate::Recycler::acquire_at`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RecycleError {
    /// No data entry exists at the requested dataset position.
    #[error("no data entry at position {position}")]
    MissingEntry { position: usize },
    /// The entry's template has no registered bucket.
    #[error("no template registered for data entry")]
    UnknownTemplate,
}
