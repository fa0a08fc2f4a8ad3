// Queue Board Port - presentation layer sink
use crate::domain::QueueAdapter;

/// Receives the full adapter list of a discovery pass.
///
/// The list replaces whatever was shown before in one call; there is no
/// incremental add/remove.
pub trait QueueBoard: Send + Sync {
    fn replace_queues(&self, queues: Vec<QueueAdapter>);
}
