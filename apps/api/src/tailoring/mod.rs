// Job-description tailoring: the remote suggestion service, its permissive payload,
// and the merge that folds accepted suggestions into the Document.

pub mod client;
pub mod handlers;
pub mod merge;
pub mod payload;
