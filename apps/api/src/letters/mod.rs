// Letters API
// Implements: batch generation over an upload, summary rows, archive and single-file downloads.
// Rendering and packaging are CPU-bound and must run inside tokio::task::spawn_blocking.

pub mod batch;
pub mod handlers;
pub mod sample;
pub mod upload;

pub use batch::{LetterBatch, LetterSummary};
