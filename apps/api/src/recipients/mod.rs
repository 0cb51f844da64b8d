// Recipient Loader
// Implements: CSV parsing, required-column validation, preview rows.
// Rows are not validated individually; only the header schema is enforced.

pub mod loader;
pub mod models;

pub use loader::{load_recipients, LoadError, REQUIRED_COLUMNS};
pub use models::{preview_rows, Recipient, RecipientPreview};
