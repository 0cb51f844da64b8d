// Archive Packager
// Implements: filename sanitisation, per-recipient file names, zip bundling by format.

pub mod naming;
pub mod packager;

pub use naming::file_name;
pub use packager::{package, ArchiveFormat, PackageError, ARCHIVE_MIME};
