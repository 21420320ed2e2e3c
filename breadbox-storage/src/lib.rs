//! Storage layer for Breadbox.
//!
//! Two collaborators live here, both behind traits so the engine never
//! depends on a concrete backend:
//!
//! - [`Disk`]: named file storage for uploads ([`LocalDisk`] on the file
//!   system, [`MemoryDisk`] for tests and previews), looked up by name through
//!   a [`DiskManager`].
//! - [`RecordStore`]: record persistence, many-to-many pivot sync, and
//!   translation rows. [`SqliteRecordStore`] keeps records as JSON attribute
//!   blobs in SQLite.
//!
//! Neither opens a transaction spanning several calls; callers that need the
//! record save, translation save and pivot syncs to be atomic provide that
//! boundary themselves.

mod disk;
mod error;
mod record_store;
mod sqlite;

pub use disk::{Disk, DiskManager, LocalDisk, MemoryDisk};
pub use error::{StorageError, StorageResult};
pub use record_store::RecordStore;
pub use sqlite::SqliteRecordStore;
