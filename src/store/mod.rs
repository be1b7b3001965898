/*!
 * SQLite chapter store.
 *
 * Holds every seeded text with its chapters: the source paragraphs, a
 * digest of them, and the translation paragraphs once imported. Alignment
 * verification and repair read from and write to this store.
 */

pub mod connection;
pub mod models;
pub mod repository;
pub mod schema;

pub use connection::StoreConnection;
pub use models::{ChapterRecord, TextRecord, UpsertOutcome};
pub use repository::ChapterStore;
