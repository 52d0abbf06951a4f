//! Layout annotation state and its persistence.

mod backend;
mod notice;
mod store;

pub use backend::{BackendError, JsonDirBackend, LayoutBackend, MemoryBackend};
pub use notice::{Notice, NoticeLevel};
pub use store::{AnnotationStore, StoreError};
