//! Where animations go: the browser-storage hand-off between pages, the
//! storage service, and downloaded files.

pub mod handoff;
pub mod local;
pub mod remote;

pub use handoff::{MemoryStore, PendingStore};
pub use remote::SaveRequest;
