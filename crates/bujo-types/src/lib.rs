pub mod context;
pub mod entry;
pub mod error;
pub mod refs;
pub mod signifier;

pub use context::{FileContext, FileKind};
pub use entry::{Entry, EntryType, Signifier, TaskStatus};
pub use error::{Error, Result};
pub use refs::EntryRef;
pub use signifier::SignifierMap;
