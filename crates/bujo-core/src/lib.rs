// Pure functions over journal text and paths
// No database access; file I/O is limited to the content hasher

pub mod context;
pub mod hash;
pub mod parser;
pub mod refs;

pub use context::resolve_context;
pub use hash::{hash_bytes, hash_file};
pub use parser::{parse_line, parse_lines};
pub use refs::{REF_WIDTH, entry_ref};
