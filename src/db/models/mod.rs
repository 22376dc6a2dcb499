pub mod process;
pub mod record;

pub use process::ProcessCatalog;
pub use record::{NewRecord, Record, DEFAULT_PROCESS_NAME};
