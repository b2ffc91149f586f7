//! CLI command handlers. Each command is in its own file.

mod apply;
mod checksum;
mod completions;
mod delete;
mod plan;
mod sha1;
mod upload;

pub use apply::run_apply;
pub use checksum::run_checksum;
pub use completions::run_completions;
pub use delete::{run_delete, run_destroy};
pub use plan::run_plan;
pub use sha1::run_sha1;
pub use upload::run_upload;
