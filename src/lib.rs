//! diffsync - vertical alignment and scroll lock for two-pane diff editors
//!
//! Given a line diff and each view's layout (wraps, foreign view zones), the
//! engine computes alignments between the two sides, turns them into padding
//! and deleted-code view zones, and keeps both scroll positions locked.
//!
//! The pure core (`alignment`, `layout`, `view_zone`, `scroll`) never touches
//! a real editor; `engine` drives it through the [`engine::DiffEditorHost`]
//! trait and `scenario` provides an in-memory host.

pub mod alignment;
pub mod config;
pub mod engine;
pub mod layout;
pub mod logging;
pub mod model;
pub mod scenario;
pub mod scroll;
pub mod view_zone;
