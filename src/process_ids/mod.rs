//! Process-id registry
//!
//! Named AO process ids from configuration, grouped for display.

mod registry;

pub use registry::{display_name, ProcessIdEntry, ProcessIdGroup, ProcessIdNode, ProcessRegistry};
