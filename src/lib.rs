// Library surface for headless/integration tests and reuse.
// Keep this lean to avoid coupling to bin-only types in main.rs.
pub mod app_dirs;
pub mod config;
pub mod dispatch;
pub mod effect;
pub mod runtime;
pub mod session;
pub mod stats;
pub mod timer;
pub mod util;
