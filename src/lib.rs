// Library surface for headless/integration tests and reuse.
// Keep this lean to avoid coupling to bin-only concerns in main.rs.
pub mod app_dirs;
pub mod ingest;
pub mod mistakes;
pub mod scoring;
pub mod session;
pub mod store;
