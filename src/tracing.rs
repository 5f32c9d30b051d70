//! # Observability & Tracing
//!
//! Every resolver fetch, registry lookup and executed query is traced with the
//! `tracing` crate using structured fields (`record`, `target`,
//! `foreign_key`, ...). The crate never installs a subscriber on its own;
//! embedders call [`setup_tracing`] or install their own.
//!
//! ## Usage Examples
//!
//! ```bash
//! # Failed associations and has_one violations only
//! RUST_LOG=warn cargo test
//!
//! # Every fetch with its foreign key and predicates
//! RUST_LOG=active_record=debug cargo test
//! ```
//!
//! **With `RUST_LOG=debug`**, resolving a `belongs_to` looks like:
//!
//! ```text
//! DEBUG association{name="target" record=owner}: belongs_to owner="owner"
//!       target=target foreign_key=target_id target_id=5
//! DEBUG association{name="target" record=owner}: Executing record=target
//!       predicates=[Predicate { column: "id", value: Int(5) }] limit=Some(1)
//! DEBUG association{name="target" record=owner}: Executed record=target matched=1
//! ```

/// Installs a compact `tracing-subscriber` filtered by `RUST_LOG`.
///
/// Safe to call more than once: later calls leave the first subscriber in place.
pub fn setup_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .try_init();
}
