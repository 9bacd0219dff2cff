//! # typegate-engine — resolution and validation engine
//!
//! The branching heart of typegate:
//!
//! - [`resolver`] — one generic local/remote/fallback resolver shared by
//!   both resource kinds (schema bundles and validation descriptors).
//! - [`descriptors`] / [`bundles`] — the two resource kinds plugged into
//!   the resolver, plus the [`bundles::SchemaService`] serving bundles
//!   and type listings.
//! - [`validate`] — the [`validate::ValidationEngine`]: resolve a
//!   definition, decode the payload leniently, run the constraint
//!   evaluator, humanize the violations.
//! - [`humanize`] — raw violation records to `{friendly, technical}`
//!   pairs.
//!
//! ## Concurrency
//!
//! Every call is independent: the only shared state is the read-only
//! resolution mode and registry configuration fixed at construction.
//! There is no caching of resolved definitions and no retry logic.

pub mod bundles;
pub mod descriptors;
pub mod humanize;
pub mod resolver;
pub mod validate;

pub use bundles::{LocalBundleStore, SchemaService};
pub use humanize::{humanize, humanize_failure, ValidationError};
pub use resolver::{LocalFailure, Resolved, ResolveError, ResourceKind, SourceResolver};
pub use validate::{ValidateError, ValidationEngine, ValidationOutcome};
