//! `shipmatch-recon`: order-to-manifest reconciliation.
//!
//! Pure engine crate: receives decoded rows, returns one record per order.
//! No filesystem access; the processing date is supplied by the caller.

pub mod batch;
pub mod config;
pub mod engine;
pub mod error;
pub mod matcher;
pub mod model;
pub mod normalize;
pub mod source;
pub mod summary;

pub use batch::BatchOrchestrator;
pub use config::{OutputFormat, ReconConfig};
pub use engine::{reconcile, CarrierSources};
pub use error::ReconError;
pub use matcher::{fuzzy_match, MatchRules};
pub use model::{BatchMeta, BatchResult, BatchSummary, OrderRecord, OutputRecord, ReconciliationResult};
pub use normalize::normalize;
pub use source::CarrierSource;
