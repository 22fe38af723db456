//! Query-Intent Pipeline - turns a merchant question into an answer
//!
//! This crate is the analytical core of shoplens. A question moves through
//! four ordered stages:
//! 1. **Classification** (`classify`) - keyword table match plus parameter
//!    extraction (top-N, time window, stock threshold)
//! 2. **Planning** (`plan`) - one fixed query template per intent, defaults
//!    filled from configuration
//! 3. **Execution** - delegated to a `DataSource` implementation, which never
//!    fails (degraded mode substitutes deterministic mock data)
//! 4. **Aggregation & Explanation** (`aggregate`, `explain`) - fixed
//!    arithmetic per intent, rendered through phrase templates with a
//!    confidence label
//!
//! # Key Types
//!
//! - `Pipeline` - the orchestrator (see `pipeline` module)
//! - `Aggregate` - per-intent computed report
//!
//! # Determinism Principle
//!
//! Every stage is a pure function of its input. Re-running aggregation and
//! explanation over the same result set yields the same answer, and the
//! pipeline holds no shared mutable state across requests.

pub mod aggregate;
pub mod classify;
pub mod explain;
pub mod pipeline;
pub mod plan;

pub use pipeline::Pipeline;
