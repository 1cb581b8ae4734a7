//! distcalc
//!
//! A small distributed calculator: an orchestrator hands arithmetic tasks to
//! a pool of agent workers over HTTP/JSON and reconciles the reported results
//! against the expressions it knows about.
//!
//! - **orchestrator side**: `registry` (expression lifecycle), `queue`
//!   (bounded task buffer), `producer` (background task emission), `api`
//!   (HTTP handlers).
//! - **agent side**: `agent` (poll/compute/report loop).
//! - **shared**: `protocol` (wire types + arithmetic dispatch), `config`,
//!   `error`.

pub mod agent;
pub mod api;
pub mod config;
pub mod error;
pub mod producer;
pub mod protocol;
pub mod queue;
pub mod registry;
