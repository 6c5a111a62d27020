//! # Gatehouse Middleware
//!
//! The edge request pipeline: a fixed-order chain of handlers that
//! classifies, redirects, localizes, tenant-rewrites, and authorizes
//! every inbound request for a multi-tenant web platform.
//!
//! ## Chain order
//!
//! ```text
//! request ──► maintenance ──► canonical host ──► locale ──► telemetry
//!                 ──► locale fallback* ──► tenant resolution* ──► authorization gate
//! ```
//!
//! Stages marked `*` are gated by the orchestrator: locale fallback runs
//! only on first visits (no preference cookie), tenant resolution only
//! on protected paths. Any stage may end the chain by returning
//! [`Outcome::Terminal`](gatehouse_core::Outcome); otherwise its
//! accumulator flows into the next stage.
//!
//! ## Entry points
//!
//! - [`Handler`] - the stage trait
//! - [`Pipeline`] - the orchestrator; [`Pipeline::process`] runs the chain
//! - [`stages`] - the seven built-in stages

#![doc(html_root_url = "https://docs.rs/gatehouse-middleware/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod handler;
mod pipeline;
pub mod stages;

pub use handler::Handler;
pub use pipeline::{Directories, Pipeline};
