//! # bcregen - Embedded Bytecode Regeneration
//!
//! Regenerates the bytecode headers that the runtime embeds for its
//! JavaScript-implemented library methods, and verifies in CI that the
//! checked-in headers match what the current sources produce.
//!
//! ## Usage
//!
//! ```bash
//! # Build both variants and regenerate all four headers
//! regen-bytecode
//!
//! # CI gate: fail if any header is stale
//! regen-bytecode --skip-build --verify
//!
//! # Pre-built 32-bit no-jit binary
//! regen-bytecode --noJit --binary=/path/to/ch --x86
//! ```
//!
//! ## Module Organization
//!
//! - [`config`] - Validated run settings and the optional `regen.toml` layout
//! - [`orchestrator`] - Builds the runtime per variant
//! - [`resolver`] - Locates the host binary per variant
//! - [`header`] - Assembles a header from scripts and host binary output
//! - [`drift`] - Detects and localizes changes against the previous header
//! - [`report`] - Verify-mode verdict
//! - [`stamp`] - Build-identity GUID stamping
//! - [`pipeline`] - Ties the stages together

/// Run configuration and repository layout.
pub mod config;

/// Drift detection between regenerated and previous headers.
pub mod drift;

/// Error types.
pub mod error;

/// External command execution.
pub mod exec;

/// Bytecode header assembly.
pub mod header;

/// Runtime builds per variant.
pub mod orchestrator;

/// End-to-end regeneration run.
pub mod pipeline;

/// Verify-mode reporting.
pub mod report;

/// Host binary resolution.
pub mod resolver;

/// Build-identity stamp.
pub mod stamp;
