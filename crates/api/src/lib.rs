//! HTTP host adapter for the build notification pipeline.
//!
//! Endpoints:
//! - GET  /health            — Liveness probe
//! - GET  /api/notificator   — Notificator id and the user properties it reads
//! - POST /api/notify        — Dispatch one build lifecycle event to its recipients

pub mod routes;
pub mod state;
