//! API middleware stack.
//!
//! Execution order (outermost → innermost):
//! 1. CORS: single allowed origin, preflight answered here
//! 2. Access logger: method, path, status, latency

pub mod access_log;
pub mod cors;
