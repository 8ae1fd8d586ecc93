//! HTTP middleware stack for the site.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request span with status and latency)
//! 3. Request ID (recorded in the span and Sentry scope)
//! 4. Security headers (CSP, frame denial, isolation)
//! 5. Rate limiting on the intake routes only (governor)

pub mod rate_limit;
pub mod request_id;
pub mod security_headers;

pub use rate_limit::intake_rate_limiter;
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
