pub mod idempotency;
pub mod security_headers;
