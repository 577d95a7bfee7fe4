pub mod cors;
pub mod request_trace;
pub mod session_guard;
pub mod structured_logger;
pub mod trace_span;

pub use cors::cors_middleware;
pub use request_trace::RequestTrace;
pub use session_guard::SessionGuard;
pub use structured_logger::StructuredLogger;
pub use trace_span::TraceSpan;
