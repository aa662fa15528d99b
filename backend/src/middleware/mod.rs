//! Request middleware.
//!
//! Purpose: request lifecycle concerns that sit outside individual handlers,
//! namely trace correlation and visit capture.

pub mod trace;
pub mod visit;

pub use trace::Trace;
pub use visit::VisitTracking;
