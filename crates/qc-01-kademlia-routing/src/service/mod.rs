//! # Routing Service
//!
//! High-level service implementing the `RoutingApi` port.
//!
//! This service wraps the domain `RouteTree` and stamps every observation
//! with the injected `TimeSource`, so callers only report *that* a node was
//! seen, not *when*.

// Semantic submodules
mod api;
mod core;

// Re-export public API
pub use core::RoutingService;
