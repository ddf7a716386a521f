//! # Ports Layer - Hexagonal Architecture Boundaries
//!
//! This module defines the port interfaces (traits) for the routing core.
//!
//! - **Driving Ports (Inbound):** APIs this crate exposes to the lookup and
//!   maintenance layers
//! - **Driven Ports (Outbound):** SPIs this crate requires from adapters

pub mod inbound;
pub mod outbound;

pub use inbound::RoutingApi;
pub use outbound::{ConfigProvider, TimeSource};
