//! Domain Layer - Pure business logic with no I/O
//!
//! This module contains the Kademlia routing core:
//! - Bit strings, identifiers and XOR distance
//! - Least-recently-seen sets and k-buckets with replacement caches
//! - The route tree and closest-node selection
//! - Change sets describing every mutation

pub mod bit_string;
pub mod change_set;
pub mod entities;
pub mod errors;
pub mod kbucket;
pub mod lrs_set;
pub mod near_set;
pub mod route_tree;
pub mod services;
pub mod value_objects;

pub use bit_string::*;
pub use change_set::*;
pub use entities::*;
pub use errors::*;
pub use kbucket::*;
pub use lrs_set::*;
pub use near_set::*;
pub use route_tree::*;
pub use services::*;
pub use value_objects::*;
