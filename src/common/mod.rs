//! Common types, traits, and error definitions for hybrid_astar
//!
//! This module provides the foundational building blocks shared by the
//! grid map and the planner components.

pub mod types;
pub mod traits;
pub mod error;

pub use types::*;
pub use traits::*;
pub use error::*;
