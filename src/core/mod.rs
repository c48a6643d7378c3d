//! Core input types, configuration tables, and the context builder.
//!
//! This module provides everything a caller needs to describe a transaction
//! and the rule tables it is judged against.

mod builder;
mod config;
mod error;
#[cfg(feature = "json")]
mod input;
pub mod jurisdictions;
mod types;

pub use builder::*;
pub use config::*;
pub use error::*;
#[cfg(feature = "json")]
pub use input::*;
pub use types::*;
