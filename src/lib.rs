//! quickdef library
//!
//! The lookup pipeline shared by every popup surface: validation,
//! normalization, a time-bounded cache, the lookup service with its request
//! channel, and the presentation state machine.

pub mod cache;
pub mod channel;
pub mod cli;
pub mod config;
pub mod data;
pub mod lookup;
pub mod surface;

pub use channel::{spawn_lookup_worker, LookupHandle, LookupRequest, LookupResponse};
pub use data::{Definition, Meaning, Sense};
pub use lookup::{LookupError, LookupService};
