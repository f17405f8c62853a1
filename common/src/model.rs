//! # Server Domain Model
//!
//! Canonical representation of one remote Aeza server as it flows through
//! a sync run: constructed once from a raw API record, never mutated,
//! discarded at the end of the run.

pub mod location;
pub mod os;
pub mod server;

pub use location::Location;
pub use os::OperatingSystem;
pub use server::{IpAddress, Server};
