#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Cellwise placement overlay.
//!
//! This crate defines the vocabulary that connects the host world, the pure
//! placement systems and the speech output. Hosts expose their map through
//! [`MapView`] and accept [`Command`] values through [`HostMap::apply`],
//! broadcasting [`Event`] values describing what changed. Systems read
//! snapshots, submit commands and report to the player exclusively through an
//! [`Announcer`].

mod announce;
mod grid;
mod host;
mod outcome;
mod settings;
mod things;

pub use announce::*;
pub use grid::*;
pub use host::*;
pub use outcome::*;
pub use settings::*;
pub use things::*;
