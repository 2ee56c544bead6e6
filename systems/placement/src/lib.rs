#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shape-based placement: the state machine that turns two corners into
//! designations, and the keyboard session wrapped around it.
//!
//! A [`PlacementSession`] owns one [`PlacementEngine`], the undo ledger for
//! its target and, after each confirmed two-corner placement, a
//! [`ReviewSession`] for stepping through whatever blocked it. Hosts feed it
//! [`KeyPress`] values and a mutable [`cellwise_core::HostMap`]; everything
//! the player needs to hear goes through the provided announcer.

mod engine;
mod input;
mod review;
mod session;
mod target;

pub use engine::{PlacementEngine, PlacementPhase};
pub use input::{Key, KeyParseError, KeyPress, Modifiers};
pub use review::ReviewSession;
pub use session::PlacementSession;
pub use target::{Acceptance, ApplyError, BatchOutcome, DesignationTarget};
