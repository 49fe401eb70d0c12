//! Bluetooth side of the pipeline: reachability probe and pairing.

pub mod pairing;
pub mod probe;

pub use pairing::{pair_and_connect, verify_connection};
pub use probe::check_reachability;
