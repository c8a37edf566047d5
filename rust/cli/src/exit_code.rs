//! Process exit codes returned by [`crate::run`].

pub const SUCCESS: i32 = 0;

/// Any failure: bad arguments, invalid configuration, I/O, engine errors.
pub const ERROR: i32 = 2;

/// A long-running command stopped before finishing its batch.
pub const INTERRUPTED: i32 = 130;
