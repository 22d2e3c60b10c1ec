//! Generic structures, somewhat independent of other structures used.

pub mod counter;
pub mod index_heap;
pub mod luby;
pub mod minimal_pcg;
