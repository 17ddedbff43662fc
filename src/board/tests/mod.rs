//! Board module tests.
//!
//! - `perft.rs` - move generation node counts
//! - `make_unmake.rs` - make/unmake correctness
//! - `proptest.rs` - property-based round trips
