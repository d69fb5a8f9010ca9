//! Property-based tests for window and paging invariants

mod window_invariants;
