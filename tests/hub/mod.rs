//! Room fan-out scenarios over in-memory connections

mod eviction_tests;
mod fanout_tests;
