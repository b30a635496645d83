//! Unit tests for the entry store backends

mod memory_store_tests;
