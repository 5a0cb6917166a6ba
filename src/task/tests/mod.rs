//! Unit tests for tasks and the board cache.

mod board_tests;
