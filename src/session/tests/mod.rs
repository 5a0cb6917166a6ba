//! Unit tests for board sessions.
