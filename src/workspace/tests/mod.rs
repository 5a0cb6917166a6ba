//! Unit tests for workspace configuration.
