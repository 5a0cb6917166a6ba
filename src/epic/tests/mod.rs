//! Unit tests for epics and the association guard.

mod service_tests;
