//! Shared test doubles and router-level tests.
