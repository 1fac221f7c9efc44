//! End-to-end tests that drive the router against in-memory stores.

mod auth_test;
mod custody_test;
mod helpers;
