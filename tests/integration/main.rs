//! Integration tests for link resolution
//!
//! These tests use wiremock to create mock HTTP servers and drive the
//! resolvers and the dispatcher end-to-end.

mod common;
mod dispatch_tests;
mod sibling_tests;
