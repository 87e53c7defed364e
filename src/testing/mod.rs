//! Testing utilities for KOLoKOI
//!
//! Shared fixtures and a recording stand-in for the TikTok API, used by the
//! unit tests and by the integration tests under `tests/` (which enable the
//! `testing` feature).
//!
//! - [`fixtures`] - Pre-built settings and provider payloads
//! - [`mock`] - In-memory [`TikTokApi`](crate::oauth::TikTokApi) implementation

pub mod fixtures;
pub mod mock;

pub use fixtures::TestFixtures;
pub use mock::MockTikTokApi;

/// Common test constants
pub mod constants {
    pub const TEST_CLIENT_KEY: &str = "sbawtestclientkey";
    pub const TEST_CLIENT_SECRET: &str = "test-client-secret";
    pub const TEST_CODE: &str = "ABC123";
    pub const TEST_ACCESS_TOKEN: &str = "T1";
    pub const TEST_OPEN_ID: &str = "U1";
    pub const TEST_EXPIRES_IN: u64 = 86_400;
}
