//! Mock implementations for testing.
//!
//! Enabled for unit tests and behind the `mocks` feature for integration tests.

mod generator;
mod transport;

pub use generator::ScriptedGenerator;
pub use transport::{MockResponse, MockTransport, RecordedRequest};
