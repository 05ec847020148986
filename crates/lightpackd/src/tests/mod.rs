//! Test suites for the Lightpack daemon.

mod support;
