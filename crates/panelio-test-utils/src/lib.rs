// SPDX-FileCopyrightText: 2026 Panelio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for the Panelio workspace.
//!
//! Provides a mock transport, in-memory stores with failure injection, and
//! a [`TestHarness`] that drives the full dispatch pipeline in tests.

pub mod harness;
pub mod memory_stores;
pub mod mock_transport;

pub use harness::{admin, member, member_with_roles, TestHarness, TestHarnessBuilder};
pub use memory_stores::MemoryStores;
pub use mock_transport::MockTransport;
