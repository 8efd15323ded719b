// SPDX-FileCopyrightText: 2026 Panelio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Capability registry for the Panelio screen engine.
//!
//! At startup every screen object registers its handlers by explicit
//! declaration under one of the five capability tags; the resulting index is
//! immutable for the life of the process and consulted by the dispatcher on
//! every inbound event.

pub mod capability;
pub mod handler;
pub mod registry;

pub use capability::Capability;
pub use handler::{handler, Handler, Invocation, Payload};
pub use registry::{CapabilityRegistry, RegistryBuilder, Screen, ScreenInfo};
