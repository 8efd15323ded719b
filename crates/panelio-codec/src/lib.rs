// SPDX-FileCopyrightText: 2026 Panelio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! State codec and screen builders for the Panelio screen engine.
//!
//! This crate is pure and synchronous: it encodes/decodes the footer string
//! carrying a document's screen identity, validates control-rack layout, and
//! assembles screen writes. No I/O happens here.

pub mod colors;
pub mod controls;
pub mod footer;
pub mod screen;
pub mod timefmt;

pub use controls::{
    back_button, delete_button, help_button, home_button, validate_layout, BACK_LABEL,
    DELETE_LABEL, HELP_LABEL, HOME_LABEL,
};
pub use footer::{decode_footer, document_screen_type, encode_footer};
pub use screen::ScreenBuilder;
