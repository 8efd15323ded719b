// SPDX-FileCopyrightText: 2026 Panelio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Footer state codec.
//!
//! The footer string is the only persisted channel for a document's screen
//! identity: independent processes touching the same message recover the
//! screen type exclusively by decoding it. The format must therefore stay
//! byte-stable across releases — documents stamped by older builds are still
//! live in user channels.
//!
//! Grammar:
//!
//! ```text
//! footer    = "@" screen-type spacer right-text
//! spacer    = 2*EMQUAD                      ; U+2000, pads to a 60-quad line
//! right-text = author-label / "v" version   ; "vdev" when version is empty
//! ```
//!
//! The spacer width packs both halves so the rendered fixed-width footer
//! visually aligns regardless of label length. Narrow glyphs are compensated
//! with extra quads; this affects width accounting only, never semantics.

/// EM QUAD, the fixed-width spacer character used in footers.
pub const SPACER: char = '\u{2000}';

/// Target rendered footer width, in quads.
const FOOTER_WIDTH: usize = 60;

/// Screen-type tags longer than this get the minimum spacer.
const MAX_PACKED_TAG: usize = 58;

/// Glyphs rendered at roughly half a quad; each pair earns one extra quad.
const NARROW_GLYPHS: [char; 7] = ['i', 'j', 't', 'l', 'f', 'I', ' '];

/// Encode a screen type, schema version, and optional display label into a
/// footer string.
///
/// The label (the owning user's display name) wins over the version text
/// when present.
pub fn encode_footer(screen_type: &str, version: &str, label: Option<&str>) -> String {
    let left = format!("@{screen_type}");
    let right = match label {
        Some(label) if !label.is_empty() => label.to_string(),
        _ => {
            let version = if version.is_empty() { "dev" } else { version };
            format!("v{version}")
        }
    };

    let left_len = left.chars().count();
    let right_len = right.chars().count();
    // Minimum of two quads so the decode delimiter always survives, even for
    // tags wider than the packed footer.
    let mut quads = if left_len <= MAX_PACKED_TAG {
        FOOTER_WIDTH.saturating_sub(left_len + right_len).max(2)
    } else {
        2
    };
    quads += narrow_glyph_bonus(&left, &right);

    let mut footer = String::with_capacity(left.len() + right.len() + quads * 3);
    footer.push_str(&left);
    for _ in 0..quads {
        footer.push(SPACER);
    }
    footer.push_str(&right);
    footer
}

/// Extra quads compensating for narrow glyphs in the packed text.
fn narrow_glyph_bonus(left: &str, right: &str) -> usize {
    let count = left
        .chars()
        .chain(right.chars())
        .filter(|c| NARROW_GLYPHS.contains(c))
        .count();
    count / 2
}

/// Decode the screen type out of a footer string.
///
/// Absent or malformed footers decode to `None`; this is never an error —
/// unknown state must stay inert.
pub fn decode_footer(footer: &str) -> Option<String> {
    let rest = footer.strip_prefix('@')?;
    let delimiter: String = [SPACER, SPACER].iter().collect();
    let tag = rest.split(&delimiter).next()?.trim_matches(SPACER).trim();
    if tag.is_empty() {
        return None;
    }
    Some(tag.to_string())
}

/// Decode the screen type of a document, if it carries one.
pub fn document_screen_type(doc: &panelio_core::Document) -> Option<String> {
    doc.footer.as_deref().and_then(decode_footer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn round_trip_short_tag() {
        let footer = encode_footer("Poll", "1.4.2", None);
        assert_eq!(decode_footer(&footer).as_deref(), Some("Poll"));
    }

    #[test]
    fn round_trip_with_label() {
        let footer = encode_footer("ConnectFour", "1.4.2", Some("jitterbug"));
        assert_eq!(decode_footer(&footer).as_deref(), Some("ConnectFour"));
    }

    #[test]
    fn version_text_used_without_label() {
        let footer = encode_footer("MainMenu", "2.0.0", None);
        assert!(footer.ends_with("v2.0.0"));
    }

    #[test]
    fn empty_version_renders_dev() {
        let footer = encode_footer("MainMenu", "", None);
        assert!(footer.ends_with("vdev"));
    }

    #[test]
    fn empty_label_falls_back_to_version() {
        let footer = encode_footer("MainMenu", "1.0.0", Some(""));
        assert!(footer.ends_with("v1.0.0"));
    }

    #[test]
    fn narrow_glyphs_widen_the_spacer() {
        let plain = encode_footer("Poll", "1.0.0", Some("BARNABY"));
        let narrow = encode_footer("Poll", "1.0.0", Some("jittttt"));
        let quads = |s: &str| s.chars().filter(|c| *c == SPACER).count();
        assert!(quads(&narrow) > quads(&plain));
    }

    #[test]
    fn round_trip_near_alignment_threshold() {
        // Tags of width 56..=62 straddle the packed-footer boundary.
        for len in 56..=62 {
            let tag = "T".repeat(len);
            let footer = encode_footer(&tag, "1.0.0", Some("somebody"));
            assert_eq!(decode_footer(&footer).as_deref(), Some(tag.as_str()), "len {len}");
        }
    }

    #[test]
    fn missing_at_sign_decodes_to_none() {
        assert_eq!(decode_footer("Poll\u{2000}\u{2000}v1"), None);
        assert_eq!(decode_footer(""), None);
        assert_eq!(decode_footer("plain footer text"), None);
    }

    #[test]
    fn bare_at_sign_decodes_to_none() {
        assert_eq!(decode_footer("@"), None);
        assert_eq!(decode_footer("@\u{2000}\u{2000}v1"), None);
    }

    proptest! {
        #[test]
        fn round_trip_any_tag_and_label(
            tag in "[A-Za-z][A-Za-z0-9_]{0,70}",
            label in "[A-Za-z0-9 ]{0,40}",
        ) {
            let label = if label.is_empty() { None } else { Some(label.as_str()) };
            let footer = encode_footer(&tag, "1.4.2", label);
            prop_assert_eq!(decode_footer(&footer), Some(tag));
        }
    }
}
