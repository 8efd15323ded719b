// SPDX-FileCopyrightText: 2026 Panelio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Builder assembling a screen into a [`NewDocument`] write.
//!
//! Every screen edit goes through here so the footer is always stamped and
//! the control rack is always validated before the transport sees the write.

use panelio_core::error::PanelioError;
use panelio_core::types::{Control, Document, NewDocument};

use crate::controls::validate_layout;
use crate::footer::encode_footer;

/// Builder for a screen write (send or edit).
#[derive(Debug, Clone)]
pub struct ScreenBuilder {
    title: String,
    body: String,
    color: u32,
    content: String,
    controls: Vec<Control>,
    footer: FooterSource,
}

#[derive(Debug, Clone)]
enum FooterSource {
    /// Re-encode from type/version/label.
    Encode {
        screen_type: String,
        version: String,
        label: Option<String>,
    },
    /// Carry an existing footer string through verbatim.
    Verbatim(Option<String>),
}

impl ScreenBuilder {
    /// Start a fresh screen of the given type.
    pub fn new(screen_type: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            title: String::new(),
            body: String::new(),
            color: 0,
            content: String::new(),
            controls: Vec::new(),
            footer: FooterSource::Encode {
                screen_type: screen_type.into(),
                version: version.into(),
                label: None,
            },
        }
    }

    /// Start from an existing document, carrying its text, color, and footer.
    ///
    /// The footer string is preserved byte-for-byte (including the original
    /// author label) unless [`retype`](Self::retype) replaces it.
    pub fn from_document(doc: &Document) -> Self {
        Self {
            title: doc.title.clone(),
            body: doc.body.clone(),
            color: doc.color,
            content: doc.content.clone(),
            controls: Vec::new(),
            footer: FooterSource::Verbatim(doc.footer.clone()),
        }
    }

    /// Stamp a (possibly new) screen type, replacing any carried footer.
    pub fn retype(mut self, screen_type: impl Into<String>, version: impl Into<String>) -> Self {
        self.footer = FooterSource::Encode {
            screen_type: screen_type.into(),
            version: version.into(),
            label: None,
        };
        self
    }

    /// Attach the owning user's display label to the footer.
    pub fn author_label(mut self, label: impl Into<String>) -> Self {
        if let FooterSource::Encode { label: slot, .. } = &mut self.footer {
            *slot = Some(label.into());
        }
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    pub fn color(mut self, color: u32) -> Self {
        self.color = color;
        self
    }

    /// Plain content outside the embed (state sentinels like `` `Ended` ``).
    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn control(mut self, control: Control) -> Self {
        self.controls.push(control);
        self
    }

    pub fn controls(mut self, controls: impl IntoIterator<Item = Control>) -> Self {
        self.controls.extend(controls);
        self
    }

    /// Validate the control rack and produce the write.
    pub fn build(self) -> Result<NewDocument, PanelioError> {
        validate_layout(&self.controls)?;
        let footer = match self.footer {
            FooterSource::Encode {
                screen_type,
                version,
                label,
            } => {
                if screen_type.is_empty() {
                    return Err(PanelioError::Codec("empty screen type".into()));
                }
                Some(encode_footer(&screen_type, &version, label.as_deref()))
            }
            FooterSource::Verbatim(footer) => footer,
        };
        Ok(NewDocument {
            title: self.title,
            body: self.body,
            color: self.color,
            content: self.content,
            controls: self.controls,
            footer,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controls::{delete_button, help_button};
    use crate::footer::decode_footer;
    use panelio_core::types::{Button, ChannelId, DocumentId, GuildId};

    fn sample_document(footer: Option<String>) -> Document {
        Document {
            id: DocumentId("doc-1".into()),
            channel_id: ChannelId("chan-1".into()),
            guild_id: GuildId("guild-1".into()),
            title: "A title".into(),
            body: "A body".into(),
            color: 0x0099e1,
            content: String::new(),
            controls: vec![],
            footer,
            pinned: false,
            from_self: true,
        }
    }

    #[test]
    fn build_stamps_a_decodable_footer() {
        let doc = ScreenBuilder::new("Poll", "1.0.0")
            .title("New poll")
            .control(delete_button())
            .build()
            .unwrap();
        assert_eq!(decode_footer(doc.footer.as_deref().unwrap()).as_deref(), Some("Poll"));
    }

    #[test]
    fn from_document_preserves_footer_verbatim() {
        let footer = crate::footer::encode_footer("Games", "0.9.0", Some("someone"));
        let doc = sample_document(Some(footer.clone()));
        let built = ScreenBuilder::from_document(&doc)
            .control(help_button())
            .build()
            .unwrap();
        assert_eq!(built.footer.as_deref(), Some(footer.as_str()));
        assert_eq!(built.title, "A title");
        assert_eq!(built.color, 0x0099e1);
    }

    #[test]
    fn retype_replaces_a_carried_footer() {
        let footer = crate::footer::encode_footer("Hangman", "1.0.0", None);
        let doc = sample_document(Some(footer));
        let built = ScreenBuilder::from_document(&doc)
            .retype("Hangman_word", "1.0.0")
            .build()
            .unwrap();
        assert_eq!(
            decode_footer(built.footer.as_deref().unwrap()).as_deref(),
            Some("Hangman_word")
        );
    }

    #[test]
    fn build_rejects_an_overflowing_rack() {
        let mut builder = ScreenBuilder::new("Poll", "1.0.0");
        for i in 0..26 {
            builder = builder.control(Control::Button(Button::new(format!("r{i}"))));
        }
        assert!(matches!(
            builder.build(),
            Err(PanelioError::LayoutOverflow { .. })
        ));
    }

    #[test]
    fn build_rejects_an_empty_screen_type() {
        assert!(ScreenBuilder::new("", "1.0.0").build().is_err());
    }
}
