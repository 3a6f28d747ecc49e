/// Inline keyboard: rows of callback buttons.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InlineKeyboard {
    pub rows: Vec<Vec<InlineButton>>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InlineButton {
    pub label: String,
    pub callback_data: String,
}

impl InlineButton {
    pub fn new(label: impl Into<String>, callback_data: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            callback_data: callback_data.into(),
        }
    }
}

impl InlineKeyboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn row(mut self, buttons: Vec<InlineButton>) -> Self {
        if !buttons.is_empty() {
            self.rows.push(buttons);
        }
        self
    }

    pub fn button(self, button: InlineButton) -> Self {
        self.row(vec![button])
    }

    /// Lay `buttons` out `per_row` at a time.
    pub fn grid(mut self, buttons: Vec<InlineButton>, per_row: usize) -> Self {
        let per_row = per_row.max(1);
        let mut row = Vec::with_capacity(per_row);
        for b in buttons {
            row.push(b);
            if row.len() == per_row {
                self.rows.push(std::mem::take(&mut row));
            }
        }
        if !row.is_empty() {
            self.rows.push(row);
        }
        self
    }

    pub fn buttons(&self) -> impl Iterator<Item = &InlineButton> {
        self.rows.iter().flatten()
    }
}

/// A post for a chat or channel: text alone, one photo with caption, or an album.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Post {
    pub text: String,
    pub photos: Vec<String>,
    pub keyboard: Option<InlineKeyboard>,
}

impl Post {
    pub fn new(text: impl Into<String>, photos: &[String], max_photos: usize) -> Self {
        Self {
            text: text.into(),
            photos: photos.iter().take(max_photos).cloned().collect(),
            keyboard: None,
        }
    }

    pub fn with_keyboard(mut self, keyboard: InlineKeyboard) -> Self {
        self.keyboard = Some(keyboard);
        self
    }
}

/// Capabilities / limits of a messenger implementation.
#[derive(Clone, Copy, Debug)]
pub struct MessagingCapabilities {
    pub supports_html: bool,
    pub supports_edit: bool,
    pub max_message_len: usize,
    pub max_caption_len: usize,
    pub max_album_size: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_wraps_rows() {
        let kb = InlineKeyboard::new().grid(
            (0..5)
                .map(|i| InlineButton::new(i.to_string(), format!("b:{i}")))
                .collect(),
            2,
        );
        let sizes: Vec<usize> = kb.rows.iter().map(|r| r.len()).collect();
        assert_eq!(sizes, vec![2, 2, 1]);
        assert_eq!(kb.buttons().count(), 5);
    }

    #[test]
    fn post_caps_photos() {
        let photos: Vec<String> = (0..12).map(|i| format!("f{i}")).collect();
        let post = Post::new("t", &photos, 10);
        assert_eq!(post.photos.len(), 10);
        assert_eq!(post.photos[9], "f9");
    }
}
