//! Per-element text capture mirroring the XML nesting.

#[derive(Debug)]
struct Frame {
    text: String,
    keep: bool,
}

/// A stack of text buffers, one per open element.
///
/// Text and CDATA both land in the innermost frame, so a child's capture never
/// picks up its parent's or siblings' character data. Frames opened with
/// [`TextStack::push_ignored`] still count toward depth but drop what is
/// appended to them; that keeps whitespace between pages from piling up in
/// the root element's frame for the whole document.
#[derive(Debug, Default)]
pub struct TextStack {
    frames: Vec<Frame>,
}

impl TextStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a capturing frame for the element just entered.
    pub fn push(&mut self) {
        self.frames.push(Frame {
            text: String::new(),
            keep: true,
        });
    }

    /// Opens a frame whose text is discarded.
    pub fn push_ignored(&mut self) {
        self.frames.push(Frame {
            text: String::new(),
            keep: false,
        });
    }

    /// Appends character data to the innermost frame. Data outside any element is dropped.
    pub fn append(&mut self, data: &str) {
        if let Some(frame) = self.frames.last_mut() {
            if frame.keep {
                frame.text.push_str(data);
            }
        }
    }

    /// Closes the innermost frame and returns its text.
    pub fn pop(&mut self) -> Option<String> {
        self.frames.pop().map(|frame| frame.text)
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }
}
