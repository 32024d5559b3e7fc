//! Output capture frames.
//!
//! Every render call owns one [`OutputStack`]. A frame is pushed for the
//! render body itself, for every `capture()` and for every open section.
//! Frames are strictly nested; closing a frame returns what was written into
//! it. [`OutputStack::unwind_to`] drops everything above a recorded depth and
//! is the single recovery path used when a body fails.

/// Stack of string buffers, innermost last.
#[derive(Debug, Default)]
pub struct OutputStack {
    frames: Vec<String>,
}

impl OutputStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of open frames.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Open a frame and return the depth to unwind to.
    pub fn open(&mut self) -> usize {
        let depth = self.frames.len();
        self.frames.push(String::new());
        depth
    }

    /// Close the innermost frame and return its content.
    ///
    /// Returns `None` when no frame is open.
    pub fn close(&mut self) -> Option<String> {
        self.frames.pop()
    }

    /// Discard every frame opened above `depth`.
    pub fn unwind_to(&mut self, depth: usize) {
        self.frames.truncate(depth);
    }

    /// Append to the innermost frame.
    ///
    /// Writes with no open frame are dropped; render bodies always run inside
    /// one.
    pub fn write(&mut self, s: &str) {
        if let Some(frame) = self.frames.last_mut() {
            frame.push_str(s);
        }
    }

    /// Content of the innermost frame so far.
    pub fn current(&self) -> &str {
        self.frames.last().map(String::as_str).unwrap_or("")
    }
}
