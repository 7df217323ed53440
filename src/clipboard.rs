//! System clipboard backing for the host's clipboard bindings.

use std::fmt;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("clipboard backend error: {0}")]
    Backend(#[from] arboard::Error),
}

/// Lazily opened `arboard` handle.
///
/// The handle is kept once opened: on X11 the copied text is served by the
/// process that owns the clipboard, so dropping it after `write` would lose
/// the text.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl fmt::Debug for SystemClipboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SystemClipboard")
            .field("open", &self.inner.is_some())
            .finish()
    }
}

impl SystemClipboard {
    fn handle(&mut self) -> Result<&mut arboard::Clipboard, ClipboardError> {
        let clipboard = match self.inner.take() {
            Some(clipboard) => clipboard,
            None => arboard::Clipboard::new()?,
        };
        Ok(self.inner.insert(clipboard))
    }

    pub fn read(&mut self) -> Result<String, ClipboardError> {
        Ok(self.handle()?.get_text()?)
    }

    pub fn write(&mut self, text: &str) -> Result<(), ClipboardError> {
        Ok(self.handle()?.set_text(text.to_owned())?)
    }
}
