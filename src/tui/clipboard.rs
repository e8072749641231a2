//! System clipboard access through `arboard`.
//!
//! A fresh handle per copy; headless sessions (no display server) fail here
//! and surface as an error alert.

use anyhow::{Context, Result};
use arboard::Clipboard;

pub fn copy_text(text: &str) -> Result<()> {
    Clipboard::new()
        .context("Presse-papiers indisponible")?
        .set_text(text.to_owned())
        .context("Copie impossible")
}
