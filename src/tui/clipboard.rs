//! Copy/paste register with OSC52 export to the host terminal's clipboard.
//!
//! Paste always reads the internal register: OSC52 is write-only in practice.

use std::io::{self, Write};

/// Conservative; several terminals truncate or drop larger payloads.
pub const OSC52_MAX_BYTES: usize = 100 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Osc52Error {
    TooLarge { bytes: usize },
    Io(String),
}

impl std::fmt::Display for Osc52Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Osc52Error::TooLarge { bytes } => write!(
                f,
                "selection too large for the terminal clipboard ({} KB, limit {} KB)",
                bytes / 1024,
                OSC52_MAX_BYTES / 1024
            ),
            Osc52Error::Io(msg) => write!(f, "clipboard write failed: {msg}"),
        }
    }
}

impl std::error::Error for Osc52Error {}

/// Terminal multiplexer the sequence must be wrapped for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Multiplexer {
    #[default]
    None,
    Tmux,
}

impl Multiplexer {
    pub fn detect() -> Self {
        if std::env::var_os("TMUX").is_some() {
            Multiplexer::Tmux
        } else {
            Multiplexer::None
        }
    }
}

pub fn osc52_sequence(text: &str, mux: Multiplexer) -> Result<String, Osc52Error> {
    let bytes = text.as_bytes();
    if bytes.len() > OSC52_MAX_BYTES {
        return Err(Osc52Error::TooLarge { bytes: bytes.len() });
    }
    let payload = base64(bytes);
    Ok(match mux {
        Multiplexer::None => format!("\x1b]52;c;{payload}\x07"),
        // tmux passthrough: DCS, with the inner ESC doubled.
        Multiplexer::Tmux => format!("\x1bPtmux;\x1b\x1b]52;c;{payload}\x07\x1b\\"),
    })
}

fn base64(bytes: &[u8]) -> String {
    const ALPHABET: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

    let mut out = String::with_capacity(bytes.len().div_ceil(3) * 4);
    for chunk in bytes.chunks(3) {
        let mut group = [0u8; 3];
        group[..chunk.len()].copy_from_slice(chunk);
        let n = u32::from_be_bytes([0, group[0], group[1], group[2]]);

        let sextets = [n >> 18, n >> 12, n >> 6, n];
        for (i, sextet) in sextets.iter().enumerate() {
            if i <= chunk.len() {
                out.push(ALPHABET[(sextet & 0x3f) as usize] as char);
            } else {
                out.push('=');
            }
        }
    }
    out
}

pub struct Clipboard {
    register: String,
    mux: Multiplexer,
    export: bool,
}

impl Clipboard {
    pub fn new() -> Self {
        Self {
            register: String::new(),
            mux: Multiplexer::detect(),
            export: true,
        }
    }

    /// Register only; nothing is written to the terminal.
    pub fn internal() -> Self {
        Self {
            register: String::new(),
            mux: Multiplexer::None,
            export: false,
        }
    }

    pub fn contents(&self) -> &str {
        &self.register
    }

    /// Stores `text` and exports it through `out`. The register is updated even
    /// when the export fails.
    pub fn copy_to<W: Write>(&mut self, text: &str, out: &mut W) -> Result<(), Osc52Error> {
        self.register = text.to_string();
        if !self.export {
            return Ok(());
        }
        let seq = osc52_sequence(text, self.mux)?;
        out.write_all(seq.as_bytes())
            .and_then(|_| out.flush())
            .map_err(|e| Osc52Error::Io(e.to_string()))
    }

    pub fn copy(&mut self, text: &str) -> Result<(), Osc52Error> {
        self.copy_to(text, &mut io::stdout())
    }
}

impl Default for Clipboard {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/tui/clipboard.rs"]
mod tests;
