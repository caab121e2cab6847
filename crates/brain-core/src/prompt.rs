//! Prompt helpers: loading the instruction prefix, combining it with user
//! input, and fingerprinting it for logs.

use std::io::ErrorKind;
use std::path::Path;

use sha2::{Digest, Sha256};
use tracing::{error, info, warn};

/// Load the prompt prefix from `path`.
///
/// The file contents are returned unmodified, trailing whitespace included.
/// Any read failure yields an empty prompt; the service keeps running with
/// no prefix.
pub fn load_prompt(path: impl AsRef<Path>) -> String {
    let path = path.as_ref();

    match std::fs::read_to_string(path) {
        Ok(prompt) => {
            info!(
                path = %path.display(),
                bytes = prompt.len(),
                fingerprint = %hash_prompt(&prompt),
                "Prompt loaded"
            );
            prompt
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            error!(path = %path.display(), "Prompt file not found, using empty prompt");
            String::new()
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to read prompt file, using empty prompt");
            String::new()
        }
    }
}

/// Combine the prompt and user text into the completion input.
pub fn wrap_input(prompt: &str, text: &str) -> String {
    let mut combined = String::with_capacity(prompt.len() + 1 + text.len());
    combined.push_str(prompt);
    combined.push('\n');
    combined.push_str(text);
    combined
}

/// Compute a stable SHA-256 fingerprint for a prompt string.
pub fn hash_prompt(prompt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(prompt.as_bytes());
    let digest = hasher.finalize();
    let mut hex = String::with_capacity(digest.len() * 2);
    for byte in digest {
        hex.push_str(&format!("{:02x}", byte));
    }
    hex
}
