use std::{io::IsTerminal, path::PathBuf};

use tokio::io::AsyncReadExt;

use crate::{Res, state::EXAMPLE_INPUT};

/// Reads flipbook input from `path`, from piped stdin, or falls back to the
/// built-in example when neither is given.
pub async fn load_input(path: Option<PathBuf>) -> Res<String> {
    if let Some(path) = path {
        let text = async_fs::read_to_string(&path)
            .await
            .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
        return Ok(normalize_newlines(text));
    }

    if !std::io::stdin().is_terminal() {
        let mut text = String::new();
        tokio::io::stdin().read_to_string(&mut text).await?;
        return Ok(normalize_newlines(text));
    }

    Ok(EXAMPLE_INPUT.to_string())
}

/// Lines are split on `\n` only, so carriage returns from Windows files are
/// dropped here rather than ending up in URLs and messages.
fn normalize_newlines(text: String) -> String {
    if text.contains('\r') {
        text.replace("\r\n", "\n")
    } else {
        text
    }
}
