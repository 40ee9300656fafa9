use anyhow::{Context, Result, bail};
use std::process::{Command, Stdio};

const NO_ARGS: &[&str] = &[];
// Goes straight to the shell URL handler; no cmd.exe, so `%..%` in the URL is left alone.
const WINDOWS_HANDLER_ARGS: &[&str] = &["url.dll,FileProtocolHandler"];

/// URL opener for an `std::env::consts::OS` value, as `(program, leading args)`.
pub fn opener_for(os: &str) -> (&'static str, &'static [&'static str]) {
    match os {
        "macos" => ("open", NO_ARGS),
        "windows" => ("rundll32", WINDOWS_HANDLER_ARGS),
        _ => ("xdg-open", NO_ARGS),
    }
}

pub fn opener_command() -> (&'static str, &'static [&'static str]) {
    opener_for(std::env::consts::OS)
}

/// Hands `url` to the desktop's default browser.
pub fn open_url(url: &str) -> Result<()> {
    let (program, args) = opener_command();
    tracing::debug!(program, url, "opening browser");

    let status = Command::new(program)
        .args(args)
        .arg(url)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .with_context(|| format!("failed to launch {program}"))?;

    if !status.success() {
        bail!("{program} exited with {status} while opening {url}");
    }
    Ok(())
}
