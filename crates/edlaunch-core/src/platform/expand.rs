//! Per-platform variable expansion for candidate path patterns.
//!
//! - Linux / macOS: `~`, `$NAME`, `${NAME}`
//! - Windows: `~`, `%NAME%` (case-insensitive), `%%` for a literal percent
//!
//! A variable that is unset falls back to the platform's standard-install
//! table (e.g. `%LOCALAPPDATA%` -> `%USERPROFILE%\AppData\Local`). A variable
//! with neither a value nor a fallback makes the whole pattern unexpandable.

use super::Platform;

const MAX_FALLBACK_DEPTH: usize = 2;

const LINUX_FALLBACKS: &[(&str, &str)] = &[
    ("XDG_DATA_HOME", "$HOME/.local/share"),
    ("XDG_CONFIG_HOME", "$HOME/.config"),
];

const MACOS_FALLBACKS: &[(&str, &str)] = &[("XDG_CONFIG_HOME", "$HOME/.config")];

const WINDOWS_FALLBACKS: &[(&str, &str)] = &[
    ("LOCALAPPDATA", r"%USERPROFILE%\AppData\Local"),
    ("APPDATA", r"%USERPROFILE%\AppData\Roaming"),
    ("PROGRAMFILES", r"C:\Program Files"),
    ("PROGRAMFILES(X86)", r"C:\Program Files (x86)"),
];

fn fallbacks(platform: Platform) -> &'static [(&'static str, &'static str)] {
    match platform {
        Platform::Linux => LINUX_FALLBACKS,
        Platform::MacOs => MACOS_FALLBACKS,
        Platform::Windows => WINDOWS_FALLBACKS,
    }
}

/// Expand `pattern` using `lookup` for variable values.
///
/// Returns `None` when a referenced variable cannot be resolved.
pub fn expand_env_vars(
    pattern: &str,
    platform: Platform,
    lookup: &dyn Fn(&str) -> Option<String>,
) -> Option<String> {
    expand_at_depth(pattern, platform, lookup, 0)
}

fn expand_at_depth(
    pattern: &str,
    platform: Platform,
    lookup: &dyn Fn(&str) -> Option<String>,
    depth: usize,
) -> Option<String> {
    let mut out = String::with_capacity(pattern.len());
    let mut rest = pattern;

    if let Some(after) = pattern.strip_prefix('~')
        && (after.is_empty() || after.starts_with('/') || after.starts_with('\\'))
    {
        out.push_str(&variable(platform.home_var(), platform, lookup, depth)?);
        rest = after;
    }

    match platform {
        Platform::Windows => expand_percent(rest, platform, lookup, depth, &mut out)?,
        Platform::Linux | Platform::MacOs => expand_dollar(rest, platform, lookup, depth, &mut out)?,
    }

    Some(out)
}

fn expand_dollar(
    input: &str,
    platform: Platform,
    lookup: &dyn Fn(&str) -> Option<String>,
    depth: usize,
    out: &mut String,
) -> Option<()> {
    let mut rest = input;

    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos + 1..];

        if let Some(braced) = tail.strip_prefix('{') {
            match braced.find('}') {
                Some(end) if end > 0 => {
                    out.push_str(&variable(&braced[..end], platform, lookup, depth)?);
                    rest = &braced[end + 1..];
                }
                _ => {
                    out.push('$');
                    rest = tail;
                }
            }
            continue;
        }

        let len = tail
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(tail.len());
        if len == 0 {
            out.push('$');
        } else {
            out.push_str(&variable(&tail[..len], platform, lookup, depth)?);
        }
        rest = &tail[len..];
    }

    out.push_str(rest);
    Some(())
}

fn expand_percent(
    input: &str,
    platform: Platform,
    lookup: &dyn Fn(&str) -> Option<String>,
    depth: usize,
    out: &mut String,
) -> Option<()> {
    let mut rest = input;

    while let Some(pos) = rest.find('%') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos + 1..];

        match tail.find('%') {
            Some(0) => {
                out.push('%');
                rest = &tail[1..];
            }
            // A stray `%` before a path component is not a variable opener.
            Some(end) if tail[..end].contains(['\\', '/']) => {
                out.push('%');
                rest = tail;
            }
            Some(end) => {
                out.push_str(&variable(&tail[..end], platform, lookup, depth)?);
                rest = &tail[end + 1..];
            }
            None => {
                out.push('%');
                rest = tail;
            }
        }
    }

    out.push_str(rest);
    Some(())
}

fn variable(
    name: &str,
    platform: Platform,
    lookup: &dyn Fn(&str) -> Option<String>,
    depth: usize,
) -> Option<String> {
    let non_empty = |value: Option<String>| value.filter(|v| !v.is_empty());

    let mut value = non_empty(lookup(name));
    if value.is_none() && platform.is_windows() {
        value = non_empty(lookup(&name.to_ascii_uppercase()));
    }
    if value.is_some() {
        return value;
    }

    if depth >= MAX_FALLBACK_DEPTH {
        return None;
    }

    let (_, fallback) = fallbacks(platform).iter().find(|(candidate, _)| {
        if platform.is_windows() {
            candidate.eq_ignore_ascii_case(name)
        } else {
            *candidate == name
        }
    })?;

    tracing::debug!(
        event = "core.platform.expand_fallback_used",
        variable = name,
        platform = %platform,
        fallback = fallback
    );

    expand_at_depth(fallback, platform, lookup, depth + 1)
}
