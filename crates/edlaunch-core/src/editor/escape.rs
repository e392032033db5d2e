use std::borrow::Cow;

/// Characters cmd.exe treats specially even inside an argument.
const CMD_METACHARS: &[char] = &['&', '|', '<', '>', '^', '(', ')', '%', '!'];

/// Quote an argument for a POSIX shell.
///
/// Safe arguments are returned unchanged; everything else is single-quoted
/// with embedded quotes written as `'\''`.
pub fn posix_quote(arg: &str) -> Cow<'_, str> {
    let safe = !arg.is_empty()
        && arg.chars().all(|c| {
            c.is_ascii_alphanumeric() || matches!(c, '_' | '@' | '%' | '+' | '=' | ':' | ',' | '.' | '/' | '-')
        });
    if safe {
        return Cow::Borrowed(arg);
    }
    Cow::Owned(format!("'{}'", arg.replace('\'', r"'\''")))
}

/// Quote an argument following the `CommandLineToArgvW` rules.
pub fn windows_quote(arg: &str) -> Cow<'_, str> {
    let needs_quotes = arg.is_empty() || arg.contains([' ', '\t', '\n', '"']);
    if !needs_quotes {
        return Cow::Borrowed(arg);
    }
    Cow::Owned(quote_argv(arg))
}

/// Quote an argument passed to a `.cmd`/`.bat` launcher.
///
/// Same as [`windows_quote`], but cmd metacharacters also force quoting.
pub fn windows_batch_quote(arg: &str) -> Cow<'_, str> {
    if arg.contains(CMD_METACHARS) && !arg.contains([' ', '\t', '\n', '"']) {
        return Cow::Owned(quote_argv(arg));
    }
    windows_quote(arg)
}

fn quote_argv(arg: &str) -> String {
    let mut out = String::with_capacity(arg.len() + 2);
    out.push('"');

    let mut backslashes = 0usize;
    for c in arg.chars() {
        match c {
            '\\' => backslashes += 1,
            '"' => {
                // Backslashes before a quote are doubled, plus one for the quote.
                out.extend(std::iter::repeat_n('\\', backslashes * 2 + 1));
                out.push('"');
                backslashes = 0;
            }
            _ => {
                out.extend(std::iter::repeat_n('\\', backslashes));
                out.push(c);
                backslashes = 0;
            }
        }
    }

    // Trailing backslashes would escape the closing quote.
    out.extend(std::iter::repeat_n('\\', backslashes * 2));
    out.push('"');
    out
}
