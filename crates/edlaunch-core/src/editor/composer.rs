use std::path::{Path, PathBuf};
use std::process::Command;

use serde::Serialize;
use tracing::debug;

use crate::platform::Platform;

use super::errors::EditorError;
use super::escape::{posix_quote, windows_batch_quote, windows_quote};
use super::types::{EditorDescriptor, LaunchRequest, ResolvedEditor};

/// Separators removed together with a missing optional placeholder.
const OPTIONAL_SEPARATORS: &[char] = &[':', ','];

/// A fully composed editor invocation.
///
/// Arguments stay an argv vector; `display_line` renders them for humans.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditorCommand {
    pub editor_id: String,
    pub program: PathBuf,
    pub args: Vec<String>,
    pub working_dir: Option<PathBuf>,
    pub platform: Platform,
}

impl EditorCommand {
    /// A Windows `.cmd`/`.bat` launcher, run through cmd.exe by the OS.
    pub fn is_batch_launcher(&self) -> bool {
        self.platform.is_windows()
            && self
                .program
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("cmd") || ext.eq_ignore_ascii_case("bat"))
    }

    /// Build a `std::process::Command` ready to spawn.
    pub fn to_command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        if let Some(dir) = &self.working_dir {
            command.current_dir(dir);
        }
        command
    }

    /// Shell-safe rendering of the command line for this platform.
    pub fn display_line(&self) -> String {
        let program = self.program.to_string_lossy();
        let quote: fn(&str) -> std::borrow::Cow<'_, str> = if !self.platform.is_windows() {
            posix_quote
        } else if self.is_batch_launcher() {
            windows_batch_quote
        } else {
            windows_quote
        };

        std::iter::once(&*program)
            .chain(self.args.iter().map(String::as_str))
            .map(|arg| quote(arg).into_owned())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Segment<'a> {
    Literal(String),
    Placeholder(&'a str),
}

/// Turns a resolved editor plus a launch request into an `EditorCommand`.
#[derive(Debug, Clone, Copy)]
pub struct LaunchComposer {
    platform: Platform,
}

impl LaunchComposer {
    pub fn new(platform: Platform) -> Self {
        Self { platform }
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Substitute `{file}`, `{line}`, `{column}`, `{dir}` and `{project}`.
    ///
    /// `{line}` and `{column}` are optional: when the request lacks them the
    /// placeholder and the separator before it (or after it, at the start of
    /// an argument) are removed, and an argument
    /// made only of missing optionals is dropped. `{column}` needs `{line}`.
    /// `{{` and `}}` produce literal braces.
    pub fn compose(
        &self,
        resolved: &ResolvedEditor,
        descriptor: &EditorDescriptor,
        request: &LaunchRequest,
    ) -> Result<EditorCommand, EditorError> {
        let values = Values::from_request(request);
        let mut args = Vec::with_capacity(descriptor.args.len());

        for template in &descriptor.args {
            let segments = parse_template(template)?;
            if let Some(arg) = render(&segments, &values)? {
                args.push(arg);
            }
        }

        let working_dir = request
            .project_root
            .clone()
            .or_else(|| values.dir.map(Path::to_path_buf));

        let command = EditorCommand {
            editor_id: descriptor.id.clone(),
            program: resolved.executable.clone(),
            args,
            working_dir,
            platform: self.platform,
        };

        debug!(
            event = "core.editor.compose_completed",
            id = %command.editor_id,
            program = %command.program.display(),
            args = command.args.len(),
            batch = command.is_batch_launcher()
        );

        Ok(command)
    }
}

struct Values<'a> {
    file: String,
    dir: Option<&'a Path>,
    project: Option<String>,
    line: Option<String>,
    column: Option<String>,
}

impl<'a> Values<'a> {
    fn from_request(request: &'a LaunchRequest) -> Self {
        let line = request.line.map(|line| line.to_string());
        let column = line
            .as_ref()
            .and(request.column)
            .map(|column| column.to_string());

        Self {
            file: request.target.to_string_lossy().into_owned(),
            dir: request
                .target
                .parent()
                .filter(|dir| !dir.as_os_str().is_empty()),
            project: request
                .project_root
                .as_ref()
                .map(|root| root.to_string_lossy().into_owned()),
            line,
            column,
        }
    }

    /// `Ok(None)` for an optional value that is absent.
    fn get(&self, name: &str) -> Result<Option<String>, EditorError> {
        let missing = || EditorError::UnresolvedPlaceholder {
            placeholder: name.to_string(),
        };

        match name {
            "file" => Ok(Some(self.file.clone())),
            "dir" => self
                .dir
                .map(|dir| Some(dir.to_string_lossy().into_owned()))
                .ok_or_else(missing),
            "project" => self.project.clone().map(Some).ok_or_else(missing),
            "line" => Ok(self.line.clone()),
            "column" => Ok(self.column.clone()),
            _ => Err(missing()),
        }
    }
}

fn parse_template(template: &str) -> Result<Vec<Segment<'_>>, EditorError> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut rest = template;

    while let Some(pos) = rest.find(['{', '}']) {
        literal.push_str(&rest[..pos]);
        let tail = &rest[pos..];

        if let Some(after) = tail.strip_prefix("{{") {
            literal.push('{');
            rest = after;
        } else if let Some(after) = tail.strip_prefix("}}") {
            literal.push('}');
            rest = after;
        } else if let Some(after) = tail.strip_prefix('}') {
            literal.push('}');
            rest = after;
        } else {
            let body = &tail[1..];
            let Some(end) = body.find('}') else {
                return Err(EditorError::InvalidDescriptor {
                    message: format!("unclosed '{{' in argument '{}'", template),
                });
            };
            if !literal.is_empty() {
                segments.push(Segment::Literal(std::mem::take(&mut literal)));
            }
            segments.push(Segment::Placeholder(&body[..end]));
            rest = &body[end + 1..];
        }
    }

    literal.push_str(rest);
    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    Ok(segments)
}

/// Render one argument; `None` when it should be dropped.
fn render(segments: &[Segment<'_>], values: &Values<'_>) -> Result<Option<String>, EditorError> {
    let mut out = String::new();
    let mut placeholders = 0usize;
    let mut missing = 0usize;
    // A missing optional at the start of the argument takes the separator after it.
    let mut strip_leading = false;

    for segment in segments {
        match segment {
            Segment::Literal(text) => {
                let text = if strip_leading {
                    text.strip_prefix(OPTIONAL_SEPARATORS).unwrap_or(text.as_str())
                } else {
                    text.as_str()
                };
                out.push_str(text);
                strip_leading = false;
            }
            Segment::Placeholder(name) => {
                placeholders += 1;
                match values.get(name)? {
                    Some(value) => {
                        out.push_str(&value);
                        strip_leading = false;
                    }
                    None => {
                        missing += 1;
                        if out.ends_with(OPTIONAL_SEPARATORS) {
                            out.pop();
                        } else if out.is_empty() {
                            strip_leading = true;
                        }
                    }
                }
            }
        }
    }

    let all_missing = placeholders > 0 && missing == placeholders;
    if all_missing || (missing > 0 && out.is_empty()) {
        return Ok(None);
    }
    Ok(Some(out))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::types::ResolutionSource;
    use chrono::Utc;

    fn resolved(executable: &str) -> ResolvedEditor {
        ResolvedEditor {
            id: "vscode".to_string(),
            executable: PathBuf::from(executable),
            resolved_at: Utc::now(),
            source: ResolutionSource::Discovered,
        }
    }

    fn descriptor(args: &[&str]) -> EditorDescriptor {
        EditorDescriptor::custom("vscode", "VS Code").with_args(args.iter().copied())
    }

    fn compose(args: &[&str], request: &LaunchRequest) -> Result<EditorCommand, EditorError> {
        LaunchComposer::new(Platform::Linux).compose(
            &resolved("/usr/local/bin/code"),
            &descriptor(args),
            request,
        )
    }

    #[test]
    fn test_goto_line_and_column() {
        let request = LaunchRequest::new("/tmp/f.ts").at_line(10).at_column(3);
        let command = compose(&["--goto", "{file}:{line}:{column}"], &request).unwrap();

        assert_eq!(command.program, PathBuf::from("/usr/local/bin/code"));
        assert_eq!(command.args, vec!["--goto", "/tmp/f.ts:10:3"]);
    }

    #[test]
    fn test_missing_line_and_column_are_dropped() {
        let request = LaunchRequest::new("/tmp/f.ts");
        let command = compose(&["--goto", "{file}:{line}:{column}"], &request).unwrap();
        assert_eq!(command.args, vec!["--goto", "/tmp/f.ts"]);
    }

    #[test]
    fn test_column_without_line_is_dropped() {
        let request = LaunchRequest::new("/tmp/f.ts").at_column(7);
        let command = compose(&["{file}:{line}:{column}"], &request).unwrap();
        assert_eq!(command.args, vec!["/tmp/f.ts"]);
    }

    #[test]
    fn test_line_without_column() {
        let request = LaunchRequest::new("/tmp/f.ts").at_line(42);
        let command = compose(&["{file}:{line}:{column}"], &request).unwrap();
        assert_eq!(command.args, vec!["/tmp/f.ts:42"]);
    }

    #[test]
    fn test_leading_missing_line_takes_following_separator() {
        let request = LaunchRequest::new("/tmp/f.ts");
        let command = compose(&["{line}:{file}", "{line}:{column}:{file}"], &request).unwrap();
        assert_eq!(command.args, vec!["/tmp/f.ts", "/tmp/f.ts"]);

        let request = LaunchRequest::new("/tmp/f.ts").at_line(4);
        let command = compose(&["{line}:{column},{file}"], &request).unwrap();
        assert_eq!(command.args, vec!["4,/tmp/f.ts"]);
    }

    #[test]
    fn test_argument_of_only_missing_optionals_is_dropped() {
        let request = LaunchRequest::new("/tmp/f.ts");
        let command = compose(&["{file}", "--line={line}", "+{line}"], &request).unwrap();
        assert_eq!(command.args, vec!["/tmp/f.ts"]);
    }

    #[test]
    fn test_template_without_line_ignores_supplied_line() {
        let request = LaunchRequest::new("/tmp/f.ts").at_line(10).at_column(3);
        let command = compose(&["{file}"], &request).unwrap();
        assert_eq!(command.args, vec!["/tmp/f.ts"]);
    }

    #[test]
    fn test_dir_and_project() {
        let request = LaunchRequest::new("/work/app/src/main.rs").with_project_root("/work/app");
        let command = compose(&["{project}", "{dir}"], &request).unwrap();
        assert_eq!(command.args, vec!["/work/app", "/work/app/src"]);
        assert_eq!(command.working_dir, Some(PathBuf::from("/work/app")));
    }

    #[test]
    fn test_working_dir_falls_back_to_parent() {
        let command = compose(&["{file}"], &LaunchRequest::new("/work/app/main.rs")).unwrap();
        assert_eq!(command.working_dir, Some(PathBuf::from("/work/app")));
    }

    #[test]
    fn test_missing_project_is_unresolved() {
        let err = compose(&["-r", "{project}"], &LaunchRequest::new("/tmp/f.ts")).unwrap_err();
        assert!(matches!(
            err,
            EditorError::UnresolvedPlaceholder { ref placeholder } if placeholder == "project"
        ));
    }

    #[test]
    fn test_missing_dir_is_unresolved() {
        let err = compose(&["{dir}"], &LaunchRequest::new("f.ts")).unwrap_err();
        assert!(matches!(
            err,
            EditorError::UnresolvedPlaceholder { ref placeholder } if placeholder == "dir"
        ));
    }

    #[test]
    fn test_unknown_placeholder_is_unresolved() {
        let err = compose(&["{workspace}"], &LaunchRequest::new("/tmp/f.ts")).unwrap_err();
        assert!(matches!(
            err,
            EditorError::UnresolvedPlaceholder { ref placeholder } if placeholder == "workspace"
        ));
    }

    #[test]
    fn test_escaped_braces() {
        let command = compose(&["{{literal}}", "{file}"], &LaunchRequest::new("/tmp/f.ts")).unwrap();
        assert_eq!(command.args, vec!["{literal}", "/tmp/f.ts"]);
    }

    #[test]
    fn test_unclosed_brace_is_invalid() {
        let err = compose(&["{file"], &LaunchRequest::new("/tmp/f.ts")).unwrap_err();
        assert!(matches!(err, EditorError::InvalidDescriptor { .. }));
    }

    #[test]
    fn test_to_command_keeps_argv() {
        let request = LaunchRequest::new("/tmp/my file.ts").at_line(1);
        let command = compose(&["-g", "{file}:{line}"], &request).unwrap();
        let process = command.to_command();

        assert_eq!(process.get_program(), "/usr/local/bin/code");
        let args: Vec<_> = process.get_args().collect();
        assert_eq!(args, vec!["-g", "/tmp/my file.ts:1"]);
        assert_eq!(process.get_current_dir(), Some(Path::new("/tmp")));
    }

    #[test]
    fn test_display_line_posix() {
        let request = LaunchRequest::new("/tmp/it's here.ts").at_line(5);
        let command = compose(&["-g", "{file}:{line}"], &request).unwrap();
        assert_eq!(
            command.display_line(),
            r"/usr/local/bin/code -g '/tmp/it'\''s here.ts:5'"
        );
    }

    #[test]
    fn test_display_line_windows_batch() {
        let composer = LaunchComposer::new(Platform::Windows);
        let request = LaunchRequest::new(r"C:\My Projects\a&b.ts")
            .at_line(2)
            .with_project_root(r"C:\My Projects");
        let command = composer
            .compose(
                &resolved(r"C:\Users\ada\AppData\Local\Programs\Microsoft VS Code\bin\code.cmd"),
                &descriptor(&["-r", "{project}", "-g", "{file}:{line}:{column}"]),
                &request,
            )
            .unwrap();

        assert!(command.is_batch_launcher());
        assert_eq!(
            command.display_line(),
            r#""C:\Users\ada\AppData\Local\Programs\Microsoft VS Code\bin\code.cmd" -r "C:\My Projects" -g "C:\My Projects\a&b.ts:2""#
        );
    }

    #[test]
    fn test_exe_is_not_batch_launcher() {
        let command = LaunchComposer::new(Platform::Windows)
            .compose(
                &resolved(r"C:\Tools\Cursor.exe"),
                &descriptor(&["{file}"]),
                &LaunchRequest::new(r"C:\src\a.ts"),
            )
            .unwrap();
        assert!(!command.is_batch_launcher());
        assert_eq!(command.display_line(), r"C:\Tools\Cursor.exe C:\src\a.ts");
    }
}
