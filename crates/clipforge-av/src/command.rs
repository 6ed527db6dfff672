//! Builder for executing external tool commands, and the [`BuildResult`]
//! vocabulary every encoder step reports in.

use crate::{Error, Result, Toolchain};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::process::{Command, ExitStatus};

/// Output captured from a tool execution.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    /// Process exit status.
    pub status: ExitStatus,
    /// Captured standard output (lossy UTF-8).
    pub stdout: String,
    /// Captured standard error (lossy UTF-8).
    pub stderr: String,
}

impl ToolOutput {
    /// Exit code, or `-1` when the process was terminated by a signal.
    pub fn exit_code(&self) -> i32 {
        self.status.code().unwrap_or(-1)
    }
}

/// Outcome of an encoder run or a whole build.
///
/// `message` accumulates human-readable diagnostics; it is only meant for
/// reporting, callers decide on `success`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildResult {
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

impl BuildResult {
    /// A clean run with no diagnostics.
    pub fn ok() -> Self {
        Self {
            success: true,
            message: String::new(),
        }
    }

    /// A failed run carrying the given diagnostic.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }

    /// Append a diagnostic line.
    pub fn push_message(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        self.message.push_str(text);
        if !text.ends_with('\n') {
            self.message.push('\n');
        }
    }
}

impl From<Error> for BuildResult {
    fn from(err: Error) -> Self {
        Self::failed(err.to_string())
    }
}

/// A builder for constructing and executing external tool invocations.
///
/// # Example
///
/// ```no_run
/// use clipforge_av::ToolCommand;
///
/// let output = ToolCommand::new("ffprobe")
///     .args(["-v", "error", "-print_format", "json", "-show_streams"])
///     .arg("/path/to/clip.mp4")
///     .execute()?;
/// println!("{}", output.stdout);
/// # Ok::<(), clipforge_av::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct ToolCommand {
    program: PathBuf,
    args: Vec<String>,
}

impl ToolCommand {
    /// Create a new command for the given program path.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append a single argument.
    pub fn arg(&mut self, s: impl Into<String>) -> &mut Self {
        self.args.push(s.into());
        self
    }

    /// Append multiple arguments.
    pub fn args(&mut self, iter: impl IntoIterator<Item = impl Into<String>>) -> &mut Self {
        self.args.extend(iter.into_iter().map(Into::into));
        self
    }

    /// Name used in diagnostics (file name of the program).
    pub fn program_name(&self) -> String {
        self.program
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.program.to_string_lossy().to_string())
    }

    /// The command line as a single string, for logging.
    pub fn command_line(&self) -> String {
        let mut line = self.program_name();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }

    /// Run the command to completion and capture its output, whatever the
    /// exit code.
    ///
    /// # Errors
    ///
    /// Only spawning can fail: [`Error::ToolNotFound`] when the binary does
    /// not exist, [`Error::Io`] otherwise.
    pub fn output(&self) -> Result<ToolOutput> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    Error::tool_not_found(self.program_name())
                } else {
                    Error::Io(e)
                }
            })?;

        Ok(ToolOutput {
            status: output.status,
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }

    /// Execute the command, treating a nonzero exit as an error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EncoderProcess`] with the captured stderr if the
    /// process exits unsuccessfully, plus the spawn errors of [`output`].
    ///
    /// [`output`]: ToolCommand::output
    pub fn execute(&self) -> Result<ToolOutput> {
        let output = self.output()?;
        if !output.status.success() {
            return Err(Error::EncoderProcess {
                tool: self.program_name(),
                code: output.status.code(),
                stderr: output.stderr.trim().to_string(),
            });
        }
        Ok(output)
    }
}

/// Run ffmpeg with overwrite enabled and translate the outcome into a
/// [`BuildResult`].
///
/// `global_flags` are placed before `-y` (e.g. `-xerror`). This never
/// returns an error: spawn failures and nonzero exits both become
/// `success: false` with the stringified error as message.
pub fn run_ffmpeg<S: AsRef<str>>(toolchain: &Toolchain, global_flags: &[&str], args: &[S]) -> BuildResult {
    let mut cmd = ToolCommand::new(toolchain.ffmpeg.clone());
    cmd.args(global_flags.iter().copied());
    cmd.arg("-y");
    cmd.args(args.iter().map(|a| a.as_ref()));

    tracing::info!("{}", cmd.command_line());

    match cmd.execute() {
        Ok(_) => BuildResult::ok(),
        Err(e) => {
            tracing::error!("ffmpeg run failed: {e}");
            BuildResult::from(e)
        }
    }
}
