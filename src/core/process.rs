use super::error::{Error, Result};
use std::ffi::{OsStr, OsString};
use std::path::PathBuf;
use std::process::{Command, Stdio};

/// One external tool call: a program and its argument vector.
///
/// Arguments are handed to the OS verbatim, no shell is involved, so paths
/// and passwords can contain anything.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Invocation {
    pub tool: String,
    pub program: PathBuf,
    pub args: Vec<OsString>,
    pub current_dir: Option<PathBuf>,
    secrets: Vec<usize>,
}

impl Invocation {
    pub fn new(tool: &str, program: impl Into<PathBuf>) -> Self {
        Self {
            tool: tool.to_string(),
            program: program.into(),
            args: vec![],
            current_dir: None,
            secrets: vec![],
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    /// Same as `arg`, but the value is masked whenever the invocation is logged.
    pub fn secret(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.secrets.push(self.args.len());
        self.arg(arg)
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    pub fn args_lossy(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    /// Printable command line with secret arguments replaced by `***`.
    pub fn display(&self) -> String {
        let mut line = self.program.display().to_string();
        for (i, arg) in self.args.iter().enumerate() {
            line.push(' ');
            if self.secrets.contains(&i) {
                line.push_str("***");
            } else {
                line.push_str(&arg.to_string_lossy());
            }
        }
        line
    }
}

/// Seam between the pipeline and the operating system's process table.
#[cfg_attr(test, mockall::automock)]
pub trait CommandRunner {
    /// Run to completion. `Ok` only if the process exited successfully.
    fn run(&self, invocation: &Invocation) -> Result<()>;
}

/// Spawns real processes and forwards their output to our console.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> Result<()> {
        log::debug!("Running {}", invocation.display());

        let mut process = Command::new(&invocation.program);
        process
            .args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        if let Some(dir) = invocation.current_dir.as_deref() {
            process.current_dir(dir);
        }

        let status = process.status().map_err(|source| Error::Spawn {
            tool: invocation.tool.clone(),
            source,
        })?;
        if !status.success() {
            log::error!("❌ {} exited with {}", invocation.tool, status);
            return Err(Error::ToolFailed {
                tool: invocation.tool.clone(),
                status,
            });
        }
        Ok(())
    }
}
