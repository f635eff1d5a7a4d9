//! Running gnuplot (and `ps2pdf` for pdf output) on a generated script.
//!
//! No shell is involved: png/svg output is produced by pointing gnuplot's
//! stdout at the destination file, pdf output by piping gnuplot's postscript
//! straight into `ps2pdf - <path>`.

use crate::error::PlotError;
use crate::models::Format;
use log::{debug, warn};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, ExitStatus, Stdio};
use std::thread::{self, ScopedJoinHandle};

/// Where the rendered file goes and in which format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTarget {
    pub path: PathBuf,
    pub format: Format,
}

/// Text captured from the external processes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Executes a complete gnuplot script for an output target.
///
/// Implemented by [`GnuplotRunner`]; tests substitute their own runner to
/// inspect the script without a gnuplot installation.
pub trait ScriptRunner {
    fn run(&self, target: &OutputTarget, script: &str) -> Result<ProcessOutput, PlotError>;
}

/// Runs the real `gnuplot` / `ps2pdf` executables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GnuplotRunner {
    /// gnuplot executable (name on PATH or full path).
    pub gnuplot: String,
    /// ps2pdf executable, only used for pdf output.
    pub ps2pdf: String,
    /// Working directory for the spawned processes.
    pub cwd: Option<PathBuf>,
    /// Extra environment variables for the spawned processes.
    pub envs: Vec<(String, String)>,
}

impl Default for GnuplotRunner {
    fn default() -> Self {
        Self {
            gnuplot: "gnuplot".into(),
            ps2pdf: "ps2pdf".into(),
            cwd: None,
            envs: Vec::new(),
        }
    }
}

/// Best-effort creation of the destination's directory and file.
///
/// Failures are logged and otherwise ignored; the render itself reports
/// anything that actually prevents the file from being written.
pub fn prepare_output(path: &Path) {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("could not create {}: {}", parent.display(), e);
            return;
        }
    }
    if let Err(e) = OpenOptions::new().create(true).append(true).open(path) {
        warn!("could not touch {}: {}", path.display(), e);
    }
}

fn lossy(bytes: Vec<u8>) -> String {
    String::from_utf8_lossy(&bytes).into_owned()
}

fn check_status(
    program: &str,
    status: ExitStatus,
    stdout: &[u8],
    stderr: &[u8],
) -> Result<(), PlotError> {
    if status.success() {
        Ok(())
    } else {
        Err(PlotError::ExternalProcess {
            program: program.to_string(),
            status,
            stdout: String::from_utf8_lossy(stdout).into_owned(),
            stderr: String::from_utf8_lossy(stderr).trim().to_string(),
        })
    }
}

fn spawn(cmd: &mut Command, program: &str) -> Result<Child, PlotError> {
    debug!("spawning {:?}", cmd);
    cmd.spawn().map_err(|source| PlotError::Spawn {
        program: program.to_string(),
        source,
    })
}

fn take_stdin(child: &mut Child) -> io::Result<ChildStdin> {
    child
        .stdin
        .take()
        .ok_or_else(|| io::Error::other("child stdin was not captured"))
}

/// Write the script and close stdin, which tells gnuplot the script is complete.
fn write_script(mut stdin: ChildStdin, script: &str) -> io::Result<()> {
    stdin.write_all(script.as_bytes())?;
    stdin.flush()
}

fn joined<T>(handle: ScopedJoinHandle<'_, io::Result<T>>) -> io::Result<T> {
    handle
        .join()
        .unwrap_or_else(|_| Err(io::Error::other("pipe worker panicked")))
}

impl GnuplotRunner {
    pub fn new(gnuplot: impl Into<String>) -> Self {
        Self {
            gnuplot: gnuplot.into(),
            ..Default::default()
        }
    }

    fn command(&self, program: &str) -> Command {
        let mut cmd = Command::new(program);
        if let Some(cwd) = &self.cwd {
            cmd.current_dir(cwd);
        }
        cmd.envs(self.envs.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        cmd
    }

    fn run_direct(&self, path: &Path, script: &str) -> Result<ProcessOutput, PlotError> {
        let file = File::create(path)?;
        let mut child = spawn(
            self.command(&self.gnuplot)
                .stdin(Stdio::piped())
                .stdout(Stdio::from(file))
                .stderr(Stdio::piped()),
            &self.gnuplot,
        )?;

        // stdin is fed from its own thread while stderr is drained.
        let stdin = take_stdin(&mut child)?;
        let (written, output) = thread::scope(|s| {
            let writer = s.spawn(move || write_script(stdin, script));
            let output = child.wait_with_output();
            (joined(writer), output)
        });
        let output = output?;
        check_status(&self.gnuplot, output.status, &output.stdout, &output.stderr)?;
        written?;

        Ok(ProcessOutput {
            stdout: lossy(output.stdout),
            stderr: lossy(output.stderr),
        })
    }

    fn run_pdf(&self, path: &Path, script: &str) -> Result<ProcessOutput, PlotError> {
        let mut gnuplot = spawn(
            self.command(&self.gnuplot)
                .stdin(Stdio::piped())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped()),
            &self.gnuplot,
        )?;
        let postscript = gnuplot
            .stdout
            .take()
            .ok_or_else(|| io::Error::other("gnuplot stdout was not captured"))?;

        let converter = spawn(
            self.command(&self.ps2pdf)
                .arg("-")
                .arg(path)
                .stdin(Stdio::from(postscript))
                .stdout(Stdio::piped())
                .stderr(Stdio::piped()),
            &self.ps2pdf,
        );
        let converter = match converter {
            Ok(c) => c,
            Err(e) => {
                let _ = gnuplot.kill();
                let _ = gnuplot.wait();
                return Err(e);
            }
        };

        let stdin = take_stdin(&mut gnuplot)?;
        let (written, gnuplot_out, converter_out) = thread::scope(|s| {
            let writer = s.spawn(move || write_script(stdin, script));
            let converting = s.spawn(move || converter.wait_with_output());
            let gnuplot_out = gnuplot.wait_with_output();
            (joined(writer), gnuplot_out, joined(converting))
        });
        let gnuplot_out = gnuplot_out?;
        let converter_out = converter_out?;
        check_status(
            &self.gnuplot,
            gnuplot_out.status,
            &converter_out.stdout,
            &gnuplot_out.stderr,
        )?;
        check_status(
            &self.ps2pdf,
            converter_out.status,
            &converter_out.stdout,
            &converter_out.stderr,
        )?;
        written?;

        Ok(ProcessOutput {
            stdout: lossy(converter_out.stdout),
            stderr: lossy(gnuplot_out.stderr) + &lossy(converter_out.stderr),
        })
    }
}

impl ScriptRunner for GnuplotRunner {
    fn run(&self, target: &OutputTarget, script: &str) -> Result<ProcessOutput, PlotError> {
        match target.format {
            Format::Pdf => self.run_pdf(&target.path, script),
            Format::Png | Format::Svg => self.run_direct(&target.path, script),
        }
    }
}

#[cfg(feature = "async")]
mod nonblocking {
    use super::*;
    use tokio::io::AsyncWriteExt;
    use tokio::process::{
        Child as AsyncChild, ChildStdin as AsyncChildStdin, Command as AsyncCommand,
    };

    fn spawn_async(cmd: Command, program: &str) -> Result<AsyncChild, PlotError> {
        debug!("spawning {:?}", cmd);
        AsyncCommand::from(cmd)
            .spawn()
            .map_err(|source| PlotError::Spawn {
                program: program.to_string(),
                source,
            })
    }

    fn take_stdin_async(child: &mut AsyncChild) -> io::Result<AsyncChildStdin> {
        child
            .stdin
            .take()
            .ok_or_else(|| io::Error::other("child stdin was not captured"))
    }

    async fn write_script_async(mut stdin: AsyncChildStdin, script: &str) -> io::Result<()> {
        stdin.write_all(script.as_bytes()).await?;
        stdin.shutdown().await
    }

    impl GnuplotRunner {
        /// Same as [`ScriptRunner::run`], awaiting the processes on the tokio runtime.
        pub async fn run_async(
            &self,
            target: &OutputTarget,
            script: &str,
        ) -> Result<ProcessOutput, PlotError> {
            match target.format {
                Format::Pdf => self.run_pdf_async(&target.path, script).await,
                Format::Png | Format::Svg => self.run_direct_async(&target.path, script).await,
            }
        }

        async fn run_direct_async(
            &self,
            path: &Path,
            script: &str,
        ) -> Result<ProcessOutput, PlotError> {
            let file = File::create(path)?;
            let mut cmd = self.command(&self.gnuplot);
            cmd.stdin(Stdio::piped())
                .stdout(Stdio::from(file))
                .stderr(Stdio::piped());
            let mut child = spawn_async(cmd, &self.gnuplot)?;

            let stdin = take_stdin_async(&mut child)?;
            let (written, output) =
                tokio::join!(write_script_async(stdin, script), child.wait_with_output());
            let output = output?;
            check_status(&self.gnuplot, output.status, &output.stdout, &output.stderr)?;
            written?;

            Ok(ProcessOutput {
                stdout: lossy(output.stdout),
                stderr: lossy(output.stderr),
            })
        }

        async fn run_pdf_async(
            &self,
            path: &Path,
            script: &str,
        ) -> Result<ProcessOutput, PlotError> {
            let mut cmd = self.command(&self.gnuplot);
            cmd.stdin(Stdio::piped())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped());
            let mut gnuplot = spawn_async(cmd, &self.gnuplot)?;
            let postscript: Stdio = gnuplot
                .stdout
                .take()
                .ok_or_else(|| io::Error::other("gnuplot stdout was not captured"))?
                .try_into()?;

            let mut cmd = self.command(&self.ps2pdf);
            cmd.arg("-")
                .arg(path)
                .stdin(postscript)
                .stdout(Stdio::piped())
                .stderr(Stdio::piped());
            let converter = match spawn_async(cmd, &self.ps2pdf) {
                Ok(c) => c,
                Err(e) => {
                    let _ = gnuplot.kill().await;
                    return Err(e);
                }
            };

            let stdin = take_stdin_async(&mut gnuplot)?;
            let (written, gnuplot_out, converter_out) = tokio::join!(
                write_script_async(stdin, script),
                gnuplot.wait_with_output(),
                converter.wait_with_output()
            );
            let gnuplot_out = gnuplot_out?;
            let converter_out = converter_out?;
            check_status(
                &self.gnuplot,
                gnuplot_out.status,
                &converter_out.stdout,
                &gnuplot_out.stderr,
            )?;
            check_status(
                &self.ps2pdf,
                converter_out.status,
                &converter_out.stdout,
                &converter_out.stderr,
            )?;
            written?;

            Ok(ProcessOutput {
                stdout: lossy(converter_out.stdout),
                stderr: lossy(gnuplot_out.stderr) + &lossy(converter_out.stderr),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn prepare_output_creates_parent_and_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/deeper/out.png");
        prepare_output(&path);
        assert!(path.exists());
    }

    #[test]
    fn missing_executable_is_spawn_error() {
        let dir = tempdir().unwrap();
        let runner = GnuplotRunner::new("gnuplotter-no-such-binary");
        let target = OutputTarget {
            path: dir.path().join("x.png"),
            format: Format::Png,
        };
        let err = runner.run(&target, "plot '-'\ne\n").unwrap_err();
        assert!(matches!(err, PlotError::Spawn { .. }), "{err}");
    }

    // `sh` stands in for gnuplot: it reads its commands from stdin the same way.
    #[cfg(unix)]
    #[test]
    fn stderr_heavy_child_does_not_block_script_writes() {
        let dir = tempdir().unwrap();
        let runner = GnuplotRunner::new("sh");
        let target = OutputTarget {
            path: dir.path().join("chatty.png"),
            format: Format::Png,
        };
        let mut script = String::from("head -c 300000 /dev/zero >&2\ncat > /dev/null\n");
        let padding = format!("# {}\n", "x".repeat(78));
        while script.len() < 400_000 {
            script.push_str(&padding);
        }

        let out = runner.run(&target, &script).unwrap();
        assert_eq!(out.stderr.len(), 300_000);
    }

    // `cat` forwards the script to `sh`, which plays the failing converter.
    #[cfg(unix)]
    #[test]
    fn failed_converter_keeps_its_stdout() {
        let dir = tempdir().unwrap();
        let runner = GnuplotRunner {
            gnuplot: "cat".into(),
            ps2pdf: "sh".into(),
            ..Default::default()
        };
        let target = OutputTarget {
            path: dir.path().join("out.pdf"),
            format: Format::Pdf,
        };
        let err = runner
            .run(&target, "echo converted\necho oops >&2\nexit 3\n")
            .unwrap_err();
        match err {
            PlotError::ExternalProcess {
                program,
                stdout,
                stderr,
                ..
            } => {
                assert_eq!(program, "sh");
                assert_eq!(stdout, "converted\n");
                assert_eq!(stderr, "oops");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
