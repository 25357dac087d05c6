use crate::error::{HarnessError, HarnessResult};
use log::{debug, info, warn};
use std::{
    ffi::OsStr,
    fmt,
    io::Read,
    path::PathBuf,
    process::{Child, Command, ExitStatus, Stdio},
    sync::mpsc::{self, Receiver, RecvTimeoutError},
    thread,
    time::{Duration, Instant},
};
use wait_timeout::ChildExt;

/// How long the output drains may lag behind the end of a command. Descendants that left
/// the process group can hold the pipes open indefinitely.
const DRAIN_GRACE: Duration = Duration::from_millis(250);

/// How a command finished.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Termination {
    Exited(i32),
    Signaled,
    TimedOut,
}

impl From<ExitStatus> for Termination {
    fn from(status: ExitStatus) -> Self {
        match status.code() {
            Some(code) => Termination::Exited(code),
            None => Termination::Signaled,
        }
    }
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Termination::Exited(code) => write!(f, "exit code {code}"),
            Termination::Signaled => f.write_str("terminated by a signal"),
            Termination::TimedOut => f.write_str("timed out"),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct CommandOutcome {
    pub termination: Termination,
    /// stdout followed by stderr, decoded lossily.
    pub combined_output: String,
}

impl CommandOutcome {
    pub fn exit_code(&self) -> Option<i32> {
        match self.termination {
            Termination::Exited(code) => Some(code),
            _ => None,
        }
    }

    pub fn success(&self) -> bool {
        self.termination == Termination::Exited(0)
    }
}

/// Runs external programs inside a working directory.
///
/// A nonzero exit, a signal or a timeout are ordinary outcomes. Only failing to start or
/// to wait on the process is an error.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct CommandRunner {
    working_dir: PathBuf,
    timeout: Option<Duration>,
}

impl CommandRunner {
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn run<S: AsRef<OsStr>>(&self, argv: &[S]) -> HarnessResult<CommandOutcome> {
        let (program, args) = argv.split_first().ok_or(HarnessError::EmptyCommand)?;
        let program_name = program.as_ref().to_string_lossy().into_owned();
        let launch_error = |source: std::io::Error| HarnessError::Launch {
            program: program_name.clone(),
            source,
        };

        let mut cmd = Command::new(program);
        cmd.args(args)
            .current_dir(&self.working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt as _;
            // own group, so a timeout reaches everything the command spawned
            cmd.process_group(0);
        }

        info!("🚀 Running '{program_name}'");
        debug!("- args: {:?}", cmd.get_args().collect::<Vec<_>>());
        debug!("- working dir: '{}'", self.working_dir.display());
        let started = Instant::now();
        let mut child = cmd.spawn().map_err(launch_error)?;

        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let termination = match self.timeout {
            Some(limit) => match child.wait_timeout(limit).map_err(launch_error)? {
                Some(status) => Termination::from(status),
                None => {
                    warn!("⏱️  '{program_name}' exceeded {limit:?}, killing it");
                    kill_tree(&mut child);
                    if let Err(err) = child.wait() {
                        debug!("error while reaping: {err:?}");
                    }
                    Termination::TimedOut
                }
            },
            None => Termination::from(child.wait().map_err(launch_error)?),
        };

        let ended = Instant::now();
        let mut combined = collect(stdout, ended);
        combined.extend(collect(stderr, ended));
        debug!(
            "'{program_name}' finished with {termination} after {:?}",
            started.elapsed()
        );

        Ok(CommandOutcome {
            termination,
            combined_output: String::from_utf8_lossy(&combined).into_owned(),
        })
    }
}

/// Kills the child's whole process group, then the child itself.
fn kill_tree(child: &mut Child) {
    #[cfg(unix)]
    {
        if let Ok(pid) = libc::pid_t::try_from(child.id()) {
            // SAFETY: plain kill(2) on the group this runner created for the child.
            if unsafe { libc::kill(-pid, libc::SIGKILL) } == -1 {
                debug!(
                    "error while killing the process group: {:?}",
                    std::io::Error::last_os_error()
                );
            }
        }
    }
    if let Err(err) = child.kill() {
        debug!("error while killing: {err:?}");
    }
}

/// Forwards everything read from `pipe` in chunks, until EOF.
fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Option<Receiver<Vec<u8>>> {
    pipe.map(|mut pipe| {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let mut buf = [0u8; 8192];
            loop {
                match pipe.read(&mut buf) {
                    Ok(0) => break,
                    Ok(n) => {
                        if tx.send(buf[..n].to_vec()).is_err() {
                            break;
                        }
                    }
                    Err(err) if err.kind() == std::io::ErrorKind::Interrupted => {}
                    Err(err) => {
                        debug!("error while reading child output: {err:?}");
                        break;
                    }
                }
            }
        });
        rx
    })
}

/// Gathers a drain's chunks until the pipe closes or `DRAIN_GRACE` has passed since
/// `ended`.
fn collect(drained: Option<Receiver<Vec<u8>>>, ended: Instant) -> Vec<u8> {
    let mut out = vec![];
    let Some(rx) = drained else {
        return out;
    };
    let cutoff = ended + DRAIN_GRACE;
    loop {
        match rx.recv_timeout(cutoff.saturating_duration_since(Instant::now())) {
            Ok(chunk) => out.extend(chunk),
            Err(RecvTimeoutError::Timeout) => {
                warn!("⏱️  output still open after the command ended, dropping the rest");
                break;
            }
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }
    out
}
