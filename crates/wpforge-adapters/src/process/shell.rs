//! Subprocess runner with a timeout.
//!
//! Output is streamed line by line into `tracing` (target `wpforge::process`)
//! so it shows up at `-vv` and in the log file without cluttering the
//! terminal. The last stderr lines are kept for the failure log.

use std::collections::VecDeque;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, instrument, warn};

use wpforge_core::{
    application::{
        ApplicationError,
        ports::{ExternalCommand, ProcessRunner},
    },
    error::ForgeResult,
};

/// Time budget for one external command.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(600);

const POLL_INTERVAL: Duration = Duration::from_millis(100);
const STDERR_TAIL: usize = 20;

/// Runs commands with `std::process`, killing them past the timeout.
#[derive(Debug, Clone)]
pub struct ShellRunner {
    timeout: Duration,
}

impl ShellRunner {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Default for ShellRunner {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

impl ProcessRunner for ShellRunner {
    #[instrument(skip_all, fields(command = %command, cwd = %cwd.display()))]
    fn run(&self, command: &ExternalCommand, cwd: &Path) -> ForgeResult<()> {
        let display = command.to_string();

        let mut cmd = Command::new(&command.program);
        cmd.args(&command.args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        // Own process group, so a timeout reaches grandchildren too.
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            cmd.process_group(0);
        }

        let mut child = cmd
            .spawn()
            .map_err(|e| ApplicationError::CommandSpawn {
                command: display.clone(),
                reason: e.to_string(),
            })?;

        let tail = Arc::new(Mutex::new(VecDeque::with_capacity(STDERR_TAIL)));
        let stdout_handle = child.stdout.take().map(|out| stream(out, None));
        let stderr_handle = child
            .stderr
            .take()
            .map(|err| stream(err, Some(Arc::clone(&tail))));

        let started = Instant::now();
        let status = loop {
            let polled = child.try_wait().map_err(|e| ApplicationError::CommandSpawn {
                command: display.clone(),
                reason: e.to_string(),
            })?;

            if let Some(status) = polled {
                break status;
            }

            if started.elapsed() >= self.timeout {
                warn!(timeout_ms = self.timeout.as_millis() as u64, "Command timed out, killing it");
                terminate(&mut child);
                // Readers are left detached: a descendant that escaped the
                // group may still hold the pipes open.
                drop(stdout_handle);
                drop(stderr_handle);
                return Err(ApplicationError::CommandTimedOut {
                    command: display,
                    timeout: self.timeout,
                }
                .into());
            }

            thread::sleep(POLL_INTERVAL);
        };

        join(stdout_handle);
        join(stderr_handle);

        debug!(%status, elapsed_ms = started.elapsed().as_millis() as u64, "Command finished");

        if status.success() {
            return Ok(());
        }

        if let Ok(lines) = tail.lock() {
            for line in lines.iter() {
                warn!(target: "wpforge::process", "{line}");
            }
        }

        Err(ApplicationError::CommandFailed {
            command: display,
            status: status.to_string(),
        }
        .into())
    }
}

/// Kill the child's whole process group, then reap the child.
fn terminate(child: &mut Child) {
    #[cfg(unix)]
    {
        use nix::sys::signal::{self, Signal};
        use nix::unistd::Pid;

        let pgid = Pid::from_raw(child.id() as i32);
        let _ = signal::killpg(pgid, Signal::SIGKILL);
    }
    // The child may exit between the poll and the kill.
    let _ = child.kill();
    let _ = child.wait();
}

fn stream<R>(reader: R, tail: Option<Arc<Mutex<VecDeque<String>>>>) -> JoinHandle<()>
where
    R: Read + Send + 'static,
{
    thread::spawn(move || {
        for line in BufReader::new(reader).lines().map_while(Result::ok) {
            debug!(target: "wpforge::process", "{line}");
            if let Some(tail) = &tail {
                if let Ok(mut tail) = tail.lock() {
                    if tail.len() == STDERR_TAIL {
                        tail.pop_front();
                    }
                    tail.push_back(line);
                }
            }
        }
    })
}

fn join(handle: Option<JoinHandle<()>>) {
    if let Some(handle) = handle {
        let _ = handle.join();
    }
}
