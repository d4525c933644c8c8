//! External command runners.

mod recording;
mod shell;

pub use recording::RecordingRunner;
pub use shell::{DEFAULT_TIMEOUT, ShellRunner};
