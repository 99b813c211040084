pub mod shell;
pub mod timer;

pub use shell::{CycleId, Effect, Shell, ShellTiming};
pub use timer::TimerToken;
