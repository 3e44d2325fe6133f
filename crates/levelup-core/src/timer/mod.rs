mod engine;
mod entry;
mod format;
mod registry;

pub use engine::{TimerEngine, DEFAULT_FADE_TICKS};
pub use entry::{BuffState, TimerEntry};
pub use format::format_time;
pub use registry::TimerRegistry;
