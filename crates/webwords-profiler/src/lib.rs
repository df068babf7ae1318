mod profiler;
mod state;

pub use profiler::{Profiler, ProfiledTarget, Recorded};
pub use state::ProfilingState;

pub use anyhow;
