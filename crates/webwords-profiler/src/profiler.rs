use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{ensure, Result};
use async_trait::async_trait;
use chrono::{DateTime, Local};
use webwords_crawler::{PageContent, PageParser};

use crate::state::ProfilingState;

/// Declares which methods of a type are measured when it is wrapped.
/// The table is static: whether a call is timed never depends on runtime
/// type inspection.
pub trait ProfiledTarget {
    const TARGET: &'static str;
    const PROFILED_METHODS: &'static [&'static str];
}

/// Hands out recording proxies and renders their accumulated data.
pub struct Profiler {
    started: DateTime<Local>,
    state: Arc<ProfilingState>,
}

impl Profiler {
    pub fn new() -> Self {
        Self {
            started: Local::now(),
            state: Arc::new(ProfilingState::default()),
        }
    }

    /// Wraps `target` in a behaviorally identical proxy that times its
    /// profiled methods. Wrapping a target that declares no profiled
    /// methods is a usage error, reported here rather than at call time.
    pub fn wrap<T: ProfiledTarget>(&self, target: T) -> Result<Recorded<T>> {
        ensure!(
            !T::PROFILED_METHODS.is_empty(),
            "{} declares no profiled methods",
            T::TARGET
        );
        Ok(Recorded {
            inner: target,
            state: self.state.clone(),
        })
    }

    /// Appends the profiling report: a `Run at` header, one line per
    /// recorded method, and a trailing blank line.
    pub fn write_report(&self, w: &mut impl Write) -> io::Result<()> {
        writeln!(w, "Run at {}", self.started.to_rfc2822())?;
        self.state.write(w)?;
        writeln!(w)
    }

    pub fn write_report_path(&self, path: impl AsRef<Path>) -> io::Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        self.write_report(&mut file)
    }
}

impl Default for Profiler {
    fn default() -> Self {
        Self::new()
    }
}

/// Proxy around `T` produced by [`Profiler::wrap`].
pub struct Recorded<T> {
    inner: T,
    state: Arc<ProfilingState>,
}

impl<T: ProfiledTarget> Recorded<T> {
    /// Runs `call` against the wrapped value, timing it when `method` is
    /// in the target's profiled table and passing through unrecorded
    /// otherwise.
    pub fn measure<R>(&self, method: &'static str, call: impl FnOnce(&T) -> R) -> R {
        if !T::PROFILED_METHODS.contains(&method) {
            return call(&self.inner);
        }
        let start = Instant::now();
        let out = call(&self.inner);
        self.state.record(T::TARGET, method, start.elapsed());
        out
    }
}

#[async_trait]
impl<P> PageParser for Recorded<P>
where
    P: PageParser + ProfiledTarget,
{
    async fn parse(&self, url: &str) -> anyhow::Result<PageContent> {
        if !P::PROFILED_METHODS.contains(&"parse") {
            return self.inner.parse(url).await;
        }
        // Recorded even when the inner call fails; the error is rethrown.
        let start = Instant::now();
        let out = self.inner.parse(url).await;
        self.state.record(P::TARGET, "parse", start.elapsed());
        out
    }
}
