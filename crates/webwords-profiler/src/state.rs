use std::io::{self, Write};
use std::time::Duration;

use dashmap::DashMap;

/// Process-lifetime record of profiled call durations, keyed by
/// `target#method`.
#[derive(Debug, Default)]
pub struct ProfilingState {
    records: DashMap<String, MethodRecord>,
}

#[derive(Debug, Default, Clone, Copy)]
struct MethodRecord {
    total: Duration,
    calls: usize,
}

impl ProfilingState {
    pub fn record(&self, target: &str, method: &str, elapsed: Duration) {
        let mut entry = self.records.entry(format!("{target}#{method}")).or_default();
        entry.total += elapsed;
        entry.calls += 1;
    }

    /// Writes one line per recorded method with its accumulated duration,
    /// in a stable (alphabetical) order.
    pub fn write(&self, w: &mut impl Write) -> io::Result<()> {
        let mut lines: Vec<(String, MethodRecord)> = self
            .records
            .iter()
            .map(|entry| (entry.key().clone(), *entry.value()))
            .collect();
        lines.sort_unstable_by(|a, b| a.0.cmp(&b.0));
        for (key, record) in lines {
            writeln!(
                w,
                "  {key} took {} ({} call{})",
                format_duration(record.total),
                record.calls,
                if record.calls == 1 { "" } else { "s" }
            )?;
        }
        Ok(())
    }
}

fn format_duration(d: Duration) -> String {
    let millis = d.as_millis();
    format!(
        "{}m {}s {}ms",
        millis / 60_000,
        (millis % 60_000) / 1_000,
        millis % 1_000
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durations_accumulate_per_method() {
        let state = ProfilingState::default();
        state.record("Parser", "parse", Duration::from_millis(500));
        state.record("Parser", "parse", Duration::from_millis(700));

        let mut out = Vec::new();
        state.write(&mut out).unwrap();
        let report = String::from_utf8(out).unwrap();

        assert_eq!(report, "  Parser#parse took 0m 1s 200ms (2 calls)\n");
    }

    #[test]
    fn format_covers_minutes() {
        let d = Duration::from_millis(2 * 60_000 + 3_000 + 45);
        assert_eq!(format_duration(d), "2m 3s 45ms");
    }
}
