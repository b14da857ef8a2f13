use std::fmt;

/// Per-builder tally for one poll of the dashboard.
///
/// Built fresh every tick by a [`StatusClassifier`](crate::source::StatusClassifier)
/// and never mutated afterwards. The total is always derived from the four
/// categories, never stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct BuildCounts {
    successes: u32,
    failures: u32,
    exceptions: u32,
    unknown: u32,
}

impl BuildCounts {
    pub const fn new(successes: u32, failures: u32, exceptions: u32, unknown: u32) -> Self {
        Self {
            successes,
            failures,
            exceptions,
            unknown,
        }
    }

    pub const fn successes(&self) -> u32 {
        self.successes
    }

    pub const fn failures(&self) -> u32 {
        self.failures
    }

    /// Infrastructure failures ("InfraFailure" on the console page).
    pub const fn exceptions(&self) -> u32 {
        self.exceptions
    }

    pub const fn unknown(&self) -> u32 {
        self.unknown
    }

    /// Number of builders seen this tick.
    ///
    /// Widened to `u64` so four saturated `u32` categories cannot overflow.
    pub const fn total(&self) -> u64 {
        self.successes as u64 + self.failures as u64 + self.exceptions as u64 + self.unknown as u64
    }

    /// True when no builder was seen at all.
    pub const fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// Incremental tally used by classifiers while walking a page.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuildCountsBuilder {
    counts: BuildCounts,
}

/// Outcome of a single builder column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuilderResult {
    Success,
    Failure,
    Exception,
    Unknown,
}

impl BuildCountsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, result: BuilderResult) -> &mut Self {
        let slot = match result {
            BuilderResult::Success => &mut self.counts.successes,
            BuilderResult::Failure => &mut self.counts.failures,
            BuilderResult::Exception => &mut self.counts.exceptions,
            BuilderResult::Unknown => &mut self.counts.unknown,
        };
        *slot = slot.saturating_add(1);
        self
    }

    pub fn build(&self) -> BuildCounts {
        self.counts
    }
}

impl FromIterator<BuilderResult> for BuildCounts {
    fn from_iter<I: IntoIterator<Item = BuilderResult>>(iter: I) -> Self {
        let mut builder = BuildCountsBuilder::new();
        for result in iter {
            builder.record(result);
        }
        builder.build()
    }
}

/// Renders the console summary block.
impl fmt::Display for BuildCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Successful Builders: {}", self.successes)?;
        writeln!(f, "Failing Builders: {}", self.failures)?;
        write!(f, "Infra Failures: {}", self.exceptions)?;
        if self.unknown > 0 {
            write!(f, "\nUnknown Builder States: {}", self.unknown)?;
        }
        Ok(())
    }
}
