//! Debug tracing. No `log`/`tracing` dependency: "debug mode" is a plain
//! `bool` threaded through each compiler stage (`CompilerConfig.debug`,
//! `set_debug_mode`), and this sink only buffers lines for later
//! inspection when that flag is on.

/// Accumulates trace lines when debug mode is on. A `None` sink (the
/// default, non-debug path) means tracing is a no-op.
#[derive(Debug, Default)]
pub struct TraceSink {
    enabled: bool,
    lines: Vec<String>,
}

impl TraceSink {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            lines: Vec::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn trace(&mut self, line: impl Into<String>) {
        if self.enabled {
            self.lines.push(line.into());
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn extend(&mut self, other: TraceSink) {
        if self.enabled {
            self.lines.extend(other.lines);
        }
    }
}
