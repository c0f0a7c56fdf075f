//! Backtrack and return records for the unified match stack.

/// One entry on the unified backtrack/call stack.
///
/// `Choice` pushes a `Backtrack` entry; `Call` pushes a `Return` entry.
/// Failing unwinds to the innermost `Backtrack`, discarding any `Return`
/// entries above it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Frame {
    /// Resumption point pushed by `Choice`.
    Backtrack {
        /// Instruction index to resume at.
        pc: usize,
        /// Subject position to restore.
        pos: usize,
        /// Capture-log length to truncate to.
        cap_height: usize,
    },
    /// Return address pushed by `Call`.
    Return {
        /// Instruction index after the call site.
        pc: usize,
    },
}
