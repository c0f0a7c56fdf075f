//! Bounded repetition lowering.

use crate::pattern::error::PatternError;
use crate::pattern::patt::Pattern;

impl Pattern {
    /// `p{n}`: matches exactly `n` occurrences.
    ///
    /// `n == 0` lowers to the empty pattern, which matches the empty string.
    pub fn repeat(self, n: u32) -> Result<Pattern, PatternError> {
        let mut out = Pattern::empty();
        for _ in 0..n {
            out = out.seq(self.clone())?;
        }
        Ok(out)
    }

    /// `p{lo..hi}`: matches between `lo` and `hi` occurrences.
    ///
    /// Lowered as `lo` mandatory copies followed by `hi - lo` optional ones.
    /// Callers validate `lo <= hi`.
    pub fn repeat_range(self, lo: u32, hi: u32) -> Result<Pattern, PatternError> {
        debug_assert!(lo <= hi);
        let mut out = self.clone().repeat(lo)?;
        for _ in lo..hi {
            out = out.seq(self.clone().opt())?;
        }
        Ok(out)
    }
}
