//! Terminal bar chart of a [`Counts`] distribution.

use crate::counts::Counts;
use std::fmt;

const DEFAULT_WIDTH: usize = 40;

pub struct Histogram<'a> {
    counts: &'a Counts,
    width: usize,
}

impl<'a> Histogram<'a> {
    pub fn new(counts: &'a Counts) -> Self {
        Self {
            counts,
            width: DEFAULT_WIDTH,
        }
    }

    /// Length in characters of the longest bar.
    pub fn width(mut self, width: usize) -> Self {
        self.width = width.max(1);
        self
    }
}

impl fmt::Display for Histogram<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.counts.total();
        let peak = match self.counts.most_frequent() {
            Some((_, peak)) if peak > 0 => peak,
            _ => return writeln!(f, "(no counts)"),
        };
        let key_width = self
            .counts
            .iter()
            .map(|(k, _)| k.chars().count())
            .max()
            .unwrap_or(0);

        for (key, count) in self.counts.iter() {
            let bar = (count * self.width).div_ceil(peak);
            let prob = count as f64 / total as f64;
            writeln!(
                f,
                "{key:>key_width$} │{}{} {prob:.3}",
                "█".repeat(bar),
                " ".repeat(self.width - bar),
            )?;
        }
        Ok(())
    }
}
