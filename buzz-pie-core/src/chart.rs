use crate::frequency::FrequencyTable;
use buzz_pie_common::{OTHER_LABEL, WAITING_LABEL};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplaySlice {
    pub label: String,
    pub size: u64,
}

impl DisplaySlice {
    pub fn new(label: impl Into<String>, size: u64) -> Self {
        Self { label: label.into(), size }
    }

    /// Share of `total` in whole percent, rounded to nearest with exact
    /// halves going to the even neighbour (12.5 -> 12, 13.5 -> 14).
    pub fn percent(&self, total: u64) -> u64 {
        if total == 0 {
            return 0;
        }
        (self.size as f64 * 100.0 / total as f64).round_ties_even() as u64
    }
}

/// Slices to draw for the current table.
///
/// Walks categories largest first. A category keeps its own slice when its
/// share reaches `min_share`, or while fewer than two slices are kept; the
/// rest are summed into a trailing "other" slice. A real category that is
/// itself keyed "other" absorbs that remainder, so the label appears once.
/// An empty table yields a single placeholder slice so there is always
/// something to draw.
pub fn display_slices(table: &FrequencyTable, min_share: f64) -> Vec<DisplaySlice> {
    if table.is_empty() {
        return vec![DisplaySlice::new(WAITING_LABEL, 1)];
    }
    let total = table.total() as f64;
    let mut kept = Vec::new();
    let mut other = 0u64;
    for (label, count) in table.sorted() {
        let share = count as f64 / total;
        if share >= min_share || kept.len() < 2 {
            kept.push(DisplaySlice::new(label, count));
        } else {
            other += count;
        }
    }
    if other > 0 {
        match kept.iter_mut().find(|s| s.label == OTHER_LABEL) {
            Some(existing) => existing.size += other,
            None => kept.push(DisplaySlice::new(OTHER_LABEL, other)),
        }
    }
    kept
}

/// Angular extent of one slice, degrees counter-clockwise from the +x axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wedge {
    pub start_deg: f64,
    pub sweep_deg: f64,
}

impl Wedge {
    pub fn mid_deg(&self) -> f64 {
        self.start_deg + self.sweep_deg / 2.0
    }
}

/// Everything needed to draw one frame of the pie.
#[derive(Debug, Clone, Serialize)]
pub struct PieChart {
    pub title: String,
    pub slices: Vec<DisplaySlice>,
    pub total: u64,
    pub start_angle_deg: f64,
    /// No events yet; the single slice is the "waiting" stand-in.
    pub placeholder: bool,
}

impl PieChart {
    pub fn new(field: &str, table: &FrequencyTable, min_share: f64, start_angle_deg: f64) -> Self {
        let slices = display_slices(table, min_share);
        let total = slices.iter().map(|s| s.size).sum();
        Self {
            title: format!("Live Share by '{field}'"),
            slices,
            total,
            start_angle_deg,
            placeholder: table.is_empty(),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.placeholder
    }

    /// True for slices that stand for no single category: the placeholder
    /// and the "other" remainder.
    pub fn is_aggregate(&self, index: usize) -> bool {
        self.placeholder || self.slices.get(index).is_some_and(|s| s.label == OTHER_LABEL)
    }

    /// Wedges laid out counter-clockwise from the fixed start angle.
    pub fn wedges(&self) -> Vec<Wedge> {
        let mut start = self.start_angle_deg;
        self.slices
            .iter()
            .map(|s| {
                let sweep = if self.total == 0 { 0.0 } else { s.size as f64 / self.total as f64 * 360.0 };
                let w = Wedge { start_deg: start, sweep_deg: sweep };
                start += sweep;
                w
            })
            .collect()
    }

    /// Index of the slice covering `angle_deg` (any range, wraps).
    pub fn slice_at(&self, angle_deg: f64) -> Option<usize> {
        if self.total == 0 {
            return None;
        }
        let rel = (angle_deg - self.start_angle_deg).rem_euclid(360.0);
        let mut acc = 0.0;
        for (i, s) in self.slices.iter().enumerate() {
            acc += s.size as f64 / self.total as f64 * 360.0;
            if rel < acc {
                return Some(i);
            }
        }
        // float rounding at the closing edge
        Some(self.slices.len() - 1)
    }

    pub fn percent_label(&self, index: usize) -> String {
        self.slices
            .get(index)
            .map(|s| format!("{}%", s.percent(self.total)))
            .unwrap_or_default()
    }
}
