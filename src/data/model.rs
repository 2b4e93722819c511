use std::path::{Path, PathBuf};

use serde::Serialize;

// ---------------------------------------------------------------------------
// Sample – one observation from a matching log line
// ---------------------------------------------------------------------------

/// A single (count, rate) observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sample {
    /// Spawned object count at the time of the log line.
    pub count: u64,
    /// Frames per second reported on the same line.
    pub fps: f64,
}

// ---------------------------------------------------------------------------
// StressSeries – the complete parsed log
// ---------------------------------------------------------------------------

/// Parallel count / FPS sequences in file order.
#[derive(Debug, Clone, PartialEq)]
pub struct StressSeries {
    /// Spawned object counts (x).
    pub counts: Vec<u64>,
    /// FPS values (y) – same length as `counts`.
    pub rates: Vec<f64>,
    /// File the series was parsed from.
    pub source: PathBuf,
}

impl StressSeries {
    pub fn new(source: &Path, counts: Vec<u64>, rates: Vec<f64>) -> Self {
        debug_assert_eq!(counts.len(), rates.len());
        StressSeries {
            counts,
            rates,
            source: source.to_path_buf(),
        }
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Whether the log contained no matching lines.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Iterate samples in file order.
    pub fn samples(&self) -> impl Iterator<Item = Sample> + '_ {
        self.counts
            .iter()
            .zip(self.rates.iter())
            .map(|(&count, &fps)| Sample { count, fps })
    }

    /// `[x, y]` pairs ready for plotting.
    pub fn points(&self) -> Vec<[f64; 2]> {
        self.samples().map(|s| [s.count as f64, s.fps]).collect()
    }

    /// Summary shown in the top bar. `None` for an empty series.
    pub fn summary(&self) -> Option<SeriesSummary> {
        if self.is_empty() {
            return None;
        }
        let min_fps = self.rates.iter().cloned().fold(f64::INFINITY, f64::min);
        let max_fps = self.rates.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let mean_fps = self.rates.iter().sum::<f64>() / self.rates.len() as f64;
        let min_count = self.counts.iter().copied().min()?;
        let max_count = self.counts.iter().copied().max()?;
        Some(SeriesSummary {
            samples: self.len(),
            min_count,
            max_count,
            min_fps,
            max_fps,
            mean_fps,
        })
    }
}

// ---------------------------------------------------------------------------
// SeriesSummary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesSummary {
    pub samples: usize,
    pub min_count: u64,
    pub max_count: u64,
    pub min_fps: f64,
    pub max_fps: f64,
    pub mean_fps: f64,
}

impl std::fmt::Display for SeriesSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} samples, objects {}–{}, FPS min {:.1} / mean {:.1} / max {:.1}",
            self.samples, self.min_count, self.max_count, self.min_fps, self.mean_fps, self.max_fps
        )
    }
}
