//! Redraw cycle: turns a store snapshot into a chart frame.
//!
//! The x-axis is ordinal: sample `i` in arrival order sits at `x = i`, so
//! gaps in arrival leave no gap on the chart. Tick labels are the time labels
//! of every `step`-th sample, `step = max(1, count / 10)`.

use std::io;

use crate::sample::{Sample, SharedStore};

pub const TITLE: &str = "Real-Time Humidity (green = ON, red = OFF)";
pub const X_LABEL: &str = "Time";
pub const Y_LABEL: &str = "Humidity";

/// Approximate number of labeled x-ticks.
pub const TARGET_TICKS: usize = 10;

/// Labeled position on the x-axis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tick {
    pub position: usize,
    pub label: String,
}

/// Everything needed to paint one chart frame.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotFrame {
    /// `(ordinal, value)` for every sample, drawn as a connected line.
    pub line: Vec<(f64, f64)>,
    /// Markers for samples with flag = 1.
    pub on_points: Vec<(f64, f64)>,
    /// Markers for every other sample.
    pub off_points: Vec<(f64, f64)>,
    pub ticks: Vec<Tick>,
    /// Axis labels spread evenly over `x_bounds`. Lines up with `ticks`;
    /// may carry one trailing blank so the last tick keeps its spacing.
    pub x_labels: Vec<String>,
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
    pub latest: Sample,
}

/// Spacing between labeled ticks for `count` samples.
pub fn tick_step(count: usize) -> usize {
    (count / TARGET_TICKS).max(1)
}

/// Ordinal positions that get a tick label.
pub fn tick_positions(count: usize) -> Vec<usize> {
    (0..count).step_by(tick_step(count)).collect()
}

impl PlotFrame {
    /// Builds a frame from samples in arrival order. Returns `None` when
    /// there is nothing to draw.
    pub fn build(samples: &[Sample]) -> Option<Self> {
        let latest = samples.last()?.clone();
        let count = samples.len();

        let mut line = Vec::with_capacity(count);
        let mut on_points = Vec::new();
        let mut off_points = Vec::new();
        for (i, sample) in samples.iter().enumerate() {
            let point = (i as f64, sample.value as f64);
            line.push(point);
            if sample.is_on() {
                on_points.push(point);
            } else {
                off_points.push(point);
            }
        }

        let step = tick_step(count);
        let ticks: Vec<Tick> = tick_positions(count)
            .into_iter()
            .map(|position| Tick {
                position,
                label: samples[position].label.clone(),
            })
            .collect();

        let mut x_labels: Vec<String> = ticks.iter().map(|t| t.label.clone()).collect();
        let last_tick = ticks.last().map(|t| t.position).unwrap_or(0);
        let x_max = if ticks.len() >= 2 && last_tick == count - 1 {
            last_tick
        } else {
            // Extend the axis by one step so labels stay on their ticks and
            // trailing samples past the last tick remain visible.
            x_labels.push(String::new());
            ticks.len() * step
        };

        Some(Self {
            line,
            on_points,
            off_points,
            ticks,
            x_labels,
            x_bounds: [0.0, x_max as f64],
            y_bounds: y_bounds(samples),
            latest,
        })
    }

    /// Y-axis labels: bottom, middle and top of the visible range.
    pub fn y_labels(&self) -> Vec<String> {
        let [lo, hi] = self.y_bounds;
        [lo, (lo + hi) / 2.0, hi]
            .iter()
            .map(|v| format!("{:.0}", v))
            .collect()
    }
}

/// Value range with a margin so extreme points aren't drawn on the border.
fn y_bounds(samples: &[Sample]) -> [f64; 2] {
    let min = samples.iter().map(|s| s.value).min().unwrap_or(0) as f64;
    let max = samples.iter().map(|s| s.value).max().unwrap_or(0) as f64;
    let pad = ((max - min) * 0.05).max(1.0);
    [min - pad, max + pad]
}

/// Something a [`PlotFrame`] can be painted on.
pub trait PlotSurface {
    /// Paints `frame`, fully replacing whatever was drawn before.
    fn draw(&mut self, frame: &PlotFrame) -> io::Result<()>;
}

/// One redraw cycle. Does nothing and returns `Ok(false)` while the store is
/// empty; otherwise paints the current contents and returns `Ok(true)`.
pub fn redraw(store: &SharedStore, surface: &mut dyn PlotSurface) -> io::Result<bool> {
    let samples = store.snapshot();
    let Some(frame) = PlotFrame::build(&samples) else {
        return Ok(false);
    };
    surface.draw(&frame)?;
    Ok(true)
}
