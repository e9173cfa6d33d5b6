//! On-disk landmark trace format.
//!
//! A trace is a JSON array of frames; each frame carries both eyes as
//! `[x, y]` pairs in the 6-point anatomical order. Traces are how recorded
//! or synthetic landmark streams get replayed through the tracker offline.

use anyhow::{Context, Result};
use palpebra_core::Point2;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// One frame of a landmark trace.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TraceFrame {
    pub left: Vec<[f32; 2]>,
    pub right: Vec<[f32; 2]>,
}

impl TraceFrame {
    pub fn left_points(&self) -> Vec<Point2> {
        self.left.iter().map(|&[x, y]| Point2::new(x, y)).collect()
    }

    pub fn right_points(&self) -> Vec<Point2> {
        self.right.iter().map(|&[x, y]| Point2::new(x, y)).collect()
    }
}

pub fn load(path: &Path) -> Result<Vec<TraceFrame>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read trace {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse trace {}", path.display()))
}

pub fn save(path: &Path, frames: &[TraceFrame]) -> Result<()> {
    let json = serde_json::to_string_pretty(frames)?;
    fs::write(path, json).with_context(|| format!("failed to write trace {}", path.display()))
}
