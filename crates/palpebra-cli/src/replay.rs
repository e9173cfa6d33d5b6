//! `palpebra replay` — run a recorded landmark trace through the blink tracker.

use anyhow::{Context, Result};
use clap::Args;
use palpebra_core::{BlinkConfig, BlinkTracker};
use std::path::PathBuf;

use crate::trace;

#[derive(Args, Debug)]
pub struct ReplayArgs {
    /// Landmark trace file (JSON).
    #[arg(long)]
    pub trace: PathBuf,

    /// Averaged EAR below this counts as a closed-eye frame.
    #[arg(long, default_value_t = BlinkConfig::default().ear_threshold)]
    pub ear_threshold: f32,

    /// Consecutive closed-eye frames required to report a blink.
    #[arg(long, default_value_t = BlinkConfig::default().min_consecutive_frames)]
    pub min_frames: u32,

    /// Emit the summary as JSON only (no per-blink lines).
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: &ReplayArgs) -> Result<()> {
    let frames = trace::load(&args.trace)?;
    tracing::info!(
        frames = frames.len(),
        ear_threshold = args.ear_threshold,
        min_frames = args.min_frames,
        "replaying trace"
    );

    let mut tracker = BlinkTracker::new(BlinkConfig {
        ear_threshold: args.ear_threshold,
        min_consecutive_frames: args.min_frames,
    });

    let mut blink_frames = Vec::new();
    for (index, frame) in frames.iter().enumerate() {
        let blinked = tracker
            .process_frame(&frame.left_points(), &frame.right_points())
            .with_context(|| format!("invalid landmarks at frame {index}"))?;
        if blinked {
            if !args.json {
                println!("blink #{} completed at frame {index}", tracker.total_blinks());
            }
            blink_frames.push(index);
        }
    }

    let summary = serde_json::json!({
        "trace": args.trace.display().to_string(),
        "frames": frames.len(),
        "blinks": tracker.total_blinks(),
        "blink_frames": blink_frames,
        "ear_threshold": args.ear_threshold,
        "min_consecutive_frames": tracker.config().min_consecutive_frames,
    });

    if args.json {
        println!("{summary}");
    } else {
        println!();
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }

    Ok(())
}
