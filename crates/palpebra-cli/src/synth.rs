//! `palpebra synth` — generate a synthetic landmark trace.
//!
//! Produces open-eye geometry with sub-pixel jitter (a static sequence with
//! zero jitter would be an unrealistic input) and evenly spaced closed-eye
//! runs long enough to register as blinks on replay.

use anyhow::{bail, Result};
use clap::Args;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;

use crate::trace::{self, TraceFrame};

/// Eye geometry template: corner distance of the generated eyes, pixels.
const EYE_WIDTH: f32 = 24.0;
/// Lid distance for an open eye (EAR ≈ 0.33 before jitter).
const OPEN_LID: f32 = 8.0;
/// Lid distance for a closed eye (EAR ≈ 0.08 before jitter).
const CLOSED_LID: f32 = 2.0;
/// Uniform per-coordinate jitter, pixels.
const JITTER: f32 = 0.3;

#[derive(Args, Debug)]
pub struct SynthArgs {
    /// Total frames to generate.
    #[arg(long, default_value_t = 120)]
    pub frames: usize,

    /// Number of blinks to embed.
    #[arg(long, default_value_t = 3)]
    pub blinks: usize,

    /// Closed-eye frames per blink.
    #[arg(long, default_value_t = 3)]
    pub blink_len: usize,

    /// Output trace file (JSON).
    #[arg(long)]
    pub out: PathBuf,

    /// RNG seed for reproducible traces.
    #[arg(long)]
    pub seed: Option<u64>,
}

/// Six contour points for one eye at `origin`, with the given lid distance.
fn eye_points(origin: (f32, f32), lid: f32, rng: &mut StdRng) -> Vec<[f32; 2]> {
    let (ox, oy) = origin;
    let h = lid / 2.0;
    let base = [
        [ox, oy],
        [ox + EYE_WIDTH / 3.0, oy + h],
        [ox + 2.0 * EYE_WIDTH / 3.0, oy + h],
        [ox + EYE_WIDTH, oy],
        [ox + 2.0 * EYE_WIDTH / 3.0, oy - h],
        [ox + EYE_WIDTH / 3.0, oy - h],
    ];
    base.iter()
        .map(|&[x, y]| {
            [
                x + rng.gen_range(-JITTER..JITTER),
                y + rng.gen_range(-JITTER..JITTER),
            ]
        })
        .collect()
}

pub fn generate(args: &SynthArgs, rng: &mut StdRng) -> Result<Vec<TraceFrame>> {
    if args.blinks > 0 && args.frames < args.blinks * (args.blink_len + 1) {
        bail!(
            "{} frames cannot hold {} blinks of {} closed frames each \
             (each blink needs an open frame after it)",
            args.frames,
            args.blinks,
            args.blink_len
        );
    }

    // Spread blink runs evenly across the trace.
    let mut closed = vec![false; args.frames];
    if args.blinks > 0 {
        let stride = args.frames / args.blinks;
        for b in 0..args.blinks {
            let start = b * stride + (stride - args.blink_len) / 2;
            for slot in closed.iter_mut().skip(start).take(args.blink_len) {
                *slot = true;
            }
        }
    }

    let frames = closed
        .iter()
        .map(|&is_closed| {
            let lid = if is_closed { CLOSED_LID } else { OPEN_LID };
            TraceFrame {
                left: eye_points((100.0, 80.0), lid, rng),
                right: eye_points((160.0, 80.0), lid, rng),
            }
        })
        .collect();

    Ok(frames)
}

pub fn run(args: &SynthArgs) -> Result<()> {
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let frames = generate(args, &mut rng)?;
    trace::save(&args.out, &frames)?;

    tracing::info!(
        frames = frames.len(),
        blinks = args.blinks,
        out = %args.out.display(),
        "synthetic trace written"
    );
    println!(
        "wrote {} frames ({} embedded blinks) to {}",
        frames.len(),
        args.blinks,
        args.out.display()
    );
    Ok(())
}
