//! Target placement
//!
//! Picks a random size and position for the next target so the whole shape
//! stays on the playfield, clear of the header inset and the margins.

use glam::Vec2;
use rand::Rng;

use super::state::{Bounds, Target};
use crate::settings::Settings;

/// Uniform draw from `[lo, hi]`, collapsing to `lo` when the range is empty
fn draw<R: Rng + ?Sized>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    if hi > lo { rng.random_range(lo..=hi) } else { lo }
}

/// Place a new target inside `bounds`
///
/// The playable height is `settings.play_area_fraction * bounds.height`; the
/// area below it belongs to the host's controls. When the playfield is too
/// small for the drawn size the axis collapses to its lower bound instead of
/// failing.
pub fn place<R: Rng + ?Sized>(bounds: &Bounds, settings: &Settings, rng: &mut R) -> Target {
    let bounds = bounds.sanitized();

    let size = draw(rng, settings.size_min, settings.size_max);
    let half = size / 2.0;

    let min_x = half + bounds.margin;
    let max_x = bounds.width - half - bounds.margin;

    let play_height = bounds.height * settings.play_area_fraction;
    let min_y = half + bounds.margin + bounds.reserved_top;
    let max_y = play_height - half - bounds.margin;

    let x = draw(rng, min_x, max_x);
    let y = draw(rng, min_y, max_y);
    let hue = rng.random::<f32>();

    Target {
        center: Vec2::new(x, y),
        size,
        hue,
    }
}
