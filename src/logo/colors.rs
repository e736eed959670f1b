//! Dominant-color extraction from team logos. Backgrounds, outlines and
//! gray chrome are filtered away, the rest is quantized and ranked by how
//! often and how vividly it appears.

use std::collections::HashMap;
use std::path::Path;

use image::imageops::FilterType;
use image::DynamicImage;
use tracing::warn;

/// Edge length logos are shrunk to before counting pixels.
const ANALYSIS_SIZE: u32 = 150;

/// Perceived brightness above this is background white.
const MAX_BRIGHTNESS: f64 = 245.0;

/// Perceived brightness below this is outline black.
const MIN_BRIGHTNESS: f64 = 15.0;

/// Mid-brightness pixels under this saturation are gray chrome, not a team
/// color. Dark desaturated colors (navy, maroon) stay in.
const GRAY_SATURATION: f64 = 0.15;
const GRAY_BRIGHTNESS_LO: f64 = 60.0;
const GRAY_BRIGHTNESS_HI: f64 = 200.0;

/// Brightness band kept by the fallback filter when the strict one rejects
/// every pixel.
const FALLBACK_LO: f64 = 20.0;
const FALLBACK_HI: f64 = 240.0;

/// Channels are rounded down to multiples of this before counting.
const QUANT_STEP: u8 = 8;

/// Minimum summed per-channel distance between two reported colors.
const MIN_COLOR_DISTANCE: u32 = 80;

/// Colors reported per logo.
const MAX_COLORS: usize = 3;

/// Read a logo file and extract its dominant colors. Unreadable or
/// undecodable files yield None rather than ending the run.
pub fn extract_logo_colors(path: &Path) -> Option<Vec<String>> {
    match image::open(path) {
        Ok(img) => dominant_colors(&img),
        Err(e) => {
            warn!("Error extracting colors from {}: {e}", path.display());
            None
        }
    }
}

/// Up to MAX_COLORS lowercase "#rrggbb" strings, most dominant first.
/// None when nothing usable remains after filtering.
pub fn dominant_colors(img: &DynamicImage) -> Option<Vec<String>> {
    let small = img
        .resize_exact(ANALYSIS_SIZE, ANALYSIS_SIZE, FilterType::Nearest)
        .to_rgb8();
    let pixels: Vec<(u8, u8, u8)> = small.pixels().map(|p| (p[0], p[1], p[2])).collect();

    let mut usable: Vec<(u8, u8, u8)> =
        pixels.iter().copied().filter(|&p| is_team_color(p)).collect();
    if usable.is_empty() {
        // keep anything that is not flat white or black
        usable = pixels
            .iter()
            .copied()
            .filter(|&p| {
                let b = brightness(p);
                b > FALLBACK_LO && b < FALLBACK_HI
            })
            .collect();
    }
    if usable.is_empty() {
        return None;
    }

    let mut counts: HashMap<(u8, u8, u8), u32> = HashMap::new();
    for p in usable {
        *counts.entry(quantize(p)).or_insert(0) += 1;
    }

    // Frequency weighted toward saturated colors, ties broken by the RGB
    // triple so output is stable between runs.
    let mut scored: Vec<(f64, (u8, u8, u8))> = counts
        .into_iter()
        .map(|(rgb, count)| (count as f64 * (1.0 + saturation(rgb) * 2.0), rgb))
        .collect();
    scored.sort_by(|a, b| {
        b.0.partial_cmp(&a.0)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.1.cmp(&b.1))
    });

    let mut selected: Vec<(u8, u8, u8)> = Vec::new();
    for (_, rgb) in scored {
        let distinct = selected
            .iter()
            .all(|&s| channel_distance(rgb, s) >= MIN_COLOR_DISTANCE);
        if distinct {
            selected.push(rgb);
        }
        if selected.len() >= MAX_COLORS {
            break;
        }
    }

    if selected.is_empty() {
        return None;
    }
    Some(
        selected
            .iter()
            .map(|&(r, g, b)| format!("#{r:02x}{g:02x}{b:02x}"))
            .collect(),
    )
}

/// White backgrounds, black outlines and mid-gray chrome are not team
/// colors.
fn is_team_color(p: (u8, u8, u8)) -> bool {
    let b = brightness(p);
    if b > MAX_BRIGHTNESS || b < MIN_BRIGHTNESS {
        return false;
    }
    !(saturation(p) < GRAY_SATURATION && b > GRAY_BRIGHTNESS_LO && b < GRAY_BRIGHTNESS_HI)
}

/// Perceived brightness, 0-255.
fn brightness((r, g, b): (u8, u8, u8)) -> f64 {
    (r as f64 * 299.0 + g as f64 * 587.0 + b as f64 * 114.0) / 1000.0
}

/// HSV saturation, 0-1.
fn saturation((r, g, b): (u8, u8, u8)) -> f64 {
    let max = r.max(g).max(b) as f64;
    let min = r.min(g).min(b) as f64;
    if max == 0.0 {
        0.0
    } else {
        (max - min) / max
    }
}

fn quantize((r, g, b): (u8, u8, u8)) -> (u8, u8, u8) {
    (r - r % QUANT_STEP, g - g % QUANT_STEP, b - b % QUANT_STEP)
}

fn channel_distance(a: (u8, u8, u8), b: (u8, u8, u8)) -> u32 {
    let d = |x: u8, y: u8| (x as i32 - y as i32).unsigned_abs();
    d(a.0, b.0) + d(a.1, b.1) + d(a.2, b.2)
}
