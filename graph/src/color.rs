//! Branch color assignment and the HSL paling tiers.
//!
//! Colors are deterministic: the same branch names assigned in the same
//! order always produce the same palette. Semantic branch names map to
//! fixed hues; everything else walks a 12-slot hue wheel that rotates 13°
//! per full cycle so later branches never repeat an exact hue.

use std::collections::{HashMap, HashSet};

/// Saturation (percent) of every assigned branch color.
pub const COLOR_SATURATION: f32 = 80.0;
/// Lightness (percent) of every assigned branch color.
pub const COLOR_LIGHTNESS: f32 = 50.0;
/// Minimum hue distance (degrees) a sequential color keeps from the
/// semantic hues.
pub const HUE_TOLERANCE: f32 = 15.0;

const SEMANTIC_HUES: [f32; 7] = [210.0, 150.0, 240.0, 90.0, 330.0, 0.0, 270.0];

/// Fallback when a color string cannot be parsed.
const FALLBACK_PALE: &str = "#cccccc";

/// Which paling tier to apply; merge is always the most desaturated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaleKind {
    /// Mild fade for commits that only exist on the remote.
    Remote,
    /// Strong fade for commits re-attributed to a virtual merge branch.
    Merge,
}

/// Strip the remote prefix so a branch and its remote counterpart share
/// a color.
pub fn normalize_branch_name(name: &str) -> &str {
    name.strip_prefix("origin/").unwrap_or(name)
}

/// Fixed hue for well-known branch names and prefixes.
pub fn semantic_hue(branch_name: &str) -> Option<f32> {
    match branch_name {
        "main" | "master" => Some(210.0),
        "develop" => Some(150.0),
        "staging" => Some(240.0),
        _ if branch_name.starts_with("feature/") => Some(90.0),
        _ if branch_name.starts_with("hotfix/") => Some(330.0),
        _ if branch_name.starts_with("bugfix/") => Some(0.0),
        _ if branch_name.starts_with("release/") => Some(270.0),
        _ => None,
    }
}

/// Whether `hue` lies within [`HUE_TOLERANCE`] of any semantic hue,
/// measured on the color circle.
pub fn is_semantic_hue_conflict(hue: f32) -> bool {
    SEMANTIC_HUES.iter().any(|&semantic| {
        let mut diff = (hue - semantic).abs() % 360.0;
        if diff > 180.0 {
            diff = 360.0 - diff;
        }
        diff <= HUE_TOLERANCE
    })
}

fn is_semantic_color(color: &str) -> bool {
    SEMANTIC_HUES
        .iter()
        .any(|&hue| hsl_to_hex(hue, COLOR_SATURATION, COLOR_LIGHTNESS) == color)
}

/// Assigns stable display colors to branches within one ingestion pass.
///
/// Holds the per-pass `used` set and memoization map itself, so separate
/// pipeline runs never share color state.
#[derive(Debug, Default)]
pub struct BranchColorAssigner {
    used: HashSet<String>,
    by_branch: HashMap<String, String>,
}

impl BranchColorAssigner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Color for `branch_name`, assigning one on first sight.
    ///
    /// Memoized by normalized name, so `assign("x") == assign("origin/x")`
    /// regardless of which variant is seen first.
    pub fn assign(&mut self, branch_name: &str) -> String {
        let key = normalize_branch_name(branch_name);
        if let Some(color) = self.by_branch.get(key) {
            return color.clone();
        }

        let color = match semantic_hue(key) {
            Some(hue) => {
                // Semantic colors may be shared across branches of the same
                // family; they skip the collision check by design of the
                // naming scheme.
                let color = hsl_to_hex(hue, COLOR_SATURATION, COLOR_LIGHTNESS);
                self.used.insert(color.clone());
                color
            }
            None => self.next_sequential(),
        };
        self.by_branch.insert(key.to_string(), color.clone());
        color
    }

    pub fn used_colors(&self) -> &HashSet<String> {
        &self.used
    }

    fn next_sequential(&mut self) -> String {
        let mut index = self
            .used
            .iter()
            .filter(|c| !is_semantic_color(c))
            .count();
        let mut attempts = 0;
        loop {
            let base_hue = (index % 12) as f32 * 30.0;
            let rotation = (index / 12) as f32 * 13.0;
            let hue = (base_hue + rotation) % 360.0;
            let color = hsl_to_hex(hue, COLOR_SATURATION, COLOR_LIGHTNESS);

            if !is_semantic_hue_conflict(hue) && !self.used.contains(&color) {
                self.used.insert(color.clone());
                return color;
            }

            index += 1;
            attempts += 1;
            if attempts > 1000 {
                // Palette exhausted; accept the collision rather than loop.
                self.used.insert(color.clone());
                return color;
            }
        }
    }
}

/// Paler variant of `color` for remote or merged-away commits.
pub fn make_color_pale(color: &str, kind: PaleKind) -> String {
    let Some((h, s, l)) = hex_to_hsl(color) else {
        return FALLBACK_PALE.to_string();
    };
    let (s, l) = match kind {
        PaleKind::Remote => (s * 0.8, (l + 0.15).min(0.9)),
        PaleKind::Merge => (s * 0.6, (l + 0.20).min(0.85)),
    };
    hsl_to_hex(h, s * 100.0, l * 100.0)
}

/// Render HSL (hue in degrees, saturation/lightness in percent) as
/// `#rrggbb`.
pub fn hsl_to_hex(h: f32, s: f32, l: f32) -> String {
    let h = (((h % 360.0) + 360.0) % 360.0) / 360.0;
    let s = (s / 100.0).clamp(0.0, 1.0);
    let l = (l / 100.0).clamp(0.0, 1.0);

    let (r, g, b) = if s == 0.0 {
        (l, l, l)
    } else {
        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;
        (
            hue_to_rgb(p, q, h + 1.0 / 3.0),
            hue_to_rgb(p, q, h),
            hue_to_rgb(p, q, h - 1.0 / 3.0),
        )
    };

    format!(
        "#{:02x}{:02x}{:02x}",
        (r * 255.0).round() as u8,
        (g * 255.0).round() as u8,
        (b * 255.0).round() as u8
    )
}

/// Parse `#rrggbb` into (hue degrees, saturation 0..1, lightness 0..1).
pub fn hex_to_hsl(hex: &str) -> Option<(f32, f32, f32)> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()? as f32 / 255.0;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()? as f32 / 255.0;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()? as f32 / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    if (max - min).abs() < f32::EPSILON {
        return Some((0.0, 0.0, l));
    }

    let d = max - min;
    let s = if l > 0.5 {
        d / (2.0 - max - min)
    } else {
        d / (max + min)
    };
    let h = if (max - r).abs() < f32::EPSILON {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if (max - g).abs() < f32::EPSILON {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    } * 60.0;

    Some((h, s, l))
}

fn hue_to_rgb(p: f32, q: f32, mut t: f32) -> f32 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}
