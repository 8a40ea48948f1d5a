//! Score to color mapping for board edges
//!
//! Edges are colored on a fixed five-stop gradient going from red (worst
//! match) through orange and yellow to green (best match). The gradient is
//! indexed by match quality, `1 - score`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    fn lerp(self, other: Rgb, t: f64) -> Rgb {
        let channel = |a: u8, b: u8| -> u8 {
            let value = a as f64 + (b as f64 - a as f64) * t;
            value.round().clamp(0.0, 255.0) as u8
        };
        Rgb(
            channel(self.0, other.0),
            channel(self.1, other.1),
            channel(self.2, other.2),
        )
    }

    /// `#rrggbb`
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Gradient stops, indexed by match quality
pub const GRADIENT_STOPS: [(f64, Rgb); 5] = [
    (0.0, Rgb(0xff, 0x00, 0x00)),
    (0.25, Rgb(0xff, 0x80, 0x00)),
    (0.5, Rgb(0xff, 0xff, 0x00)),
    (0.75, Rgb(0x80, 0xff, 0x00)),
    (1.0, Rgb(0x00, 0xff, 0x00)),
];

/// Clamp a raw score into [0, 1]; non-finite scores count as the worst match
fn normalized_score(score: f64) -> f64 {
    if score.is_finite() {
        score.clamp(0.0, 1.0)
    } else {
        1.0
    }
}

/// Match percentage shown on an edge: `round((1 - score) * 100)` in [0, 100]
pub fn match_percent(score: f64) -> u8 {
    ((1.0 - normalized_score(score)) * 100.0).round() as u8
}

/// Edge label, e.g. `"82%"`
pub fn match_label(score: f64) -> String {
    format!("{}%", match_percent(score))
}

/// Gradient color for a score
pub fn score_color(score: f64) -> Rgb {
    let quality = 1.0 - normalized_score(score);

    for pair in GRADIENT_STOPS.windows(2) {
        let (lo, lo_color) = pair[0];
        let (hi, hi_color) = pair[1];
        if quality <= hi {
            let t = (quality - lo) / (hi - lo);
            return lo_color.lerp(hi_color, t);
        }
    }

    GRADIENT_STOPS[GRADIENT_STOPS.len() - 1].1
}

/// One entry of the score legend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendStop {
    pub percent: u8,
    pub color: String,
}

/// The legend displayed next to the board, worst to best
pub fn legend() -> Vec<LegendStop> {
    GRADIENT_STOPS
        .iter()
        .map(|(quality, color)| LegendStop {
            percent: (quality * 100.0).round() as u8,
            color: color.to_hex(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_percent() {
        assert_eq!(match_percent(0.0), 100);
        assert_eq!(match_percent(1.0), 0);
        assert_eq!(match_percent(0.5), 50);
        assert_eq!(match_percent(0.123), 88);
    }

    #[test]
    fn test_match_percent_clamps() {
        assert_eq!(match_percent(-0.4), 100);
        assert_eq!(match_percent(1.7), 0);
        assert_eq!(match_percent(f64::NAN), 0);
    }

    #[test]
    fn test_match_label() {
        assert_eq!(match_label(0.0), "100%");
        assert_eq!(match_label(1.0), "0%");
        assert_eq!(match_label(0.5), "50%");
    }

    #[test]
    fn test_colors_at_stops() {
        assert_eq!(score_color(0.0).to_hex(), "#00ff00");
        assert_eq!(score_color(0.25).to_hex(), "#80ff00");
        assert_eq!(score_color(0.5).to_hex(), "#ffff00");
        assert_eq!(score_color(0.75).to_hex(), "#ff8000");
        assert_eq!(score_color(1.0).to_hex(), "#ff0000");
    }

    #[test]
    fn test_color_interpolates_between_stops() {
        // quality 0.125 sits halfway between red and orange
        assert_eq!(score_color(0.875), Rgb(0xff, 0x40, 0x00));
    }

    #[test]
    fn test_legend_runs_worst_to_best() {
        let stops = legend();
        assert_eq!(stops.len(), 5);
        assert_eq!(stops[0].percent, 0);
        assert_eq!(stops[0].color, "#ff0000");
        assert_eq!(stops[4].percent, 100);
        assert_eq!(stops[4].color, "#00ff00");
    }
}
