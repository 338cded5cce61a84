//! Bounded score type and the normalization curves used by both scorers.
//!
//! `Score` is an integer in [1,10]. The only ways to build one clamp, so an
//! out-of-range value cannot exist.
//!
//! Hype:   score = round(1 + 9 * (1 - exp(-raw / scale)))      (raw >= 0)
//! Ethics: score = round(clamp(5 + delta_scale * delta, 1, 10))

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Integer score in [1,10].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Score(u8);

impl Score {
    pub const MIN: Score = Score(1);
    pub const MAX: Score = Score(10);
    /// Ethics baseline when nothing matched.
    pub const NEUTRAL: Score = Score(5);

    /// Clamp any integer into range.
    pub fn clamped(v: i64) -> Self {
        Score(v.clamp(1, 10) as u8)
    }

    /// Clamp then round a real value. NaN maps to the minimum.
    pub fn from_f64(v: f64) -> Self {
        if v.is_nan() {
            return Self::MIN;
        }
        let c = v.clamp(1.0, 10.0);
        Score(c.round() as u8)
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for Score {
    fn default() -> Self {
        Self::MIN
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Score> for u8 {
    fn from(s: Score) -> u8 {
        s.0
    }
}

impl TryFrom<i64> for Score {
    type Error = String;

    fn try_from(v: i64) -> Result<Self, Self::Error> {
        if (1..=10).contains(&v) {
            Ok(Score(v as u8))
        } else {
            Err(format!("score {v} outside 1..=10"))
        }
    }
}

impl<'de> Deserialize<'de> for Score {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let v = i64::deserialize(d)?;
        Score::try_from(v).map_err(serde::de::Error::custom)
    }
}

/// Saturating, monotonic map from a non-negative raw hype signal to a score.
pub fn hype_curve(raw: f64, curve_scale: f64) -> Score {
    if !raw.is_finite() || raw <= 0.0 {
        // +inf is a saturated signal, everything else is "no signal"
        return if raw == f64::INFINITY {
            Score::MAX
        } else {
            Score::MIN
        };
    }
    let scale = if curve_scale > 0.0 { curve_scale } else { 1.0 };
    Score::from_f64(1.0 + 9.0 * (1.0 - (-raw / scale).exp()))
}

/// Neutral baseline 5 shifted by the signed ethics delta.
pub fn ethics_curve(delta: f64, delta_scale: f64) -> Score {
    if !delta.is_finite() {
        return if delta > 0.0 {
            Score::MAX
        } else if delta < 0.0 {
            Score::MIN
        } else {
            Score::NEUTRAL
        };
    }
    Score::from_f64(5.0 + delta_scale * delta)
}
