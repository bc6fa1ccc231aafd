//! Output aspect modes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Output shape of a poster.
///
/// Each mode is bound to a fixed output resolution and its own template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AspectMode {
    /// 4:3, rendered at 1600x1200.
    #[default]
    #[serde(alias = "4:3")]
    Landscape,
    /// 3:4, rendered at 1200x1600.
    #[serde(alias = "3:4")]
    Portrait,
}

impl AspectMode {
    /// Fixed poster resolution `(width, height)` for this mode.
    pub const fn output_size(self) -> (u32, u32) {
        match self {
            AspectMode::Landscape => (1600, 1200),
            AspectMode::Portrait => (1200, 1600),
        }
    }

    /// Width divided by height.
    pub fn ratio(self) -> f64 {
        let (w, h) = self.output_size();
        w as f64 / h as f64
    }

    /// The other mode.
    pub fn toggled(self) -> Self {
        match self {
            AspectMode::Landscape => AspectMode::Portrait,
            AspectMode::Portrait => AspectMode::Landscape,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AspectMode::Landscape => "landscape",
            AspectMode::Portrait => "portrait",
        }
    }
}

impl fmt::Display for AspectMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AspectMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "landscape" | "4:3" => Ok(AspectMode::Landscape),
            "portrait" | "3:4" => Ok(AspectMode::Portrait),
            other => Err(format!(
                "Unknown aspect mode: {other}. Use: landscape, portrait"
            )),
        }
    }
}
