//! Adaptive image quality selection.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Priority;

/// Observed network quality.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionQuality {
    /// 2G-class links.
    Slow,
    /// Anything not classified otherwise.
    #[default]
    Normal,
    /// 4G-class links and better.
    Fast,
}

impl ConnectionQuality {
    /// Classifies an effective connection type (`slow-2g`, `2g`, `3g`, `4g`).
    #[must_use]
    pub fn from_effective_type(effective_type: &str) -> Self {
        match effective_type.trim().to_ascii_lowercase().as_str() {
            "slow-2g" | "2g" => Self::Slow,
            "4g" => Self::Fast,
            _ => Self::Normal,
        }
    }

    /// Returns the encoding quality for a tier on this connection.
    #[must_use]
    pub const fn image_quality(self, tier: QualityTier) -> u8 {
        match (self, tier) {
            (Self::Slow, QualityTier::High) => 50,
            (Self::Slow, QualityTier::Normal) => 40,
            (Self::Slow, QualityTier::Low) => 30,
            (Self::Normal, QualityTier::High) => 75,
            (Self::Normal, QualityTier::Normal) => 65,
            (Self::Normal, QualityTier::Low) => 55,
            (Self::Fast, QualityTier::High) => 85,
            (Self::Fast, QualityTier::Normal) => 75,
            (Self::Fast, QualityTier::Low) => 65,
        }
    }
}

impl fmt::Display for ConnectionQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Slow => write!(f, "slow"),
            Self::Normal => write!(f, "normal"),
            Self::Fast => write!(f, "fast"),
        }
    }
}

/// Importance of an image for quality selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QualityTier {
    /// Above the fold.
    High,
    /// Regular content.
    Normal,
    /// Background or far-off content.
    Low,
}

impl From<Priority> for QualityTier {
    fn from(priority: Priority) -> Self {
        match priority {
            Priority::High => Self::High,
            Priority::Low => Self::Low,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("slow-2g", ConnectionQuality::Slow ; "slow_2g")]
    #[test_case("2g", ConnectionQuality::Slow ; "two_g")]
    #[test_case("3g", ConnectionQuality::Normal ; "three_g")]
    #[test_case("4G", ConnectionQuality::Fast ; "four_g_uppercase")]
    #[test_case("", ConnectionQuality::Normal ; "unknown")]
    fn test_from_effective_type(input: &str, expected: ConnectionQuality) {
        assert_eq!(ConnectionQuality::from_effective_type(input), expected);
    }

    #[test_case(ConnectionQuality::Slow, QualityTier::High, 50 ; "slow_high")]
    #[test_case(ConnectionQuality::Slow, QualityTier::Low, 30 ; "slow_low")]
    #[test_case(ConnectionQuality::Normal, QualityTier::Normal, 65 ; "normal_normal")]
    #[test_case(ConnectionQuality::Fast, QualityTier::High, 85 ; "fast_high")]
    #[test_case(ConnectionQuality::Fast, QualityTier::Low, 65 ; "fast_low")]
    fn test_image_quality(connection: ConnectionQuality, tier: QualityTier, expected: u8) {
        assert_eq!(connection.image_quality(tier), expected);
    }

    #[test]
    fn test_tier_from_priority() {
        assert_eq!(QualityTier::from(Priority::High), QualityTier::High);
        assert_eq!(QualityTier::from(Priority::Low), QualityTier::Low);
    }
}
