use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{
    Deserialize,
    Deserializer,
    Serialize,
};

use crate::errors::InvalidArgumentError;

/// Maximum retention time gap, in minutes, between two consecutive
/// (RT sorted) records for them to be considered the same peak.
///
/// The gap is compared inclusively, so a tolerance of 0.4 links
/// records at 10.0 and 10.4.
///
/// Example:
/// ```
/// use rtconsensus::RtTolerance;
///
/// let tolerance = RtTolerance::default();
/// assert_eq!(tolerance.minutes().to_string(), "0.4");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RtTolerance(Decimal);

impl RtTolerance {
    pub const DEFAULT_MINUTES: Decimal = dec!(0.4);

    pub fn try_new(minutes: Decimal) -> Result<Self, InvalidArgumentError> {
        if minutes <= Decimal::ZERO {
            return Err(InvalidArgumentError::NonPositiveTolerance(
                minutes.to_string(),
            ));
        }
        Ok(Self(minutes))
    }

    pub fn minutes(&self) -> Decimal {
        self.0
    }

    /// Whether `next` is close enough to `previous` to extend a cluster.
    ///
    /// This is a forward difference, not an absolute one; callers iterate
    /// in ascending RT order.
    pub fn links(&self, previous: Decimal, next: Decimal) -> bool {
        next - previous <= self.0
    }
}

impl Default for RtTolerance {
    fn default() -> Self {
        Self(Self::DEFAULT_MINUTES)
    }
}

impl TryFrom<f64> for RtTolerance {
    type Error = InvalidArgumentError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        // Going through the shortest display repr keeps 0.4 as exactly 0.4
        let minutes = value
            .to_string()
            .parse::<Decimal>()
            .map_err(|_| InvalidArgumentError::NonPositiveTolerance(value.to_string()))?;
        Self::try_new(minutes)
    }
}

impl<'de> Deserialize<'de> for RtTolerance {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let minutes = <Decimal as Deserialize>::deserialize(deserializer)?;
        Self::try_new(minutes).map_err(serde::de::Error::custom)
    }
}
