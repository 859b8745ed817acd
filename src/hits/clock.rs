use super::HitError;

/// Value of [`HitCollection::earliest_time`](super::HitCollection::earliest_time) when there are
/// no hits. Never a valid physical time.
pub const NO_HITS: f64 = f64::INFINITY;

/// Relative distance from a bin edge below which a time snaps onto that edge.
pub const BIN_EDGE_TOLERANCE: f64 = 1e-9;

/// Physical time (ns) represented by one time-bin.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "f64", into = "f64")
)]
pub struct ClockUnit(f64);

impl Default for ClockUnit {
    fn default() -> Self {
        Self(1.0)
    }
}

impl ClockUnit {
    pub fn new(ns_per_bin: f64) -> Result<Self, HitError> {
        if ns_per_bin.is_finite() && ns_per_bin > 0.0 {
            Ok(Self(ns_per_bin))
        } else {
            Err(HitError::InvalidClockUnit(ns_per_bin))
        }
    }

    pub fn ns_per_bin(self) -> f64 {
        self.0
    }

    pub fn to_time(self, time_bin: u64) -> f64 {
        time_bin as f64 * self.0
    }

    /// The bin containing `time_ns`; bins are half-open `[k·unit, (k+1)·unit)`.
    ///
    /// Times within a relative [`BIN_EDGE_TOLERANCE`] of a bin edge fall into the bin starting at
    /// that edge, so `quantize(to_time(k)) == k` despite rounding in the division.
    pub fn quantize(self, time_ns: f64) -> Result<u64, HitError> {
        let scaled = time_ns / self.0;
        let edge = scaled.round();
        let bin = if (scaled - edge).abs() <= BIN_EDGE_TOLERANCE * edge.max(1.0) {
            edge
        } else {
            scaled.floor()
        };
        if !time_ns.is_finite() || time_ns < 0.0 || bin >= u64::MAX as f64 {
            return Err(HitError::InvalidTime(time_ns));
        }
        Ok(bin as u64)
    }
}

impl TryFrom<f64> for ClockUnit {
    type Error = HitError;

    fn try_from(ns_per_bin: f64) -> Result<Self, Self::Error> {
        Self::new(ns_per_bin)
    }
}

impl From<ClockUnit> for f64 {
    fn from(unit: ClockUnit) -> Self {
        unit.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0.0, 0)]
    #[case(0.24, 0)]
    #[case(0.25, 1)]
    #[case(10.1, 40)]
    #[case(0.9999999999, 4)]
    fn test_quantize(#[case] time_ns: f64, #[case] bin: u64) {
        let unit = ClockUnit::new(0.25).unwrap();
        assert_eq!(unit.quantize(time_ns), Ok(bin));
    }

    #[rstest]
    #[case(0.1, 0.3, 3)]
    #[case(0.1, 0.7, 7)]
    #[case(0.3, 0.9, 3)]
    #[case(0.1, 0.29, 2)]
    fn test_quantize_bin_edges(#[case] unit: f64, #[case] time_ns: f64, #[case] bin: u64) {
        let unit = ClockUnit::new(unit).unwrap();
        assert_eq!(unit.quantize(time_ns), Ok(bin));
        assert_eq!(unit.quantize(unit.to_time(bin)), Ok(bin));
    }

    #[rstest]
    #[case(-0.5)]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    #[case(1e300)]
    fn test_quantize_rejects(#[case] time_ns: f64) {
        assert!(matches!(
            ClockUnit::default().quantize(time_ns),
            Err(HitError::InvalidTime(_))
        ));
    }

    #[test]
    fn test_invalid_unit() {
        assert_eq!(ClockUnit::new(0.0), Err(HitError::InvalidClockUnit(0.0)));
        assert!(ClockUnit::new(-1.0).is_err());
        assert!(ClockUnit::new(f64::NAN).is_err());
        assert_eq!(ClockUnit::default().to_time(3), 3.0);
    }
}
