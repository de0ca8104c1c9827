//! Threshold classifiers for observation fields.
//!
//! The original tier rules had gaps and overlaps at their boundaries: a
//! magnitude in `(2, 3)` matched no tier, and `magnitude == 5` matched two.
//! The tiers here are total and non-overlapping over finite values: gaps are
//! closed into the middle tier and an exact boundary value belongs to the
//! tier whose closed bound names it (so `5.0` is High, not Medium).
//!
//! Records missing the classified field map to no tier and are dropped from
//! categorical aggregations rather than being classified as zero.

use crate::aggregate::Classifier;
use crate::reading::Record;

/// Earthquake magnitude tier: Low `m <= 2`, Medium `2 < m < 5`, High `m >= 5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MagnitudeTier {
    Low,
    Medium,
    High,
}

impl MagnitudeTier {
    pub const ALL: [MagnitudeTier; 3] =
        [MagnitudeTier::Low, MagnitudeTier::Medium, MagnitudeTier::High];

    pub fn classify(magnitude: f64) -> Option<Self> {
        if !magnitude.is_finite() {
            return None;
        }
        Some(if magnitude <= 2.0 {
            MagnitudeTier::Low
        } else if magnitude < 5.0 {
            MagnitudeTier::Medium
        } else {
            MagnitudeTier::High
        })
    }

    pub fn label(&self) -> &'static str {
        match self {
            MagnitudeTier::Low => "Low_Magnitude",
            MagnitudeTier::Medium => "Medium_Magnitude",
            MagnitudeTier::High => "High_Magnitude",
        }
    }
}

/// Daily rainfall tier: Low `r <= 5`, Medium `5 < r < 10`, High `r >= 10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RainfallTier {
    Low,
    Medium,
    High,
}

impl RainfallTier {
    pub const ALL: [RainfallTier; 3] =
        [RainfallTier::Low, RainfallTier::Medium, RainfallTier::High];

    pub fn classify(rain_sum: f64) -> Option<Self> {
        if !rain_sum.is_finite() {
            return None;
        }
        Some(if rain_sum <= 5.0 {
            RainfallTier::Low
        } else if rain_sum < 10.0 {
            RainfallTier::Medium
        } else {
            RainfallTier::High
        })
    }

    pub fn label(&self) -> &'static str {
        match self {
            RainfallTier::Low => "Low_rainfall",
            RainfallTier::Medium => "Medium_rainfall",
            RainfallTier::High => "High_rainfall",
        }
    }
}

/// Station elevation tier, in metres.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElevationTier {
    BelowSeaLevel,
    SeaLevel,
    GroundLevel,
    GroundLevelMid,
    GroundLevelHigh,
}

impl ElevationTier {
    pub const ALL: [ElevationTier; 5] = [
        ElevationTier::BelowSeaLevel,
        ElevationTier::SeaLevel,
        ElevationTier::GroundLevel,
        ElevationTier::GroundLevelMid,
        ElevationTier::GroundLevelHigh,
    ];

    pub fn classify(elevation: f64) -> Option<Self> {
        if !elevation.is_finite() {
            return None;
        }
        Some(if elevation <= 10.0 {
            ElevationTier::BelowSeaLevel
        } else if elevation <= 30.0 {
            ElevationTier::SeaLevel
        } else if elevation <= 60.0 {
            ElevationTier::GroundLevel
        } else if elevation <= 90.0 {
            ElevationTier::GroundLevelMid
        } else {
            ElevationTier::GroundLevelHigh
        })
    }

    pub fn label(&self) -> &'static str {
        match self {
            ElevationTier::BelowSeaLevel => "Below_Sea_Level",
            ElevationTier::SeaLevel => "Sea_Level",
            ElevationTier::GroundLevel => "Ground_Level",
            ElevationTier::GroundLevelMid => "Ground_Level_Mid",
            ElevationTier::GroundLevelHigh => "Ground_Level_High",
        }
    }

    /// Plotting ordinal, 1 (below sea level) to 5 (high ground).
    pub fn ordinal(&self) -> u32 {
        match self {
            ElevationTier::BelowSeaLevel => 1,
            ElevationTier::SeaLevel => 2,
            ElevationTier::GroundLevel => 3,
            ElevationTier::GroundLevelMid => 4,
            ElevationTier::GroundLevelHigh => 5,
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tier| tier.label() == label)
    }
}

/// Time-of-day tier derived from the hour of an `HH:MM...` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeOfDay {
    Morning,
    MidMorning,
    Afternoon,
    Evening,
    Night,
}

impl TimeOfDay {
    pub const ALL: [TimeOfDay; 5] = [
        TimeOfDay::Morning,
        TimeOfDay::MidMorning,
        TimeOfDay::Afternoon,
        TimeOfDay::Evening,
        TimeOfDay::Night,
    ];

    pub fn classify(time: &str) -> Option<Self> {
        let hour: u32 = time.split(':').next()?.trim().parse().ok()?;
        match hour {
            0..=9 => Some(TimeOfDay::Morning),
            10..=12 => Some(TimeOfDay::MidMorning),
            13..=16 => Some(TimeOfDay::Afternoon),
            17..=19 => Some(TimeOfDay::Evening),
            20..=23 => Some(TimeOfDay::Night),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TimeOfDay::Morning => "Morning",
            TimeOfDay::MidMorning => "Mid_Morning",
            TimeOfDay::Afternoon => "Afternoon",
            TimeOfDay::Evening => "Evening",
            TimeOfDay::Night => "Night",
        }
    }
}

/// Sunlight tier from the percentage of a 12-hour day that was sunny:
/// Low `<= 30`, Medium `(30, 60]`, Full `> 60`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SunlightTier {
    Low,
    Medium,
    Full,
}

impl SunlightTier {
    pub const ALL: [SunlightTier; 3] =
        [SunlightTier::Low, SunlightTier::Medium, SunlightTier::Full];

    pub fn classify(sunshine_hours: f64) -> Option<Self> {
        if !sunshine_hours.is_finite() {
            return None;
        }
        let percent = sunshine_hours / 12.0 * 100.0;
        Some(if percent <= 30.0 {
            SunlightTier::Low
        } else if percent <= 60.0 {
            SunlightTier::Medium
        } else {
            SunlightTier::Full
        })
    }

    pub fn label(&self) -> &'static str {
        match self {
            SunlightTier::Low => "Low Sunlight",
            SunlightTier::Medium => "Medium Sunlight",
            SunlightTier::Full => "Full Sunlight",
        }
    }
}

fn magnitude_label(record: &Record) -> Option<&'static str> {
    MagnitudeTier::classify(record.magnitude?).map(|t| t.label())
}

fn rainfall_label(record: &Record) -> Option<&'static str> {
    RainfallTier::classify(record.weather.rain_sum?).map(|t| t.label())
}

fn elevation_label(record: &Record) -> Option<&'static str> {
    ElevationTier::classify(record.elevation?).map(|t| t.label())
}

fn time_of_day_label(record: &Record) -> Option<&'static str> {
    TimeOfDay::classify(record.time.as_deref()?).map(|t| t.label())
}

fn sunlight_label(record: &Record) -> Option<&'static str> {
    let hours = record.weather.sunshine_hours? / 3600.0;
    SunlightTier::classify(hours).map(|t| t.label())
}

pub const MAGNITUDE: Classifier = Classifier {
    labels: &["Low_Magnitude", "Medium_Magnitude", "High_Magnitude"],
    apply: magnitude_label,
};

pub const RAINFALL: Classifier = Classifier {
    labels: &["Low_rainfall", "Medium_rainfall", "High_rainfall"],
    apply: rainfall_label,
};

pub const ELEVATION: Classifier = Classifier {
    labels: &[
        "Below_Sea_Level",
        "Sea_Level",
        "Ground_Level",
        "Ground_Level_Mid",
        "Ground_Level_High",
    ],
    apply: elevation_label,
};

pub const TIME_OF_DAY: Classifier = Classifier {
    labels: &["Morning", "Mid_Morning", "Afternoon", "Evening", "Night"],
    apply: time_of_day_label,
};

pub const SUNLIGHT: Classifier = Classifier {
    labels: &["Low Sunlight", "Medium Sunlight", "Full Sunlight"],
    apply: sunlight_label,
};

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_classify_magnitude_tiers() {
        assert_eq!(MagnitudeTier::classify(1.5), Some(MagnitudeTier::Low));
        assert_eq!(MagnitudeTier::classify(2.0), Some(MagnitudeTier::Low));
        assert_eq!(MagnitudeTier::classify(4.0), Some(MagnitudeTier::Medium));
        assert_eq!(MagnitudeTier::classify(6.0), Some(MagnitudeTier::High));
        assert_eq!(MagnitudeTier::classify(f64::NAN), None);
    }

    #[test]
    fn should_close_the_magnitude_gap_into_medium() {
        // 2.5 matched no tier in the original rules.
        assert_eq!(MagnitudeTier::classify(2.5), Some(MagnitudeTier::Medium));
        assert_eq!(MagnitudeTier::classify(2.0001), Some(MagnitudeTier::Medium));
    }

    #[test]
    fn should_resolve_magnitude_five_to_high() {
        // 5.0 matched both Medium and High in the original rules.
        assert_eq!(MagnitudeTier::classify(5.0), Some(MagnitudeTier::High));
        assert_eq!(MagnitudeTier::classify(4.999), Some(MagnitudeTier::Medium));
    }

    #[test]
    fn should_classify_rainfall_tiers() {
        assert_eq!(RainfallTier::classify(0.0), Some(RainfallTier::Low));
        assert_eq!(RainfallTier::classify(5.0), Some(RainfallTier::Low));
        assert_eq!(RainfallTier::classify(5.5), Some(RainfallTier::Medium));
        assert_eq!(RainfallTier::classify(9.9), Some(RainfallTier::Medium));
        // 10 matched both Medium and High in the original rules.
        assert_eq!(RainfallTier::classify(10.0), Some(RainfallTier::High));
        assert_eq!(RainfallTier::classify(25.0), Some(RainfallTier::High));
    }

    #[test]
    fn should_classify_elevation_tiers() {
        assert_eq!(
            ElevationTier::classify(-3.0),
            Some(ElevationTier::BelowSeaLevel)
        );
        assert_eq!(
            ElevationTier::classify(10.0),
            Some(ElevationTier::BelowSeaLevel)
        );
        // 10.5 fell in a gap in the original integer-bounded rules.
        assert_eq!(ElevationTier::classify(10.5), Some(ElevationTier::SeaLevel));
        assert_eq!(
            ElevationTier::classify(45.0),
            Some(ElevationTier::GroundLevel)
        );
        assert_eq!(
            ElevationTier::classify(90.0),
            Some(ElevationTier::GroundLevelMid)
        );
        assert_eq!(
            ElevationTier::classify(91.0),
            Some(ElevationTier::GroundLevelHigh)
        );
    }

    #[test]
    fn should_round_trip_elevation_labels() {
        for tier in ElevationTier::ALL {
            assert_eq!(ElevationTier::from_label(tier.label()), Some(tier));
        }
        assert_eq!(ElevationTier::from_label("nope"), None);
    }

    #[test]
    fn should_classify_time_of_day() {
        assert_eq!(TimeOfDay::classify("00:15"), Some(TimeOfDay::Morning));
        assert_eq!(TimeOfDay::classify("09:59"), Some(TimeOfDay::Morning));
        assert_eq!(TimeOfDay::classify("10:00"), Some(TimeOfDay::MidMorning));
        assert_eq!(TimeOfDay::classify("13:00:22"), Some(TimeOfDay::Afternoon));
        assert_eq!(TimeOfDay::classify("17:01"), Some(TimeOfDay::Evening));
        assert_eq!(TimeOfDay::classify("23:59"), Some(TimeOfDay::Night));
        assert_eq!(TimeOfDay::classify("24:00"), None);
        assert_eq!(TimeOfDay::classify("noon"), None);
        assert_eq!(TimeOfDay::classify(""), None);
    }

    #[test]
    fn should_classify_sunlight_tiers() {
        assert_eq!(SunlightTier::classify(3.0), Some(SunlightTier::Low));
        assert_eq!(SunlightTier::classify(3.7), Some(SunlightTier::Medium));
        assert_eq!(SunlightTier::classify(6.0), Some(SunlightTier::Medium));
        assert_eq!(SunlightTier::classify(8.0), Some(SunlightTier::Full));
    }

    #[test]
    fn should_drop_records_missing_the_classified_field() {
        let record = Record::default();

        assert_eq!((MAGNITUDE.apply)(&record), None);
        assert_eq!((RAINFALL.apply)(&record), None);
        assert_eq!((ELEVATION.apply)(&record), None);
        assert_eq!((TIME_OF_DAY.apply)(&record), None);
        assert_eq!((SUNLIGHT.apply)(&record), None);
    }

    #[test]
    fn should_keep_classifier_labels_in_tier_order() {
        let labels: Vec<_> = MagnitudeTier::ALL.iter().map(|t| t.label()).collect();
        assert_eq!(MAGNITUDE.labels, labels.as_slice());

        let labels: Vec<_> = ElevationTier::ALL.iter().map(|t| t.label()).collect();
        assert_eq!(ELEVATION.labels, labels.as_slice());

        let labels: Vec<_> = TimeOfDay::ALL.iter().map(|t| t.label()).collect();
        assert_eq!(TIME_OF_DAY.labels, labels.as_slice());
    }
}
