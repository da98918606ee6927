//! Grouping dimensions

use chrono::NaiveDate;
use serde::Serialize;

use funnel_storage::Platform;

use crate::features::lineage::LineageRow;

/// Which columns partition the funnel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DimensionSet {
    /// Single partition
    None,
    /// platform × age_range × download date
    PlatformAgeDate,
    AgeRange,
    Platform,
}

impl DimensionSet {
    /// Extract the grouping key; runs before any stage filter so missing
    /// values form their own group
    pub fn key(&self, row: &LineageRow<'_>) -> DimensionKey {
        match self {
            Self::None => DimensionKey::default(),
            Self::PlatformAgeDate => DimensionKey {
                platform: row.download.platform,
                age_range: row.age_range().map(str::to_string),
                download_date: Some(row.download.download_timestamp.date_naive()),
            },
            Self::AgeRange => DimensionKey {
                age_range: row.age_range().map(str::to_string),
                ..DimensionKey::default()
            },
            Self::Platform => DimensionKey {
                platform: row.download.platform,
                ..DimensionKey::default()
            },
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::PlatformAgeDate => "platform_age_date",
            Self::AgeRange => "age_range",
            Self::Platform => "platform",
        }
    }
}

/// Dimension tuple; unused columns stay `None`
///
/// Orders lexically by (platform, age_range, download_date), `None` first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct DimensionKey {
    pub platform: Option<Platform>,
    pub age_range: Option<String>,
    pub download_date: Option<NaiveDate>,
}

impl DimensionKey {
    pub fn platform(platform: Option<Platform>) -> Self {
        Self {
            platform,
            ..Self::default()
        }
    }

    pub fn age_range(age_range: Option<&str>) -> Self {
        Self {
            age_range: age_range.map(str::to_string),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use funnel_storage::{Download, Signup};

    #[test]
    fn test_key_extraction() {
        let download = Download::new(
            "d1",
            Some(Platform::Android),
            Utc.with_ymd_and_hms(2024, 2, 29, 23, 59, 0).unwrap(),
        );
        let signup = Signup::new("d1", "u1", download.download_timestamp, Some("35-44"));
        let row = LineageRow {
            signup: Some(&signup),
            ..LineageRow::download_only(&download)
        };

        assert_eq!(DimensionSet::None.key(&row), DimensionKey::default());
        assert_eq!(
            DimensionSet::AgeRange.key(&row),
            DimensionKey::age_range(Some("35-44"))
        );
        assert_eq!(
            DimensionSet::Platform.key(&row),
            DimensionKey::platform(Some(Platform::Android))
        );

        let full = DimensionSet::PlatformAgeDate.key(&row);
        assert_eq!(full.download_date, NaiveDate::from_ymd_opt(2024, 2, 29));
    }

    #[test]
    fn test_missing_values_form_own_group() {
        let download = Download::new("d1", None, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        let row = LineageRow::download_only(&download);

        assert_eq!(DimensionSet::AgeRange.key(&row), DimensionKey::age_range(None));
        assert_eq!(DimensionSet::Platform.key(&row), DimensionKey::platform(None));
    }

    #[test]
    fn test_key_ordering_none_first() {
        let mut keys = vec![
            DimensionKey::age_range(Some("25-34")),
            DimensionKey::age_range(None),
            DimensionKey::age_range(Some("18-24")),
        ];
        keys.sort();
        assert_eq!(keys[0].age_range, None);
        assert_eq!(keys[1].age_range.as_deref(), Some("18-24"));
    }
}
