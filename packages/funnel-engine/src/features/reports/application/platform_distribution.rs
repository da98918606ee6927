//! Download share per platform

use rustc_hash::{FxHashMap, FxHashSet};

use funnel_storage::{Download, Platform};

use crate::features::reports::domain::PlatformDistributionRow;
use crate::shared::utils::{percent_of, percent_string};

/// `platform_distribution`, sorted by download_count desc then platform
///
/// Downloads without a platform form their own row. No downloads, no rows.
pub fn platform_distribution(downloads: &[Download]) -> Vec<PlatformDistributionRow> {
    let mut keys_by_platform: FxHashMap<Option<Platform>, FxHashSet<&str>> = FxHashMap::default();
    for download in downloads {
        keys_by_platform
            .entry(download.platform)
            .or_default()
            .insert(download.download_key.as_str());
    }

    let total: u64 = keys_by_platform.values().map(|keys| keys.len() as u64).sum();

    let mut rows: Vec<PlatformDistributionRow> = keys_by_platform
        .into_iter()
        .filter_map(|(platform, keys)| {
            let count = keys.len() as u64;
            percent_of(count as f64, total as f64).map(|pct| PlatformDistributionRow {
                platform,
                download_count: count,
                total_downloads: total,
                pct_of_downloads_string: percent_string(pct),
            })
        })
        .collect();

    rows.sort_by(|a, b| {
        b.download_count
            .cmp(&a.download_count)
            .then(a.platform.cmp(&b.platform))
    });
    rows
}
