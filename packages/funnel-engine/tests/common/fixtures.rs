//! Test fixtures

use chrono::{DateTime, TimeZone, Utc};
use funnel_storage::{ChargeStatus, EntitySnapshot, Platform};

use super::builders::{RideBuilder, SnapshotBuilder};

/// 2024-03-01 08:00:00 UTC
pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap()
}

/// Small dataset covering every stage and the usual edge cases
///
/// - d1 (ios, 18-24): u1 with a completed, paid (Denied then Approved),
///   twice-reviewed ride r1 and a cancelled ride r2 (4 min wait)
/// - d2 (android, 25-34): u2 with an accepted ride r3 cancelled after 12 min
/// - d3 (ios, no age range): u3 signed up, no rides
/// - d4 (web): no signup
/// - d5 (no platform): no signup
/// - orphans: signup for a missing download, transaction and review for a
///   missing ride
pub fn canonical_snapshot() -> EntitySnapshot {
    SnapshotBuilder::new()
        .with_download("d1", Some(Platform::Ios))
        .with_download("d2", Some(Platform::Android))
        .with_download("d3", Some(Platform::Ios))
        .with_download("d4", Some(Platform::Web))
        .with_download("d5", None)
        .with_signup("d1", "u1", Some("18-24"))
        .with_signup("d2", "u2", Some("25-34"))
        .with_signup("d3", "u3", None)
        .with_signup("missing-download", "u9", Some("18-24"))
        .with_ride(RideBuilder::new("r1", "u1").with_driver("drv1").completed(20).build())
        .with_ride(RideBuilder::new("r2", "u1").cancelled(4).build())
        .with_ride(RideBuilder::new("r3", "u2").accepted(2).cancelled(12).build())
        .with_transaction("r1", ChargeStatus::Denied, 18.5)
        .with_transaction("r1", ChargeStatus::Approved, 18.5)
        .with_transaction("ghost-ride", ChargeStatus::Approved, 99.0)
        .with_review("r1", "u1", 5)
        .with_review("r1", "u1", 4)
        .with_review("ghost-ride", "u1", 1)
        .build()
}

/// `n` downloads, every `signup_every`-th one signed up with one completed
/// and approved ride; platforms and age ranges rotate
pub fn generated_snapshot(n: usize, signup_every: usize) -> EntitySnapshot {
    let platforms = [Some(Platform::Ios), Some(Platform::Android), Some(Platform::Web), None];
    let ages = [Some("18-24"), Some("25-34"), Some("35-44"), None];

    let mut builder = SnapshotBuilder::new();
    for i in 0..n {
        let key = format!("d{}", i);
        builder = builder.with_download_on_day(&key, platforms[i % platforms.len()], (i % 7) as i64);

        if signup_every > 0 && i % signup_every == 0 {
            let user = format!("u{}", i);
            let ride = format!("r{}", i);
            builder = builder
                .with_signup(&key, &user, ages[i % ages.len()])
                .with_ride(RideBuilder::new(&ride, &user).completed((i % 30) as i64 + 1).build())
                .with_transaction(&ride, ChargeStatus::Approved, 10.0 + (i % 5) as f64);
            if i % 3 == 0 {
                builder = builder.with_review(&ride, &user, 5);
            }
        }
    }
    builder.build()
}
