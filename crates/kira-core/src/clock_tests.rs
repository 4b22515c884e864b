// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn fake_clock_set_and_now() {
    let fixed = Utc.with_ymd_and_hms(2026, 6, 1, 12, 0, 0).unwrap();
    let clock = FakeClock::new(fixed);
    assert_eq!(clock.now(), fixed);
}

#[test]
fn fake_clock_advance() {
    let clock = FakeClock::default();
    let before = clock.now();
    clock.advance(chrono::Duration::seconds(30));
    assert_eq!(clock.now(), before + chrono::Duration::seconds(30));
}

#[test]
fn fake_clock_is_shared_across_clones() {
    let clock = FakeClock::default();
    let clone = clock.clone();
    clone.advance(chrono::Duration::minutes(5));
    assert_eq!(clock.now(), clone.now());
}

#[test]
fn system_clock_falls_back_on_invalid_tz() {
    let clock = SystemClock::new("Not/A_Real_Zone");
    assert_eq!(clock.tz(), DEFAULT_TZ.parse::<Tz>().unwrap());
}

#[test]
fn system_clock_accepts_valid_tz() {
    let clock = SystemClock::new("America/New_York");
    assert_eq!(clock.tz().to_string(), "America/New_York");
}

#[test]
fn epoch_ms_is_non_negative() {
    let clock = FakeClock::default();
    assert!(clock.epoch_ms() > 0);
}
