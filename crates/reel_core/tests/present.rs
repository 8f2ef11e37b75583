use chrono::{FixedOffset, TimeZone, Utc};
use pretty_assertions::assert_eq;
use reel_core::present::{
    format_playback_time, playback_progress, relative_time_label_in, resume_url,
};

const MINUTE: i64 = 60_000;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;

#[test]
fn relative_labels_follow_thresholds() {
    let now = 1_700_000_000_000;
    assert_eq!(relative_time_label_in(now, now, &Utc), "just now");
    assert_eq!(relative_time_label_in(now - 59_999, now, &Utc), "just now");
    assert_eq!(relative_time_label_in(now - MINUTE, now, &Utc), "1 minute ago");
    assert_eq!(relative_time_label_in(now - 59 * MINUTE, now, &Utc), "59 minutes ago");
    assert_eq!(relative_time_label_in(now - HOUR, now, &Utc), "1 hour ago");
    assert_eq!(relative_time_label_in(now - 23 * HOUR, now, &Utc), "23 hours ago");
    assert_eq!(relative_time_label_in(now - DAY, now, &Utc), "1 day ago");
    assert_eq!(relative_time_label_in(now - 6 * DAY, now, &Utc), "6 days ago");
}

#[test]
fn future_timestamps_read_as_just_now() {
    let now = 1_700_000_000_000;
    assert_eq!(relative_time_label_in(now + HOUR, now, &Utc), "just now");
}

#[test]
fn old_timestamps_use_absolute_date_in_zone() {
    let at = Utc
        .with_ymd_and_hms(2024, 3, 5, 7, 9, 0)
        .single()
        .expect("valid date")
        .timestamp_millis();
    let now = at + 30 * DAY;
    assert_eq!(relative_time_label_in(at, now, &Utc), "2024-03-05 07:09");

    let plus_two = FixedOffset::east_opt(2 * 3600).expect("valid offset");
    assert_eq!(relative_time_label_in(at, now, &plus_two), "2024-03-05 09:09");
}

#[test]
fn playback_time_is_floor_divided_and_padded() {
    assert_eq!(format_playback_time(0.0), "00:00");
    assert_eq!(format_playback_time(f64::NAN), "00:00");
    assert_eq!(format_playback_time(-4.0), "00:00");
    assert_eq!(format_playback_time(59.99), "00:59");
    assert_eq!(format_playback_time(61.5), "01:01");
    assert_eq!(format_playback_time(6000.0), "100:00");
}

#[test]
fn progress_only_between_threshold_and_near_end() {
    assert_eq!(playback_progress(Some(10.0), Some(100.0)), None);
    assert_eq!(playback_progress(Some(95.0), Some(100.0)), None);
    assert_eq!(playback_progress(Some(50.0), None), None);
    assert_eq!(playback_progress(None, Some(100.0)), None);
    assert_eq!(playback_progress(Some(50.0), Some(0.0)), None);

    let progress = playback_progress(Some(10.5), Some(100.0)).expect("shown");
    assert_eq!(progress.percent, 11);
    assert_eq!(progress.position, "00:10");
    assert_eq!(progress.duration, "01:40");
}

#[test]
fn resume_extends_existing_query() {
    assert_eq!(
        resume_url("player.html", "player.html?id=1", "T", 2, Some(42.7)),
        "player.html?id=1&index=2&position=42"
    );
    // Existing index wins, first episode and short positions add nothing.
    assert_eq!(
        resume_url("player.html", "player.html?id=1&index=4", "T", 2, Some(5.0)),
        "player.html?id=1&index=4"
    );
    assert_eq!(
        resume_url("player.html", "watch?id=1", "T", 0, None),
        "watch?id=1"
    );
}

#[test]
fn resume_wraps_bare_url_in_player_link() {
    assert_eq!(
        resume_url("player.html", "https://cdn/a b.mp4", "Show & Tell", 0, Some(11.0)),
        "player.html?url=https%3A%2F%2Fcdn%2Fa+b.mp4&title=Show+%26+Tell&index=0&position=11"
    );
    assert_eq!(
        resume_url("play.html", "https://cdn/x", "X", 3, None),
        "play.html?url=https%3A%2F%2Fcdn%2Fx&title=X&index=3"
    );
}
