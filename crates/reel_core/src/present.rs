//! Derived display values for history panels.
//!
//! Everything here is a pure function of entry data plus "now", so renderers
//! never need to touch the clock or the store themselves.

use std::fmt::Display;

use chrono::{Local, TimeZone};
use url::form_urlencoded;

use crate::Millis;

const MINUTE_MS: Millis = 60_000;
const HOUR_MS: Millis = 60 * MINUTE_MS;
const DAY_MS: Millis = 24 * HOUR_MS;
const WEEK_MS: Millis = 7 * DAY_MS;

/// Position must pass this many seconds before it is worth resuming from.
pub const RESUME_THRESHOLD_SECS: f64 = 10.0;
/// Past this fraction of the duration an episode counts as finished.
const FINISHED_FRACTION: f64 = 0.95;

/// Human label for how long ago `timestamp` was, in the local time zone.
pub fn relative_time_label(timestamp: Millis, now: Millis) -> String {
    relative_time_label_in(timestamp, now, &Local)
}

/// Same as [`relative_time_label`] with an explicit zone for the absolute form.
pub fn relative_time_label_in<Tz>(timestamp: Millis, now: Millis, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let diff = now.saturating_sub(timestamp);

    if diff < HOUR_MS {
        let minutes = diff.div_euclid(MINUTE_MS);
        return match minutes {
            m if m <= 0 => "just now".to_string(),
            1 => "1 minute ago".to_string(),
            m => format!("{m} minutes ago"),
        };
    }
    if diff < DAY_MS {
        return plural(diff / HOUR_MS, "hour");
    }
    if diff < WEEK_MS {
        return plural(diff / DAY_MS, "day");
    }

    match tz.timestamp_millis_opt(timestamp).earliest() {
        Some(at) => at.format("%Y-%m-%d %H:%M").to_string(),
        None => String::new(),
    }
}

fn plural(count: Millis, unit: &str) -> String {
    if count == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{count} {unit}s ago")
    }
}

/// `MM:SS`, floor-divided and zero-padded. Unknown or negative input is `00:00`.
pub fn format_playback_time(seconds: f64) -> String {
    if !seconds.is_finite() || seconds <= 0.0 {
        return "00:00".to_string();
    }
    let whole = seconds.floor() as u64;
    format!("{:02}:{:02}", whole / 60, whole % 60)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackProgress {
    pub percent: u32,
    pub position: String,
    pub duration: String,
}

/// Progress worth showing: past the resume threshold and not yet finished.
pub fn playback_progress(
    position: Option<f64>,
    duration: Option<f64>,
) -> Option<PlaybackProgress> {
    let position = position?;
    let duration = duration?;
    if !duration.is_finite()
        || duration <= 0.0
        || position.is_nan()
        || position <= RESUME_THRESHOLD_SECS
        || position >= duration * FINISHED_FRACTION
    {
        return None;
    }
    Some(PlaybackProgress {
        percent: (position / duration * 100.0).round() as u32,
        position: format_playback_time(position),
        duration: format_playback_time(duration),
    })
}

/// Link that resumes `url` at the stored episode and position.
///
/// URLs that already carry a query string are extended in place; bare media
/// URLs are wrapped in a `player_page` link.
pub fn resume_url(
    player_page: &str,
    url: &str,
    title: &str,
    episode_index: u32,
    position: Option<f64>,
) -> String {
    let resume_at = position
        .filter(|p| *p > RESUME_THRESHOLD_SECS)
        .map(|p| p.floor() as u64);

    if url.contains('?') {
        let mut link = url.to_string();
        if !url.contains("index=") && episode_index > 0 {
            link.push_str(&format!("&index={episode_index}"));
        }
        if let Some(at) = resume_at {
            link.push_str(&format!("&position={at}"));
        }
        return link;
    }

    let mut query = form_urlencoded::Serializer::new(String::new());
    query
        .append_pair("url", url)
        .append_pair("title", title)
        .append_pair("index", &episode_index.to_string());
    if let Some(at) = resume_at {
        query.append_pair("position", &at.to_string());
    }
    format!("{player_page}?{}", query.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plural_handles_one() {
        assert_eq!(plural(1, "day"), "1 day ago");
        assert_eq!(plural(3, "day"), "3 days ago");
    }
}
