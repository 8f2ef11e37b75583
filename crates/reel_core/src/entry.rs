use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// Milliseconds since the Unix epoch.
pub type Millis = i64;

/// One remembered search query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchEntry {
    /// Normalized query text (trimmed, truncated, angle brackets escaped).
    pub text: String,
    /// When the query was last run; 0 for entries migrated from the legacy format.
    #[serde(default)]
    pub timestamp: Millis,
}

impl SearchEntry {
    pub fn new(text: impl Into<String>, timestamp: Millis) -> Self {
        Self {
            text: text.into(),
            timestamp,
        }
    }
}

/// What the player reports when something is watched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoInfo {
    pub url: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_name: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub episode_index: u32,
    /// Seconds into the episode, when known.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_seconds"
    )]
    pub playback_position: Option<f64>,
    /// Episode length in seconds, when known.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_seconds"
    )]
    pub duration: Option<f64>,
    /// Any other fields the page reported; stored along with the entry.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One show in the viewing history. Keyed by `title`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewingEntry {
    pub url: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_name: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub episode_index: u32,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_seconds"
    )]
    pub playback_position: Option<f64>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_seconds"
    )]
    pub duration: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub timestamp: Millis,
    /// Fields this crate does not interpret. Kept so rewrites do not strip them.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ViewingEntry {
    pub fn from_video(info: VideoInfo, timestamp: Millis) -> Self {
        Self {
            url: info.url,
            title: info.title,
            source_name: info.source_name,
            episode_index: info.episode_index,
            playback_position: info.playback_position,
            duration: info.duration,
            timestamp,
            extra: info.extra,
        }
    }
}

/// Whole seconds are written as integers (`120`, not `120.0`), matching what
/// the page itself stores. Non-finite values become `null`.
fn serialize_seconds<S>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0;
    match *value {
        Some(secs) if secs.fract() == 0.0 && secs.abs() < MAX_EXACT => {
            serializer.serialize_i64(secs as i64)
        }
        Some(secs) if secs.is_finite() => serializer.serialize_f64(secs),
        _ => serializer.serialize_none(),
    }
}

/// The page writes `null` where it had `NaN` or nothing at all.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_seconds_serialize_as_integers() {
        let entry = ViewingEntry {
            url: "u".to_string(),
            title: "T".to_string(),
            playback_position: Some(120.0),
            duration: Some(1500.5),
            timestamp: 3,
            ..ViewingEntry::default()
        };
        assert_eq!(
            serde_json::to_string(&entry).unwrap(),
            r#"{"url":"u","title":"T","episodeIndex":0,"playbackPosition":120,"duration":1500.5,"timestamp":3}"#
        );
    }

    #[test]
    fn null_index_reads_as_zero_and_unknown_fields_survive() {
        let raw = r#"{"url":"u","title":"T","episodeIndex":null,"timestamp":null,"episodes":["a","b"]}"#;
        let entry: ViewingEntry = serde_json::from_str(raw).unwrap();
        assert_eq!(entry.episode_index, 0);
        assert_eq!(entry.timestamp, 0);
        assert_eq!(entry.extra.get("episodes"), Some(&serde_json::json!(["a", "b"])));
        assert_eq!(
            serde_json::to_string(&entry).unwrap(),
            r#"{"url":"u","title":"T","episodeIndex":0,"timestamp":0,"episodes":["a","b"]}"#
        );
    }
}
