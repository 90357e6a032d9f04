//! Media metadata probing with a timeout and fallback values.

use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use clipforge_core::config::MediaConfig;
use clipforge_core::{ClipForgeError, Result};
use clipforge_timeline::{Clip, ClipKind, ClipProperties, MediaProps};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Probed information about a media source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MediaMetadata {
    /// Duration in seconds
    pub duration: f64,
    pub width: u32,
    pub height: u32,
    pub has_audio: bool,
}

impl MediaMetadata {
    /// Values substituted when probing fails or times out.
    pub fn fallback(config: &MediaConfig) -> Self {
        Self {
            duration: config.fallback_duration,
            width: 0,
            height: 0,
            has_audio: config.fallback_has_audio,
        }
    }
}

/// Result of `probe_with_fallback`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeOutcome {
    pub metadata: MediaMetadata,
    /// True when fallback values were substituted.
    pub fell_back: bool,
}

/// Storage/media collaborator that can read metadata for a source URL.
pub trait MetadataProber {
    fn probe(&self, url: &str) -> impl Future<Output = Result<MediaMetadata>> + Send;
}

/// Probe `url`, substituting fallback metadata on failure or after
/// `config.probe_timeout_secs`. Never fails.
pub async fn probe_with_fallback<P: MetadataProber>(
    prober: &P,
    url: &str,
    config: &MediaConfig,
) -> ProbeOutcome {
    let timeout = Duration::from_secs_f64(config.probe_timeout_secs.max(0.0));
    match tokio::time::timeout(timeout, prober.probe(url)).await {
        Ok(Ok(metadata)) => ProbeOutcome {
            metadata,
            fell_back: false,
        },
        Ok(Err(e)) => {
            warn!(url, error = %e, "metadata probe failed, using fallback");
            ProbeOutcome {
                metadata: MediaMetadata::fallback(config),
                fell_back: true,
            }
        }
        Err(_) => {
            warn!(url, timeout_secs = config.probe_timeout_secs, "metadata probe timed out, using fallback");
            ProbeOutcome {
                metadata: MediaMetadata::fallback(config),
                fell_back: true,
            }
        }
    }
}

/// Build a clip for a dropped media source from its probed metadata.
pub fn clip_from_media(
    kind: ClipKind,
    source: impl Into<String>,
    start_time: f64,
    metadata: &MediaMetadata,
) -> Result<Clip> {
    let props = MediaProps::new(source);
    let properties = match kind {
        ClipKind::Video => ClipProperties::Video(props),
        ClipKind::Image => ClipProperties::Image(props),
        ClipKind::Audio => ClipProperties::Audio(props),
        ClipKind::Text => {
            return Err(ClipForgeError::InvalidParameter(
                "text clips have no media source".to_string(),
            ))
        }
    };
    let mut clip = Clip::new(properties, start_time, metadata.duration);
    clip.has_audio = kind != ClipKind::Image && metadata.has_audio;
    Ok(clip)
}

/// Prober answering from a fixed table; unknown URLs fail.
#[derive(Debug, Clone, Default)]
pub struct StaticProber {
    entries: HashMap<String, MediaMetadata>,
}

impl StaticProber {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, url: impl Into<String>, metadata: MediaMetadata) {
        self.entries.insert(url.into(), metadata);
    }
}

impl MetadataProber for StaticProber {
    fn probe(&self, url: &str) -> impl Future<Output = Result<MediaMetadata>> + Send {
        let result = self
            .entries
            .get(url)
            .copied()
            .ok_or_else(|| ClipForgeError::MetadataProbe(format!("no metadata for {url}")));
        async move { result }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StallingProber;

    impl MetadataProber for StallingProber {
        fn probe(&self, _url: &str) -> impl Future<Output = Result<MediaMetadata>> + Send {
            async {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Err(ClipForgeError::Internal("unreachable".into()))
            }
        }
    }

    fn meta(duration: f64, has_audio: bool) -> MediaMetadata {
        MediaMetadata {
            duration,
            width: 1080,
            height: 1920,
            has_audio,
        }
    }

    #[tokio::test]
    async fn test_probe_success() {
        let mut prober = StaticProber::new();
        prober.insert("a.mp4", meta(8.0, false));
        let outcome = probe_with_fallback(&prober, "a.mp4", &MediaConfig::default()).await;
        assert!(!outcome.fell_back);
        assert_eq!(outcome.metadata.duration, 8.0);
    }

    #[tokio::test]
    async fn test_probe_failure_uses_fallback() {
        let prober = StaticProber::new();
        let outcome = probe_with_fallback(&prober, "missing.mp4", &MediaConfig::default()).await;
        assert!(outcome.fell_back);
        assert_eq!(outcome.metadata.duration, 5.0);
        assert!(outcome.metadata.has_audio);
    }

    #[tokio::test]
    async fn test_probe_timeout_uses_fallback() {
        let config = MediaConfig {
            probe_timeout_secs: 0.05,
            ..MediaConfig::default()
        };
        let outcome = probe_with_fallback(&StallingProber, "slow.mp4", &config).await;
        assert!(outcome.fell_back);
        assert_eq!(outcome.metadata.duration, 5.0);
    }

    #[test]
    fn test_clip_from_media() {
        let clip = clip_from_media(ClipKind::Video, "a.mp4", 2.0, &meta(6.0, false)).unwrap();
        assert_eq!(clip.duration, 6.0);
        assert!(!clip.has_audio);
        assert_eq!(clip.source(), Some("a.mp4"));

        let image = clip_from_media(ClipKind::Image, "a.png", 0.0, &meta(5.0, true)).unwrap();
        assert!(!image.has_audio);

        assert!(clip_from_media(ClipKind::Text, "x", 0.0, &meta(1.0, false)).is_err());
    }
}
