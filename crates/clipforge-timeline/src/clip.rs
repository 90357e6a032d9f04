//! Clip types for the timeline.

use clipforge_core::{defaults, TimeSpan};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Clip identifier, unique across the whole timeline.
pub type ClipId = Uuid;

/// Kind of clip, derived from its properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClipKind {
    Video,
    Text,
    Image,
    Audio,
}

impl ClipKind {
    /// Clips of this kind are played through a media handle.
    pub fn is_playable(self) -> bool {
        matches!(self, ClipKind::Video | ClipKind::Audio)
    }
}

/// In/out offsets into the source media, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Trim {
    pub start: f64,
    pub end: f64,
}

/// Properties shared by video, image and audio clips.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaProps {
    /// Resolvable source reference
    pub source: String,
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    #[serde(default = "one")]
    pub scale: f32,
    #[serde(default)]
    pub trim: Trim,
}

impl MediaProps {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            x: 0.0,
            y: 0.0,
            scale: 1.0,
            trim: Trim::default(),
        }
    }
}

fn one() -> f32 {
    1.0
}

/// Horizontal alignment of a text overlay relative to its anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

/// Entrance/exit animation of a text overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextAnimation {
    #[default]
    None,
    FadeIn,
    FadeOut,
    SlideLeft,
    SlideRight,
    SlideUp,
    SlideDown,
}

/// Properties of a text overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextProps {
    pub text: String,
    pub font_family: String,
    /// Font size in surface units
    pub size: f32,
    /// Fill color as a hex string
    pub color: String,
    /// Anchor position on the canvas
    pub x: f32,
    pub y: f32,
    pub align: TextAlign,
    pub animation: TextAnimation,
    pub bold: bool,
    pub italic: bool,
    /// Optional background box color as a hex string
    pub background: Option<String>,
}

impl Default for TextProps {
    fn default() -> Self {
        Self {
            text: String::new(),
            font_family: "sans-serif".to_string(),
            size: 48.0,
            color: "#ffffff".to_string(),
            x: 0.0,
            y: 0.0,
            align: TextAlign::Center,
            animation: TextAnimation::None,
            bold: false,
            italic: false,
            background: None,
        }
    }
}

/// Type-tagged properties of a clip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ClipProperties {
    Video(MediaProps),
    Text(TextProps),
    Image(MediaProps),
    Audio(MediaProps),
}

impl ClipProperties {
    pub fn kind(&self) -> ClipKind {
        match self {
            ClipProperties::Video(_) => ClipKind::Video,
            ClipProperties::Text(_) => ClipKind::Text,
            ClipProperties::Image(_) => ClipKind::Image,
            ClipProperties::Audio(_) => ClipKind::Audio,
        }
    }

    /// Media properties for clips backed by a source.
    pub fn media(&self) -> Option<&MediaProps> {
        match self {
            ClipProperties::Video(m) | ClipProperties::Image(m) | ClipProperties::Audio(m) => {
                Some(m)
            }
            ClipProperties::Text(_) => None,
        }
    }

    pub fn media_mut(&mut self) -> Option<&mut MediaProps> {
        match self {
            ClipProperties::Video(m) | ClipProperties::Image(m) | ClipProperties::Audio(m) => {
                Some(m)
            }
            ClipProperties::Text(_) => None,
        }
    }

    pub fn text(&self) -> Option<&TextProps> {
        match self {
            ClipProperties::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn text_mut(&mut self) -> Option<&mut TextProps> {
        match self {
            ClipProperties::Text(t) => Some(t),
            _ => None,
        }
    }
}

/// A timed element on a track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clip {
    /// Unique clip ID
    pub id: ClipId,
    /// Timeline position in seconds
    pub start_time: f64,
    /// Duration on timeline in seconds
    pub duration: f64,
    /// Whether the clip's media carries an audible track
    pub has_audio: bool,
    pub properties: ClipProperties,
}

impl Clip {
    /// Create a clip with a fresh id.
    pub fn new(properties: ClipProperties, start_time: f64, duration: f64) -> Self {
        let has_audio = matches!(properties.kind(), ClipKind::Video | ClipKind::Audio);
        let mut clip = Self {
            id: Uuid::new_v4(),
            start_time,
            duration,
            has_audio,
            properties,
        };
        clip.normalize(defaults::MIN_CLIP_DURATION);
        clip
    }

    /// Create a video clip.
    pub fn video(source: impl Into<String>, start_time: f64, duration: f64) -> Self {
        Self::new(
            ClipProperties::Video(MediaProps::new(source)),
            start_time,
            duration,
        )
    }

    /// Create an image clip.
    pub fn image(source: impl Into<String>, start_time: f64, duration: f64) -> Self {
        Self::new(
            ClipProperties::Image(MediaProps::new(source)),
            start_time,
            duration,
        )
    }

    /// Create an audio clip.
    pub fn audio(source: impl Into<String>, start_time: f64, duration: f64) -> Self {
        Self::new(
            ClipProperties::Audio(MediaProps::new(source)),
            start_time,
            duration,
        )
    }

    /// Create a text overlay clip with default styling.
    pub fn text(text: impl Into<String>, start_time: f64, duration: f64) -> Self {
        Self::new(
            ClipProperties::Text(TextProps {
                text: text.into(),
                ..TextProps::default()
            }),
            start_time,
            duration,
        )
    }

    pub fn kind(&self) -> ClipKind {
        self.properties.kind()
    }

    /// Timeline span `[start, start + duration)`.
    pub fn span(&self) -> TimeSpan {
        TimeSpan::new(self.start_time, self.duration)
    }

    pub fn end_time(&self) -> f64 {
        self.start_time + self.duration
    }

    /// Is the clip active at `time`?
    pub fn contains(&self, time: f64) -> bool {
        self.span().contains(time)
    }

    /// Source reference, if any.
    pub fn source(&self) -> Option<&str> {
        self.properties.media().map(|m| m.source.as_str())
    }

    /// Position inside the source media that corresponds to timeline `time`.
    pub fn local_time(&self, time: f64) -> f64 {
        let trim_start = self.properties.media().map_or(0.0, |m| m.trim.start);
        time - self.start_time + trim_start
    }

    /// Copy of this clip with a fresh id.
    pub fn duplicate(&self) -> Self {
        Self {
            id: Uuid::new_v4(),
            ..self.clone()
        }
    }

    /// Enforce `start_time >= 0` and `duration >= min_duration`.
    pub fn normalize(&mut self, min_duration: f64) {
        if !self.start_time.is_finite() || self.start_time < 0.0 {
            self.start_time = 0.0;
        }
        if !self.duration.is_finite() || self.duration < min_duration {
            self.duration = min_duration;
        }
    }
}

/// Partial update for `TimelineStore::update_clip`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClipPatch {
    pub start_time: Option<f64>,
    pub duration: Option<f64>,
    pub has_audio: Option<bool>,
    pub properties: Option<ClipProperties>,
}

impl ClipPatch {
    pub fn apply(self, clip: &mut Clip) {
        if let Some(start) = self.start_time {
            clip.start_time = start;
        }
        if let Some(duration) = self.duration {
            clip.duration = duration;
        }
        if let Some(has_audio) = self.has_audio {
            clip.has_audio = has_audio;
        }
        if let Some(properties) = self.properties {
            clip.properties = properties;
        }
    }
}
