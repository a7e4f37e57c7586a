//! Non-fatal quality warnings surfaced to the caller.

/// A condition the pipeline recovered from but that the caller should know about.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QualityWarning {
    /// Middle slides would have received a zero or negative share; they were clamped up to the floor.
    DurationClamped {
        /// Total slides in the show.
        slide_count: usize,
        /// Time left for middle slides after the fixed allowances (negative or tiny).
        residual_secs: f64,
        /// Share each middle slide would have received.
        requested_secs: f64,
        /// Duration actually assigned to each middle slide.
        floor_secs: f64,
    },
    /// A slide's caption could not be rendered; the slide shows the plain photo.
    CaptionDropped {
        /// Zero-based slide index.
        slide_index: usize,
        /// Underlying failure.
        reason: String,
    },
    /// An audio bed was expected but could not be used; the video is silent.
    AudioMissing {
        /// Why the audio was dropped.
        reason: String,
    },
}

impl QualityWarning {
    /// Emit this warning through `tracing`.
    pub fn log(&self) {
        match self {
            Self::DurationClamped {
                slide_count,
                residual_secs,
                requested_secs,
                floor_secs,
            } => tracing::warn!(
                slide_count,
                residual_secs,
                requested_secs,
                floor_secs,
                "audio too short for slide count; middle slides clamped to floor"
            ),
            Self::CaptionDropped {
                slide_index,
                reason,
            } => tracing::warn!(
                slide_index,
                %reason,
                "caption could not be rendered; using plain photo"
            ),
            Self::AudioMissing { reason } => {
                tracing::warn!(%reason, "rendering without audio")
            }
        }
    }
}

impl std::fmt::Display for QualityWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DurationClamped {
                slide_count,
                residual_secs,
                requested_secs,
                floor_secs,
            } => write!(
                f,
                "{slide_count} slides do not fit the audio (residual {residual_secs:.2}s, \
                 {requested_secs:.2}s per middle slide); clamped to {floor_secs:.2}s"
            ),
            Self::CaptionDropped {
                slide_index,
                reason,
            } => write!(f, "slide {slide_index}: caption dropped ({reason})"),
            Self::AudioMissing { reason } => write!(f, "no audio: {reason}"),
        }
    }
}
