use crate::{
    assets::decode::PreparedImage,
    foundation::error::{ReelError, ReelResult},
};

/// One (image, duration, captions) unit of the output video. Immutable once built.
#[derive(Clone, Debug, PartialEq)]
pub struct Slide {
    /// Zero-based position in the show.
    pub index: usize,
    /// Canvas-fitted still.
    pub image: PreparedImage,
    /// Strictly positive duration in seconds.
    pub duration_secs: f64,
    /// Caption lines for this slide, possibly empty.
    pub captions: Vec<String>,
}

/// Zip images, durations and caption groups into slides.
///
/// All three inputs must have the same length and every duration must be finite and positive.
pub fn build_slides(
    images: Vec<PreparedImage>,
    durations: &[f64],
    caption_groups: Vec<Vec<String>>,
) -> ReelResult<Vec<Slide>> {
    if images.is_empty() {
        return Err(ReelError::invalid_input("no slides"));
    }
    if images.len() != durations.len() || images.len() != caption_groups.len() {
        return Err(ReelError::invalid_input(format!(
            "slide inputs disagree: {} images, {} durations, {} caption groups",
            images.len(),
            durations.len(),
            caption_groups.len()
        )));
    }

    images
        .into_iter()
        .zip(durations.iter().copied())
        .zip(caption_groups)
        .enumerate()
        .map(|(index, ((image, duration_secs), captions))| {
            if !duration_secs.is_finite() || duration_secs <= 0.0 {
                return Err(ReelError::invalid_input(format!(
                    "slide {index} duration must be finite and > 0 (got {duration_secs})"
                )));
            }
            Ok(Slide {
                index,
                image,
                duration_secs,
                captions,
            })
        })
        .collect()
}
