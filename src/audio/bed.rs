use std::path::Path;

use anyhow::Context as _;

use crate::{
    assets::media::{AudioPcm, decode_audio_f32_stereo},
    foundation::error::ReelResult,
    timeline::assemble::{AudioFit, AudioPlan},
};

/// Stretch decoded PCM over exactly `cut_at_secs`.
///
/// `Loop` repeats the whole source back to back; `PlayOnce` copies it once and pads with
/// silence. Either way the result is cut at `round(cut_at_secs × sample_rate)` frames.
pub fn fit_pcm(source: &AudioPcm, fit: AudioFit, cut_at_secs: f64) -> AudioPcm {
    let channels = usize::from(source.channels.max(1));
    let target_frames = (cut_at_secs.max(0.0) * f64::from(source.sample_rate)).round() as usize;
    let target_len = target_frames.saturating_mul(channels);
    let src = &source.interleaved_f32[..source.frames() * channels];

    let mut out = Vec::with_capacity(target_len);
    match fit {
        AudioFit::Loop { .. } if !src.is_empty() => {
            while out.len() < target_len {
                let take = (target_len - out.len()).min(src.len());
                out.extend_from_slice(&src[..take]);
            }
        }
        _ => {
            let take = target_len.min(src.len());
            out.extend_from_slice(&src[..take]);
            out.resize(target_len, 0.0);
        }
    }

    AudioPcm {
        sample_rate: source.sample_rate,
        channels: channels as u16,
        interleaved_f32: out,
    }
}

/// Decode the planned track and fit it to the video.
#[tracing::instrument(skip(plan), fields(path = %plan.track.path.display()))]
pub fn render_bed(plan: &AudioPlan, sample_rate: u32) -> ReelResult<AudioPcm> {
    let decoded = decode_audio_f32_stereo(&plan.track.path, sample_rate)?;
    tracing::debug!(
        decoded_secs = decoded.duration_secs(),
        probed_secs = plan.track.duration_secs,
        fit = ?plan.fit,
        "audio decoded"
    );
    Ok(fit_pcm(&decoded, plan.fit, plan.cut_at_secs))
}

/// Write interleaved samples as raw little-endian `f32`.
pub fn write_f32le_file(samples_interleaved: &[f32], out_path: &Path) -> ReelResult<()> {
    if let Some(parent) = out_path.parent() {
        std::fs::create_dir_all(parent).with_context(|| {
            format!("create audio bed directory '{}'", parent.display())
        })?;
    }

    let mut bytes = Vec::<u8>::with_capacity(samples_interleaved.len() * 4);
    for &sample in samples_interleaved {
        bytes.extend_from_slice(&sample.to_le_bytes());
    }
    std::fs::write(out_path, bytes)
        .with_context(|| format!("write audio bed '{}'", out_path.display()))?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/audio/bed.rs"]
mod tests;
