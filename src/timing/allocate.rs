use crate::{
    config::PacingConfig,
    foundation::error::{ReelError, ReelResult},
    report::QualityWarning,
};

/// Per-slide durations plus any clamping that happened while producing them.
#[derive(Clone, Debug, PartialEq)]
pub struct Allocation {
    /// One strictly positive duration per slide, in slide order.
    pub durations: Vec<f64>,
    /// Time budget the durations were derived from (audio length or the configured default).
    pub budget_secs: f64,
    /// Non-fatal pacing issues.
    pub warnings: Vec<QualityWarning>,
}

impl Allocation {
    /// Sum of all slide durations.
    pub fn total_secs(&self) -> f64 {
        self.durations.iter().sum()
    }
}

/// Resolve the time budget: a present, positive audio duration wins; zero or absent means
/// "no audio" and falls back to `pacing.default_total_secs`.
pub fn budget_secs(audio_duration_secs: Option<f64>, pacing: &PacingConfig) -> ReelResult<f64> {
    match audio_duration_secs {
        None => Ok(pacing.default_total_secs),
        Some(d) if !d.is_finite() || d < 0.0 => Err(ReelError::invalid_input(format!(
            "audio duration must be finite and >= 0 (got {d})"
        ))),
        Some(d) if d == 0.0 => Ok(pacing.default_total_secs),
        Some(d) => Ok(d),
    }
}

/// Spread the time budget across `slide_count` slides.
///
/// The first slide gets `opening_secs`, the last gets `closing_secs`, and the slides in between
/// share what is left evenly, so a non-negative residual is spent exactly. When the residual is
/// used up (the share is zero or negative) every middle slide is clamped to `min_slide_secs` and
/// a [`QualityWarning::DurationClamped`] is recorded. A single slide gets the opening allowance.
#[tracing::instrument(skip(pacing))]
pub fn allocate(
    slide_count: usize,
    audio_duration_secs: Option<f64>,
    pacing: &PacingConfig,
) -> ReelResult<Allocation> {
    if slide_count == 0 {
        return Err(ReelError::invalid_input("no slides to time"));
    }
    pacing.validate()?;
    let budget = budget_secs(audio_duration_secs, pacing)?;
    let floor = pacing.min_slide_secs;

    if slide_count == 1 {
        return Ok(Allocation {
            durations: vec![pacing.opening_secs.max(floor)],
            budget_secs: budget,
            warnings: Vec::new(),
        });
    }

    let middle_count = slide_count - 2;
    let residual = budget - pacing.opening_secs - pacing.closing_secs;
    let mut warnings = Vec::new();

    let mut durations = Vec::with_capacity(slide_count);
    durations.push(pacing.opening_secs);
    if middle_count > 0 {
        let share = residual / middle_count as f64;
        let middle = if share <= 0.0 {
            let w = QualityWarning::DurationClamped {
                slide_count,
                residual_secs: residual,
                requested_secs: share,
                floor_secs: floor,
            };
            w.log();
            warnings.push(w);
            floor
        } else {
            share
        };
        durations.extend(std::iter::repeat_n(middle, middle_count));
    }
    durations.push(pacing.closing_secs);

    tracing::debug!(budget, residual, slide_count, "allocated slide durations");
    Ok(Allocation {
        durations,
        budget_secs: budget,
        warnings,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/timing/allocate.rs"]
mod tests;
