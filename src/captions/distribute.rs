use crate::foundation::error::{ReelError, ReelResult};

/// Assign ordered caption lines to `slide_count` slides.
///
/// - No lines: every slide gets an empty group.
/// - One slide: that slide gets every line.
/// - At most one line per slide: lines `0..n-1` go one per slide from the front, the final line
///   always lands on the last slide, everything in between stays empty.
/// - More lines than slides: the first `slide_count - 1` slides get equal contiguous chunks of
///   `lines.len() / (slide_count - 1)` lines; whatever is left over goes to the last slide.
///
/// Flattening the result always reproduces `lines` exactly.
#[tracing::instrument(skip(lines), fields(lines = lines.len()))]
pub fn distribute<S>(lines: &[S], slide_count: usize) -> ReelResult<Vec<Vec<String>>>
where
    S: AsRef<str>,
{
    if slide_count == 0 {
        return Err(ReelError::invalid_input("no slides to caption"));
    }

    let owned = |slice: &[S]| -> Vec<String> {
        slice.iter().map(|s| s.as_ref().to_string()).collect()
    };

    if lines.is_empty() {
        return Ok(vec![Vec::new(); slide_count]);
    }
    if slide_count == 1 {
        return Ok(vec![owned(lines)]);
    }

    let mut groups = Vec::with_capacity(slide_count);
    let leading = slide_count - 1;
    if lines.len() <= slide_count {
        let (head, last) = lines.split_at(lines.len() - 1);
        for i in 0..leading {
            match head.get(i) {
                Some(line) => groups.push(vec![line.as_ref().to_string()]),
                None => groups.push(Vec::new()),
            }
        }
        groups.push(owned(last));
    } else {
        let per_slide = lines.len() / leading;
        for chunk in lines.chunks_exact(per_slide).take(leading) {
            groups.push(owned(chunk));
        }
        groups.push(owned(&lines[leading * per_slide..]));
    }

    debug_assert_eq!(groups.len(), slide_count);
    Ok(groups)
}

#[cfg(test)]
#[path = "../../tests/unit/captions/distribute.rs"]
mod tests;
