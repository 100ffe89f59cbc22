/// Index and value of the largest score.
///
/// Scans left to right, so the first of several equal maxima wins. NaN is
/// never selected; an empty or all-NaN slice yields `None`.
pub fn argmax_and_max(scores: &[f32]) -> Option<(usize, f32)> {
    scores
        .iter()
        .enumerate()
        .filter(|(_, val)| !val.is_nan())
        .fold(None, |best, (i, &val)| match best {
            Some((_, max_val)) if val <= max_val => best,
            _ => Some((i, val)),
        })
}
