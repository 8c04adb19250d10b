//! Pure scoring helpers. Every function here is total: degenerate input
//! yields a well-formed number, never an error.

/// Characters per standard word.
pub const CHARS_PER_WORD: f64 = 5.0;

/// Ceiling applied to words per minute so sub-second completions don't spike.
pub const MAX_WPM: f64 = 350.0;

const MILLIS_PER_MINUTE: f64 = 60_000.0;

/// Words per minute for `character_count` characters typed over
/// `elapsed_millis`. Returns 0.0 when either argument is non-positive.
pub fn words_per_minute(character_count: i64, elapsed_millis: i64) -> f64 {
    if character_count <= 0 || elapsed_millis <= 0 {
        return 0.0;
    }

    let words = character_count as f64 / CHARS_PER_WORD;
    let minutes = elapsed_millis as f64 / MILLIS_PER_MINUTE;

    (words / minutes).min(MAX_WPM)
}

/// Positional accuracy of `typed` against `target`, as `(percentage, errors)`.
///
/// Characters are compared index by index with no realignment, so a single
/// missing or extra character shifts every later comparison. Any length
/// difference is counted twice: once as uncorrected positions and once more
/// as extra errors.
pub fn accuracy_percentage(target: &str, typed: &str) -> (f64, usize) {
    if target.is_empty() {
        return (100.0, 0);
    }

    let target_len = target.chars().count();
    let typed_len = typed.chars().count();

    let overlap = target_len.min(typed_len);
    let correct = target
        .chars()
        .zip(typed.chars())
        .filter(|(expected, actual)| expected == actual)
        .count();

    let total = target_len.max(typed_len);
    let extra_errors = total - overlap;
    let errors = (total - correct) + extra_errors;

    let accuracy = ((total as f64 - errors as f64) / total as f64) * 100.0;

    (accuracy.clamp(0.0, 100.0), errors)
}
