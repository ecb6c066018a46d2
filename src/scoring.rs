/// Per-line accuracy as a percentage of the expected line's code points
/// that were typed correctly at their position.
///
/// Positions the user never reached count against them (they simply never
/// match), while anything typed past the end of the expected line is
/// ignored. An empty expected line scores 0 rather than dividing by zero.
pub fn calculate_accuracy(expected: &str, typed: &str) -> f64 {
    let expected_len = expected.chars().count();
    if expected_len == 0 {
        return 0.0;
    }

    let matches = expected
        .chars()
        .zip(typed.chars())
        .filter(|(e, t)| e == t)
        .count();

    (matches as f64 / expected_len as f64) * 100.0
}
