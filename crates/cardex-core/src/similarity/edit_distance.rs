/// Levenshtein distance over Unicode scalar values with unit costs.
#[must_use]
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a = a.chars().collect::<Vec<_>>();
    let b = b.chars().collect::<Vec<_>>();
    char_distance(&a, &b)
}

pub(super) fn char_distance(a: &[char], b: &[char]) -> usize {
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    // Keep the row as short as the shorter input.
    let (target, source) = if a.len() < b.len() { (a, b) } else { (b, a) };
    let mut row = (0..=target.len()).collect::<Vec<_>>();

    for (i, source_char) in source.iter().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, target_char) in target.iter().enumerate() {
            let cost = usize::from(source_char != target_char);
            let substitution = diagonal + cost;
            let deletion = row[j + 1] + 1;
            let insertion = row[j] + 1;
            diagonal = row[j + 1];
            row[j + 1] = substitution.min(deletion).min(insertion);
        }
    }
    row[target.len()]
}

/// `1 - distance / longer length`; two empty names are identical.
#[must_use]
pub fn name_similarity(a: &str, b: &str) -> f64 {
    let a = a.chars().collect::<Vec<_>>();
    let b = b.chars().collect::<Vec<_>>();
    char_similarity(&a, &b)
}

#[allow(
    clippy::cast_precision_loss,
    reason = "name lengths are far below f64 mantissa precision"
)]
pub(super) fn char_similarity(a: &[char], b: &[char]) -> f64 {
    let longest = a.len().max(b.len());
    if longest == 0 {
        return 1.0;
    }
    1.0 - char_distance(a, b) as f64 / longest as f64
}
