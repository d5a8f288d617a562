//! Edit distance for "did you mean" property suggestions.

/// Levenshtein distance with substitutions costing two, so that a
/// transposed pair is cheaper than two unrelated edits.
pub(crate) fn edit_distance(lhs: &str, rhs: &str) -> usize {
    let lhs: Vec<char> = lhs.chars().collect();
    let rhs: Vec<char> = rhs.chars().collect();
    if lhs.is_empty() {
        return rhs.len();
    }
    if rhs.is_empty() {
        return lhs.len();
    }

    let mut previous: Vec<usize> = (0..=rhs.len()).collect();
    let mut current = vec![0; rhs.len() + 1];
    for (i, &a) in lhs.iter().enumerate() {
        current[0] = i + 1;
        for (j, &b) in rhs.iter().enumerate() {
            let substitution = previous[j] + if a == b { 0 } else { 2 };
            current[j + 1] = substitution
                .min(previous[j + 1] + 1)
                .min(current[j] + 1);
        }
        std::mem::swap(&mut previous, &mut current);
    }
    previous[rhs.len()]
}

/// Returns the bound name closest to `name`, if any are bound.
pub(crate) fn closest_name<'a>(name: &str, candidates: &'a [String]) -> Option<&'a str> {
    candidates
        .iter()
        .min_by_key(|candidate| edit_distance(name, candidate))
        .map(String::as_str)
}
