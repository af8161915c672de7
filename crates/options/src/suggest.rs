/// Minimum Jaro similarity for a "did you mean" hint.
pub const SUGGESTION_THRESHOLD: f64 = 0.7;

/// Best candidate whose Jaro similarity to `key` exceeds the threshold.
/// Ties keep the earliest candidate.
pub fn closest_match<'a, I>(key: &str, candidates: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut best: Option<(&'a str, f64)> = None;
    for candidate in candidates {
        if candidate == key {
            continue;
        }
        let score = strsim::jaro(key, candidate);
        if score <= SUGGESTION_THRESHOLD {
            continue;
        }
        if best.map_or(true, |(_, s)| score > s) {
            best = Some((candidate, score));
        }
    }
    best.map(|(c, _)| c)
}

#[cfg(test)]
mod tests {
    use super::closest_match;

    #[test]
    fn finds_typo() {
        let keys = ["temperature", "top_p", "max_tokens"];
        assert_eq!(closest_match("temprature", keys), Some("temperature"));
        assert_eq!(closest_match("max_token", keys), Some("max_tokens"));
    }

    #[test]
    fn unrelated_key_has_no_match() {
        assert_eq!(closest_match("zzz", ["temperature", "seed"]), None);
    }
}
