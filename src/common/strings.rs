/// Returns the candidates starting with `prefix`, in their original order
/// and without duplicates. Comparison is case-sensitive.
pub fn match_prefix<S: AsRef<str>>(prefix: &str, candidates: &[S]) -> Vec<String> {
    let mut matches: Vec<String> = Vec::new();
    for candidate in candidates {
        let candidate = candidate.as_ref();
        if candidate.starts_with(prefix) && !matches.iter().any(|m| m == candidate) {
            matches.push(candidate.to_owned());
        }
    }

    matches
}

/// The longest string that is a prefix of every entry in `strings`.
pub fn longest_common_prefix<S: AsRef<str>>(strings: &[S]) -> String {
    let (first, rest) = match strings.split_first() {
        Some(split) => split,
        None => return String::new(),
    };

    let mut prefix = first.as_ref();
    for s in rest {
        let len = prefix
            .char_indices()
            .zip(s.as_ref().chars())
            .take_while(|((_, a), b)| a == b)
            .last()
            .map(|((i, ch), _)| i + ch.len_utf8())
            .unwrap_or(0);

        prefix = &prefix[..len];
        if prefix.is_empty() {
            break;
        }
    }

    prefix.to_owned()
}

/// The longest common prefix of `matches` and whether it resolves to exactly
/// one candidate.
pub fn longest_match<S: AsRef<str>>(matches: &[S]) -> (String, bool) {
    let lcp = longest_common_prefix(matches);
    let exact = !matches.is_empty() && matches.iter().all(|m| m.as_ref() == lcp);
    (lcp, exact)
}
