// Fuzzy name matching
// Scores are 0-100, 100 meaning the normalized strings are identical

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Lookups below this score report "No match found."
pub const MIN_MATCH_SCORE: u8 = 55;

/// Lowercase, fold accents, drop punctuation, turn separators into single spaces.
/// "Kai'Sa" -> "kaisa", "Dr. Mundo" -> "dr mundo", "Jarvan_IV" -> "jarvan iv"
pub fn normalize(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.nfkd().filter(|c| !is_combining_mark(*c)) {
        if ch.is_alphanumeric() {
            out.extend(ch.to_lowercase());
        } else if ch.is_whitespace() || ch == '-' || ch == '_' || ch == '/' {
            out.push(' ');
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn levenshtein(a: &[char], b: &[char]) -> usize {
    if a.is_empty() {
        return b.len();
    }
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut cur = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        cur[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            cur[j + 1] = (prev[j] + cost).min(prev[j + 1] + 1).min(cur[j] + 1);
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    prev[b.len()]
}

fn ratio_normalized(a: &str, b: &str) -> u8 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 100;
    }
    let dist = levenshtein(&a, &b);
    (((total - dist.min(total)) as f64 / total as f64) * 100.0).round() as u8
}

/// Plain edit-distance similarity of two strings after normalization.
/// Used for answer checking where partial matches must not count.
pub fn similarity(a: &str, b: &str) -> u8 {
    let (a, b) = (normalize(a), normalize(b));
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    if a.replace(' ', "") == b.replace(' ', "") {
        return 100;
    }
    ratio_normalized(&a, &b)
}

/// Lookup score: similarity, boosted when every query word appears in the
/// candidate ("yasuo" vs "high noon yasuo") or the candidate starts with it.
pub fn score(query: &str, candidate: &str) -> u8 {
    let (q, c) = (normalize(query), normalize(candidate));
    if q.is_empty() || c.is_empty() {
        return 0;
    }
    if q.replace(' ', "") == c.replace(' ', "") {
        return 100;
    }

    let mut best = ratio_normalized(&q, &c);

    let q_len = q.chars().count();
    let c_len = c.chars().count();
    let candidate_words: Vec<&str> = c.split_whitespace().collect();
    let contains_all_words = q
        .split_whitespace()
        .all(|word| candidate_words.contains(&word));

    if q_len >= 3 && (contains_all_words || c.starts_with(&q)) {
        let coverage = (q_len * 19 / c_len.max(1)).min(19) as u8;
        best = best.max(80 + coverage);
    }

    // A typo in one word of a longer name ("ezrael" vs "ezreal")
    if q_len >= 3 {
        for word in &candidate_words {
            let word_score = ratio_normalized(&q, word) as u32 * 9 / 10;
            best = best.max(word_score as u8);
        }
    }

    best
}

/// Highest scoring candidate; ties keep the earliest. Each candidate may
/// expose several names (display name, internal id, ...).
pub fn best_match<T, I, F>(query: &str, candidates: I, names: F) -> Option<(T, u8)>
where
    I: IntoIterator<Item = T>,
    F: Fn(&T) -> Vec<String>,
{
    let mut best: Option<(T, u8)> = None;

    for candidate in candidates {
        let candidate_score = names(&candidate)
            .iter()
            .map(|name| score(query, name))
            .max()
            .unwrap_or(0);

        if best.as_ref().map_or(true, |(_, s)| candidate_score > *s) {
            best = Some((candidate, candidate_score));
        }
    }

    best.filter(|(_, s)| *s >= MIN_MATCH_SCORE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("Kai'Sa"), "kaisa");
        assert_eq!(normalize("Éclat Lunaire"), "eclat lunaire");
        assert_eq!(normalize("  Dr. Mundo "), "dr mundo");
        assert_eq!(normalize("Jarvan_IV"), "jarvan iv");
        assert_eq!(normalize("!!!"), "");
    }

    #[test]
    fn test_levenshtein() {
        let chars = |s: &str| s.chars().collect::<Vec<_>>();
        assert_eq!(levenshtein(&chars("kitten"), &chars("sitting")), 3);
        assert_eq!(levenshtein(&chars(""), &chars("abc")), 3);
        assert_eq!(levenshtein(&chars("same"), &chars("same")), 0);
    }

    #[test]
    fn test_exact_and_punctuation() {
        assert_eq!(score("Kai'Sa", "kaisa"), 100);
        assert_eq!(score("drmundo", "Dr. Mundo"), 100);
        assert_eq!(similarity("LEE SIN", "Lee Sin"), 100);
    }

    #[test]
    fn test_empty_scores_zero() {
        assert_eq!(score("", "Ahri"), 0);
        assert_eq!(similarity("Ahri", "..."), 0);
    }

    #[test]
    fn test_typo_beats_unrelated() {
        assert!(score("ezrael", "Ezreal") > score("ezrael", "Zed"));
        assert!(similarity("ezrael", "Ezreal") >= 80);
        assert!(similarity("zed", "zac") < 80);
    }

    #[test]
    fn test_contained_words_boost() {
        assert!(score("yasuo", "High Noon Yasuo") >= 80);
        assert!(score("infinity", "Infinity Edge") >= 80);
        // similarity alone doesn't reward partial names
        assert!(similarity("yasuo", "High Noon Yasuo") < 80);
    }

    #[test]
    fn test_long_query_boost_stays_capped() {
        // query far longer than the candidate must not wrap the boost
        let query = "yasuo ".repeat(35);
        assert_eq!(score(&query, "High Noon Yasuo"), 99);
    }

    #[test]
    fn test_short_prefix_gets_no_boost() {
        assert!(score("a", "Ahri") < MIN_MATCH_SCORE);
    }

    #[test]
    fn test_best_match() {
        let names = ["Ahri", "Akali", "Yasuo", "Yone"];
        let (name, s) = best_match("yasou", names.iter(), |n| vec![n.to_string()]).unwrap();
        assert_eq!(*name, "Yasuo");
        assert!(s >= MIN_MATCH_SCORE);

        assert!(best_match("qqqqqqqq", names.iter(), |n| vec![n.to_string()]).is_none());
    }

    #[test]
    fn test_best_match_alternate_names() {
        let champs = [("MonkeyKing", "Wukong"), ("Ahri", "Ahri")];
        let ((id, _), s) =
            best_match("monkeyking", champs.iter(), |(id, name)| vec![name.to_string(), id.to_string()])
                .unwrap();
        assert_eq!(*id, "MonkeyKing");
        assert_eq!(s, 100);
    }

    #[test]
    fn test_best_match_tie_keeps_first() {
        let names = ["Flash", "Flash"];
        let matched = best_match("flash", names.iter().enumerate(), |(_, n)| vec![n.to_string()]);
        assert_eq!(matched.map(|((i, _), _)| i), Some(0));
    }
}
