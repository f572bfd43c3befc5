use super::normalizer::normalize;

/// Width of an index gram, in Unicode scalar values.
pub const GRAM_LEN: usize = 2;

/// Collect all overlapping bigrams of an already normalized string.
pub fn bigrams(s: &str) -> Vec<String> {
    let chars: Vec<char> = s.chars().collect();
    chars
        .windows(GRAM_LEN)
        .map(|w| w.iter().collect::<String>())
        .collect()
}

/// Normalize `text` and slice it into bigrams. Shorter than two characters
/// after normalization yields nothing.
pub fn generate_grams(text: &str) -> Vec<String> {
    bigrams(&normalize(text))
}
