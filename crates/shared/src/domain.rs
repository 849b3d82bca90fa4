/// The fixed word pool. Order matters: the server maps a uniform draw onto
/// an index into this array.
pub const VOCABULARY: [&str; 20] = [
    "serendipity",
    "ephemeral",
    "luminous",
    "mellifluous",
    "quintessential",
    "ethereal",
    "resplendent",
    "eloquent",
    "synchronicity",
    "ineffable",
    "nebulous",
    "vivacious",
    "labyrinthine",
    "melancholy",
    "solitude",
    "tranquility",
    "whimsical",
    "zenith",
    "cascade",
    "vellichor",
];

pub fn word_at(index: usize) -> Option<&'static str> {
    VOCABULARY.get(index).copied()
}

pub fn is_vocabulary_word(word: &str) -> bool {
    VOCABULARY.contains(&word)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn vocabulary_has_twenty_distinct_words() {
        let distinct: HashSet<_> = VOCABULARY.iter().collect();
        assert_eq!(distinct.len(), 20);
    }

    #[test]
    fn word_at_follows_fixed_order() {
        assert_eq!(word_at(0), Some("serendipity"));
        assert_eq!(word_at(19), Some("vellichor"));
        assert_eq!(word_at(20), None);
    }

    #[test]
    fn membership_is_exact() {
        assert!(is_vocabulary_word("zenith"));
        assert!(!is_vocabulary_word("Zenith"));
        assert!(!is_vocabulary_word("test-word"));
    }
}
