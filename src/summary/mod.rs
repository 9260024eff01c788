//! Frequency-based extractive summarizer.
//!
//! Scores sentences by the normalized frequency of their content words and
//! keeps the highest-scoring ones in original document order. No model, no
//! network: good enough to condense an hour of captions into a screenful.

use std::collections::HashMap;

const STOPWORDS: &[&str] = &[
    "a", "about", "after", "all", "also", "an", "and", "any", "are", "as", "at", "be", "because",
    "been", "but", "by", "can", "could", "did", "do", "does", "for", "from", "get", "go", "going",
    "had", "has", "have", "he", "her", "here", "him", "his", "how", "i", "if", "in", "into", "is",
    "it", "its", "just", "like", "me", "more", "most", "my", "no", "not", "now", "of", "on", "one",
    "or", "our", "out", "over", "re", "s", "she", "so", "some", "t", "than", "that", "the",
    "their", "them", "then", "there", "these", "they", "this", "those", "to", "too", "up", "us",
    "very", "was", "we", "were", "what", "when", "where", "which", "who", "why", "will", "with",
    "would", "you", "your",
];

/// Produce an extractive summary of at most `max_sentences` sentences.
///
/// Degrades gracefully: empty input or a request larger than the sentence
/// count returns whatever exists.
pub fn summarize(text: &str, max_sentences: usize) -> String {
    if max_sentences == 0 {
        return String::new();
    }

    let sentences = split_sentences(text);
    if sentences.len() <= max_sentences {
        return sentences.join(" ");
    }

    let weights = word_weights(text);

    let mut scored: Vec<(usize, f64)> = sentences
        .iter()
        .enumerate()
        .map(|(index, sentence)| (index, sentence_score(sentence, &weights)))
        .collect();

    // Highest score first; ties keep the earlier sentence
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    let mut selected: Vec<usize> = scored.into_iter().take(max_sentences).map(|(i, _)| i).collect();
    selected.sort_unstable();

    selected
        .into_iter()
        .map(|i| sentences[i].as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Split text into sentences on terminal punctuation, keeping the delimiter.
fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();

    for c in text.chars() {
        current.push(c);
        if matches!(c, '.' | '!' | '?') {
            let trimmed = current.trim();
            if !trimmed.is_empty() {
                sentences.push(trimmed.to_string());
            }
            current.clear();
        }
    }

    let trailing = current.trim();
    if !trailing.is_empty() {
        sentences.push(trailing.to_string());
    }

    sentences
}

/// Content-word frequencies normalized by the maximum frequency.
fn word_weights(text: &str) -> HashMap<String, f64> {
    let mut counts: HashMap<String, u32> = HashMap::new();

    for word in tokens(text) {
        *counts.entry(word).or_insert(0) += 1;
    }

    let max = counts.values().copied().max().unwrap_or(1) as f64;
    counts
        .into_iter()
        .map(|(word, count)| (word, count as f64 / max))
        .collect()
}

fn sentence_score(sentence: &str, weights: &HashMap<String, f64>) -> f64 {
    tokens(sentence)
        .filter_map(|word| weights.get(&word))
        .sum()
}

fn tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .map(|w| w.to_lowercase())
        .filter(|w| w.len() > 1 && !STOPWORDS.contains(&w.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        assert_eq!(summarize("", 3), "");
    }

    #[test]
    fn test_zero_sentences_requested() {
        assert_eq!(summarize("One. Two.", 0), "");
    }

    #[test]
    fn test_short_input_returned_whole() {
        assert_eq!(summarize("Only one sentence here.", 5), "Only one sentence here.");
    }

    #[test]
    fn test_frequent_topic_wins() {
        let text = "Rust makes systems programming safe. The weather was nice yesterday. \
                    Rust programs avoid data races. Lunch was a sandwich. \
                    Safe Rust code is the default.";
        let summary = summarize(text, 2);

        assert!(summary.contains("Rust"));
        assert!(!summary.contains("sandwich"));
    }

    #[test]
    fn test_original_order_preserved() {
        let text = "Alpha topic opens the talk. Small aside. \
                    Alpha topic closes the talk. Another small aside.";
        let summary = summarize(text, 2);

        let open = summary.find("opens").unwrap();
        let close = summary.find("closes").unwrap();
        assert!(open < close);
    }

    #[test]
    fn test_split_sentences_handles_mixed_punctuation() {
        let sentences = split_sentences("First! Second? Third. trailing words");
        assert_eq!(sentences.len(), 4);
        assert_eq!(sentences[3], "trailing words");
    }

    #[test]
    fn test_stopwords_carry_no_weight() {
        let weights = word_weights("the the the compiler");
        assert!(weights.contains_key("compiler"));
        assert!(!weights.contains_key("the"));
    }
}
