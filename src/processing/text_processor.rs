//! Text processing and normalization

use regex::Regex;
use std::collections::{HashMap, HashSet};
use unicode_segmentation::UnicodeSegmentation;

/// Characters that separate words when building literal word sets.
const WORD_DELIMITERS: &[char] = &[
    ',', ';', ':', '(', ')', '[', ']', '{', '}', '|', '/', '\\', '"', '\'', '!', '?', '•', '*',
];

pub struct TextProcessor {
    stop_words: HashSet<&'static str>,
    email_regex: Regex,
    phone_regex: Regex,
    linkedin_regex: Regex,
    year_regex: Regex,
}

impl Default for TextProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextProcessor {
    pub fn new() -> Self {
        let email_regex = Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}")
            .expect("Invalid email regex");

        let phone_regex = Regex::new(r"\+?\d[\d\s().-]{7,}\d").expect("Invalid phone regex");

        let linkedin_regex = Regex::new(r"(?i)(?:https?://)?(?:www\.)?linkedin\.com/[A-Za-z0-9\-_/]+")
            .expect("Invalid LinkedIn regex");

        let year_regex = Regex::new(r"\b(?:19|20)\d{2}\b").expect("Invalid year regex");

        Self {
            stop_words: STOP_WORDS.iter().copied().collect(),
            email_regex,
            phone_regex,
            linkedin_regex,
            year_regex,
        }
    }

    /// Split text into lower-cased literal words.
    ///
    /// Surrounding punctuation is trimmed but `+`, `#` and inner dots survive, so
    /// `C++`, `c#` and `node.js` stay intact.
    pub fn words(&self, text: &str) -> Vec<String> {
        text.split(|c: char| c.is_whitespace() || WORD_DELIMITERS.contains(&c))
            .map(|w| w.trim_matches(|c: char| matches!(c, '.' | '-' | '_')))
            .filter(|w| !w.is_empty())
            .map(|w| w.to_lowercase())
            .collect()
    }

    /// Times the words of `phrase` appear consecutively in `words`.
    pub fn phrase_occurrences(&self, phrase: &str, words: &[String]) -> usize {
        let needle = self.words(phrase);
        if needle.is_empty() || needle.len() > words.len() {
            return 0;
        }
        words
            .windows(needle.len())
            .filter(|window| *window == needle.as_slice())
            .count()
    }

    pub fn contains_phrase(&self, phrase: &str, words: &[String]) -> bool {
        self.phrase_occurrences(phrase, words) > 0
    }

    /// Tokenize text into lower-cased content words, dropping stop words.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        text.unicode_words()
            .map(|w| w.to_lowercase())
            .filter(|w| w.len() > 2 && !self.is_stop_word(w))
            .filter(|w| w.chars().any(|c| c.is_alphabetic()))
            .collect()
    }

    /// Unique content words in order of first appearance
    pub fn vocabulary(&self, text: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        self.tokenize(text)
            .into_iter()
            .filter(|token| token.chars().all(|c| c.is_alphabetic()))
            .filter(|token| seen.insert(token.clone()))
            .collect()
    }

    /// Extract keywords from text (frequency-based)
    pub fn extract_keywords(&self, text: &str, max_keywords: usize) -> Vec<String> {
        let mut word_freq: HashMap<String, usize> = HashMap::new();
        let mut first_seen: HashMap<String, usize> = HashMap::new();

        for (position, token) in self.tokenize(text).into_iter().enumerate() {
            first_seen.entry(token.clone()).or_insert(position);
            *word_freq.entry(token).or_insert(0) += 1;
        }

        let mut keywords: Vec<(String, usize)> = word_freq.into_iter().collect();
        keywords.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| first_seen[&a.0].cmp(&first_seen[&b.0])));

        keywords
            .into_iter()
            .take(max_keywords)
            .map(|(word, _)| word)
            .collect()
    }

    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(word)
    }

    pub fn find_email(&self, text: &str) -> Option<String> {
        self.email_regex.find(text).map(|m| m.as_str().to_string())
    }

    pub fn find_phone(&self, text: &str) -> Option<String> {
        self.phone_regex
            .find_iter(text)
            .map(|m| m.as_str().trim().to_string())
            // date ranges like "2016 - 2019" also match the pattern
            .find(|candidate| (10..=15).contains(&candidate.chars().filter(|c| c.is_ascii_digit()).count()))
    }

    pub fn find_linkedin(&self, text: &str) -> Option<String> {
        self.linkedin_regex.find(text).map(|m| m.as_str().to_string())
    }

    /// Four-digit calendar years (1900-2099) mentioned in the text
    pub fn years(&self, text: &str) -> Vec<i32> {
        self.year_regex
            .find_iter(text)
            .filter_map(|m| m.as_str().parse().ok())
            .collect()
    }
}

const STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "all", "also", "am", "an", "and", "any", "are",
    "as", "at", "be", "been", "before", "being", "below", "between", "both", "but", "by",
    "can", "could", "did", "do", "does", "doing", "down", "during", "each", "etc", "few",
    "for", "from", "further", "had", "has", "have", "having", "he", "her", "here", "hers",
    "him", "his", "how", "i", "if", "in", "into", "is", "it", "its", "just", "may", "me",
    "more", "most", "must", "my", "no", "nor", "not", "now", "of", "off", "on", "once",
    "only", "or", "other", "our", "ours", "out", "over", "own", "per", "plus", "same",
    "she", "should", "so", "some", "such", "than", "that", "the", "their", "them", "then",
    "there", "these", "they", "this", "those", "through", "to", "too", "under", "until",
    "up", "us", "very", "was", "we", "were", "what", "when", "where", "which", "while",
    "who", "whom", "why", "will", "with", "within", "would", "you", "your", "yours",
    // job posting filler
    "ability", "able", "candidate", "candidates", "including", "join", "looking", "plus",
    "preferred", "required", "requirements", "responsibilities", "role", "seeking",
    "strong", "work", "working", "years", "year", "experience", "knowledge", "skills",
    "team", "excellent", "good", "great", "new", "well", "using", "use", "across",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_words_keep_symbols() {
        let processor = TextProcessor::new();
        let words = processor.words("Skills: C++, C#, Node.js (expert); Java.");

        assert!(words.contains(&"c++".to_string()));
        assert!(words.contains(&"c#".to_string()));
        assert!(words.contains(&"node.js".to_string()));
        assert!(words.contains(&"java".to_string()));
        assert!(!words.contains(&"java.".to_string()));
    }

    #[test]
    fn test_contains_phrase() {
        let processor = TextProcessor::new();
        let words = processor.words("Built distributed systems in Java");

        assert!(processor.contains_phrase("distributed systems", &words));
        assert!(processor.contains_phrase("java", &words));
        assert!(!processor.contains_phrase("javascript", &words));
        assert!(!processor.contains_phrase("", &words));
    }

    #[test]
    fn test_phrase_words_must_be_adjacent() {
        let processor = TextProcessor::new();
        let words = processor.words("Strong leadership in teams. Guided by clear principles.");

        assert!(!processor.contains_phrase("leadership principles", &words));
        assert!(processor.contains_phrase("clear principles", &words));
    }

    #[test]
    fn test_phrase_occurrences_ignore_fragments() {
        let processor = TextProcessor::new();
        let words = processor.words("I maintained email pipelines again, years ago, doing AI research. Go and AI.");

        assert_eq!(processor.phrase_occurrences("ai", &words), 2);
        assert_eq!(processor.phrase_occurrences("go", &words), 1);
        assert_eq!(processor.phrase_occurrences("machine learning", &words), 0);
    }

    #[test]
    fn test_tokenization() {
        let processor = TextProcessor::new();
        let tokens = processor.tokenize("Rust programming language is awesome!");

        assert!(tokens.contains(&"rust".to_string()));
        assert!(tokens.contains(&"programming".to_string()));
        assert!(!tokens.contains(&"is".to_string()));
    }

    #[test]
    fn test_keyword_extraction() {
        let processor = TextProcessor::new();
        let text = "Rust Rust programming language. Rust is memory safe. Programming with Rust is fun.";

        let keywords = processor.extract_keywords(text, 2);

        assert_eq!(keywords, vec!["rust".to_string(), "programming".to_string()]);
    }

    #[test]
    fn test_contact_extraction() {
        let processor = TextProcessor::new();
        let text = "Jane Roe | jane.roe@example.com | +1 555-123-4567 | linkedin.com/in/janeroe";

        assert_eq!(processor.find_email(text).as_deref(), Some("jane.roe@example.com"));
        assert!(processor.find_phone(text).is_some());
        assert_eq!(processor.find_linkedin(text).as_deref(), Some("linkedin.com/in/janeroe"));
    }

    #[test]
    fn test_years() {
        let processor = TextProcessor::new();
        let years = processor.years("Acme 2016 - 2019, Initech 2019 - 2024, id 123456");

        assert_eq!(years, vec![2016, 2019, 2019, 2024]);
    }
}
