//! Text normalization helpers shared by the extractors and matchers

use regex::Regex;

pub struct TextProcessor {
    email_regex: Regex,
    word_regex: Regex,
}

impl Default for TextProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextProcessor {
    pub fn new() -> Self {
        let email_regex = Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}")
            .expect("Invalid email regex");

        let word_regex = Regex::new(r"\w+").expect("Invalid word regex");

        Self {
            email_regex,
            word_regex,
        }
    }

    /// First e-mail address appearing in the text
    pub fn find_email(&self, text: &str) -> Option<String> {
        self.email_regex.find(text).map(|m| m.as_str().to_string())
    }

    /// Lower-cased word tokens (`\w+` runs) in order of appearance
    pub fn word_tokens(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        self.word_regex
            .find_iter(&lowered)
            .map(|m| m.as_str().to_string())
            .collect()
    }
}

/// Lower-cased whitespace tokens
pub fn whitespace_tokens(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(|t| t.to_string())
        .collect()
}

/// Lower-case, sort the whitespace tokens and join them with single spaces.
pub fn token_sort(text: &str) -> String {
    let mut tokens = whitespace_tokens(text);
    tokens.sort();
    tokens.join(" ")
}

/// Split on full stops, keeping empty fragments so positions stay stable
pub fn split_sentences(text: &str) -> Vec<&str> {
    text.split('.').collect()
}

/// Title-case every word: a cased character following another letter is
/// lower-cased, any other letter is upper-cased. `node.js` becomes `Node.Js`.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut previous_is_letter = false;

    for c in text.chars() {
        if c.is_alphabetic() {
            if previous_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            previous_is_letter = true;
        } else {
            out.push(c);
            previous_is_letter = false;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("python"), "Python");
        assert_eq!(title_case("machine learning"), "Machine Learning");
        assert_eq!(title_case("node.js"), "Node.Js");
        assert_eq!(title_case("ci/cd"), "Ci/Cd");
        assert_eq!(title_case("scikit-learn"), "Scikit-Learn");
        assert_eq!(title_case("AWS"), "Aws");
        assert_eq!(title_case("3d modeling"), "3D Modeling");
    }

    #[test]
    fn test_token_sort() {
        assert_eq!(token_sort("Rust  systems\tEngineer"), "engineer rust systems");
        assert_eq!(token_sort("   "), "");
    }

    #[test]
    fn test_word_tokens() {
        let processor = TextProcessor::new();
        let tokens = processor.word_tokens("We require Python, and Django!");
        assert_eq!(tokens, vec!["we", "require", "python", "and", "django"]);
    }

    #[test]
    fn test_find_email() {
        let processor = TextProcessor::new();
        let text = "Jane Roe\njane.roe@example.com | (555) 123-4567";
        assert_eq!(processor.find_email(text).as_deref(), Some("jane.roe@example.com"));
        assert_eq!(processor.find_email("no contact here"), None);
    }

    #[test]
    fn test_split_sentences() {
        let sentences = split_sentences("Required: Python. Nice to have Go.");
        assert_eq!(sentences, vec!["Required: Python", " Nice to have Go", ""]);
    }
}
