use recommender_core::tokenizer::tokenize;

#[test]
fn it_normalizes_and_stems() {
    let words = tokenize("Running Runners RUN! The café's menu.");
    // Stemming to "run" should appear
    assert!(words.contains(&"run".to_string()));
    // Unicode normalization keeps accented letters as one token
    assert!(words.iter().any(|w| w.starts_with("caf")));
}

#[test]
fn it_filters_stopwords() {
    let words = tokenize("The quick brown fox and the lazy dog");
    assert!(!words.contains(&"the".to_string()));
    assert!(!words.contains(&"and".to_string()));
}

#[test]
fn it_splits_on_punctuation() {
    let words = tokenize("java/python,sql;go-lang");
    assert_eq!(words, vec!["java", "python", "sql", "go", "lang"]);
}

#[test]
fn stopword_only_text_is_empty() {
    assert!(tokenize("the a an of").is_empty());
    assert!(tokenize("   ").is_empty());
}
