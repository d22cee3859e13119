use super::auxiliary::{KEYBOARD_ROWS, intensifier, is_negation, is_stopword};
use super::defs::{GENERAL_REASON, general_claim};
use super::matching::{contains_phrase, normalize_whitespace, tokenize, truncate_chars};
use super::{concern_def, concern_registry};
use crate::model::argument::Stance;
use crate::model::concern::ConcernCategory;

#[test]
fn test_registry_follows_category_priority() {
    let registry = concern_registry();
    assert_eq!(registry.len(), ConcernCategory::all().len());
    for (idx, def) in registry.iter().enumerate() {
        assert_eq!(def.category.priority(), idx);
        assert_eq!(concern_def(def.category).category, def.category);
    }
}

#[test]
fn test_registry_weights_from_fixed_scale() {
    for def in concern_registry() {
        assert!(!def.patterns.is_empty());
        for pattern in def.patterns {
            assert!(
                [0.5, 1.0, 1.5, 2.0].contains(&pattern.weight),
                "{} has weight {}",
                pattern.phrase,
                pattern.weight
            );
            assert_eq!(pattern.phrase, pattern.phrase.to_lowercase());
        }
    }
}

#[test]
fn test_claim_templates_per_stance() {
    let privacy = concern_def(ConcernCategory::Privacy);
    assert_ne!(privacy.claim(Stance::For), privacy.claim(Stance::Against));
    assert_eq!(general_claim(Stance::For), "General support");
    assert_eq!(general_claim(Stance::Against), "General opposition");
    assert_eq!(GENERAL_REASON, "general");
}

#[test]
fn test_tokenize_keeps_contractions() {
    let tokens = tokenize("I DON\u{2019}T like it, 'really'!");
    assert_eq!(tokens, vec!["i", "don't", "like", "it", "really"]);
}

#[test]
fn test_contains_phrase_whole_tokens() {
    let tokens = tokenize("Students are treated like children here");
    assert!(contains_phrase(&tokens, "treated like"));
    assert!(contains_phrase(&tokens, "children"));
    assert!(!contains_phrase(&tokens, "child"));
    assert!(!contains_phrase(&tokens, "like treated"));
    assert!(!contains_phrase(&tokens, ""));
}

#[test]
fn test_normalize_and_truncate() {
    assert_eq!(normalize_whitespace("  Hello \t  WORLD\n"), "hello world");
    assert_eq!(truncate_chars("caf\u{e9} au lait", 4), "caf\u{e9}");
    assert_eq!(truncate_chars("short", 10), "short");
}

#[test]
fn test_auxiliary_lookups() {
    assert_eq!(intensifier("extremely"), Some(2.0));
    assert_eq!(intensifier("banana"), None);
    assert!(is_negation("can't"));
    assert!(is_stopword("the"));
    assert!(!is_stopword("privacy"));
    assert!(KEYBOARD_ROWS.iter().any(|r| r.starts_with("qwerty")));
}
