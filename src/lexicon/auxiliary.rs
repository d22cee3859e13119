pub const POSITIVE_WORDS: &[&str] = &[
    "excellent",
    "amazing",
    "wonderful",
    "fantastic",
    "great",
    "perfect",
    "love",
    "best",
    "awesome",
    "brilliant",
    "outstanding",
    "good",
    "nice",
    "helpful",
    "useful",
    "beneficial",
    "appreciate",
    "support",
    "agree",
    "favor",
    "yes",
    "positive",
    "happy",
    "safe",
    "secure",
    "protect",
    "important",
    "necessary",
    "needed",
    "welcome",
    "okay",
    "fine",
    "acceptable",
    "reasonable",
    "understandable",
];

pub const NEGATIVE_WORDS: &[&str] = &[
    "terrible",
    "horrible",
    "awful",
    "worst",
    "hate",
    "despise",
    "ridiculous",
    "absurd",
    "stupid",
    "idiotic",
    "pathetic",
    "bad",
    "poor",
    "wrong",
    "against",
    "oppose",
    "disagree",
    "unnecessary",
    "useless",
    "pointless",
    "waste",
    "invasion",
    "surveillance",
    "prison",
    "jail",
    "restrict",
    "control",
    "spy",
    "violate",
    "intrude",
    "distrust",
    "unfair",
    "unjust",
    "concern",
    "worry",
    "doubt",
    "skeptical",
    "unsure",
    "uncomfortable",
];

pub const INTENSIFIERS: &[(&str, f64)] = &[
    ("very", 1.5),
    ("extremely", 2.0),
    ("really", 1.3),
    ("absolutely", 1.8),
    ("completely", 1.7),
    ("totally", 1.5),
    ("highly", 1.4),
    ("strongly", 1.6),
    ("somewhat", 0.7),
    ("slightly", 0.5),
];

pub const NEGATIONS: &[&str] = &[
    "not", "no", "never", "neither", "nobody", "nothing", "nowhere", "none", "don't", "doesn't",
    "didn't", "won't", "wouldn't", "shouldn't", "couldn't", "can't", "isn't", "aren't",
];

pub const SUGGESTION_CUES: &[&str] = &[
    "should",
    "could",
    "would be better",
    "would be good",
    "suggest",
    "recommend",
    "propose",
    "advise",
    "better if",
    "instead of",
    "rather than",
    "why not",
    "what if",
    "how about",
    "need to",
    "must",
    "require",
    "alternative",
    "opt for",
];

pub const PLEASE_VERBS: &[&str] = &["implement", "add", "consider", "allow", "provide"];

pub const SUGGESTION_CATEGORIES: &[(&str, &[&str])] = &[
    (
        "process",
        &[
            "process",
            "procedure",
            "system",
            "method",
            "way",
            "approach",
            "mechanism",
        ],
    ),
    (
        "policy",
        &[
            "policy",
            "rule",
            "regulation",
            "guideline",
            "norm",
            "standard",
        ],
    ),
    (
        "timing",
        &[
            "time", "timing", "hour", "day", "night", "midnight", "morning", "evening", "schedule",
        ],
    ),
    (
        "communication",
        &[
            "inform",
            "notify",
            "communicate",
            "message",
            "sms",
            "email",
            "alert",
        ],
    ),
    (
        "implementation",
        &[
            "implement",
            "execute",
            "deploy",
            "install",
            "setup",
            "digital",
            "app",
            "card",
        ],
    ),
    (
        "flexibility",
        &[
            "flexible",
            "exception",
            "emergency",
            "optional",
            "choice",
            "freedom",
        ],
    ),
];

pub const GENERAL_SUGGESTION_CATEGORY: &str = "general";

pub const STOPWORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "is", "it", "be",
    "are", "was", "were", "been", "being", "have", "has", "had", "do", "does", "did", "will",
    "would", "could", "should", "may", "might", "must", "shall", "can", "need", "this", "that",
    "these", "those", "i", "you", "he", "she", "we", "they", "me", "him", "her", "us", "them",
    "my", "your", "his", "its", "our", "their", "what", "which", "who", "whom", "when", "where",
    "why", "how", "all", "each", "every", "both", "few", "more", "most", "other", "some", "such",
    "no", "nor", "not", "only", "own", "same", "so", "than", "too", "very", "just", "also", "now",
    "here", "there", "then", "if", "as", "with", "from", "about", "into", "through", "during",
    "before", "after", "above", "below", "between", "under", "again", "further", "once", "any",
    "am", "by", "up", "down", "out", "off", "over", "because", "until", "while", "don", "doesn",
    "didn", "won", "wouldn", "couldn", "shouldn", "ain", "aren", "hadn", "hasn", "haven", "isn",
    "mightn", "mustn", "needn", "shan", "wasn", "weren",
];

pub const KEYBOARD_PATTERNS: &[&str] = &[
    "qwerty", "asdf", "zxcv", "qweasd", "abcde", "qazwsx", "hjkl", "yuiop",
];

pub const KEYBOARD_ROWS: &[&str] = &["qwertyuiop", "asdfghjkl", "zxcvbnm"];

pub const FILLER_COMMENTS: &[&str] = &[
    "na", "n/a", "nil", "none", "ok", "yes", "no", "nothing", ".", "-", "...",
];

pub fn intensifier(word: &str) -> Option<f64> {
    INTENSIFIERS
        .iter()
        .find(|(w, _)| *w == word)
        .map(|(_, factor)| *factor)
}

pub fn is_negation(word: &str) -> bool {
    NEGATIONS.contains(&word)
}

pub fn is_positive(word: &str) -> bool {
    POSITIVE_WORDS.contains(&word)
}

pub fn is_negative(word: &str) -> bool {
    NEGATIVE_WORDS.contains(&word)
}

pub fn is_stopword(word: &str) -> bool {
    STOPWORDS.contains(&word)
}
