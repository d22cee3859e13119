use crate::model::argument::Stance;
use crate::model::concern::ConcernCategory;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedPattern {
    pub phrase: &'static str,
    pub weight: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct ConcernDef {
    pub category: ConcernCategory,
    pub name: &'static str,
    pub color: &'static str,
    pub patterns: &'static [WeightedPattern],
    pub claim_for: &'static str,
    pub claim_against: &'static str,
}

impl ConcernDef {
    pub fn claim(&self, stance: Stance) -> &'static str {
        match stance {
            Stance::For => self.claim_for,
            Stance::Against => self.claim_against,
        }
    }
}

pub const GENERAL_REASON: &str = "general";

pub fn general_claim(stance: Stance) -> &'static str {
    match stance {
        Stance::For => "General support",
        Stance::Against => "General opposition",
    }
}

const fn p(phrase: &'static str, weight: f64) -> WeightedPattern {
    WeightedPattern { phrase, weight }
}

const PRIVACY: &[WeightedPattern] = &[
    p("privacy", 2.0),
    p("surveillance", 2.0),
    p("spy", 2.0),
    p("spying", 2.0),
    p("personal information", 2.0),
    p("tracking", 1.5),
    p("track", 1.5),
    p("tracked", 1.5),
    p("confidential", 1.5),
    p("private", 1.5),
    p("monitor", 1.0),
    p("monitoring", 1.0),
    p("monitored", 1.0),
    p("watch", 1.0),
    p("watched", 1.0),
    p("data", 1.0),
    p("share", 1.0),
    p("shared", 1.0),
    p("sharing", 1.0),
    p("location", 1.0),
];

const AUTONOMY: &[WeightedPattern] = &[
    p("adult", 2.0),
    p("adults", 2.0),
    p("freedom", 2.0),
    p("autonomy", 2.0),
    p("infantilizing", 2.0),
    p("infantilising", 2.0),
    p("independent", 1.5),
    p("independence", 1.5),
    p("grown up", 1.5),
    p("treated like", 1.5),
    p("choice", 1.0),
    p("mature", 1.0),
    p("grown", 1.0),
    p("child", 1.0),
    p("children", 1.0),
    p("18", 1.0),
    p("age", 0.5),
];

const TRUST: &[WeightedPattern] = &[
    p("trust", 2.0),
    p("distrust", 2.0),
    p("mistrust", 2.0),
    p("suspicion", 1.5),
    p("faith", 1.0),
    p("doubt", 1.0),
    p("believe", 0.5),
    p("confidence", 0.5),
];

const SAFETY: &[WeightedPattern] = &[
    p("safety", 2.0),
    p("safe", 1.5),
    p("security", 1.5),
    p("protection", 1.5),
    p("emergency", 1.5),
    p("danger", 1.5),
    p("dangerous", 1.5),
    p("secure", 1.0),
    p("risk", 1.0),
    p("harm", 1.0),
];

const PARENTAL: &[WeightedPattern] = &[
    p("parent", 2.0),
    p("parents", 2.0),
    p("guardian", 1.5),
    p("guardians", 1.5),
    p("family", 1.0),
    p("mother", 1.0),
    p("father", 1.0),
    p("mom", 1.0),
    p("dad", 1.0),
    p("inform", 1.0),
    p("notify", 1.0),
    p("notification", 1.0),
    p("notifications", 1.0),
];

const NECESSITY: &[WeightedPattern] = &[
    p("unnecessary", 2.0),
    p("not needed", 2.0),
    p("pointless", 2.0),
    p("useless", 2.0),
    p("waste", 1.5),
    p("necessary", 1.0),
    p("essential", 1.0),
    p("need", 0.5),
    p("needed", 0.5),
    p("required", 0.5),
    p("why", 0.5),
];

const IMPLEMENTATION: &[WeightedPattern] = &[
    p("practical", 1.5),
    p("impractical", 1.5),
    p("feasible", 1.5),
    p("technical", 1.5),
    p("logistics", 1.5),
    p("infrastructure", 1.5),
    p("glitch", 1.5),
    p("implement", 1.0),
    p("implementation", 1.0),
    p("biometric", 1.0),
    p("app", 1.0),
    p("system", 0.5),
    p("work", 0.5),
    p("how", 0.5),
];

const REGISTRY: &[ConcernDef] = &[
    ConcernDef {
        category: ConcernCategory::Privacy,
        name: "Privacy Concerns",
        color: "#ef4444",
        patterns: PRIVACY,
        claim_for: "Privacy is adequately protected",
        claim_against: "Violates student privacy",
    },
    ConcernDef {
        category: ConcernCategory::Autonomy,
        name: "Autonomy & Independence",
        color: "#f97316",
        patterns: AUTONOMY,
        claim_for: "Oversight is reasonable for students",
        claim_against: "Students are adults who deserve autonomy",
    },
    ConcernDef {
        category: ConcernCategory::Trust,
        name: "Trust Issues",
        color: "#eab308",
        patterns: TRUST,
        claim_for: "Builds trust between students, parents and campus",
        claim_against: "Signals distrust of students",
    },
    ConcernDef {
        category: ConcernCategory::Safety,
        name: "Safety & Security",
        color: "#22c55e",
        patterns: SAFETY,
        claim_for: "Improves student safety",
        claim_against: "Safety benefits are overstated",
    },
    ConcernDef {
        category: ConcernCategory::Parental,
        name: "Parental Involvement",
        color: "#3b82f6",
        patterns: PARENTAL,
        claim_for: "Keeps parents informed",
        claim_against: "Parents should not track daily movements",
    },
    ConcernDef {
        category: ConcernCategory::Necessity,
        name: "Questioning Necessity",
        color: "#8b5cf6",
        patterns: NECESSITY,
        claim_for: "A necessary measure",
        claim_against: "The policy is unnecessary",
    },
    ConcernDef {
        category: ConcernCategory::Implementation,
        name: "Implementation Concerns",
        color: "#ec4899",
        patterns: IMPLEMENTATION,
        claim_for: "Practical to implement",
        claim_against: "Implementation is impractical",
    },
];

pub fn concern_registry() -> &'static [ConcernDef] {
    REGISTRY
}

pub fn concern_def(category: ConcernCategory) -> &'static ConcernDef {
    &REGISTRY[category.priority()]
}
