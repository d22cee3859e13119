//! Proportion statistics used by every aggregate in a snapshot.
//!
//! All functions are total: zero totals, zero marginals and zero standard
//! errors produce defined sentinel results instead of NaN or panics.

pub mod distributions;

use crate::model::stats::{
    Adequacy, ChiSquareResult, ComparisonStatTest, CorrelationStrength, EffectSize,
    PercentageWithCi, SampleAdequacy, SignificanceBadge, SignificanceLevel,
};
use crate::model::thresholds::SignificanceThresholds;

use distributions::{chi_square_1df_survival, two_tailed_p};

const Z_POWER_80: f64 = 0.8416;
const Z_95: f64 = 1.96;

pub fn z_for_confidence(confidence: f64) -> f64 {
    const TABLE: &[(f64, f64)] = &[(0.90, 1.645), (0.95, 1.96), (0.99, 2.576)];
    TABLE
        .iter()
        .find(|(level, _)| (level - confidence).abs() < 1e-9)
        .map(|(_, z)| *z)
        .unwrap_or(Z_95)
}

pub fn percentage_with_ci(count: u64, total: u64, confidence: f64) -> PercentageWithCi {
    if total == 0 {
        return PercentageWithCi {
            count,
            sample_size: 0,
            percentage: 0.0,
            margin_of_error: 100.0,
            ci_lower: 0.0,
            ci_upper: 100.0,
            wilson_lower: 0.0,
            wilson_upper: 100.0,
            confidence_level: confidence,
            insufficient_sample: true,
        };
    }
    let z = z_for_confidence(confidence);
    let n = total as f64;
    let p = proportion(count, total);
    let percentage = p * 100.0;
    let margin_of_error = z * (p * (1.0 - p) / n).sqrt() * 100.0;
    let (wilson_lower, wilson_upper) = wilson_interval(count, total, z);
    PercentageWithCi {
        count,
        sample_size: total,
        percentage,
        margin_of_error,
        ci_lower: (percentage - margin_of_error).clamp(0.0, 100.0),
        ci_upper: (percentage + margin_of_error).clamp(0.0, 100.0),
        wilson_lower,
        wilson_upper,
        confidence_level: confidence,
        insufficient_sample: false,
    }
}

pub fn wilson_interval(count: u64, total: u64, z: f64) -> (f64, f64) {
    if total == 0 {
        return (0.0, 100.0);
    }
    let n = total as f64;
    let p = proportion(count, total);
    let z2 = z * z;
    let denom = 1.0 + z2 / n;
    let center = (p + z2 / (2.0 * n)) / denom;
    let half = z * (p * (1.0 - p) / n + z2 / (4.0 * n * n)).sqrt() / denom;
    (
        ((center - half) * 100.0).clamp(0.0, 100.0),
        ((center + half) * 100.0).clamp(0.0, 100.0),
    )
}

pub fn two_proportion_z_test(
    count_a: u64,
    total_a: u64,
    count_b: u64,
    total_b: u64,
) -> ComparisonStatTest {
    two_proportion_z_test_with(
        count_a,
        total_a,
        count_b,
        total_b,
        &SignificanceThresholds::default(),
    )
}

pub fn two_proportion_z_test_with(
    count_a: u64,
    total_a: u64,
    count_b: u64,
    total_b: u64,
    thresholds: &SignificanceThresholds,
) -> ComparisonStatTest {
    if total_a == 0 || total_b == 0 {
        return ComparisonStatTest {
            z_statistic: 0.0,
            p_value: 1.0,
            significant: false,
            highly_significant: false,
            difference: 0.0,
            effect_size: EffectSize::Negligible,
            cohens_h: 0.0,
        };
    }
    let p_a = proportion(count_a, total_a);
    let p_b = proportion(count_b, total_b);
    let pooled = (count_a.min(total_a) + count_b.min(total_b)) as f64 / (total_a + total_b) as f64;
    let se = (pooled * (1.0 - pooled) * (1.0 / total_a as f64 + 1.0 / total_b as f64)).sqrt();
    let cohens_h = 2.0 * (p_a.sqrt().asin() - p_b.sqrt().asin());
    let difference = 100.0 * (p_a - p_b);
    let effect_size = effect_size_for(cohens_h, thresholds);

    if se <= 0.0 || !se.is_finite() {
        return ComparisonStatTest {
            z_statistic: 0.0,
            p_value: 1.0,
            significant: false,
            highly_significant: false,
            difference,
            effect_size,
            cohens_h,
        };
    }

    let z_statistic = (p_a - p_b) / se;
    let p_value = two_tailed_p(z_statistic);
    ComparisonStatTest {
        z_statistic,
        p_value,
        significant: p_value < thresholds.alpha,
        highly_significant: p_value < thresholds.strict_alpha,
        difference,
        effect_size,
        cohens_h,
    }
}

pub fn effect_size_for(cohens_h: f64, thresholds: &SignificanceThresholds) -> EffectSize {
    let h = cohens_h.abs();
    if h < thresholds.cohens_h_small {
        EffectSize::Negligible
    } else if h < thresholds.cohens_h_medium {
        EffectSize::Small
    } else if h < thresholds.cohens_h_large {
        EffectSize::Medium
    } else {
        EffectSize::Large
    }
}

pub fn chi_square_2x2(yes_yes: u64, yes_no: u64, no_yes: u64, no_no: u64) -> ChiSquareResult {
    let (a, b, c, d) = (yes_yes as f64, yes_no as f64, no_yes as f64, no_no as f64);
    let row1 = a + b;
    let row2 = c + d;
    let col1 = a + c;
    let col2 = b + d;
    let n = row1 + row2;
    if n == 0.0 || row1 == 0.0 || row2 == 0.0 || col1 == 0.0 || col2 == 0.0 {
        return ChiSquareResult {
            chi_square: 0.0,
            p_value: 1.0,
            correlation_coefficient: 0.0,
            yates_corrected: false,
        };
    }

    let cells = [
        (a, row1 * col1 / n),
        (b, row1 * col2 / n),
        (c, row2 * col1 / n),
        (d, row2 * col2 / n),
    ];
    let yates_corrected = cells.iter().any(|(_, expected)| *expected < 5.0);
    let chi_square = cells
        .iter()
        .map(|(observed, expected)| {
            let mut diff = (observed - expected).abs();
            if yates_corrected {
                diff = (diff - 0.5).max(0.0);
            }
            diff * diff / expected
        })
        .sum::<f64>();

    let phi = (a * d - b * c) / (row1 * row2 * col1 * col2).sqrt();
    ChiSquareResult {
        chi_square,
        p_value: chi_square_1df_survival(chi_square),
        correlation_coefficient: phi.clamp(-1.0, 1.0),
        yates_corrected,
    }
}

pub fn correlation_strength(phi: f64, thresholds: &SignificanceThresholds) -> CorrelationStrength {
    let r = phi.abs();
    if r >= thresholds.correlation_strong {
        CorrelationStrength::Strong
    } else if r >= thresholds.correlation_moderate {
        CorrelationStrength::Moderate
    } else if r >= thresholds.correlation_weak {
        CorrelationStrength::Weak
    } else {
        CorrelationStrength::Negligible
    }
}

pub fn significance_badge(p_value: f64, significant: bool) -> SignificanceBadge {
    significance_badge_with(p_value, significant, &SignificanceThresholds::default())
}

pub fn significance_badge_with(
    p_value: f64,
    significant: bool,
    thresholds: &SignificanceThresholds,
) -> SignificanceBadge {
    let level = if !significant {
        SignificanceLevel::NotSignificant
    } else if p_value < thresholds.very_strict_alpha {
        SignificanceLevel::HighlySignificant
    } else if p_value < thresholds.strict_alpha {
        SignificanceLevel::VerySignificant
    } else if p_value < thresholds.alpha {
        SignificanceLevel::Significant
    } else {
        SignificanceLevel::NotSignificant
    };
    let (label, symbol, color) = match level {
        SignificanceLevel::HighlySignificant => ("highly significant", "***", "green"),
        SignificanceLevel::VerySignificant => ("very significant", "**", "green"),
        SignificanceLevel::Significant => ("significant", "*", "blue"),
        SignificanceLevel::NotSignificant => ("not significant", "ns", "gray"),
    };
    SignificanceBadge {
        level,
        label: label.to_string(),
        symbol: symbol.to_string(),
        color: color.to_string(),
    }
}

pub fn sample_adequacy(sample_size: u64, population_estimate: Option<u64>) -> SampleAdequacy {
    sample_adequacy_with(
        sample_size,
        population_estimate,
        &SignificanceThresholds::default(),
    )
}

pub fn sample_adequacy_with(
    sample_size: u64,
    population_estimate: Option<u64>,
    thresholds: &SignificanceThresholds,
) -> SampleAdequacy {
    if sample_size == 0 {
        return SampleAdequacy {
            sample_size,
            population_estimate,
            adequacy: Adequacy::Weak,
            worst_case_moe_percent: 100.0,
            can_detect_difference: 100.0,
        };
    }
    let n = sample_size as f64;
    let mut moe = Z_95 * (0.25 / n).sqrt();
    if let Some(population) = population_estimate.filter(|&pop| pop > sample_size) {
        let big_n = population as f64;
        moe *= ((big_n - n) / (big_n - 1.0)).sqrt();
    }
    let worst_case_moe_percent = moe * 100.0;
    let adequacy = if worst_case_moe_percent < thresholds.moe_strong {
        Adequacy::Strong
    } else if worst_case_moe_percent < thresholds.moe_adequate {
        Adequacy::Adequate
    } else {
        Adequacy::Weak
    };
    let per_group = n / 2.0;
    let can_detect_difference =
        ((Z_95 + Z_POWER_80) * (2.0 * 0.25 / per_group).sqrt() * 100.0).min(100.0);
    SampleAdequacy {
        sample_size,
        population_estimate,
        adequacy,
        worst_case_moe_percent,
        can_detect_difference,
    }
}

fn proportion(count: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    count.min(total) as f64 / total as f64
}

#[cfg(test)]
#[path = "../../tests/src_inline/stats/tests.rs"]
mod tests;
