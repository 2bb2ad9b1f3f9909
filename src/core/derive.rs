// Sayaç CRM - core/derive.rs
//
// Classification engine: segment and churn risk derived from intake answers.
// Pure functions; no I/O, no storage, no UI.
//
// The churn weights and tier thresholds are fixed business constants and
// must not be tuned here.

use crate::core::model::{Answers, ChurnRisk, Segment};
use crate::util::constants::{
    ENTRY_ASKED_PRICE, HIGH_PRICE_THRESHOLD, OBJECTION_CHEAPER_ELSEWHERE, OBJECTION_EXPENSIVE,
    OTHER_OPTION, PAYMENT_DEPOSIT_INSTALMENTS, SALE_HAPPENED_YES,
};
use regex::{Regex, RegexBuilder};
use std::sync::OnceLock;

/// Map a business type (selected option or free text) to its segment.
///
/// Case-insensitive substring match, first hit wins:
/// "Hızlı" → Fastfood, "Kafe" → Kafe, "Oto" → Oto, otherwise Diğer.
pub fn derive_segment(business_type: &str) -> Segment {
    static RULES: OnceLock<Vec<(Regex, Segment)>> = OnceLock::new();

    let rules = RULES.get_or_init(|| {
        // Literal patterns, escaped; covered by the tests below.
        fn contains(needle: &str) -> Regex {
            RegexBuilder::new(&regex::escape(needle))
                .case_insensitive(true)
                .build()
                .expect("derive_segment: invalid pattern")
        }

        vec![
            (contains("Hızlı"), Segment::Fastfood),
            (contains("Kafe"), Segment::Kafe),
            (contains("Oto"), Segment::Oto),
        ]
    });

    rules
        .iter()
        .find(|(re, _)| re.is_match(business_type))
        .map(|(_, segment)| *segment)
        .unwrap_or(Segment::Other)
}

/// Weighted churn score for a set of answers (before tier mapping).
pub fn churn_score(answers: &Answers) -> i32 {
    let mut score = 0;

    match answers.objection.as_deref() {
        Some(OBJECTION_EXPENSIVE) => score += 2,
        Some(OBJECTION_CHEAPER_ELSEWHERE) => score += 3,
        _ => {}
    }
    if answers.entry_question.as_deref() == Some(ENTRY_ASKED_PRICE) {
        score += 1;
    }
    if answers.sale_happened.as_deref() == Some(SALE_HAPPENED_YES) {
        score -= 3;
    }
    if answers.payment_type.as_deref() == Some(PAYMENT_DEPOSIT_INSTALMENTS) {
        score -= 1;
    }
    if effective_price(answers).is_some_and(|price| price >= HIGH_PRICE_THRESHOLD) {
        score += 1;
    }

    score
}

/// Churn tier: score <= 0 Düşük, 1..=2 Orta, > 2 Yüksek.
pub fn derive_churn_risk(answers: &Answers) -> ChurnRisk {
    risk_for_score(churn_score(answers))
}

fn risk_for_score(score: i32) -> ChurnRisk {
    if score <= 0 {
        ChurnRisk::Low
    } else if score <= 2 {
        ChurnRisk::Medium
    } else {
        ChurnRisk::High
    }
}

/// The price the prospect was quoted, as a number.
///
/// When the offer is "Diğer" the free-entered companion value is used,
/// otherwise the offer itself. `None` when the chosen value does not parse.
pub fn effective_price(answers: &Answers) -> Option<f64> {
    let raw = if answers.price_offer.as_deref() == Some(OTHER_OPTION) {
        answers.price_other.as_deref()
    } else {
        answers.price_offer.as_deref()
    };
    raw.and_then(parse_price)
}

/// The stored `priceNumeric` of a record.
///
/// Same resolution as [`effective_price`], except that a "Diğer" offer with
/// no free-entered amount counts as 0: the amount was left blank, not
/// mistyped. Scoring still treats that case as having no price.
pub fn record_price(answers: &Answers) -> Option<f64> {
    if answers.price_offer.as_deref() == Some(OTHER_OPTION) {
        let blank = answers
            .price_other
            .as_deref()
            .map_or(true, |raw| raw.trim().is_empty());
        if blank {
            return Some(0.0);
        }
    }
    effective_price(answers)
}

/// Parse a numeric price string. Surrounding whitespace is ignored;
/// empty, non-numeric, and non-finite inputs yield `None`.
pub fn parse_price(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}
