// Sayaç CRM - core/questionnaire.rs
//
// Static definition of the intake questionnaire: one entry per step, in
// interview order. Not persisted; the intake session walks this list.

use crate::core::model::AnswerField;

/// How a question is answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionKind {
    /// Free text with an input hint.
    Text { placeholder: &'static str },
    /// Exactly one of a fixed list of options.
    Select { options: &'static [&'static str] },
}

/// Companion free-entry input shown when a particular option is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtraInput {
    /// Option value that reveals the extra input.
    pub trigger: &'static str,
    /// Field the free-entered value is stored in.
    pub field: AnswerField,
}

/// One step of the intake questionnaire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestionSpec {
    pub field: AnswerField,
    pub label: &'static str,
    pub kind: QuestionKind,
    pub extra: Option<ExtraInput>,
}

impl QuestionSpec {
    const fn text(field: AnswerField, label: &'static str, placeholder: &'static str) -> Self {
        Self {
            field,
            label,
            kind: QuestionKind::Text { placeholder },
            extra: None,
        }
    }

    const fn select(
        field: AnswerField,
        label: &'static str,
        options: &'static [&'static str],
    ) -> Self {
        Self {
            field,
            label,
            kind: QuestionKind::Select { options },
            extra: None,
        }
    }

    /// Options of a select question; empty for text questions.
    pub fn options(&self) -> &'static [&'static str] {
        match self.kind {
            QuestionKind::Select { options } => options,
            QuestionKind::Text { .. } => &[],
        }
    }

    /// Whether `value` reveals this question's companion input.
    pub fn shows_extra(&self, value: Option<&str>) -> bool {
        matches!((self.extra, value), (Some(extra), Some(v)) if extra.trigger == v)
    }
}

pub const BUSINESS_TYPE_OPTIONS: &[&str] = &["Kafe", "Hızlı Tüketim (Fastfood)", "Oto", "Diğer"];
pub const ENTRY_QUESTION_OPTIONS: &[&str] = &["Bilgi alabilir miyim?", "Fiyat nedir?"];
pub const PRICE_OFFER_OPTIONS: &[&str] = &["6000", "5500", "Diğer"];
pub const VALUE_REASON_OPTIONS: &[&str] = &["Reklam", "Tekrarlı satış", "Hareketlilik"];
pub const OBJECTION_OPTIONS: &[&str] = &["Pahalı", "Daha ucuza yapan var", "Ne sunacaksın ki?"];
pub const SALE_HAPPENED_OPTIONS: &[&str] = &["Evet", "Hayır"];
pub const PAYMENT_TYPE_OPTIONS: &[&str] = &["Direkt", "Kapora ile parçalı ödeme"];

/// The intake questionnaire, in interview order.
pub static QUESTIONS: &[QuestionSpec] = &[
    QuestionSpec::text(AnswerField::Instagram, "Instagram hesabı", "@kullanici"),
    QuestionSpec::text(AnswerField::ContactName, "Kişi İsmi", "Ad Soyad"),
    QuestionSpec::text(AnswerField::Phone, "Telefon Numarası", "+90 5xx xxx xx xx"),
    QuestionSpec::text(AnswerField::BusinessName, "İşletme İsmi", "Kahve Bahçesi"),
    QuestionSpec::select(AnswerField::BusinessType, "İşletme Türü", BUSINESS_TYPE_OPTIONS),
    QuestionSpec::select(
        AnswerField::EntryQuestion,
        "Hangi soru ile başladı?",
        ENTRY_QUESTION_OPTIONS,
    ),
    QuestionSpec {
        field: AnswerField::PriceOffer,
        label: "Fiyat teklifi ne kadar?",
        kind: QuestionKind::Select {
            options: PRICE_OFFER_OPTIONS,
        },
        extra: Some(ExtraInput {
            trigger: crate::util::constants::OTHER_OPTION,
            field: AnswerField::PriceOther,
        }),
    },
    QuestionSpec::select(
        AnswerField::ValueReason,
        "Hangi değer için geldi?",
        VALUE_REASON_OPTIONS,
    ),
    QuestionSpec::select(
        AnswerField::Objection,
        "Hangi engel ile geldi?",
        OBJECTION_OPTIONS,
    ),
    QuestionSpec::select(
        AnswerField::SaleHappened,
        "Satış gerçekleşti mi?",
        SALE_HAPPENED_OPTIONS,
    ),
    QuestionSpec::select(AnswerField::PaymentType, "Ödeme türü", PAYMENT_TYPE_OPTIONS),
];

/// The question that asks for `field`, if any. The companion field
/// (`priceOther`) resolves to the question that owns it.
pub fn question_for(field: AnswerField) -> Option<&'static QuestionSpec> {
    QUESTIONS
        .iter()
        .find(|q| q.field == field || q.extra.is_some_and(|extra| extra.field == field))
}
