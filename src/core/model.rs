// Sayaç CRM - core/model.rs
//
// Core data model types. Pure data definitions with no I/O, no UI,
// no platform dependencies.
//
// These types are the shared vocabulary across all layers. JSON field names
// and enum labels match the persisted `sm_crm_v1` slot exactly.

use crate::core::derive;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// Record (one completed intake)
// =============================================================================

/// One completed intake interview with its derived classification fields.
///
/// This is the unit that flows through the store, filtering, display, and
/// export. `segment`, `churn_risk`, and `price_numeric` are only ever set by
/// [`Record::classify`], so they always agree with `answers`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// Unique, immutable, assigned at creation.
    pub id: Uuid,

    /// Questionnaire answers (serialised inline, one JSON key per field).
    #[serde(flatten)]
    pub answers: Answers,

    /// Derived from `answers.business_type`.
    pub segment: Segment,

    /// Derived from the weighted churn score over `answers`.
    pub churn_risk: ChurnRisk,

    /// Current sales stage. The only field that changes without an edit.
    pub pipeline: Pipeline,

    /// Creation timestamp (ISO-8601 UTC). Never modified after creation.
    pub created_at: String,

    /// Effective numeric price, `None` when nothing parses as a number.
    pub price_numeric: Option<f64>,
}

impl Record {
    /// Build a record from answers, computing every derived field.
    pub fn classify(id: Uuid, answers: Answers, pipeline: Pipeline, created_at: String) -> Self {
        let business_type = answers
            .business_type
            .as_deref()
            .unwrap_or(crate::util::constants::OTHER_OPTION);

        Self {
            id,
            segment: derive::derive_segment(business_type),
            churn_risk: derive::derive_churn_risk(&answers),
            price_numeric: derive::record_price(&answers),
            answers,
            pipeline,
            created_at,
        }
    }

    /// Apply a full field edit, keeping `id` and `created_at` and
    /// re-deriving every classification field from the edited answers.
    pub fn with_edit(&self, edit: RecordEdit) -> Self {
        Self::classify(self.id, edit.answers, edit.pipeline, self.created_at.clone())
    }

    /// Start an edit draft seeded from this record's current values.
    pub fn edit(&self) -> RecordEdit {
        RecordEdit {
            answers: self.answers.clone(),
            pipeline: self.pipeline,
        }
    }
}

/// Editable copy of a record's mutable fields.
///
/// Dropping the draft is the cancel path: nothing touches the store until the
/// draft is passed to `RecordStore::apply_edit`. The derived fields are not
/// part of the draft; they are recomputed when the edit is applied.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordEdit {
    pub answers: Answers,
    pub pipeline: Pipeline,
}

// =============================================================================
// Answers
// =============================================================================

/// The fixed set of answer fields a record carries.
///
/// Every field is optional; an unanswered question is `None` and is omitted
/// from the JSON form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answers {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_question: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_offer: Option<String>,
    /// Free-entered price, companion of `price_offer == "Diğer"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_other: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub objection: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sale_happened: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_type: Option<String>,
}

impl Answers {
    /// Read one answer field.
    pub fn get(&self, field: AnswerField) -> Option<&str> {
        self.slot(field).as_deref()
    }

    /// Overwrite one answer field. `None` clears it.
    pub fn set(&mut self, field: AnswerField, value: Option<String>) {
        *self.slot_mut(field) = value;
    }

    fn slot(&self, field: AnswerField) -> &Option<String> {
        match field {
            AnswerField::Instagram => &self.instagram,
            AnswerField::ContactName => &self.contact_name,
            AnswerField::Phone => &self.phone,
            AnswerField::BusinessName => &self.business_name,
            AnswerField::BusinessType => &self.business_type,
            AnswerField::EntryQuestion => &self.entry_question,
            AnswerField::PriceOffer => &self.price_offer,
            AnswerField::PriceOther => &self.price_other,
            AnswerField::ValueReason => &self.value_reason,
            AnswerField::Objection => &self.objection,
            AnswerField::SaleHappened => &self.sale_happened,
            AnswerField::PaymentType => &self.payment_type,
        }
    }

    fn slot_mut(&mut self, field: AnswerField) -> &mut Option<String> {
        match field {
            AnswerField::Instagram => &mut self.instagram,
            AnswerField::ContactName => &mut self.contact_name,
            AnswerField::Phone => &mut self.phone,
            AnswerField::BusinessName => &mut self.business_name,
            AnswerField::BusinessType => &mut self.business_type,
            AnswerField::EntryQuestion => &mut self.entry_question,
            AnswerField::PriceOffer => &mut self.price_offer,
            AnswerField::PriceOther => &mut self.price_other,
            AnswerField::ValueReason => &mut self.value_reason,
            AnswerField::Objection => &mut self.objection,
            AnswerField::SaleHappened => &mut self.sale_happened,
            AnswerField::PaymentType => &mut self.payment_type,
        }
    }
}

/// Identifies one answer field. The key is the camelCase JSON/CSV name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnswerField {
    Instagram,
    ContactName,
    Phone,
    BusinessName,
    BusinessType,
    EntryQuestion,
    PriceOffer,
    PriceOther,
    ValueReason,
    Objection,
    SaleHappened,
    PaymentType,
}

impl AnswerField {
    /// All answer fields in CSV column order.
    pub fn all() -> &'static [AnswerField] {
        &[
            AnswerField::Instagram,
            AnswerField::ContactName,
            AnswerField::Phone,
            AnswerField::BusinessName,
            AnswerField::BusinessType,
            AnswerField::EntryQuestion,
            AnswerField::PriceOffer,
            AnswerField::PriceOther,
            AnswerField::ValueReason,
            AnswerField::Objection,
            AnswerField::SaleHappened,
            AnswerField::PaymentType,
        ]
    }

    /// The camelCase key used in JSON and the CSV header.
    pub fn key(&self) -> &'static str {
        match self {
            AnswerField::Instagram => "instagram",
            AnswerField::ContactName => "contactName",
            AnswerField::Phone => "phone",
            AnswerField::BusinessName => "businessName",
            AnswerField::BusinessType => "businessType",
            AnswerField::EntryQuestion => "entryQuestion",
            AnswerField::PriceOffer => "priceOffer",
            AnswerField::PriceOther => "priceOther",
            AnswerField::ValueReason => "valueReason",
            AnswerField::Objection => "objection",
            AnswerField::SaleHappened => "saleHappened",
            AnswerField::PaymentType => "paymentType",
        }
    }

    /// Look a field up by its camelCase key.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::all().iter().copied().find(|f| f.key() == key)
    }
}

impl std::fmt::Display for AnswerField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

// =============================================================================
// Segment
// =============================================================================

/// Coarse business-type classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Segment {
    Kafe,
    Fastfood,
    Oto,
    #[default]
    #[serde(rename = "Diğer")]
    Other,
}

impl Segment {
    /// Returns all variants in filter-menu order.
    pub fn all() -> &'static [Segment] {
        &[Segment::Kafe, Segment::Fastfood, Segment::Oto, Segment::Other]
    }

    /// Display label, identical to the persisted value.
    pub fn label(&self) -> &'static str {
        match self {
            Segment::Kafe => "Kafe",
            Segment::Fastfood => "Fastfood",
            Segment::Oto => "Oto",
            Segment::Other => "Diğer",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::all().iter().copied().find(|s| s.label() == label)
    }
}

impl std::fmt::Display for Segment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Churn risk
// =============================================================================

/// Three-tier churn risk, ordered from lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ChurnRisk {
    #[serde(rename = "Düşük")]
    Low,
    #[serde(rename = "Orta")]
    Medium,
    #[serde(rename = "Yüksek")]
    High,
}

impl ChurnRisk {
    pub fn label(&self) -> &'static str {
        match self {
            ChurnRisk::Low => "Düşük",
            ChurnRisk::Medium => "Orta",
            ChurnRisk::High => "Yüksek",
        }
    }
}

impl std::fmt::Display for ChurnRisk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Pipeline stage
// =============================================================================

/// Sales-process position of a record, in process order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum Pipeline {
    #[default]
    #[serde(rename = "Aday Cari")]
    Candidate,
    #[serde(rename = "Telefon Görüşmesi Bekliyor")]
    AwaitingCall,
    #[serde(rename = "Görüşme Yapıldı")]
    Interviewed,
    #[serde(rename = "Teklif Verildi")]
    OfferMade,
    #[serde(rename = "Satış Onaylandı")]
    SaleApproved,
    #[serde(rename = "Satış Tamamlandı")]
    SaleCompleted,
    #[serde(rename = "Churn (Kaybedildi)")]
    Churned,
}

impl Pipeline {
    /// All seven stages in process order. The first is the creation default.
    pub fn all() -> &'static [Pipeline] {
        &[
            Pipeline::Candidate,
            Pipeline::AwaitingCall,
            Pipeline::Interviewed,
            Pipeline::OfferMade,
            Pipeline::SaleApproved,
            Pipeline::SaleCompleted,
            Pipeline::Churned,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Pipeline::Candidate => "Aday Cari",
            Pipeline::AwaitingCall => "Telefon Görüşmesi Bekliyor",
            Pipeline::Interviewed => "Görüşme Yapıldı",
            Pipeline::OfferMade => "Teklif Verildi",
            Pipeline::SaleApproved => "Satış Onaylandı",
            Pipeline::SaleCompleted => "Satış Tamamlandı",
            Pipeline::Churned => "Churn (Kaybedildi)",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::all().iter().copied().find(|p| p.label() == label)
    }
}

impl std::fmt::Display for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
