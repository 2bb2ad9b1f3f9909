// Sayaç CRM - app/intake.rs
//
// Intake wizard state machine. Walks the questionnaire one step at a time,
// accumulates answers in a typed draft, and on finish classifies the draft
// and prepends the resulting record through the store.
//
// Nothing blocks forward progress: every answer is optional.

use crate::app::store::{RecordStore, StorageBackend};
use crate::core::model::{AnswerField, Answers, Pipeline, Record};
use crate::core::questionnaire::{question_for, QuestionSpec, QUESTIONS};
use crate::util::error::StorageError;
use chrono::{SecondsFormat, Utc};
use uuid::Uuid;

/// In-progress intake: current step plus the answers given so far.
#[derive(Debug, Clone)]
pub struct IntakeSession {
    questions: &'static [QuestionSpec],
    step: usize,
    answers: Answers,
    pipeline: Pipeline,
    created_at: String,
}

impl Default for IntakeSession {
    fn default() -> Self {
        Self::new()
    }
}

impl IntakeSession {
    /// Start a new intake stamped with the current time.
    pub fn new() -> Self {
        Self::with_created_at(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    /// Start a new intake with an explicit creation timestamp.
    pub fn with_created_at(created_at: impl Into<String>) -> Self {
        Self {
            questions: QUESTIONS,
            step: 0,
            answers: Answers::default(),
            pipeline: Pipeline::default(),
            created_at: created_at.into(),
        }
    }

    pub fn step(&self) -> usize {
        self.step
    }

    pub fn total_steps(&self) -> usize {
        self.questions.len()
    }

    pub fn current_question(&self) -> &'static QuestionSpec {
        &self.questions[self.step]
    }

    pub fn is_first(&self) -> bool {
        self.step == 0
    }

    pub fn is_last(&self) -> bool {
        self.step + 1 >= self.questions.len()
    }

    /// Percentage of steps already passed, rounded (0 on the first step).
    pub fn progress_percent(&self) -> u8 {
        let pct = (self.step as f64 / self.questions.len() as f64 * 100.0).round();
        pct as u8
    }

    pub fn answers(&self) -> &Answers {
        &self.answers
    }

    pub fn created_at(&self) -> &str {
        &self.created_at
    }

    /// Current answer for `field`, if given.
    pub fn answer_for(&self, field: AnswerField) -> Option<&str> {
        self.answers.get(field)
    }

    /// Move to the next question; no-op on the last one.
    pub fn advance(&mut self) {
        if !self.is_last() {
            self.step += 1;
        }
    }

    /// Move to the previous question; no-op on the first one.
    pub fn retreat(&mut self) {
        if !self.is_first() {
            self.step -= 1;
        }
    }

    /// Record an answer.
    ///
    /// When the question that owns `field` has a companion free-entry field,
    /// the companion is overwritten with `extra` at the same time, so picking
    /// a fixed price clears a previously typed custom one.
    pub fn set_answer(&mut self, field: AnswerField, value: Option<String>, extra: Option<String>) {
        self.answers.set(field, value);

        if let Some(companion) = question_for(field).and_then(|q| q.extra) {
            if companion.field != field {
                self.answers.set(companion.field, extra);
            }
        }
    }

    /// Answer the current question.
    pub fn answer_current(&mut self, value: Option<String>, extra: Option<String>) {
        let field = self.current_question().field;
        self.set_answer(field, value, extra);
    }

    /// "Enter" on the current step: finish on the last question, otherwise
    /// advance. Returns the stored record when the intake completed.
    pub fn submit<B: StorageBackend>(
        &mut self,
        store: &mut RecordStore<B>,
    ) -> Result<Option<Record>, StorageError> {
        if self.is_last() {
            self.clone().finish(store).map(Some)
        } else {
            self.advance();
            Ok(None)
        }
    }

    /// Build the record from the draft without storing it.
    pub fn build_record(&self) -> Record {
        Record::classify(
            Uuid::new_v4(),
            self.answers.clone(),
            self.pipeline,
            self.created_at.clone(),
        )
    }

    /// Complete the intake: classify, assign an id, and prepend the record.
    ///
    /// The record is returned even though the store keeps its own copy, so
    /// the caller can show what was saved.
    pub fn finish<B: StorageBackend>(
        self,
        store: &mut RecordStore<B>,
    ) -> Result<Record, StorageError> {
        let record = self.build_record();

        tracing::info!(
            id = %record.id,
            segment = record.segment.label(),
            churn_risk = record.churn_risk.label(),
            step = self.step,
            "Intake completed"
        );

        store.prepend(record.clone())?;
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::store::MemoryStorage;
    use crate::core::model::{ChurnRisk, Segment};

    fn some(s: &str) -> Option<String> {
        Some(s.to_string())
    }

    #[test]
    fn test_initial_state() {
        let session = IntakeSession::with_created_at("2025-06-01T09:00:00.000Z");
        assert_eq!(session.step(), 0);
        assert!(session.is_first());
        assert!(!session.is_last());
        assert_eq!(session.progress_percent(), 0);
        assert_eq!(session.current_question().field, AnswerField::Instagram);
        assert_eq!(session.answers(), &Answers::default());
    }

    #[test]
    fn test_step_bounds() {
        let mut session = IntakeSession::with_created_at("t");
        session.retreat();
        assert_eq!(session.step(), 0);

        for _ in 0..50 {
            session.advance();
        }
        assert_eq!(session.step(), session.total_steps() - 1);
        assert!(session.is_last());
        assert_eq!(session.current_question().field, AnswerField::PaymentType);

        session.retreat();
        assert_eq!(session.step(), session.total_steps() - 2);
    }

    #[test]
    fn test_progress_percent() {
        let mut session = IntakeSession::with_created_at("t");
        session.advance(); // 1/11
        assert_eq!(session.progress_percent(), 9);
        for _ in 0..9 {
            session.advance();
        }
        assert_eq!(session.progress_percent(), 91); // 10/11
    }

    #[test]
    fn test_price_companion_set_and_cleared() {
        let mut session = IntakeSession::with_created_at("t");
        session.set_answer(AnswerField::PriceOffer, some("Diğer"), some("7250"));
        assert_eq!(session.answer_for(AnswerField::PriceOther), Some("7250"));

        session.set_answer(AnswerField::PriceOffer, some("5500"), None);
        assert_eq!(session.answer_for(AnswerField::PriceOffer), Some("5500"));
        assert_eq!(session.answer_for(AnswerField::PriceOther), None);
    }

    #[test]
    fn test_plain_answer_leaves_other_fields() {
        let mut session = IntakeSession::with_created_at("t");
        session.set_answer(AnswerField::PriceOffer, some("Diğer"), some("7250"));
        session.set_answer(AnswerField::Phone, some("+90 555"), some("ignored"));
        assert_eq!(session.answer_for(AnswerField::PriceOther), Some("7250"));
        assert_eq!(session.answer_for(AnswerField::Phone), Some("+90 555"));
    }

    #[test]
    fn test_finish_classifies_and_prepends() {
        let mut store = RecordStore::open(MemoryStorage::new());
        let mut session = IntakeSession::with_created_at("2025-06-01T09:00:00.000Z");
        session.set_answer(AnswerField::ContactName, some("Deniz"), None);
        session.set_answer(AnswerField::BusinessType, some("Hızlı Tüketim (Fastfood)"), None);
        session.set_answer(AnswerField::EntryQuestion, some("Fiyat nedir?"), None);
        session.set_answer(AnswerField::PriceOffer, some("Diğer"), some("6500"));
        session.set_answer(AnswerField::Objection, some("Pahalı"), None);

        let record = session.finish(&mut store).unwrap();
        assert_eq!(record.segment, Segment::Fastfood);
        // Pahalı +2, Fiyat nedir? +1, 6500 >= 6000 +1
        assert_eq!(record.churn_risk, ChurnRisk::High);
        assert_eq!(record.price_numeric, Some(6500.0));
        assert_eq!(record.pipeline, Pipeline::Candidate);
        assert_eq!(record.created_at, "2025-06-01T09:00:00.000Z");
        assert_eq!(store.records(), &[record]);
    }

    #[test]
    fn test_finish_with_no_answers() {
        let mut store = RecordStore::open(MemoryStorage::new());
        let record = IntakeSession::new().finish(&mut store).unwrap();
        assert_eq!(record.segment, Segment::Other);
        assert_eq!(record.churn_risk, ChurnRisk::Low);
        assert_eq!(record.price_numeric, None);
        assert!(record.created_at.ends_with('Z'));
    }

    #[test]
    fn test_finish_custom_offer_without_amount_is_zero() {
        let mut store = RecordStore::open(MemoryStorage::new());
        let mut session = IntakeSession::with_created_at("t");
        session.set_answer(AnswerField::PriceOffer, some("Diğer"), None);

        let record = session.finish(&mut store).unwrap();
        assert_eq!(record.price_numeric, Some(0.0));
        assert_eq!(record.churn_risk, ChurnRisk::Low);
    }

    #[test]
    fn test_submit_advances_then_finishes() {
        let mut store = RecordStore::open(MemoryStorage::new());
        let mut session = IntakeSession::with_created_at("t");

        for _ in 0..session.total_steps() - 1 {
            assert!(session.submit(&mut store).unwrap().is_none());
        }
        assert!(session.is_last());
        let saved = session.submit(&mut store).unwrap();
        assert!(saved.is_some());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_each_finish_gets_fresh_id() {
        let mut store = RecordStore::open(MemoryStorage::new());
        let a = IntakeSession::with_created_at("t").finish(&mut store).unwrap();
        let b = IntakeSession::with_created_at("t").finish(&mut store).unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(store.len(), 2);
    }
}
