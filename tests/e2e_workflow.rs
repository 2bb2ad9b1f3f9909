// Sayaç CRM - tests/e2e_workflow.rs
//
// End-to-end tests for the intake → storage → list → export pipeline.
//
// These tests use the real file-backed storage in a temporary directory,
// real classification, and real CSV/JSON rendering. Each test reopens
// the storage from disk to prove the state survives a restart.

use chrono::NaiveDate;
use sayac_crm::app::intake::IntakeSession;
use sayac_crm::app::notes::NotesPad;
use sayac_crm::app::store::RecordStore;
use sayac_crm::core::export::{csv_header_line, to_csv, to_json, write_csv_file};
use sayac_crm::core::filter::{filter_records, FilterState};
use sayac_crm::core::model::{AnswerField, ChurnRisk, Pipeline, Record, Segment};
use sayac_crm::platform::storage::FileStorage;
use sayac_crm::util::constants::UTF8_BOM;
use std::path::Path;
use tempfile::TempDir;

// =============================================================================
// Helpers
// =============================================================================

fn open_store(dir: &Path) -> RecordStore<FileStorage> {
    RecordStore::open(FileStorage::new(dir))
}

/// Run an intake with the given answers and save it.
fn intake(store: &mut RecordStore<FileStorage>, answers: &[(AnswerField, &str)]) -> Record {
    let mut session = IntakeSession::with_created_at("2025-05-01T09:30:00.000Z");
    for (field, value) in answers {
        session.set_answer(*field, Some(value.to_string()), None);
    }
    session.finish(store).unwrap()
}

fn seed(dir: &Path) -> (Record, Record) {
    let mut store = open_store(dir);
    let kafe = intake(
        &mut store,
        &[
            (AnswerField::ContactName, "Ayşe Yılmaz"),
            (AnswerField::BusinessName, "Kahve Bahçesi"),
            (AnswerField::BusinessType, "Kafe"),
            (AnswerField::PriceOffer, "5500"),
            (AnswerField::SaleHappened, "Evet"),
        ],
    );
    let mut session = IntakeSession::with_created_at("2025-05-02T14:00:00.000Z");
    session.set_answer(AnswerField::ContactName, Some("Mehmet, \"Usta\"".into()), None);
    session.set_answer(AnswerField::BusinessType, Some("Oto Yıkama".into()), None);
    session.set_answer(AnswerField::EntryQuestion, Some("Fiyat nedir?".into()), None);
    session.set_answer(AnswerField::Objection, Some("Pahalı".into()), None);
    session.set_answer(
        AnswerField::PriceOffer,
        Some("Diğer".into()),
        Some("7500 TL".into()),
    );
    let oto = session.finish(&mut store).unwrap();
    (kafe, oto)
}

// =============================================================================
// Intake and persistence
// =============================================================================

#[test]
fn e2e_intake_survives_restart() {
    let dir = TempDir::new().unwrap();
    let (kafe, oto) = seed(dir.path());

    let store = open_store(dir.path());
    assert_eq!(store.len(), 2);
    // Newest first.
    assert_eq!(store.records()[0], oto);
    assert_eq!(store.records()[1], kafe);

    assert_eq!(kafe.segment, Segment::Kafe);
    assert_eq!(kafe.churn_risk, ChurnRisk::Low);
    assert_eq!(kafe.price_numeric, Some(5500.0));
    assert_eq!(kafe.pipeline, Pipeline::Candidate);

    assert_eq!(oto.segment, Segment::Oto);
    // Pahalı +2, Fiyat nedir? +1
    assert_eq!(oto.churn_risk, ChurnRisk::High);
    // "7500 TL" is not a plain number.
    assert_eq!(oto.price_numeric, None);
}

#[test]
fn e2e_stored_json_uses_record_keys() {
    let dir = TempDir::new().unwrap();
    seed(dir.path());

    let raw = std::fs::read_to_string(dir.path().join("sm_crm_v1.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let first = &value[0];
    assert_eq!(first["businessType"], "Oto Yıkama");
    assert_eq!(first["segment"], "Oto");
    assert_eq!(first["churnRisk"], "Yüksek");
    assert_eq!(first["pipeline"], "Aday Cari");
    assert_eq!(first["createdAt"], "2025-05-02T14:00:00.000Z");
    assert!(first["priceNumeric"].is_null());
}

#[test]
fn e2e_corrupt_storage_starts_empty() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("sm_crm_v1.json"), "[{\"broken\": ").unwrap();

    let mut store = open_store(dir.path());
    assert!(store.is_empty());

    // The next save overwrites the corrupt slot; the original text survives
    // in the backup slot.
    intake(&mut store, &[(AnswerField::BusinessType, "Kafe")]);
    assert_eq!(open_store(dir.path()).len(), 1);
    let backup = std::fs::read_to_string(dir.path().join("sm_crm_v1_backup.json")).unwrap();
    assert_eq!(backup, "[{\"broken\": ");
}

#[test]
fn e2e_one_bad_record_does_not_wipe_the_list() {
    let dir = TempDir::new().unwrap();
    let (kafe, oto) = seed(dir.path());

    // Hand-edit the stored file: one record gets a stage the app does not know.
    let slot = dir.path().join("sm_crm_v1.json");
    let raw = std::fs::read_to_string(&slot).unwrap();
    let mut value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    value[0]["pipeline"] = serde_json::Value::from("Kazanıldı");
    let edited = serde_json::to_string(&value).unwrap();
    std::fs::write(&slot, &edited).unwrap();

    let mut store = open_store(dir.path());
    assert_eq!(store.records(), &[kafe]);
    intake(&mut store, &[(AnswerField::BusinessType, "Oto")]);

    assert_eq!(open_store(dir.path()).len(), 2);
    let backup = std::fs::read_to_string(dir.path().join("sm_crm_v1_backup.json")).unwrap();
    let kept: serde_json::Value = serde_json::from_str(&backup).unwrap();
    assert_eq!(kept[0]["id"], oto.id.to_string());
    assert_eq!(kept[0]["pipeline"], "Kazanıldı");
}

// =============================================================================
// Pipeline, edit, remove
// =============================================================================

#[test]
fn e2e_pipeline_edit_remove() {
    let dir = TempDir::new().unwrap();
    let (kafe, oto) = seed(dir.path());

    {
        let mut store = open_store(dir.path());
        store.set_pipeline(kafe.id, Pipeline::SaleCompleted).unwrap();

        let mut edit = store.get(oto.id).unwrap().edit();
        edit.answers.business_type = Some("Hızlı Tüketim (Fastfood)".into());
        edit.answers.price_other = Some("6000".into());
        store.apply_edit(oto.id, edit).unwrap();
    }

    let mut store = open_store(dir.path());
    let kafe_now = store.get(kafe.id).unwrap();
    assert_eq!(kafe_now.pipeline, Pipeline::SaleCompleted);
    assert_eq!(kafe_now.created_at, kafe.created_at);

    let oto_now = store.get(oto.id).unwrap();
    assert_eq!(oto_now.segment, Segment::Fastfood);
    assert_eq!(oto_now.price_numeric, Some(6000.0));
    assert_eq!(oto_now.created_at, oto.created_at);

    assert!(!store.remove(oto.id, |_| false).unwrap());
    assert!(store.remove(oto.id, |_| true).unwrap());

    let store = open_store(dir.path());
    assert_eq!(store.len(), 1);
    assert!(store.get(oto.id).is_none());
}

// =============================================================================
// Filter and export
// =============================================================================

#[test]
fn e2e_filter_then_export_csv() {
    let dir = TempDir::new().unwrap();
    let out_dir = TempDir::new().unwrap();
    seed(dir.path());
    let store = open_store(dir.path());

    let filter = FilterState::from_choices("usta", "Hepsi", "Hepsi").unwrap();
    let rows = filter_records(store.records(), &filter);
    assert_eq!(rows.len(), 1);

    let date = NaiveDate::from_ymd_opt(2025, 5, 3).unwrap();
    let path = write_csv_file(rows.iter().copied(), out_dir.path(), date).unwrap();
    assert!(path.ends_with("sayac-makinesi-crm-2025-05-03.csv"));

    let bytes = std::fs::read(&path).unwrap();
    assert!(bytes.starts_with(UTF8_BOM));
    let text = String::from_utf8(bytes[UTF8_BOM.len()..].to_vec()).unwrap();

    let mut lines = text.split('\n');
    assert_eq!(lines.next(), Some(csv_header_line().as_str()));
    let row = lines.next().unwrap();
    assert!(row.contains("\"Mehmet, \"\"Usta\"\"\""), "row: {row}");
    assert!(row.contains(",Oto,Yüksek,Aday Cari,2025-05-02T14:00:00.000Z,"));
    assert!(lines.next().is_none());
    assert!(!text.ends_with('\n'));
}

#[test]
fn e2e_segment_filter_and_json_export() {
    let dir = TempDir::new().unwrap();
    seed(dir.path());
    let store = open_store(dir.path());

    let filter = FilterState::from_choices("", "Kafe", "Aday Cari").unwrap();
    let rows = filter_records(store.records(), &filter);
    assert_eq!(rows.len(), 1);

    let json = to_json(rows.iter().copied()).unwrap();
    let parsed: Vec<Record> = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.len(), 1);
    assert_eq!(parsed[0].answers.contact_name.as_deref(), Some("Ayşe Yılmaz"));

    let none = FilterState::from_choices("", "Oto", "Satış Tamamlandı").unwrap();
    let empty = filter_records(store.records(), &none);
    assert!(empty.is_empty());
    assert_eq!(to_csv(empty.iter().copied()).unwrap(), csv_header_line());
}

// =============================================================================
// Notes
// =============================================================================

#[test]
fn e2e_notes_independent_of_records() {
    let dir = TempDir::new().unwrap();
    seed(dir.path());

    let mut pad = NotesPad::open(FileStorage::new(dir.path()));
    pad.set("Pazartesi ara: Ayşe").unwrap();
    pad.append_line("Kapora hatırlat").unwrap();

    let pad = NotesPad::open(FileStorage::new(dir.path()));
    assert_eq!(pad.text(), "Pazartesi ara: Ayşe\nKapora hatırlat");
    assert_eq!(open_store(dir.path()).len(), 2);
}
