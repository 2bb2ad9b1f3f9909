// Sayaç CRM - util/constants.rs
//
// Single source of truth for all named constants, storage keys, and the
// fixed label vocabulary shared by the intake, derivation, and export layers.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "Sayaç Makinesi CRM";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "SayacMakinesiCrm";

/// Current application version (updated by release script).
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Durable storage slots
// =============================================================================

/// Storage key holding the JSON-serialised record list.
pub const RECORDS_KEY: &str = "sm_crm_v1";

/// Storage key receiving a copy of the record slot when it could not be
/// fully decoded.
pub const RECORDS_BACKUP_KEY: &str = "sm_crm_v1_backup";

/// Storage key holding the free-text notes scratchpad.
pub const NOTES_KEY: &str = "sm_crm_notes";

/// File extension used by `FileStorage` for the record list slot.
pub const RECORDS_FILE_EXTENSION: &str = "json";

/// File extension used by `FileStorage` for the notes slot.
pub const NOTES_FILE_EXTENSION: &str = "txt";

/// Maximum size of a single storage slot read from disk.
///
/// A slot larger than this is not loaded into memory. `FileStorage` moves
/// such a file aside before it writes the slot again.
pub const MAX_SLOT_SIZE: u64 = 64 * 1024 * 1024; // 64 MB

// =============================================================================
// Intake vocabulary
// =============================================================================

/// Filter choice meaning "no restriction" in the segment and pipeline filters.
pub const ALL_FILTER_LABEL: &str = "Hepsi";

/// The "other" option. Used by the price question (triggers free entry),
/// as the business-type fallback, and as the catch-all segment label.
pub const OTHER_OPTION: &str = "Diğer";

/// Objection answer weighted +2 in the churn score.
pub const OBJECTION_EXPENSIVE: &str = "Pahalı";

/// Objection answer weighted +3 in the churn score.
pub const OBJECTION_CHEAPER_ELSEWHERE: &str = "Daha ucuza yapan var";

/// Entry question weighted +1 in the churn score.
pub const ENTRY_ASKED_PRICE: &str = "Fiyat nedir?";

/// Sale outcome weighted -3 in the churn score.
pub const SALE_HAPPENED_YES: &str = "Evet";

/// Payment type weighted -1 in the churn score.
pub const PAYMENT_DEPOSIT_INSTALMENTS: &str = "Kapora ile parçalı ödeme";

/// Effective price at or above which the churn score gains +1.
pub const HIGH_PRICE_THRESHOLD: f64 = 6000.0;

// =============================================================================
// Display
// =============================================================================

/// Placeholder rendered for absent or unparseable values.
pub const PLACEHOLDER_DASH: &str = "—";

/// Turkish lira currency symbol.
pub const CURRENCY_SYMBOL: &str = "₺";

/// Thousands separator used by tr-TR number formatting.
pub const THOUSANDS_SEPARATOR: char = '.';

// =============================================================================
// Export
// =============================================================================

/// Prefix of the CSV export file name (`<prefix>-<YYYY-MM-DD>.csv`).
pub const CSV_FILE_PREFIX: &str = "sayac-makinesi-crm";

/// UTF-8 byte-order mark written at the start of CSV files so spreadsheet
/// applications detect the encoding of Turkish characters correctly.
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

// =============================================================================
// Configuration
// =============================================================================

/// Config file name, located in the platform config directory's parent.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Default log level when none is specified. A CLI shows warnings only.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Log levels accepted in `[logging] level`.
pub const VALID_LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];
