// Sayaç CRM - cli.rs
//
// Command-line front end. Plays the part of the intake/list/notes screens:
// it parses user actions and calls into the library layers, nothing more.
// Tables and prompts go to stdout; diagnostics go through tracing (stderr).

use crate::app::intake::IntakeSession;
use crate::app::notes::NotesPad;
use crate::app::store::{RecordStore, StorageBackend};
use crate::core::export;
use crate::core::filter::{filter_records, FilterState};
use crate::core::format::{format_price_try, or_dash, price_preview};
use crate::core::model::{AnswerField, Pipeline, Record, Segment};
use crate::core::questionnaire::QuestionKind;
use crate::util::constants::ALL_FILTER_LABEL;
use crate::util::error::{CrmError, Result, StorageError};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use uuid::Uuid;

/// Sayaç Makinesi CRM - sales-intake questionnaire, lead list, and export.
///
/// Records are stored locally; every command reads the current list,
/// applies one action, and writes the list back.
#[derive(Parser, Debug)]
#[command(name = "sayac-crm", version, about)]
pub struct Cli {
    /// Storage directory (overrides config and the platform default).
    #[arg(long = "data-dir", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug", global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the intake questionnaire and save the new record.
    Intake,

    /// List records matching the filters.
    List(FilterArgs),

    /// Export records matching the filters.
    #[command(subcommand)]
    Export(ExportCommand),

    /// Move a record to another pipeline stage.
    Pipeline {
        /// Record id (or a unique prefix of it).
        id: String,
        /// Stage label or its 1-based number (see `stages`).
        stage: String,
    },

    /// Edit record fields; segment and churn risk are re-derived.
    Edit {
        /// Record id (or a unique prefix of it).
        id: String,
        /// Field assignment, e.g. `--set businessType="Oto Yıkama"`.
        /// An empty value clears the field.
        #[arg(long = "set", value_name = "FIELD=VALUE", required = true)]
        assignments: Vec<String>,
    },

    /// Delete a record (asks for confirmation).
    Remove {
        /// Record id (or a unique prefix of it).
        id: String,
        /// Skip the confirmation prompt.
        #[arg(short = 'y', long = "yes")]
        yes: bool,
    },

    /// Quick notes scratchpad.
    Notes {
        #[command(subcommand)]
        action: Option<NotesCommand>,
    },

    /// Print the pipeline stages in order.
    Stages,
}

#[derive(Subcommand, Debug)]
pub enum ExportCommand {
    /// Write a CSV file (UTF-8 with BOM).
    Csv {
        /// Output directory (overrides config and the downloads folder).
        #[arg(short = 'o', long = "out")]
        out: Option<PathBuf>,
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Print the records as pretty JSON (clipboard payload).
    Json {
        #[command(flatten)]
        filter: FilterArgs,
    },
}

#[derive(Subcommand, Debug)]
pub enum NotesCommand {
    /// Print the notes.
    Show,
    /// Replace the notes.
    Set { text: String },
    /// Append a line to the notes.
    Append { text: String },
}

#[derive(Args, Debug, Clone)]
pub struct FilterArgs {
    /// Free-text search over contact, business, and segment fields.
    #[arg(short = 'q', long = "query", default_value = "")]
    pub query: String,

    /// Segment: Hepsi, Kafe, Fastfood, Oto, Diğer.
    #[arg(short = 's', long = "segment", default_value = ALL_FILTER_LABEL)]
    pub segment: String,

    /// Pipeline stage label, or Hepsi.
    #[arg(short = 'p', long = "pipeline", default_value = ALL_FILTER_LABEL)]
    pub pipeline: String,
}

impl FilterArgs {
    pub fn to_filter(&self) -> Result<FilterState> {
        FilterState::from_choices(&self.query, &self.segment, &self.pipeline).ok_or_else(|| {
            let segments: Vec<&str> = std::iter::once(ALL_FILTER_LABEL)
                .chain(Segment::all().iter().map(Segment::label))
                .collect();
            CrmError::InvalidArgument {
                argument: "filter",
                value: format!("{} / {}", self.segment, self.pipeline),
                expected: format!(
                    "segment one of {}; pipeline Hepsi or a stage from `stages`",
                    segments.join(", ")
                ),
            }
        })
    }
}

/// Everything a command needs besides its own arguments.
pub struct Context<B: StorageBackend> {
    pub backend: B,
    pub export_dir: PathBuf,
}

/// Execute one command against `ctx`, reading prompts from `input` and
/// writing output to `out`.
pub fn run<B, R, W>(command: Command, ctx: Context<B>, input: &mut R, out: &mut W) -> Result<()>
where
    B: StorageBackend,
    R: BufRead,
    W: Write,
{
    let Context {
        backend,
        export_dir,
    } = ctx;

    match command {
        Command::Notes { action } => run_notes(action, NotesPad::open(backend), out),
        Command::Stages => {
            for (i, stage) in Pipeline::all().iter().enumerate() {
                writeln!(out, "{}. {stage}", i + 1).map_err(stdout_err)?;
            }
            Ok(())
        }
        command => {
            let mut store = RecordStore::open(backend);
            match command {
                Command::Intake => run_intake(&mut store, input, out),
                Command::List(filter) => {
                    let filter = filter.to_filter()?;
                    print_table(&filter_records(store.records(), &filter), out)
                }
                Command::Export(ExportCommand::Csv { out: dir, filter }) => {
                    let filter = filter.to_filter()?;
                    let rows = filter_records(store.records(), &filter);
                    let dir = dir.unwrap_or(export_dir);
                    let path =
                        export::write_csv_file(rows.iter().copied(), &dir, Utc::now().date_naive())?;
                    writeln!(out, "{}", path.display()).map_err(stdout_err)
                }
                Command::Export(ExportCommand::Json { filter }) => {
                    let filter = filter.to_filter()?;
                    let rows = filter_records(store.records(), &filter);
                    let count = export::export_json(rows.iter().copied(), &mut *out)?;
                    tracing::debug!(count, "JSON export written");
                    writeln!(out).map_err(stdout_err)
                }
                Command::Pipeline { id, stage } => {
                    let id = resolve_id(&store, &id)?;
                    let stage = parse_stage(&stage)?;
                    store.set_pipeline(id, stage)?;
                    writeln!(out, "{} → {stage}", short_id(id)).map_err(stdout_err)
                }
                Command::Edit { id, assignments } => {
                    let id = resolve_id(&store, &id)?;
                    run_edit(&mut store, id, &assignments, out)
                }
                Command::Remove { id, yes } => {
                    let id = resolve_id(&store, &id)?;
                    run_remove(&mut store, id, yes, input, out)
                }
                Command::Notes { .. } | Command::Stages => Ok(()),
            }
        }
    }
}

// =============================================================================
// Intake
// =============================================================================

/// Walk the questionnaire interactively.
///
/// A number picks an option, `<` goes back, an empty line keeps the current
/// answer and moves on. End of input cancels without saving.
pub fn run_intake<B, R, W>(store: &mut RecordStore<B>, input: &mut R, out: &mut W) -> Result<()>
where
    B: StorageBackend,
    R: BufRead,
    W: Write,
{
    let mut session = IntakeSession::new();

    loop {
        let question = session.current_question();
        writeln!(
            out,
            "\n[{}/{}] %{}  {}",
            session.step() + 1,
            session.total_steps(),
            session.progress_percent(),
            question.label
        )
        .map_err(stdout_err)?;

        match question.kind {
            QuestionKind::Text { placeholder } => {
                writeln!(out, "  ({placeholder})").map_err(stdout_err)?;
            }
            QuestionKind::Select { options } => {
                for (i, option) in options.iter().enumerate() {
                    writeln!(out, "  {}. {option}", i + 1).map_err(stdout_err)?;
                }
            }
        }
        if let Some(current) = session.answer_for(question.field) {
            writeln!(out, "  [{current}]").map_err(stdout_err)?;
        }
        write!(out, "> ").map_err(stdout_err)?;
        out.flush().map_err(stdout_err)?;

        let Some(line) = read_line(input)? else {
            writeln!(out, "\nKayıt iptal edildi.").map_err(stdout_err)?;
            tracing::info!(step = session.step(), "Intake cancelled");
            return Ok(());
        };

        if line == "<" {
            session.retreat();
            continue;
        }

        if !line.is_empty() {
            let value = match question.kind {
                QuestionKind::Text { .. } => line,
                QuestionKind::Select { options } => match pick_option(options, &line) {
                    Some(v) => v.to_string(),
                    None => {
                        writeln!(out, "  1-{} arası bir seçim yapın.", options.len())
                            .map_err(stdout_err)?;
                        continue;
                    }
                },
            };

            let extra = if question.shows_extra(Some(value.as_str())) {
                write!(out, "  Tutar: ").map_err(stdout_err)?;
                out.flush().map_err(stdout_err)?;
                let raw = read_line(input)?.unwrap_or_default();
                writeln!(out, "  {}", price_preview(&raw).message()).map_err(stdout_err)?;
                Some(raw)
            } else {
                None
            };

            session.answer_current(Some(value), extra);
        }

        if let Some(record) = session.submit(store)? {
            writeln!(out, "\nKayıt tamamlandı: {}", short_id(record.id)).map_err(stdout_err)?;
            writeln!(
                out,
                "  Segment: {}  Churn: {}  Fiyat: {}",
                record.segment,
                record.churn_risk,
                format_price_try(record.price_numeric)
            )
            .map_err(stdout_err)?;
            return Ok(());
        }
    }
}

/// Resolve a select answer given as a 1-based number or the option text.
fn pick_option(options: &'static [&'static str], raw: &str) -> Option<&'static str> {
    if let Ok(n) = raw.parse::<usize>() {
        return n.checked_sub(1).and_then(|i| options.get(i)).copied();
    }
    options.iter().copied().find(|o| o.eq_ignore_ascii_case(raw))
}

// =============================================================================
// Edit / remove
// =============================================================================

fn run_edit<B: StorageBackend, W: Write>(
    store: &mut RecordStore<B>,
    id: Uuid,
    assignments: &[String],
    out: &mut W,
) -> Result<()> {
    let record = store
        .get(id)
        .ok_or_else(|| StorageError::NotFound { id: id.to_string() })?;
    let mut edit = record.edit();

    for assignment in assignments {
        let (key, value) = assignment
            .split_once('=')
            .ok_or_else(|| CrmError::InvalidArgument {
                argument: "assignment",
                value: assignment.clone(),
                expected: "FIELD=VALUE".to_string(),
            })?;
        let value = value.trim();

        if key == "pipeline" {
            edit.pipeline = parse_stage(value)?;
        } else if let Some(field) = AnswerField::from_key(key) {
            let value = (!value.is_empty()).then(|| value.to_string());
            edit.answers.set(field, value);
        } else {
            let keys: Vec<&str> = AnswerField::all().iter().map(AnswerField::key).collect();
            return Err(CrmError::InvalidArgument {
                argument: "field",
                value: key.to_string(),
                expected: format!("pipeline, {}", keys.join(", ")),
            });
        }
    }

    let saved = store.apply_edit(id, edit)?;
    writeln!(
        out,
        "{}  Segment: {}  Churn: {}  Pipeline: {}",
        short_id(saved.id),
        saved.segment,
        saved.churn_risk,
        saved.pipeline
    )
    .map_err(stdout_err)
}

fn run_remove<B, R, W>(
    store: &mut RecordStore<B>,
    id: Uuid,
    yes: bool,
    input: &mut R,
    out: &mut W,
) -> Result<()>
where
    B: StorageBackend,
    R: BufRead,
    W: Write,
{
    let mut prompt_error = None;
    let removed = store.remove(id, |record| {
        if yes {
            return true;
        }
        let answer = write!(
            out,
            "{} ({}) kaydını silmek istediğinize emin misiniz? [e/H] ",
            or_dash(record.answers.contact_name.as_deref()),
            or_dash(record.answers.business_name.as_deref()),
        )
        .and_then(|_| out.flush())
        .map_err(stdout_err)
        .and_then(|_| read_line(input));

        match answer {
            Ok(line) => matches!(line.as_deref(), Some("e" | "E" | "evet" | "Evet")),
            Err(e) => {
                prompt_error = Some(e);
                false
            }
        }
    })?;

    if let Some(e) = prompt_error {
        return Err(e);
    }
    let message = if removed { "Silindi." } else { "Vazgeçildi." };
    writeln!(out, "{message}").map_err(stdout_err)
}

// =============================================================================
// Notes
// =============================================================================

fn run_notes<B: StorageBackend, W: Write>(
    action: Option<NotesCommand>,
    mut pad: NotesPad<B>,
    out: &mut W,
) -> Result<()> {
    match action.unwrap_or(NotesCommand::Show) {
        NotesCommand::Show => writeln!(out, "{}", pad.text()).map_err(stdout_err),
        NotesCommand::Set { text } => Ok(pad.set(text)?),
        NotesCommand::Append { text } => Ok(pad.append_line(&text)?),
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn print_table<W: Write>(records: &[&Record], out: &mut W) -> Result<()> {
    if records.is_empty() {
        return writeln!(out, "Kayıt yok. `intake` ile yeni kayıt ekleyin.").map_err(stdout_err);
    }

    for record in records {
        let a = &record.answers;
        writeln!(
            out,
            "{}  {}  {}  {}  {}  {}  {}  {}  {}  {}",
            short_id(record.id),
            display_date(&record.created_at),
            or_dash(a.contact_name.as_deref()),
            or_dash(a.business_name.as_deref()),
            or_dash(a.business_type.as_deref()),
            record.segment,
            format_price_try(record.price_numeric),
            or_dash(a.objection.as_deref()),
            record.churn_risk,
            record.pipeline,
        )
        .map_err(stdout_err)?;
    }
    writeln!(out, "{} kayıt", records.len()).map_err(stdout_err)
}

/// `dd.mm.yyyy` for ISO timestamps; anything else is shown as stored.
fn display_date(created_at: &str) -> String {
    DateTime::parse_from_rfc3339(created_at)
        .map(|dt| dt.format("%d.%m.%Y").to_string())
        .unwrap_or_else(|_| created_at.to_string())
}

fn short_id(id: Uuid) -> String {
    id.to_string().chars().take(8).collect()
}

/// Full UUID, or a prefix matching exactly one stored record.
fn resolve_id<B: StorageBackend>(store: &RecordStore<B>, raw: &str) -> Result<Uuid> {
    if let Ok(id) = Uuid::parse_str(raw) {
        return Ok(id);
    }

    let prefix = raw.to_lowercase();
    let matches: Vec<Uuid> = store
        .records()
        .iter()
        .map(|r| r.id)
        .filter(|id| id.to_string().starts_with(&prefix))
        .collect();

    match matches.as_slice() {
        [id] => Ok(*id),
        [] => Err(StorageError::NotFound {
            id: raw.to_string(),
        }
        .into()),
        _ => Err(CrmError::InvalidArgument {
            argument: "id",
            value: raw.to_string(),
            expected: format!("a unique prefix ({} records match)", matches.len()),
        }),
    }
}

/// Stage label or 1-based stage number.
fn parse_stage(raw: &str) -> Result<Pipeline> {
    let by_number = raw
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| Pipeline::all().get(i).copied());

    by_number
        .or_else(|| Pipeline::from_label(raw))
        .ok_or_else(|| CrmError::InvalidArgument {
            argument: "pipeline stage",
            value: raw.to_string(),
            expected: format!("1-{} or a label from `stages`", Pipeline::all().len()),
        })
}

/// Read one line without its terminator. `None` at end of input.
fn read_line<R: BufRead>(input: &mut R) -> Result<Option<String>> {
    let mut line = String::new();
    let n = input.read_line(&mut line).map_err(|e| CrmError::Io {
        path: PathBuf::from("<stdin>"),
        operation: "read",
        source: e,
    })?;
    if n == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn stdout_err(e: std::io::Error) -> CrmError {
    CrmError::Io {
        path: PathBuf::from("<stdout>"),
        operation: "write",
        source: e,
    }
}
