//! Delimited dataset IO and index-aligned assembly of enriched records.

use std::io::{Read, Write};
use std::path::Path;

use crate::error::SentimentError;
use crate::normalize::LabelFamily;
use crate::signal::content_signal;
use crate::types::{ClassifierOutput, ComplaintRecord, EnrichedRecord, Enrichment};

/// Delimiters tried, in order, when sniffing the header line.
const CANDIDATE_DELIMITERS: [u8; 4] = [b',', b';', b'\t', b'|'];

/// An ordered set of records sharing one header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    pub headers: Vec<String>,
    pub records: Vec<ComplaintRecord>,
}

impl Dataset {
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// A classifier output tagged with the index of the record it scores.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedOutput {
    pub index: usize,
    pub output: ClassifierOutput,
}

/// Read a delimited file whose header must contain `text_column`.
///
/// # Errors
///
/// See [`read_csv_from_reader`]; also returns [`SentimentError::Io`] if the
/// file cannot be opened.
pub fn read_csv(path: &Path, text_column: &str) -> Result<Dataset, SentimentError> {
    let file = std::fs::File::open(path).map_err(|source| SentimentError::Io {
        path: path.display().to_string(),
        source,
    })?;
    read_csv_from_reader(file, text_column)
}

/// Read delimited records, sniffing the delimiter from the header line.
///
/// Rows whose field count differs from the header are skipped with a warning.
///
/// # Errors
///
/// Returns [`SentimentError::MissingTextColumn`] if the header lacks
/// `text_column`, or [`SentimentError::Csv`] / [`SentimentError::Io`] on
/// unreadable input.
pub fn read_csv_from_reader<R: Read>(
    mut reader: R,
    text_column: &str,
) -> Result<Dataset, SentimentError> {
    let mut raw = String::new();
    reader
        .read_to_string(&mut raw)
        .map_err(|source| SentimentError::Io {
            path: "<reader>".to_string(),
            source,
        })?;

    let delimiter = sniff_delimiter(raw.lines().next().unwrap_or_default());
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(raw.as_bytes());

    let headers: Vec<String> = csv_reader
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{FEFF}').to_string())
        .collect();

    if !headers.iter().any(|h| h == text_column) {
        return Err(SentimentError::MissingTextColumn(text_column.to_string()));
    }

    let mut records = Vec::new();
    for (line, row) in csv_reader.records().enumerate() {
        let row = row?;
        if row.len() != headers.len() {
            tracing::warn!(
                row = line + 1,
                expected = headers.len(),
                got = row.len(),
                "skipping malformed dataset row"
            );
            continue;
        }
        let columns = headers
            .iter()
            .cloned()
            .zip(row.iter().map(ToString::to_string))
            .collect();
        records.push(ComplaintRecord::new(columns));
    }

    Ok(Dataset { headers, records })
}

fn sniff_delimiter(header_line: &str) -> u8 {
    CANDIDATE_DELIMITERS
        .into_iter()
        .find(|d| header_line.as_bytes().contains(d))
        .unwrap_or(b',')
}

/// Write enriched records to `path`: original headers, then the enrichment
/// columns. The file is written to a sibling temp path and renamed into place
/// so a failed write never leaves a partial dataset behind.
///
/// # Errors
///
/// Returns [`SentimentError::Io`] or [`SentimentError::Csv`] on write failure.
pub fn write_csv(
    path: &Path,
    headers: &[String],
    records: &[EnrichedRecord],
) -> Result<(), SentimentError> {
    write_atomically(path, |file| write_csv_to_writer(file, headers, records))
}

/// Write a raw (unenriched) dataset to `path`, comma-delimited.
///
/// # Errors
///
/// Returns [`SentimentError::Io`] or [`SentimentError::Csv`] on write failure.
pub fn write_dataset(path: &Path, dataset: &Dataset) -> Result<(), SentimentError> {
    write_atomically(path, |file| {
        let mut csv_writer = csv::Writer::from_writer(file);
        csv_writer.write_record(&dataset.headers)?;
        for record in &dataset.records {
            csv_writer.write_record(
                dataset
                    .headers
                    .iter()
                    .map(|h| record.get(h).unwrap_or_default()),
            )?;
        }
        csv_writer.flush().map_err(|source| SentimentError::Io {
            path: "<writer>".to_string(),
            source,
        })
    })
}

fn write_atomically<F>(path: &Path, write: F) -> Result<(), SentimentError>
where
    F: FnOnce(std::fs::File) -> Result<(), SentimentError>,
{
    let io_err = |source| SentimentError::Io {
        path: path.display().to_string(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }

    let tmp_path = path.with_extension("csv.tmp");
    let file = std::fs::File::create(&tmp_path).map_err(io_err)?;
    if let Err(e) = write(file) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(e);
    }
    std::fs::rename(&tmp_path, path).map_err(io_err)?;
    Ok(())
}

/// Write enriched records as comma-delimited text to any writer.
///
/// # Errors
///
/// Returns [`SentimentError::Csv`] on write failure.
pub fn write_csv_to_writer<W: Write>(
    writer: W,
    headers: &[String],
    records: &[EnrichedRecord],
) -> Result<(), SentimentError> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    let mut header_row: Vec<&str> = headers.iter().map(String::as_str).collect();
    header_row.extend(Enrichment::COLUMNS);
    csv_writer.write_record(&header_row)?;

    for enriched in records {
        let original = headers
            .iter()
            .map(|h| enriched.record.get(h).unwrap_or_default().to_string());
        csv_writer.write_record(original.chain(enriched.enrichment.to_row()))?;
    }

    csv_writer.flush().map_err(|source| SentimentError::Io {
        path: "<writer>".to_string(),
        source,
    })?;
    Ok(())
}

/// Place each stage's outputs into per-record slots by index.
///
/// Fails if an index is out of range, repeated, or missing.
fn align(
    stage: &'static str,
    len: usize,
    outputs: Vec<IndexedOutput>,
) -> Result<Vec<ClassifierOutput>, SentimentError> {
    let mut slots: Vec<Option<ClassifierOutput>> = vec![None; len];

    for IndexedOutput { index, output } in outputs {
        let slot = slots.get_mut(index).ok_or_else(|| SentimentError::Misaligned {
            stage,
            message: format!("index {index} out of range for {len} records"),
        })?;
        if slot.replace(output).is_some() {
            return Err(SentimentError::Misaligned {
                stage,
                message: format!("duplicate output for record {index}"),
            });
        }
    }

    slots
        .into_iter()
        .enumerate()
        .map(|(index, slot)| {
            slot.ok_or_else(|| SentimentError::Misaligned {
                stage,
                message: format!("no output for record {index}"),
            })
        })
        .collect()
}

/// Join both scoring stages back onto `records`, reconciling each record.
///
/// Output order and original column values match `records` exactly.
///
/// # Errors
///
/// Returns [`SentimentError::Misaligned`] if either stage does not cover every
/// record exactly once.
pub fn assemble(
    records: Vec<ComplaintRecord>,
    text_column: &str,
    text_stage: (LabelFamily, Vec<IndexedOutput>),
    emoji_stage: (LabelFamily, Vec<IndexedOutput>),
) -> Result<Vec<EnrichedRecord>, SentimentError> {
    let (text_family, text_outputs) = text_stage;
    let (emoji_family, emoji_outputs) = emoji_stage;

    let text_outputs = align("text", records.len(), text_outputs)?;
    let emoji_outputs = align("emoji", records.len(), emoji_outputs)?;

    let enriched = records
        .into_iter()
        .zip(text_outputs.iter().zip(&emoji_outputs))
        .map(|(record, (text_out, emoji_out))| {
            let signal = content_signal(record.get(text_column).unwrap_or_default());
            let enrichment = Enrichment::from_outputs(
                &text_family.normalize(text_out),
                &emoji_family.normalize(emoji_out),
                signal,
            );
            EnrichedRecord { record, enrichment }
        })
        .collect();

    Ok(enriched)
}
