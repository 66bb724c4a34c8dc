//! Registry text → practitioner records.

use std::collections::BTreeSet;
use std::fmt;

use csv::{ReaderBuilder, StringRecord, Trim};
use wellmatch_model::{ModelError, PractitionerId, PractitionerRecord};

use crate::error::{IngestError, Result};
use crate::header::{HeaderMap, HeaderRole};
use crate::source::CancelToken;

/// Rows between cancellation checks while parsing.
const CANCEL_CHECK_INTERVAL: usize = 256;

/// Why a registry row produced no record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    MissingName,
    MissingSpecialty,
    DuplicateId,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::MissingName => "missing name",
            Self::MissingSpecialty => "missing specialty",
            Self::DuplicateId => "duplicate id",
        })
    }
}

/// A row that was skipped during parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedRow {
    /// 1-based line number in the source text.
    pub line: usize,
    pub reason: RejectReason,
}

/// Output of [`parse_registry`].
#[derive(Debug, Clone)]
pub struct ParsedRegistry {
    pub headers: HeaderMap,
    pub records: Vec<PractitionerRecord>,
    pub rejected: Vec<RejectedRow>,
}

impl ParsedRegistry {
    pub fn rejected_count(&self) -> usize {
        self.rejected.len()
    }
}

/// Parses registry text (header row + data rows).
///
/// Malformed rows are reported in [`ParsedRegistry::rejected`] and never fail
/// the batch. Rows whose fields are all blank are skipped. Fails only when
/// there is no header, or the header has no name or specialty column.
pub fn parse_registry(text: &str, source_name: &str) -> Result<ParsedRegistry> {
    parse_registry_with_cancel(text, source_name, &CancelToken::new())
}

/// [`parse_registry`] that stops with [`IngestError::Cancelled`] once `cancel`
/// is triggered.
pub fn parse_registry_with_cancel(
    text: &str,
    source_name: &str,
    cancel: &CancelToken,
) -> Result<ParsedRegistry> {
    let csv_error = |err: csv::Error| IngestError::CsvParse {
        source_name: source_name.to_string(),
        message: err.to_string(),
    };

    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let header_record = reader.headers().map_err(csv_error)?;
    if is_blank(header_record) {
        return Err(IngestError::NoHeaderDetected {
            source_name: source_name.to_string(),
        });
    }
    let headers = HeaderMap::from_headers(header_record);
    for (role, label) in [(HeaderRole::Name, "name"), (HeaderRole::Specialty, "specialty")] {
        if !headers.contains(role) {
            return Err(IngestError::MissingRole {
                source_name: source_name.to_string(),
                role: label,
            });
        }
    }

    let lines = LineIndex::new(text);
    let mut records = Vec::new();
    let mut rejected = Vec::new();
    let mut seen_ids = BTreeSet::new();
    let mut ordinal = 0;

    for (index, result) in reader.records().enumerate() {
        if index % CANCEL_CHECK_INTERVAL == 0 && cancel.is_cancelled() {
            return Err(IngestError::Cancelled {
                source_name: source_name.to_string(),
            });
        }
        let row = result.map_err(csv_error)?;
        if is_blank(&row) {
            continue;
        }
        ordinal += 1;
        let line_number = row
            .position()
            .map_or(0, |position| lines.line_at(position.byte()));

        match build_record(&headers, &row, ordinal) {
            Ok(record) => {
                if seen_ids.insert(record.id().clone()) {
                    records.push(record);
                } else {
                    tracing::debug!(
                        line = line_number,
                        id = %record.id(),
                        "skipping registry row with duplicate id"
                    );
                    rejected.push(RejectedRow {
                        line: line_number,
                        reason: RejectReason::DuplicateId,
                    });
                }
            }
            Err(reason) => {
                tracing::debug!(line = line_number, %reason, "skipping registry row");
                rejected.push(RejectedRow {
                    line: line_number,
                    reason,
                });
            }
        }
    }

    tracing::debug!(
        source = source_name,
        accepted = records.len(),
        rejected = rejected.len(),
        "parsed practitioner registry"
    );

    Ok(ParsedRegistry {
        headers,
        records,
        rejected,
    })
}

fn is_blank(record: &StringRecord) -> bool {
    record.iter().all(str::is_empty)
}

/// Maps byte offsets in the source text to 1-based line numbers.
struct LineIndex<'a> {
    text: &'a [u8],
    newlines: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    fn new(text: &'a str) -> Self {
        let newlines = text.match_indices('\n').map(|(i, _)| i).collect();
        Self {
            text: text.as_bytes(),
            newlines,
        }
    }

    /// Line on which a record starting at `byte` begins. Line breaks between
    /// `byte` and the first field belong to earlier, blank lines.
    fn line_at(&self, byte: u64) -> usize {
        let byte = usize::try_from(byte).unwrap_or(usize::MAX).min(self.text.len());
        let skipped = self.text[byte..]
            .iter()
            .take_while(|b| matches!(b, b'\r' | b'\n'))
            .count();
        self.newlines.partition_point(|&i| i < byte + skipped) + 1
    }
}

fn build_record(
    headers: &HeaderMap,
    row: &StringRecord,
    position: usize,
) -> std::result::Result<PractitionerRecord, RejectReason> {
    let id = PractitionerId::new(headers.field(row, HeaderRole::Identity))
        .unwrap_or_else(|_| PractitionerId::from_position(position));

    let record = PractitionerRecord::new(
        id,
        headers.field(row, HeaderRole::Name),
        headers.field(row, HeaderRole::Specialty),
    )
    .map_err(|err| match err {
        ModelError::MissingSpecialty => RejectReason::MissingSpecialty,
        _ => RejectReason::MissingName,
    })?;

    let location = headers.field(row, HeaderRole::Location);
    Ok(record
        .with_symptoms(split_symptoms(headers.field(row, HeaderRole::Symptoms)))
        .with_description(headers.field(row, HeaderRole::Description))
        .with_rating(parse_rating(headers.field(row, HeaderRole::Rating)))
        .with_location((!location.is_empty()).then(|| location.to_string())))
}

/// Splits a symptom field on `;`, `|` or `,`.
pub fn split_symptoms(value: &str) -> Vec<String> {
    value
        .split([';', '|', ','])
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_rating(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|r| r.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_symptoms_on_all_delimiters() {
        assert_eq!(
            split_symptoms("Joint Pain; arthritis | back pain,, "),
            vec!["joint pain", "arthritis", "back pain"]
        );
        assert!(split_symptoms("").is_empty());
    }

    #[test]
    fn rating_parse_is_lenient() {
        assert_eq!(parse_rating(" 4.5 "), Some(4.5));
        assert_eq!(parse_rating("n/a"), None);
        assert_eq!(parse_rating("inf"), None);
        assert_eq!(parse_rating(""), None);
    }

    #[test]
    fn header_only_text_has_no_records() {
        let parsed = parse_registry("name,specialty\n", "inline").unwrap();
        assert!(parsed.records.is_empty());
        assert!(parsed.rejected.is_empty());
    }

    #[test]
    fn blank_text_has_no_header() {
        let err = parse_registry("\n  \n", "inline").unwrap_err();
        assert!(matches!(err, IngestError::NoHeaderDetected { .. }));
    }

    #[test]
    fn empty_text_has_no_header() {
        let err = parse_registry("", "inline").unwrap_err();
        assert!(matches!(err, IngestError::NoHeaderDetected { .. }));
    }

    #[test]
    fn line_index_skips_leading_line_breaks() {
        let text = "a,b\r\n\r\nc,d\ne,f";
        let lines = LineIndex::new(text);
        assert_eq!(lines.line_at(0), 1);
        // offset of the "\r\n\r\n" run that precedes "c,d"
        assert_eq!(lines.line_at(3), 3);
        assert_eq!(lines.line_at(7), 3);
        assert_eq!(lines.line_at(10), 4);
        assert_eq!(lines.line_at(99), 4);
    }

    #[test]
    fn cancelled_token_stops_parsing() {
        let cancel = CancelToken::new();
        cancel.cancel();
        let err =
            parse_registry_with_cancel("name,specialty\nA,B\n", "inline", &cancel).unwrap_err();
        assert!(matches!(err, IngestError::Cancelled { .. }));
    }
}
