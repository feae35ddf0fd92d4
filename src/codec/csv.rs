//! Delimited text codec
//!
//! Converts between delimited text and ordered records. Decoding runs a
//! sanitation pass first: statement exports picked up in the wild carry
//! fragments of previously rendered markup, so lines holding one of the
//! denylisted markers are discarded before the remaining text reaches the
//! CSV parser.

use csv::{QuoteStyle, Terminator, Trim, WriterBuilder};

use crate::error::{ReviewError, ReviewResult};

/// Markers whose presence on a line marks it as corrupt
pub const DEFAULT_DENYLIST: &[&str] = &["{", "}", "[", "undefined", "🗑️ Remover"];

/// Column never carried through a decode
pub const EXCLUDED_COLUMN: &str = "socios";

/// One decoded line: field name/value pairs in header order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Record(Vec<(String, String)>);

impl Record {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a field value by name
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Set a field, replacing an existing value in place or appending
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.0.push((key, value)),
        }
    }

    /// Builder form of [`Record::insert`]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Field names in order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    /// Field name/value pairs in order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (k, v) in iter {
            record.insert(k, v);
        }
        record
    }
}

/// Configurable delimited text codec
#[derive(Debug, Clone)]
pub struct CsvCodec {
    delimiter: u8,
    denylist: Vec<String>,
    excluded_column: Option<String>,
}

impl CsvCodec {
    /// Create a codec with the default denylist and excluded column
    pub fn new(delimiter: u8) -> Self {
        Self {
            delimiter,
            denylist: DEFAULT_DENYLIST.iter().map(|s| s.to_string()).collect(),
            excluded_column: Some(EXCLUDED_COLUMN.to_string()),
        }
    }

    /// Codec for the contacts file (`;`-delimited)
    pub fn contacts() -> Self {
        Self::new(b';')
    }

    /// Codec for the transaction report (`,`-delimited)
    pub fn report() -> Self {
        Self::new(b',')
    }

    /// Replace the denylist
    pub fn with_denylist<I, S>(mut self, markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.denylist = markers.into_iter().map(Into::into).collect();
        self
    }

    /// Replace (or disable) the excluded column
    pub fn with_excluded_column(mut self, column: Option<&str>) -> Self {
        self.excluded_column = column.map(String::from);
        self
    }

    pub fn delimiter(&self) -> u8 {
        self.delimiter
    }

    /// Check whether a raw line survives the sanitation pass
    fn keeps_line(&self, line: &str) -> bool {
        !line.trim().is_empty()
            && line.as_bytes().contains(&self.delimiter)
            && !self.denylist.iter().any(|marker| line.contains(marker.as_str()))
    }

    /// Decode delimited text into records
    ///
    /// The first surviving line is the header. Missing trailing fields
    /// decode as empty strings; surplus fields are ignored.
    pub fn decode(&self, raw: &str) -> ReviewResult<Vec<Record>> {
        let mut dropped = 0usize;
        let kept: Vec<&str> = raw
            .lines()
            .filter(|line| {
                let keep = self.keeps_line(line);
                if !keep {
                    dropped += 1;
                }
                keep
            })
            .collect();

        if dropped > 0 {
            tracing::debug!(dropped, "Discarded lines during CSV sanitation");
        }

        if kept.is_empty() {
            return Ok(Vec::new());
        }

        let delimiter = char::from(self.delimiter);
        let text = kept
            .iter()
            .map(|line| trim_fields(line, delimiter))
            .collect::<Vec<_>>()
            .join("\n");
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(Trim::None)
            .delimiter(self.delimiter)
            .from_reader(text.as_bytes());

        let mut lines = reader.records();
        let header: Vec<String> = match lines.next() {
            Some(first) => first?.iter().map(String::from).collect(),
            None => return Ok(Vec::new()),
        };

        let excluded_at = self
            .excluded_column
            .as_deref()
            .and_then(|column| header.iter().position(|h| h == column));

        let mut records = Vec::new();
        for line in lines {
            let line = line?;
            let record: Record = header
                .iter()
                .enumerate()
                .filter(|(i, _)| Some(*i) != excluded_at)
                .map(|(i, key)| {
                    let value = line.get(i).map(String::from).unwrap_or_default();
                    (key.clone(), value)
                })
                .collect();
            records.push(record);
        }

        Ok(records)
    }

    /// Encode records as delimited text
    ///
    /// The header comes from the first record's field names. Every value is
    /// quoted; the header is quoted only where needed. Each line, including
    /// the last, ends with `\n`. An empty slice encodes to an empty string.
    pub fn encode(&self, records: &[Record]) -> ReviewResult<String> {
        let Some(first) = records.first() else {
            return Ok(String::new());
        };
        let header: Vec<&str> = first.keys().collect();

        let mut header_writer = WriterBuilder::new()
            .delimiter(self.delimiter)
            .quote_style(QuoteStyle::Necessary)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(Vec::new());
        header_writer.write_record(&header)?;
        let buffer = header_writer
            .into_inner()
            .map_err(|e| ReviewError::Export(e.to_string()))?;

        let mut writer = WriterBuilder::new()
            .delimiter(self.delimiter)
            .quote_style(QuoteStyle::Always)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(buffer);

        for record in records {
            let values = header.iter().map(|key| record.get(key).unwrap_or(""));
            writer.write_record(values)?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| ReviewError::Export(e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| ReviewError::Export(e.to_string()))
    }
}

/// Decode with the default denylist and excluded column
pub fn decode(raw: &str, delimiter: u8) -> ReviewResult<Vec<Record>> {
    CsvCodec::new(delimiter).decode(raw)
}

/// Encode with always-quoted values
pub fn encode(records: &[Record], delimiter: u8) -> ReviewResult<String> {
    CsvCodec::new(delimiter).encode(records)
}

/// Strip whitespace around each field of a raw line
///
/// Only whitespace outside quotes goes; a quoted value reaches the parser
/// with its quotes at the field boundary, so its content is kept verbatim.
fn trim_fields(line: &str, delimiter: char) -> String {
    let mut fields = Vec::new();
    let mut start = 0;
    let mut quoted = false;
    for (i, c) in line.char_indices() {
        if c == '"' {
            quoted = !quoted;
        } else if c == delimiter && !quoted {
            fields.push(line[start..i].trim());
            start = i + c.len_utf8();
        }
    }
    fields.push(line[start..].trim());
    fields.join(delimiter.to_string().as_str())
}
