//! Feature Tables and CSV I/O
//!
//! An ordered collection of extracted vectors with optional labels,
//! written as CSV with the schema as header. Corpus input is
//! line-oriented; labeled datasets round-trip through a small quote-aware
//! reader because plaintext records may contain commas and quotes.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};

use crate::features::{FeatureSchema, FeatureVector};

/// Ordered feature vectors plus optional labels
#[derive(Debug, Clone)]
pub struct FeatureTable {
    schema: Arc<FeatureSchema>,
    rows: Vec<FeatureVector>,
    labels: Option<Vec<String>>,
}

impl FeatureTable {
    /// Unlabeled table
    pub fn new(schema: Arc<FeatureSchema>, rows: Vec<FeatureVector>) -> Self {
        Self {
            schema,
            rows,
            labels: None,
        }
    }

    /// Labeled table; rows and labels are parallel
    pub fn labeled(
        schema: Arc<FeatureSchema>,
        rows: Vec<FeatureVector>,
        labels: Vec<String>,
    ) -> Self {
        debug_assert_eq!(rows.len(), labels.len());
        Self {
            schema,
            rows,
            labels: Some(labels),
        }
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn rows(&self) -> &[FeatureVector] {
        &self.rows
    }

    pub fn labels(&self) -> Option<&[String]> {
        self.labels.as_deref()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row/label pairs; empty for an unlabeled table
    pub fn labeled_rows(&self) -> impl Iterator<Item = (&FeatureVector, &str)> + '_ {
        let labels = self.labels.as_deref().unwrap_or(&[]);
        self.rows
            .iter()
            .zip(labels.iter().map(|label| label.as_str()))
    }

    /// Write the table as CSV: header row, then one row per record in
    /// input order
    pub fn write_csv<W: Write>(&self, writer: &mut W) -> Result<()> {
        let mut header: Vec<&str> = self.schema.names().iter().map(|n| n.as_str()).collect();
        if self.labels.is_some() {
            header.push("label");
        }
        write_record(writer, header.into_iter())?;

        for (i, row) in self.rows.iter().enumerate() {
            let mut fields: Vec<String> =
                row.values().iter().map(|v| v.to_string()).collect();
            if let Some(labels) = &self.labels {
                fields.push(labels[i].clone());
            }
            write_record(writer, fields.iter().map(|f| f.as_str()))?;
        }
        Ok(())
    }

    /// Write the table as CSV to a file
    pub fn write_csv_file(&self, path: &Path) -> Result<()> {
        let file = File::create(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        self.write_csv(&mut writer)?;
        writer.flush()?;
        Ok(())
    }
}

/// Read one record per non-empty line
pub fn read_sentences(path: &Path) -> Result<Vec<String>> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let reader = BufReader::new(file);

    let mut sentences = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        sentences.push(line.to_string());
    }
    Ok(sentences)
}

/// Write a raw labeled dataset as a two-column "text,label" CSV
pub fn write_dataset_csv(path: &Path, records: &[(String, String)]) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    write_record(&mut writer, ["text", "label"].into_iter())?;
    for (text, label) in records {
        write_record(&mut writer, [text.as_str(), label.as_str()].into_iter())?;
    }
    writer.flush()?;
    Ok(())
}

/// Read a two-column "text,label" CSV written by `write_dataset_csv`
pub fn read_labeled_csv(path: &Path) -> Result<Vec<(String, String)>> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let reader = BufReader::new(file);

    let mut records = Vec::new();
    for (line_num, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.strip_suffix('\r').unwrap_or(&line);
        if line.is_empty() {
            continue;
        }
        // Header
        if line_num == 0 {
            continue;
        }
        let fields = parse_csv_line(line);
        if fields.len() != 2 {
            bail!(
                "{}: line {}: expected 2 fields, got {}",
                path.display(),
                line_num + 1,
                fields.len()
            );
        }
        let mut fields = fields.into_iter();
        let text = fields.next().unwrap_or_default();
        let label = fields.next().unwrap_or_default();
        records.push((text, label));
    }
    Ok(records)
}

fn write_record<'a, W, I>(writer: &mut W, fields: I) -> Result<()>
where
    W: Write,
    I: Iterator<Item = &'a str>,
{
    let mut first = true;
    for field in fields {
        if !first {
            writer.write_all(b",")?;
        }
        first = false;
        write_field(writer, field)?;
    }
    writer.write_all(b"\n")?;
    Ok(())
}

/// Quote a field when it contains a comma, quote or line break; several
/// pool-derived headers need it
fn write_field<W: Write>(writer: &mut W, field: &str) -> Result<()> {
    if field.contains([',', '"', '\n', '\r']) {
        writer.write_all(b"\"")?;
        writer.write_all(field.replace('"', "\"\"").as_bytes())?;
        writer.write_all(b"\"")?;
    } else {
        writer.write_all(field.as_bytes())?;
    }
    Ok(())
}

/// Split one CSV line into fields, honoring double-quote escaping
fn parse_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(c);
            }
        } else {
            match c {
                '"' => in_quotes = true,
                ',' => fields.push(std::mem::take(&mut field)),
                _ => field.push(c),
            }
        }
    }
    fields.push(field);
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    use crate::config::ExtractorConfig;
    use crate::extractor::FeatureExtractor;

    fn extractor() -> FeatureExtractor {
        FeatureExtractor::new(ExtractorConfig::default()).unwrap()
    }

    #[test]
    fn test_csv_header_matches_schema() {
        let extractor = extractor();
        let table = extractor.extract_table(&["hello"]);

        let mut out = Vec::new();
        table.write_csv(&mut out).unwrap();
        let csv = String::from_utf8(out).unwrap();
        let header = csv.lines().next().unwrap();

        assert!(header.starts_with("freq_A,freq_B"));
        assert!(header.ends_with("chi_square"));
        assert_eq!(csv.lines().count(), 2);
    }

    #[test]
    fn test_csv_quotes_awkward_headers() {
        let extractor = extractor();
        let table = extractor.extract_table(&["x"]);

        let mut out = Vec::new();
        table.write_csv(&mut out).unwrap();
        let csv = String::from_utf8(out).unwrap();
        let header = csv.lines().next().unwrap();

        // The comma and quote pool columns must be quoted
        assert!(header.contains(r#""freq_,""#));
        assert!(header.contains(r#""freq_""""#));
    }

    #[test]
    fn test_labeled_csv_has_label_column() {
        let extractor = extractor();
        let records = vec![("hello".to_string(), "Plaintext".to_string())];
        let table = extractor.extract_labeled(&records);

        let mut out = Vec::new();
        table.write_csv(&mut out).unwrap();
        let csv = String::from_utf8(out).unwrap();

        assert!(csv.lines().next().unwrap().ends_with(",label"));
        assert!(csv.lines().nth(1).unwrap().ends_with(",Plaintext"));
    }

    #[test]
    fn test_row_count_matches_records() {
        let extractor = extractor();
        let texts: Vec<String> = (0..7).map(|i| format!("row {i}")).collect();
        let table = extractor.extract_table(&texts);

        let mut out = Vec::new();
        table.write_csv(&mut out).unwrap();
        let csv = String::from_utf8(out).unwrap();
        assert_eq!(csv.lines().count(), 8);
    }

    #[test]
    fn test_read_sentences_skips_blanks() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "first sentence").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "  second sentence  ").unwrap();
        file.flush().unwrap();

        let sentences = read_sentences(file.path()).unwrap();
        assert_eq!(sentences, vec!["first sentence", "second sentence"]);
    }

    #[test]
    fn test_dataset_csv_round_trip() {
        let records = vec![
            ("plain text".to_string(), "Plaintext".to_string()),
            ("with, comma".to_string(), "Caesar".to_string()),
            (r#"with "quotes""#.to_string(), "AES".to_string()),
            ("dGVzdA==".to_string(), "RC4".to_string()),
        ];

        let file = NamedTempFile::new().unwrap();
        write_dataset_csv(file.path(), &records).unwrap();
        let loaded = read_labeled_csv(file.path()).unwrap();
        assert_eq!(loaded, records);
    }

    #[test]
    fn test_read_labeled_csv_rejects_short_rows() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "text,label").unwrap();
        writeln!(file, "only-one-field").unwrap();
        file.flush().unwrap();

        assert!(read_labeled_csv(file.path()).is_err());
    }

    #[test]
    fn test_parse_csv_line_quoting() {
        assert_eq!(parse_csv_line("a,b,c"), vec!["a", "b", "c"]);
        assert_eq!(parse_csv_line(r#""a,b",c"#), vec!["a,b", "c"]);
        assert_eq!(parse_csv_line(r#""say ""hi""",x"#), vec![r#"say "hi""#, "x"]);
        assert_eq!(parse_csv_line(""), vec![""]);
    }

    #[test]
    fn test_labeled_rows_empty_for_unlabeled() {
        let extractor = extractor();
        let table = extractor.extract_table(&["a", "b"]);
        assert_eq!(table.labeled_rows().count(), 0);
    }
}
