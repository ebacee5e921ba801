use std::path::Path;

use tracing::debug;

use crate::core::types::GenomicRecord;
use crate::parsing::{data_lines, read_text, ParseError};

/// Parse a genomic candidate file (plain or `.gz`)
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, or other parse errors
/// if the content is invalid.
pub fn parse_genomic_file(path: &Path) -> Result<Vec<GenomicRecord>, ParseError> {
    let content = read_text(path)?;
    let records = parse_genomic_text(&content)?;
    debug!(path = %path.display(), records = records.len(), "Loaded genomic records");
    Ok(records)
}

/// Parse tab-separated candidate probes: `chrom, start, end, sequence, ...`.
///
/// Extra columns are ignored; `track`/`browser` lines are skipped. Records are
/// returned sorted by start.
///
/// # Errors
///
/// Returns `ParseError::InvalidLine` for lines with fewer than 4 columns,
/// non-integer coordinates, `end < start` or an empty sequence, and
/// `ParseError::InvalidFormat` if no record is found.
pub fn parse_genomic_text(text: &str) -> Result<Vec<GenomicRecord>, ParseError> {
    let mut records = Vec::new();

    for (line_num, line) in data_lines(text) {
        if line.starts_with("track") || line.starts_with("browser") {
            continue;
        }

        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < 4 {
            return Err(ParseError::line(
                line_num,
                format!("expected at least 4 tab-separated fields, found {}", fields.len()),
            ));
        }

        let coordinate = |value: &str| {
            value.trim().parse::<u64>().map_err(|_| {
                ParseError::line(line_num, format!("invalid coordinate '{value}'"))
            })
        };
        let start = coordinate(fields[1])?;
        let end = coordinate(fields[2])?;
        if end < start {
            return Err(ParseError::line(
                line_num,
                format!("end {end} is before start {start}"),
            ));
        }

        let sequence = fields[3].trim();
        if sequence.is_empty() {
            return Err(ParseError::line(line_num, "empty sequence"));
        }

        records.push(GenomicRecord::new(start, end, sequence));
    }

    if records.is_empty() {
        return Err(ParseError::InvalidFormat(
            "No genomic records found".to_string(),
        ));
    }

    records.sort_by_key(|r| r.start);
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_oligominer_bed() {
        let bed = "chr3L\t8000\t8030\tGCTATCGTTCGTTCGAGGCCAGCTAGCTAG\t47.2\t100\t0\t0\t+\n\
                   chr3L\t8050\t8080\tcaccgacgtcgcatagaacgagctagctag\t46.0\t100\t0\t0\t+\n";
        let records = parse_genomic_text(bed).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].start, 8000);
        assert_eq!(records[0].end, 8030);
        assert_eq!(records[0].sequence, "GCTATCGTTCGTTCGAGGCCAGCTAGCTAG");
        assert_eq!(records[1].sequence.len(), 30);
    }

    #[test]
    fn test_parse_sorts_by_start() {
        let bed = "chr2R\t300\t330\tGGG\nchr2R\t100\t130\tAAA\nchr2R\t200\t230\tCCC\n";
        let records = parse_genomic_text(bed).unwrap();
        let starts: Vec<u64> = records.iter().map(|r| r.start).collect();
        assert_eq!(starts, vec![100, 200, 300]);
    }

    #[test]
    fn test_parse_skips_track_lines() {
        let bed = "track name=probes\n# comment\nchr2R\t100\t130\tAAA\n";
        assert_eq!(parse_genomic_text(bed).unwrap().len(), 1);
    }

    #[test]
    fn test_parse_reports_line_number() {
        let bed = "chr2R\t100\t130\tAAA\nchr2R\tabc\t130\tAAA\n";
        let err = parse_genomic_text(bed).unwrap_err();
        assert!(matches!(err, ParseError::InvalidLine { line: 2, .. }));
        assert!(err.to_string().contains("abc"));

        let err = parse_genomic_text("chr2R\t100\t130\n").unwrap_err();
        assert!(matches!(err, ParseError::InvalidLine { line: 1, .. }));

        let err = parse_genomic_text("chr2R\t130\t100\tAAA\n").unwrap_err();
        assert!(matches!(err, ParseError::InvalidLine { line: 1, .. }));
    }

    #[test]
    fn test_parse_empty() {
        assert!(matches!(
            parse_genomic_text("# nothing\n"),
            Err(ParseError::InvalidFormat(_))
        ));
    }
}
