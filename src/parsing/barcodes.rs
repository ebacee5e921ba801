use std::path::Path;

use crate::core::types::Barcode;
use crate::parsing::{data_lines, read_text, ParseError};

/// Parse a barcode/RT file
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, or other parse errors
/// if the content is invalid.
pub fn parse_barcode_file(path: &Path) -> Result<Vec<Barcode>, ParseError> {
    let content = read_text(path)?;
    parse_barcode_text(&content)
}

/// Parse `name,sequence` lines, keeping file order.
///
/// # Errors
///
/// Returns `ParseError::InvalidLine` for lines without a name or a sequence,
/// and `ParseError::InvalidFormat` if the file holds no barcode.
pub fn parse_barcode_text(text: &str) -> Result<Vec<Barcode>, ParseError> {
    let mut barcodes = Vec::new();

    for (line_num, line) in data_lines(text) {
        let mut fields = line.split(',').map(str::trim);
        let name = fields.next().unwrap_or_default();
        let sequence = fields.next().unwrap_or_default();

        if name.is_empty() || sequence.is_empty() {
            return Err(ParseError::line(
                line_num,
                "expected 'name,sequence'",
            ));
        }

        barcodes.push(Barcode::new(name, sequence));
    }

    if barcodes.is_empty() {
        return Err(ParseError::InvalidFormat(
            "No barcodes/RTs found".to_string(),
        ));
    }

    Ok(barcodes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rt_list() {
        let csv = "revMer1,caccgacgtcgcatagaacg\nrevMer2,gtcgaactcgactgatcgca\n";
        let barcodes = parse_barcode_text(csv).unwrap();
        assert_eq!(barcodes.len(), 2);
        assert_eq!(barcodes[0], Barcode::new("revMer1", "caccgacgtcgcatagaacg"));
        assert_eq!(barcodes[1].name, "revMer2");
    }

    #[test]
    fn test_parse_keeps_order() {
        let csv = "Bcd_003,AAAA\r\nBcd_001,CCCC\r\nBcd_002,GGGG\r\n";
        let names: Vec<String> = parse_barcode_text(csv)
            .unwrap()
            .into_iter()
            .map(|b| b.name)
            .collect();
        assert_eq!(names, vec!["Bcd_003", "Bcd_001", "Bcd_002"]);
    }

    #[test]
    fn test_parse_missing_sequence() {
        let err = parse_barcode_text("Bcd_001,GCTATCGTTCGTTCGAGGCC\nBcd_002\n").unwrap_err();
        assert!(matches!(err, ParseError::InvalidLine { line: 2, .. }));
    }
}
