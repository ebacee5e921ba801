use std::path::Path;

use crate::core::types::PrimerPair;
use crate::design::DesignError;
use crate::parsing::{data_lines, read_text, ParseError};

/// Universal primer sets, in file order
#[derive(Debug, Clone, Default)]
pub struct PrimerTable {
    pub sets: Vec<PrimerPair>,
}

impl PrimerTable {
    #[must_use]
    pub fn get(&self, set_name: &str) -> Option<&PrimerPair> {
        self.sets.iter().find(|p| p.set_name == set_name)
    }

    /// Look up the primer set chosen for a run
    ///
    /// # Errors
    ///
    /// Returns `DesignError::UnknownPrimerSet` if no set has this name.
    pub fn select(&self, set_name: &str) -> Result<PrimerPair, DesignError> {
        self.get(set_name)
            .cloned()
            .ok_or_else(|| DesignError::UnknownPrimerSet {
                name: set_name.to_string(),
                available: self.names().join(", "),
            })
    }

    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.sets.iter().map(|p| p.set_name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}

/// Parse a universal primer file
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, or other parse errors
/// if the content is invalid.
pub fn parse_primer_file(path: &Path) -> Result<PrimerTable, ParseError> {
    let content = read_text(path)?;
    parse_primer_text(&content)
}

/// Parse `set,fw_name,fw_seq,rev_name,rev_seq` lines
///
/// # Errors
///
/// Returns `ParseError::InvalidLine` for lines with fewer than 5 fields or
/// a duplicated set name, and `ParseError::InvalidFormat` for an empty table.
pub fn parse_primer_text(text: &str) -> Result<PrimerTable, ParseError> {
    let mut table = PrimerTable::default();

    for (line_num, line) in data_lines(text) {
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        if fields.len() < 5 || fields[..5].iter().any(|f| f.is_empty()) {
            return Err(ParseError::line(
                line_num,
                "expected 'set,fw_name,fw_seq,rev_name,rev_seq'",
            ));
        }
        if table.get(fields[0]).is_some() {
            return Err(ParseError::line(
                line_num,
                format!("duplicate primer set '{}'", fields[0]),
            ));
        }

        table.sets.push(PrimerPair::new(
            fields[0], fields[1], fields[2], fields[3], fields[4],
        ));
    }

    if table.is_empty() {
        return Err(ParseError::InvalidFormat(
            "No universal primers found".to_string(),
        ));
    }

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRIMERS: &str = "\
primer1,BB297.Fw,GACTGGTACTCGCGTGACTTG,BB299.Rev,CCAGTCCAGAGGTGTCCCTAC
primer2,BB287.Fw,GCTCGCGCTACTACATGGTG,BB288.Rev,CCTACCCGCCAAACAGCTAC
";

    #[test]
    fn test_parse_primer_table() {
        let table = parse_primer_text(PRIMERS).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.names(), vec!["primer1", "primer2"]);

        let primer1 = table.get("primer1").unwrap();
        assert_eq!(primer1.fw_name, "BB297.Fw");
        assert_eq!(primer1.fw_seq, "GACTGGTACTCGCGTGACTTG");
        assert_eq!(primer1.rev_name, "BB299.Rev");
        assert_eq!(primer1.rev_seq, "CCAGTCCAGAGGTGTCCCTAC");
    }

    #[test]
    fn test_select_unknown_set() {
        let table = parse_primer_text(PRIMERS).unwrap();
        let err = table.select("primer9").unwrap_err();
        assert!(matches!(err, DesignError::UnknownPrimerSet { ref name, .. } if name == "primer9"));
        assert!(err.to_string().contains("primer1, primer2"));
    }

    #[test]
    fn test_parse_rejects_short_and_duplicate_lines() {
        let err = parse_primer_text("primer1,BB297.Fw,GACT\n").unwrap_err();
        assert!(matches!(err, ParseError::InvalidLine { line: 1, .. }));

        let dup = format!("{PRIMERS}primer1,A,AAAA,B,CCCC\n");
        let err = parse_primer_text(&dup).unwrap_err();
        assert!(matches!(err, ParseError::InvalidLine { line: 3, .. }));
    }
}
