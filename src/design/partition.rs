use tracing::debug;

use crate::core::types::{DesignType, GenomicRecord};
use crate::design::DesignError;

/// How loci are carved out of the library region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartitionStrategy {
    /// Consecutive windows of `resolution` bp starting at `start_lib`
    LocusLength { resolution: u64 },
    /// Consecutive runs of `nbr_probe_by_locus` records starting at `start_lib`
    NbrProbes,
}

/// A locus interval and the genomic records it covers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocusWindow {
    pub locus_n: usize,
    pub start_seq: u64,
    pub end_seq: u64,
    pub candidates: Vec<GenomicRecord>,
}

/// Computes locus boundaries and the genomic records falling into each locus
#[derive(Debug, Clone)]
pub struct Partitioner {
    pub start_lib: u64,
    pub nbr_loci_total: usize,
    pub nbr_probe_by_locus: usize,
    pub strategy: PartitionStrategy,
}

impl Partitioner {
    /// Build a partitioner for the given design type.
    ///
    /// # Errors
    ///
    /// Returns `DesignError::MissingResolution` when `design_type` is
    /// `locus_length` and no (non-zero) resolution is given, and
    /// `DesignError::InvalidConfig` when the library end overflows.
    pub fn new(
        design_type: DesignType,
        start_lib: u64,
        nbr_loci_total: usize,
        resolution: Option<u64>,
        nbr_probe_by_locus: usize,
    ) -> Result<Self, DesignError> {
        let strategy = match design_type {
            DesignType::LocusLength => match resolution {
                Some(resolution) if resolution > 0 => {
                    if library_end(start_lib, nbr_loci_total, resolution).is_none() {
                        return Err(DesignError::InvalidConfig(format!(
                            "library end {start_lib} + {nbr_loci_total} * {resolution} overflows"
                        )));
                    }
                    PartitionStrategy::LocusLength { resolution }
                }
                _ => return Err(DesignError::MissingResolution),
            },
            DesignType::NbrProbes => PartitionStrategy::NbrProbes,
        };

        Ok(Self {
            start_lib,
            nbr_loci_total,
            nbr_probe_by_locus,
            strategy,
        })
    }

    /// End of the library region for fixed-length loci
    #[must_use]
    pub fn end_lib(&self) -> Option<u64> {
        match self.strategy {
            PartitionStrategy::LocusLength { resolution } => {
                library_end(self.start_lib, self.nbr_loci_total, resolution)
            }
            PartitionStrategy::NbrProbes => None,
        }
    }

    /// `[start, end)` of locus `locus_n` (1-based) for fixed-length loci
    #[must_use]
    pub fn locus_interval(&self, locus_n: usize) -> Option<(u64, u64)> {
        match self.strategy {
            PartitionStrategy::LocusLength { resolution } if locus_n >= 1 => {
                let start = library_end(self.start_lib, locus_n - 1, resolution)?;
                Some((start, start.checked_add(resolution)?))
            }
            _ => None,
        }
    }

    /// Keep only the records the library can use.
    ///
    /// `records` must be sorted by start. With fixed-length loci every record
    /// inside `[start_lib, end_lib)` is kept; with a fixed probe count the first
    /// `nbr_loci_total * nbr_probe_by_locus` records starting at or after
    /// `start_lib` are kept. Fewer qualifying records is not an error.
    #[must_use]
    pub fn reduce_list_seq(&self, records: &[GenomicRecord]) -> Vec<GenomicRecord> {
        let first = records.partition_point(|r| r.start < self.start_lib);
        let eligible = &records[first..];

        let reduced: Vec<GenomicRecord> = match self.strategy {
            PartitionStrategy::LocusLength { .. } => {
                let end_lib = self.end_lib().unwrap_or(u64::MAX);
                eligible
                    .iter()
                    .take_while(|r| r.start < end_lib)
                    .filter(|r| r.end < end_lib)
                    .cloned()
                    .collect()
            }
            PartitionStrategy::NbrProbes => eligible
                .iter()
                .take(self.nbr_loci_total.saturating_mul(self.nbr_probe_by_locus))
                .cloned()
                .collect(),
        };

        debug!(
            total = records.len(),
            kept = reduced.len(),
            "Reduced genomic records to library region"
        );
        reduced
    }

    /// Split the reduced record list into one window per locus, in locus order
    #[must_use]
    pub fn partition(&self, reduced: &[GenomicRecord]) -> Vec<LocusWindow> {
        match self.strategy {
            PartitionStrategy::LocusLength { .. } => (1..=self.nbr_loci_total)
                .filter_map(|locus_n| {
                    let (start_seq, end_seq) = self.locus_interval(locus_n)?;
                    Some(LocusWindow {
                        locus_n,
                        start_seq,
                        end_seq,
                        candidates: records_within(reduced, start_seq, end_seq),
                    })
                })
                .collect(),
            PartitionStrategy::NbrProbes => self.partition_by_count(reduced),
        }
    }

    fn partition_by_count(&self, reduced: &[GenomicRecord]) -> Vec<LocusWindow> {
        let chunk_size = self.nbr_probe_by_locus.max(1);
        let mut chunks = reduced.chunks(chunk_size);
        let mut previous_end = self.start_lib;
        let mut windows = Vec::with_capacity(self.nbr_loci_total);

        for locus_n in 1..=self.nbr_loci_total {
            let window = match chunks.next() {
                Some(chunk) => {
                    // chunks() never yields an empty slice
                    let start_seq = chunk[0].start;
                    let end_seq = chunk[chunk.len() - 1].end;
                    LocusWindow {
                        locus_n,
                        start_seq,
                        end_seq,
                        candidates: chunk.to_vec(),
                    }
                }
                None => LocusWindow {
                    locus_n,
                    start_seq: previous_end,
                    end_seq: previous_end,
                    candidates: Vec::new(),
                },
            };
            previous_end = window.end_seq;
            windows.push(window);
        }
        windows
    }
}

/// `start_lib + nbr_loci * resolution`, or `None` when it does not fit in a `u64`
#[must_use]
pub fn library_end(start_lib: u64, nbr_loci: usize, resolution: u64) -> Option<u64> {
    u64::try_from(nbr_loci)
        .ok()?
        .checked_mul(resolution)?
        .checked_add(start_lib)
}

/// Records with `start >= start_seq` and `end < end_seq`, from a start-sorted slice
fn records_within(records: &[GenomicRecord], start_seq: u64, end_seq: u64) -> Vec<GenomicRecord> {
    let lo = records.partition_point(|r| r.start < start_seq);
    let hi = records.partition_point(|r| r.start < end_seq);
    records[lo..hi.max(lo)]
        .iter()
        .filter(|r| r.end < end_seq)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records every 50 bp from 8000 to 80000, 30 bp long
    fn tiled_records() -> Vec<GenomicRecord> {
        (8000..80_000)
            .step_by(50)
            .map(|start| GenomicRecord::new(start, start + 30, "acgtacgtacgtacgtacgtacgtacgtac"))
            .collect()
    }

    #[test]
    fn test_reduce_list_seq_locus_length() {
        let partitioner =
            Partitioner::new(DesignType::LocusLength, 8500, 5, Some(1000), 20).unwrap();
        let reduced = partitioner.reduce_list_seq(&tiled_records());
        assert_eq!(reduced.len(), 100);
        assert_eq!(reduced[0].start, 8500);
        assert!(reduced.iter().all(|r| r.end < 13_500));
    }

    #[test]
    fn test_reduce_list_seq_nbr_probes() {
        let partitioner = Partitioner::new(DesignType::NbrProbes, 8500, 6, None, 20).unwrap();
        let reduced = partitioner.reduce_list_seq(&tiled_records());
        assert_eq!(reduced.len(), 120);
        assert_eq!(reduced[0].start, 8500);
        assert!(reduced.windows(2).all(|w| w[0].start <= w[1].start));
    }

    #[test]
    fn test_reduce_list_seq_returns_what_qualifies() {
        let records = vec![
            GenomicRecord::new(100, 130, "a"),
            GenomicRecord::new(200, 230, "c"),
        ];
        let partitioner = Partitioner::new(DesignType::NbrProbes, 150, 10, None, 10).unwrap();
        assert_eq!(partitioner.reduce_list_seq(&records).len(), 1);
    }

    #[test]
    fn test_missing_resolution() {
        assert!(matches!(
            Partitioner::new(DesignType::LocusLength, 0, 1, None, 1),
            Err(DesignError::MissingResolution)
        ));
        assert!(matches!(
            Partitioner::new(DesignType::LocusLength, 0, 1, Some(0), 1),
            Err(DesignError::MissingResolution)
        ));
    }

    #[test]
    fn test_library_end_overflow() {
        assert_eq!(library_end(8500, 5, 1000), Some(13_500));
        assert_eq!(library_end(0, 3, u64::MAX / 2), None);
        assert_eq!(library_end(u64::MAX, 1, 1), None);
        assert!(matches!(
            Partitioner::new(DesignType::LocusLength, 0, 3, Some(u64::MAX / 2), 1),
            Err(DesignError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_locus_length_windows_are_contiguous() {
        let partitioner =
            Partitioner::new(DesignType::LocusLength, 8500, 5, Some(1000), 20).unwrap();
        let reduced = partitioner.reduce_list_seq(&tiled_records());
        let windows = partitioner.partition(&reduced);

        assert_eq!(windows.len(), 5);
        for (i, window) in windows.iter().enumerate() {
            let i = i as u64;
            assert_eq!(window.start_seq, 8500 + i * 1000);
            assert_eq!(window.end_seq, 8500 + (i + 1) * 1000);
            assert_eq!(window.candidates.len(), 20);
            assert!(window
                .candidates
                .iter()
                .all(|r| r.start >= window.start_seq && r.end < window.end_seq));
        }
        for pair in windows.windows(2) {
            assert_eq!(pair[0].end_seq, pair[1].start_seq);
        }
    }

    #[test]
    fn test_records_crossing_a_boundary_are_dropped() {
        let records = vec![
            GenomicRecord::new(100, 130, "a"),
            GenomicRecord::new(180, 210, "c"),
            GenomicRecord::new(250, 280, "g"),
        ];
        let partitioner = Partitioner::new(DesignType::LocusLength, 100, 2, Some(100), 5).unwrap();
        let windows = partitioner.partition(&partitioner.reduce_list_seq(&records));
        assert_eq!(windows[0].candidates.len(), 1);
        assert_eq!(windows[1].candidates.len(), 1);
        assert_eq!(windows[1].candidates[0].sequence, "g");
    }

    #[test]
    fn test_nbr_probes_windows_follow_records() {
        let partitioner = Partitioner::new(DesignType::NbrProbes, 8500, 3, None, 20).unwrap();
        let reduced = partitioner.reduce_list_seq(&tiled_records());
        let windows = partitioner.partition(&reduced);

        assert_eq!(windows.len(), 3);
        assert_eq!(windows[0].start_seq, 8500);
        assert_eq!(windows[0].end_seq, 8500 + 19 * 50 + 30);
        assert_eq!(windows[1].start_seq, 8500 + 20 * 50);
        assert!(windows.iter().all(|w| w.candidates.len() == 20));
    }

    #[test]
    fn test_nbr_probes_runs_out_of_records() {
        let records = vec![
            GenomicRecord::new(100, 130, "a"),
            GenomicRecord::new(200, 230, "c"),
            GenomicRecord::new(300, 330, "g"),
        ];
        let partitioner = Partitioner::new(DesignType::NbrProbes, 0, 3, None, 2).unwrap();
        let windows = partitioner.partition(&partitioner.reduce_list_seq(&records));

        assert_eq!(windows[0].candidates.len(), 2);
        assert_eq!(windows[1].candidates.len(), 1);
        assert_eq!((windows[1].start_seq, windows[1].end_seq), (300, 330));
        assert!(windows[2].candidates.is_empty());
        assert_eq!((windows[2].start_seq, windows[2].end_seq), (330, 330));
    }
}
