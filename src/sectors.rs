// Sector (cluster) coverage table.
//
// No normalization happens here: sectors are named, given a coverage ratio and
// ranked directly by people in need.
use crate::lookup::{resolve_name, SECTOR_TO_NAME};
use crate::types::SectorRecord;
use std::cmp::Ordering;

/// One sector row as read from the benchmarking table, before validation.
#[derive(Debug, Clone, PartialEq)]
pub struct SectorInput {
    pub cluster_code: String,
    pub in_need: Option<i64>,
    pub targeted: Option<i64>,
}

/// Resolve display names and compute `coverage = targeted / in_need`.
///
/// Rows without a positive `in_need` are dropped so coverage is always
/// defined. A negative `targeted` is kept as unknown. Input order is
/// preserved; ranking is [`top_sectors`]' job.
pub fn aggregate_sectors(inputs: &[SectorInput]) -> Vec<SectorRecord> {
    let out: Vec<SectorRecord> = inputs
        .iter()
        .filter_map(|s| {
            let in_need = s.in_need.filter(|n| *n > 0)?;
            let targeted = s.targeted.filter(|t| *t >= 0);
            Some(SectorRecord {
                cluster_code: s.cluster_code.clone(),
                sector_name: resolve_name(&SECTOR_TO_NAME, &s.cluster_code),
                in_need,
                targeted,
                coverage: targeted.map(|t| t as f64 / in_need as f64),
            })
        })
        .collect();
    let skipped = inputs.len() - out.len();
    if skipped > 0 {
        log::warn!("sectors: skipped {} rows without positive in-need", skipped);
    }
    out
}

/// Largest `in_need` first; equal counts ordered by ascending cluster code.
pub fn rank_order(a: &SectorRecord, b: &SectorRecord) -> Ordering {
    b.in_need
        .cmp(&a.in_need)
        .then_with(|| a.cluster_code.cmp(&b.cluster_code))
}

pub fn top_sectors(records: &[SectorRecord], n: usize) -> Vec<SectorRecord> {
    let mut sorted = records.to_vec();
    sorted.sort_by(rank_order);
    sorted.truncate(n);
    sorted
}
