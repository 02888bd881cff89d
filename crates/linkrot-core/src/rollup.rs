//! Rollup counters: four monotonically increasing counts, one per bucket.

use crate::classify::Bucket;

/// Per-bucket counts accumulated as row checks resolve.
///
/// Counters only ever increment; there is no reset within a session. The
/// total always equals the number of [`record`](Rollup::record) calls, i.e.
/// the number of rows whose check has resolved so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rollup {
    pub success: usize,
    pub forbidden: usize,
    pub not_found: usize,
    pub other: usize,
}

impl Rollup {
    /// Increment the counter for one resolved row.
    pub fn record(&mut self, bucket: Bucket) {
        match bucket {
            Bucket::Success => self.success += 1,
            Bucket::Forbidden => self.forbidden += 1,
            Bucket::NotFound => self.not_found += 1,
            Bucket::Other => self.other += 1,
        }
    }

    pub fn count(&self, bucket: Bucket) -> usize {
        match bucket {
            Bucket::Success => self.success,
            Bucket::Forbidden => self.forbidden,
            Bucket::NotFound => self.not_found,
            Bucket::Other => self.other,
        }
    }

    /// Number of resolved rows.
    pub fn total(&self) -> usize {
        self.success + self.forbidden + self.not_found + self.other
    }

    /// The four summary boxes in display order.
    pub fn boxes(&self) -> [(Bucket, usize); 4] {
        Bucket::ALL.map(|bucket| (bucket, self.count(bucket)))
    }
}

/// Delay in ms until the next `quantum_ms` boundary, 0 when already aligned.
///
/// Used to batch visually-simultaneous rollup redraws; purely cosmetic.
pub fn quantum_offset_ms(now_ms: u64, quantum_ms: u64) -> u64 {
    if quantum_ms == 0 {
        return 0;
    }
    (quantum_ms - now_ms % quantum_ms) % quantum_ms
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_matches_record_count() {
        let mut rollup = Rollup::default();
        let sequence = [
            Bucket::Success,
            Bucket::Other,
            Bucket::NotFound,
            Bucket::Success,
            Bucket::Forbidden,
            Bucket::Other,
        ];
        for (i, bucket) in sequence.into_iter().enumerate() {
            rollup.record(bucket);
            assert_eq!(rollup.total(), i + 1);
        }
        assert_eq!(rollup.success, 2);
        assert_eq!(rollup.forbidden, 1);
        assert_eq!(rollup.not_found, 1);
        assert_eq!(rollup.other, 2);
    }

    #[test]
    fn boxes_in_display_order() {
        let mut rollup = Rollup::default();
        rollup.record(Bucket::NotFound);
        let boxes = rollup.boxes();
        assert_eq!(boxes[0], (Bucket::Success, 0));
        assert_eq!(boxes[1], (Bucket::Forbidden, 0));
        assert_eq!(boxes[2], (Bucket::NotFound, 1));
        assert_eq!(boxes[3], (Bucket::Other, 0));
    }

    #[test]
    fn quantum_offset_aligned_is_zero() {
        assert_eq!(quantum_offset_ms(0, 250), 0);
        assert_eq!(quantum_offset_ms(1000, 250), 0);
    }

    #[test]
    fn quantum_offset_rounds_up() {
        assert_eq!(quantum_offset_ms(1001, 250), 249);
        assert_eq!(quantum_offset_ms(1249, 250), 1);
        assert_eq!(quantum_offset_ms(1, 250), 249);
    }

    #[test]
    fn quantum_offset_zero_quantum() {
        assert_eq!(quantum_offset_ms(1234, 0), 0);
    }
}
