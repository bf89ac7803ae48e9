use std::ops::Range;

/// Episodes shown per batch in the episode browser
pub const BATCH_SIZE: usize = 24;

/// Number of batches for `len` episodes (zero for an empty list)
pub fn batch_count(len: usize) -> usize {
    len.div_ceil(BATCH_SIZE)
}

/// Index range of batch `index`, clamped to the list
pub fn batch_range(index: usize, len: usize) -> Range<usize> {
    let start = (index * BATCH_SIZE).min(len);
    let end = (start + BATCH_SIZE).min(len);
    start..end
}

/// 1-based episode span of a batch, e.g. "25-48"
pub fn batch_label(index: usize, len: usize) -> String {
    let range = batch_range(index, len);
    if range.is_empty() {
        return String::new();
    }
    format!("{}-{}", range.start + 1, range.end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_count() {
        assert_eq!(batch_count(0), 0);
        assert_eq!(batch_count(1), 1);
        assert_eq!(batch_count(24), 1);
        assert_eq!(batch_count(25), 2);
        assert_eq!(batch_count(50), 3);
    }

    #[test]
    fn test_batch_range() {
        assert_eq!(batch_range(0, 50), 0..24);
        assert_eq!(batch_range(2, 50), 48..50);
        assert_eq!(batch_range(3, 50), 50..50);
        assert_eq!(batch_range(0, 0), 0..0);
    }

    #[test]
    fn test_batch_label() {
        assert_eq!(batch_label(1, 50), "25-48");
        assert_eq!(batch_label(2, 50), "49-50");
        assert_eq!(batch_label(5, 50), "");
    }
}
