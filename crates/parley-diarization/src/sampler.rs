//! Representative turn selection for voice classification

use parley_core::Interval;

/// Pick up to `k` turns, longest first.
///
/// Equal-length turns keep their original order.
pub fn select_longest(turns: &[Interval], k: usize) -> Vec<Interval> {
    let mut sorted = turns.to_vec();
    sorted.sort_by(|a, b| b.duration().total_cmp(&a.duration()));
    sorted.truncate(k);
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iv(start: f64, end: f64) -> Interval {
        Interval::new(start, end).unwrap()
    }

    #[test]
    fn test_longest_first() {
        let turns = vec![iv(0.0, 1.0), iv(2.0, 6.0), iv(7.0, 9.0), iv(10.0, 10.5)];
        assert_eq!(select_longest(&turns, 2), vec![iv(2.0, 6.0), iv(7.0, 9.0)]);
    }

    #[test]
    fn test_ties_keep_original_order() {
        let turns = vec![iv(0.0, 1.0), iv(3.0, 5.0), iv(6.0, 7.0), iv(8.0, 10.0)];
        assert_eq!(
            select_longest(&turns, 3),
            vec![iv(3.0, 5.0), iv(8.0, 10.0), iv(0.0, 1.0)]
        );
    }

    #[test]
    fn test_fewer_than_k() {
        let turns = vec![iv(0.0, 1.0)];
        assert_eq!(select_longest(&turns, 3), turns);
        assert!(select_longest(&[], 3).is_empty());
        assert!(select_longest(&turns, 0).is_empty());
    }
}
