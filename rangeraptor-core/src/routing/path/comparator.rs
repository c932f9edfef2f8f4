use super::path::Path;
use crate::model::transit::Cost;
use crate::request::{RaptorProfile, RelaxCost};
use crate::routing::raptor::multicriteria::{C2Dominance, ParetoComparator};

/// Dominance between complete paths at the destination.
///
/// Earlier arrival (forward) or later departure (reverse) and fewer
/// transfers always count. The other end of the journey counts for
/// standard and timetable searches, c1 and c2 for multi-criteria ones.
#[derive(Debug, Clone, Copy)]
pub struct PathComparator {
    forward: bool,
    include_other_end: bool,
    include_c1: bool,
    relax_c1: Option<RelaxCost>,
    c2: C2Dominance,
}

impl PathComparator {
    pub fn new(
        forward: bool,
        profile: RaptorProfile,
        timetable: bool,
        relax_c1: Option<RelaxCost>,
        c2: C2Dominance,
    ) -> Self {
        Self {
            forward,
            include_other_end: timetable || profile == RaptorProfile::Standard,
            include_c1: profile.is_multi_criteria(),
            relax_c1,
            c2,
        }
    }

    /// Comparator used to merge results of independent searches
    pub fn for_merge() -> Self {
        Self {
            forward: true,
            include_other_end: true,
            include_c1: true,
            relax_c1: None,
            c2: C2Dominance::None,
        }
    }

    fn c1_dominance(&self, left: Cost, right: Cost) -> bool {
        match self.relax_c1 {
            Some(RelaxCost { ratio, slack }) => {
                let relaxed = (f64::from(right) * ratio).round() as Cost + slack * 100;
                left < relaxed
            }
            None => left < right,
        }
    }
}

impl ParetoComparator<Path> for PathComparator {
    fn left_dominance_exists(&self, left: &Path, right: &Path) -> bool {
        let earlier_end = left.end_time < right.end_time;
        let later_start = left.start_time > right.start_time;
        let (primary, other_end) = if self.forward {
            (earlier_end, later_start)
        } else {
            (later_start, earlier_end)
        };
        primary
            || (self.include_other_end && other_end)
            || left.number_of_transfers < right.number_of_transfers
            || (self.include_c1 && self.c1_dominance(left.c1, right.c1))
            || self
                .c2
                .left_dominance(left.c2.unwrap_or(0), right.c2.unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::raptor::multicriteria::ParetoSet;

    fn path(start: i32, end: i32, transfers: usize, c1: Cost) -> Path {
        Path {
            start_time: start,
            end_time: end,
            c1,
            c2: None,
            number_of_transfers: transfers,
            legs: Vec::new(),
        }
    }

    #[test]
    fn standard_keeps_later_departures() {
        let cmp =
            PathComparator::new(true, RaptorProfile::Standard, false, None, C2Dominance::None);
        let mut set = ParetoSet::new(cmp);
        assert!(set.add(path(100, 1000, 0, 0)));
        assert!(set.add(path(200, 1000, 0, 0)));
        assert_eq!(set.len(), 1);
        assert!(set.add(path(50, 900, 1, 0)));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn multi_criteria_keeps_cheaper_slower_paths() {
        let cmp =
            PathComparator::new(true, RaptorProfile::MultiCriteria, false, None, C2Dominance::None);
        let mut set = ParetoSet::new(cmp);
        assert!(set.add(path(100, 1000, 0, 5_000)));
        assert!(set.add(path(100, 1100, 0, 4_000)));
        assert!(!set.add(path(200, 1100, 0, 4_000)));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn relaxed_cost_keeps_slightly_more_expensive_paths() {
        let relax = Some(RelaxCost {
            ratio: 1.0,
            slack: 60,
        });
        let cmp = PathComparator::new(
            true,
            RaptorProfile::MultiCriteria,
            false,
            relax,
            C2Dominance::None,
        );
        let mut set = ParetoSet::new(cmp);
        assert!(set.add(path(100, 1100, 0, 4_000)));
        assert!(set.add(path(100, 1000, 0, 9_000)));
        assert_eq!(set.len(), 2);
        assert!(set.add(path(100, 900, 0, 20_000)));
        assert_eq!(set.len(), 3);
    }
}
