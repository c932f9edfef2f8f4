//! Pass-through points as the second criterion.
//!
//! c2 counts the points visited in order: 0 is not-visited, `i` means the
//! next point to visit is `i`, and `n` means all visited.

use crate::model::transit::StopIdx;
use crate::request::PassThroughPoint;

#[derive(Debug, Clone, Default)]
pub struct PassThroughPointsService {
    points: Vec<PassThroughPoint>,
}

impl PassThroughPointsService {
    /// `points` in search order, reversed by the caller for reverse searches
    pub fn new(points: Vec<PassThroughPoint>) -> Self {
        Self { points }
    }

    pub fn is_noop(&self) -> bool {
        self.points.is_empty()
    }

    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    /// c2 after passing `stop`
    pub fn update_c2_value(&self, c2: u32, stop: StopIdx) -> u32 {
        let mut visited = c2 as usize;
        while visited < self.points.len() && self.points[visited].contains(stop) {
            visited += 1;
        }
        visited as u32
    }

    pub fn accept_c2_at_destination(&self, c2: u32) -> bool {
        c2 as usize == self.points.len()
    }

    /// More points visited dominates
    pub fn dominates(left: u32, right: u32) -> bool {
        left > right
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> PassThroughPointsService {
        PassThroughPointsService::new(vec![
            PassThroughPoint::new("P1", &[2, 3]),
            PassThroughPoint::new("P2", &[5]),
        ])
    }

    #[test]
    fn points_are_visited_in_order() {
        let svc = service();
        assert_eq!(svc.update_c2_value(0, 5), 0);
        assert_eq!(svc.update_c2_value(0, 3), 1);
        assert_eq!(svc.update_c2_value(1, 3), 1);
        assert_eq!(svc.update_c2_value(1, 5), 2);
        assert!(svc.accept_c2_at_destination(2));
        assert!(!svc.accept_c2_at_destination(1));
    }

    #[test]
    fn empty_service_is_noop_and_accepts_all() {
        let svc = PassThroughPointsService::default();
        assert!(svc.is_noop());
        assert_eq!(svc.update_c2_value(0, 1), 0);
        assert!(svc.accept_c2_at_destination(0));
    }
}
