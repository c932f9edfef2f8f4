//! Transit priority groups as the second criterion.
//!
//! c2 is the set of groups used by the journey as a bitmask. Journeys using
//! different sets never dominate each other.

pub fn merge_group_ids(current: u32, route_group: u32) -> u32 {
    current | route_group
}

pub fn dominates(left: u32, right: u32) -> bool {
    left != right
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merged_sets_are_compared_by_identity() {
        let rail_and_bus = merge_group_ids(merge_group_ids(0, 0b01), 0b10);
        assert_eq!(rail_and_bus, 0b11);
        assert_eq!(merge_group_ids(rail_and_bus, 0b01), 0b11);
        assert!(dominates(0b01, 0b11));
        assert!(dominates(0b11, 0b01));
        assert!(!dominates(0b11, 0b11));
    }
}
