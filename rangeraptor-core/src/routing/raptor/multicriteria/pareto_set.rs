//! Generic Pareto frontier.
//!
//! A comparator only answers "does `left` beat `right` on at least one
//! criterion". A new element is kept if it beats every element in the set
//! somewhere, and elements it is not beaten by anywhere are dropped. Equal
//! elements are rejected.

pub trait ParetoComparator<T> {
    fn left_dominance_exists(&self, left: &T, right: &T) -> bool;
}

#[derive(Debug, Clone)]
pub struct ParetoSet<T, C> {
    elements: Vec<T>,
    comparator: C,
}

impl<T, C: ParetoComparator<T>> ParetoSet<T, C> {
    pub fn new(comparator: C) -> Self {
        Self {
            elements: Vec::new(),
            comparator,
        }
    }

    /// Would `value` be accepted
    pub fn qualify(&self, value: &T) -> bool {
        self.elements
            .iter()
            .all(|e| self.comparator.left_dominance_exists(value, e))
    }

    pub fn add(&mut self, value: T) -> bool {
        if !self.qualify(&value) {
            return false;
        }
        let comparator = &self.comparator;
        self.elements
            .retain(|e| comparator.left_dominance_exists(e, &value));
        self.elements.push(value);
        true
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.elements.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.elements.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn clear(&mut self) {
        self.elements.clear();
    }

    pub fn comparator(&self) -> &C {
        &self.comparator
    }

    pub fn into_vec(self) -> Vec<T> {
        self.elements
    }
}

impl<'s, T, C> IntoIterator for &'s ParetoSet<T, C> {
    type Item = &'s T;
    type IntoIter = std::slice::Iter<'s, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}
