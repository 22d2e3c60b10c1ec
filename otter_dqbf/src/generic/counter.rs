/*!
A monotonic counter for minting fresh atoms.

Every atom of a formula --- named variable, gate, Tseitin auxiliary,
rule-chain auxiliary, expansion variable --- is obtained from a single
counter, so no atom is ever issued twice.

The counter is created by whichever structure first mints atoms (typically
the [builder](crate::builder)) and then *moved* to the structure which mints
atoms next (typically a [context](crate::context)).
As each party holds the counter exclusively while minting, no shared handle
is required.

When a context is constructed over a matrix which was not built by the
in-crate builder, the counter is seeded to at least the maximum atom
appearing in the name tables and the matrix, so fresh atoms never collide
with input atoms.
*/

use crate::structures::atom::Atom;

/// A monotonic counter over atoms.
#[derive(Clone, Copy, Debug, Default)]
pub struct Counter {
    value: Atom,
}

impl Counter {
    /// A counter whose next issued atom is strictly greater than `value`.
    pub fn new(value: Atom) -> Self {
        Counter { value }
    }

    /// Increments the counter and returns the fresh atom.
    pub fn increment(&mut self) -> Atom {
        self.value += 1;
        self.value
    }

    /// The last issued atom, or the seed if no atom has been issued.
    pub fn value(&self) -> Atom {
        self.value
    }

    /// Raises the counter to `value`, if the counter is below `value`.
    pub fn raise_to(&mut self, value: Atom) {
        if self.value < value {
            self.value = value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strictly_increasing() {
        let mut counter = Counter::new(7);
        assert_eq!(counter.increment(), 8);
        assert_eq!(counter.increment(), 9);
        assert_eq!(counter.value(), 9);
    }

    #[test]
    fn raise_is_monotone() {
        let mut counter = Counter::new(3);
        counter.raise_to(10);
        assert_eq!(counter.increment(), 11);
        counter.raise_to(4);
        assert_eq!(counter.increment(), 12);
    }
}
