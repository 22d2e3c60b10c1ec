/*!
A database of 'atom related' things, accessed via fields on an [AtomDB] struct.

Things include:
- A current (often partial) valuation, and the previous value of each atom.
- Watch lists for each atom, holding the keys of clauses watching each
  polarity of the atom.
- An [IndexHeap] recording the activity of atoms, where any atom without a
  value is active on the heap.
- A record of which decision level an atom was valued on.

The previous value of an atom serves two roles: it is where phase saving
stores the value of an atom when the value is dropped during a backjump, and
it is where [set_phase](crate::engine::GenericEngine::set_phase) hints land.
In both cases the value is read when the atom is next chosen for a decision.
*/

use crate::{
    config::Activity,
    engine::{ClauseKey, LevelIndex},
    generic::index_heap::IndexHeap,
    misc::log::targets::{self},
    structures::atom::Atom,
};

/// Watch lists for one atom, split by the polarity of the watched literal.
#[derive(Default)]
struct WatchLists {
    /// Keys of clauses watching the positive literal of the atom.
    positive: Vec<ClauseKey>,

    /// Keys of clauses watching the negative literal of the atom.
    negative: Vec<ClauseKey>,
}

/// The atom database.
pub struct AtomDB {
    /// A current (often partial) valuation.
    valuation: Vec<Option<bool>>,

    /// The previous value of each atom, from phase saving or a phase hint.
    previous_valuation: Vec<bool>,

    /// A record of which decision level an atom was valued on.
    levels: Vec<Option<LevelIndex>>,

    /// Watch lists for each atom.
    watch_lists: Vec<WatchLists>,

    /// An [IndexHeap] recording the activity of atoms.
    activity_heap: IndexHeap<Activity>,

    /// The amount to bump the activity of an atom by, scaled after each conflict.
    activity_increment: Activity,
}

impl Default for AtomDB {
    fn default() -> Self {
        AtomDB {
            valuation: Vec::default(),
            previous_valuation: Vec::default(),
            levels: Vec::default(),
            watch_lists: Vec::default(),
            activity_heap: IndexHeap::default(),
            activity_increment: 1.0,
        }
    }
}

impl AtomDB {
    /// A count of atoms in the database.
    pub fn count(&self) -> usize {
        self.valuation.len()
    }

    /// A fresh atom, with all the relevant structures grown to support access via the atom.
    pub fn fresh_atom(&mut self, previous_value: bool) -> Atom {
        let atom = self.valuation.len() as Atom;

        self.valuation.push(None);
        self.previous_valuation.push(previous_value);
        self.levels.push(None);
        self.watch_lists.push(WatchLists::default());

        self.activity_heap.add(atom as usize, 0.0);
        self.activity_heap.activate(atom as usize);

        atom
    }

    /// The value of `atom` on the current valuation, if any.
    pub fn value_of(&self, atom: Atom) -> Option<bool> {
        self.valuation[atom as usize]
    }

    /// The decision level `atom` was valued on, if valued.
    pub fn level_of(&self, atom: Atom) -> Option<LevelIndex> {
        self.levels[atom as usize]
    }

    /// The previous value of `atom`.
    pub fn previous_value_of(&self, atom: Atom) -> bool {
        self.previous_valuation[atom as usize]
    }

    /// Sets the previous value of `atom`, e.g. as a decision-polarity hint.
    pub fn set_previous_value(&mut self, atom: Atom, value: bool) {
        self.previous_valuation[atom as usize] = value;
    }

    /// Sets `atom` to `value`, with a note of the level the value is set on.
    ///
    /// The caller upholds: `atom` has no value on the current valuation.
    pub fn set_value(&mut self, atom: Atom, value: bool, level: LevelIndex) {
        debug_assert!(self.valuation[atom as usize].is_none());
        self.valuation[atom as usize] = Some(value);
        self.levels[atom as usize] = Some(level);
    }

    /// Clears the value of `atom`, saving the value as the previous value of
    /// the atom, and returns the atom to the activity heap.
    pub fn drop_value(&mut self, atom: Atom) {
        log::trace!(target: targets::VALUATION, "Cleared atom: {atom}");
        if let Some(value) = self.valuation[atom as usize] {
            self.previous_valuation[atom as usize] = value;
        }
        self.valuation[atom as usize] = None;
        self.levels[atom as usize] = None;
        self.activity_heap.activate(atom as usize);
    }

    /// Some atom without a value with maximal activity, if one exists.
    pub fn pop_most_active_without_value(&mut self) -> Option<Atom> {
        while let Some(atom) = self.activity_heap.pop_max() {
            if self.valuation[atom].is_none() {
                return Some(atom as Atom);
            }
        }
        None
    }

    /// An iterator over all atoms without a value on the current valuation.
    pub fn atoms_without_value(&self) -> impl Iterator<Item = Atom> + '_ {
        self.valuation
            .iter()
            .enumerate()
            .filter_map(|(atom, value)| match value {
                None => Some(atom as Atom),
                Some(_) => None,
            })
    }

    /// Bumps the activity of `atom` by the current increment.
    pub fn bump_activity(&mut self, atom: Atom) {
        let increment = self.activity_increment;
        self.activity_heap
            .apply_to_index(atom as usize, |activity| activity + increment);
    }

    /// Scales the activity increment by `decay`, rescaling all activities if required.
    pub fn decay_activity(&mut self, decay: Activity) {
        const RESCALE_LIMIT: Activity = 1e100;

        self.activity_increment *= decay;
        if self.activity_increment > RESCALE_LIMIT {
            self.activity_heap
                .apply_to_all(|activity| activity / RESCALE_LIMIT);
            self.activity_increment /= RESCALE_LIMIT;
        }
    }

    /// Adds `key` to the watch list for `atom` with polarity `polarity`.
    pub fn watch(&mut self, atom: Atom, polarity: bool, key: ClauseKey) {
        let lists = &mut self.watch_lists[atom as usize];
        match polarity {
            true => lists.positive.push(key),
            false => lists.negative.push(key),
        }
    }

    /// Takes the watch list for `atom` with polarity `polarity`, leaving an empty list.
    ///
    /// The counterpart of [restore_watches](AtomDB::restore_watches), to
    /// allow the list to be examined while clauses (and other watch lists)
    /// are mutated.
    pub fn take_watches(&mut self, atom: Atom, polarity: bool) -> Vec<ClauseKey> {
        let lists = &mut self.watch_lists[atom as usize];
        match polarity {
            true => std::mem::take(&mut lists.positive),
            false => std::mem::take(&mut lists.negative),
        }
    }

    /// Restores a watch list taken with [take_watches](AtomDB::take_watches).
    ///
    /// Any keys watched while the list was taken are preserved.
    pub fn restore_watches(&mut self, atom: Atom, polarity: bool, mut watches: Vec<ClauseKey>) {
        let lists = &mut self.watch_lists[atom as usize];
        let list = match polarity {
            true => &mut lists.positive,
            false => &mut lists.negative,
        };
        watches.append(list);
        *list = watches;
    }
}
