//! End-to-end scenarios over hand-built formulas.

use std::collections::{BTreeMap, HashMap};

use otter_dqbf::{
    builder::FormulaParts,
    config::Config,
    context::DqbfContext,
    generic::counter::Counter,
    reports::Report,
    structures::{atom::Atom, clause::CClause, literal::CLiteral},
};

/// Formula parts from literal-level pieces: `matrix` clauses are integer
/// literals over the named atoms.
fn parts(
    names: &[(&str, Atom)],
    dependencies: &[(&str, &[&str])],
    matrix: &[&[i32]],
    universals: &[&str],
    output_gate: Atom,
) -> FormulaParts {
    let mut name_to_id = HashMap::default();
    let mut id_to_name = BTreeMap::default();
    for (name, id) in names {
        name_to_id.insert(name.to_string(), *id);
        id_to_name.insert(*id, name.to_string());
    }

    let mut dependency_map = BTreeMap::default();
    for (existential, dependency_names) in dependencies {
        dependency_map.insert(
            existential.to_string(),
            dependency_names
                .iter()
                .map(|name| name.to_string())
                .collect(),
        );
    }

    let matrix: Vec<CClause> = matrix
        .iter()
        .map(|clause| clause.iter().map(|int| CLiteral::from_int(*int as isize)).collect())
        .collect();

    FormulaParts {
        name_to_id,
        id_to_name,
        dependencies: dependency_map,
        matrix,
        universals: universals.iter().map(|name| name.to_string()).collect(),
        output_gate,
        counter: Counter::new(0),
    }
}

#[test]
fn trivial_satisfiable() {
    // ∃a. a, with the matrix the single clause {a}.
    let parts = parts(&[("a", 1)], &[("a", &[])], &[&[1]], &[], 1);
    let mut ctx = DqbfContext::from_parts(parts, Config::default()).unwrap();

    assert_eq!(ctx.solve(), Ok(Report::Satisfiable));
    assert_eq!(ctx.statistics().iterations, 1);

    let outputs = ctx.compute_model_functions(&[]).unwrap();
    assert_eq!(outputs, Some(vec![CLiteral::from_int(1)]));
}

#[test]
fn trivial_unsatisfiable() {
    // ∃a. a ∧ ¬a, through an output gate g = and(a, -a).
    let parts = parts(
        &[("a", 1), ("g", 2)],
        &[("a", &[])],
        &[&[-2, 1], &[-2, -1], &[2, -1, 1]],
        &[],
        2,
    );
    let mut ctx = DqbfContext::from_parts(parts, Config::default()).unwrap();

    assert_eq!(ctx.solve(), Ok(Report::Unsatisfiable));
}

#[test]
fn copy_the_universal() {
    // ∀u ∃e(u). e ≡ u, with g ≡ (u ≡ e) as the output gate.
    let parts = parts(
        &[("u", 1), ("e", 2), ("g", 3)],
        &[("e", &["u"])],
        &[&[-3, -1, 2], &[-3, 1, -2], &[3, -1, -2], &[3, 1, 2]],
        &["u"],
        3,
    );
    let mut ctx = DqbfContext::from_parts(parts, Config::default()).unwrap();

    assert_eq!(ctx.solve(), Ok(Report::Satisfiable));

    let rows = ctx.enumerate_model_functions().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].1, vec![CLiteral::from_int(-2)]);
    assert_eq!(rows[1].1, vec![CLiteral::from_int(2)]);
}

#[test]
fn unseen_universal() {
    // ∀u1 u2 ∃e(u1). e ≡ u2 is unsatisfiable: e cannot see u2.
    let parts = parts(
        &[("u1", 1), ("u2", 2), ("e", 3), ("g", 4)],
        &[("e", &["u1"])],
        &[&[-4, -3, 2], &[-4, 3, -2], &[4, -3, -2], &[4, 3, 2]],
        &["u1", "u2"],
        4,
    );
    let mut ctx = DqbfContext::from_parts(parts, Config::default()).unwrap();

    assert_eq!(ctx.solve(), Ok(Report::Unsatisfiable));
}

#[test]
fn independent_constants() {
    // ∀u1 u2 ∃e1(u1) e2(u2). e1 ∧ e2 is witnessed by constant-true functions.
    let parts = parts(
        &[("u1", 1), ("u2", 2), ("e1", 3), ("e2", 4), ("g", 5)],
        &[("e1", &["u1"]), ("e2", &["u2"])],
        &[&[-5, 3], &[-5, 4], &[5, -3, -4]],
        &["u1", "u2"],
        5,
    );
    let mut ctx = DqbfContext::from_parts(parts, Config::default()).unwrap();

    assert_eq!(ctx.solve(), Ok(Report::Satisfiable));

    let rows = ctx.enumerate_model_functions().unwrap();
    assert_eq!(rows.len(), 4);
    for (_universals, existentials) in rows {
        assert_eq!(
            existentials,
            vec![CLiteral::from_int(3), CLiteral::from_int(4)]
        );
    }
}

#[test]
fn dependency_breaking() {
    // The Henkin-style case: ∀u1 u2 ∃e1(u1) e2(u2).
    // (e1 ≡ e2) ∧ (e1 ≡ u1 ⊕ u2) demands information neither existential has.
    let parts = parts(
        &[
            ("u1", 1),
            ("u2", 2),
            ("e1", 3),
            ("e2", 4),
            ("g1", 5),
            ("g2", 6),
            ("g3", 7),
            ("go", 8),
        ],
        &[("e1", &["u1"]), ("e2", &["u2"])],
        &[
            // g1 ≡ u1 ⊕ u2
            &[-5, -1, -2],
            &[-5, 1, 2],
            &[5, -1, 2],
            &[5, 1, -2],
            // g2 ≡ (e1 ≡ g1)
            &[-6, -3, 5],
            &[-6, 3, -5],
            &[6, -3, -5],
            &[6, 3, 5],
            // g3 ≡ (e1 ≡ e2)
            &[-7, -3, 4],
            &[-7, 3, -4],
            &[7, -3, -4],
            &[7, 3, 4],
            // go ≡ g2 ∧ g3
            &[-8, 6],
            &[-8, 7],
            &[8, -6, -7],
        ],
        &["u1", "u2"],
        8,
    );
    let mut ctx = DqbfContext::from_parts(parts, Config::default()).unwrap();

    assert_eq!(ctx.solve(), Ok(Report::Unsatisfiable));
}
