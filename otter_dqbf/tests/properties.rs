//! Property-flavoured tests: determinism, canonicalisation, freshness, and
//! the behaviour of the refinement loop against an engine oracle.

use std::collections::{BTreeMap, HashMap};

use otter_dqbf::{
    builder::FormulaParts,
    config::Config,
    context::{DqbfContext, GenericDqbfContext},
    engine::{ClauseOk, PropositionalEngine},
    generic::counter::Counter,
    reports::Report,
    structures::{
        atom::Atom,
        clause::Clause,
        literal::{CLiteral, Literal},
    },
    types::err::{ContextError, EngineError},
};

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

    FormulaParts {
        name_to_id,
        id_to_name,
        dependencies: dependency_map,
        matrix: matrix
            .iter()
            .map(|clause| {
                clause
                    .iter()
                    .map(|int| CLiteral::from_int(*int as isize))
                    .collect()
            })
            .collect(),
        universals: universals.iter().map(|name| name.to_string()).collect(),
        output_gate,
        counter: Counter::new(0),
    }
}

/// Parts for ∀u1 u2 ∃e(u1, u2). e ≡ (u1 ∧ u2).
fn conjunction_parts() -> FormulaParts {
    parts(
        &[("u1", 1), ("u2", 2), ("e", 3), ("ga", 4), ("g", 5)],
        &[("e", &["u1", "u2"])],
        &[
            // ga ≡ u1 ∧ u2
            &[-4, 1],
            &[-4, 2],
            &[4, -1, -2],
            // g ≡ (e ≡ ga), as e ⊕ ¬ga
            &[-5, -3, 4],
            &[-5, 3, -4],
            &[5, -3, -4],
            &[5, 3, 4],
        ],
        &["u1", "u2"],
        5,
    )
}

mod determinism {
    use super::*;

    #[test]
    fn identical_runs_identical_traces() {
        let run = || {
            let mut ctx =
                DqbfContext::from_parts(conjunction_parts(), Config::default()).unwrap();
            let report = ctx.solve().unwrap();
            (report, ctx.statistics())
        };

        let (first_report, first_statistics) = run();
        let (second_report, second_statistics) = run();

        assert_eq!(first_report, Report::Satisfiable);
        assert_eq!(first_report, second_report);
        assert_eq!(first_statistics, second_statistics);
    }

    #[test]
    fn model_functions_are_stable() {
        let mut ctx = DqbfContext::from_parts(conjunction_parts(), Config::default()).unwrap();
        assert_eq!(ctx.solve(), Ok(Report::Satisfiable));

        let input = [CLiteral::from_int(1), CLiteral::from_int(-2)];
        let first = ctx.compute_model_functions(&input).unwrap();
        let second = ctx.compute_model_functions(&input).unwrap();

        assert!(first.is_some());
        assert_eq!(first, second);
    }

    #[test]
    fn model_functions_realise_the_specification() {
        let mut ctx = DqbfContext::from_parts(conjunction_parts(), Config::default()).unwrap();
        assert_eq!(ctx.solve(), Ok(Report::Satisfiable));

        let rows = ctx.enumerate_model_functions().unwrap();
        assert_eq!(rows.len(), 4);

        // The only Skolem function for e ≡ (u1 ∧ u2) is the conjunction itself.
        for (universals, existentials) in rows {
            let u1 = universals[0].polarity();
            let u2 = universals[1].polarity();
            assert_eq!(existentials[0].polarity(), u1 && u2);
        }
    }
}

mod expansion {
    use super::*;

    #[test]
    fn canonicalisation_of_assignments() {
        let mut ctx = DqbfContext::from_parts(conjunction_parts(), Config::default()).unwrap();

        let forward = [CLiteral::from_int(1), CLiteral::from_int(-2)];
        let backward = [CLiteral::from_int(-2), CLiteral::from_int(1)];

        let x = ctx.expansion_variable(3, &forward).unwrap();
        let y = ctx.expansion_variable(3, &backward).unwrap();

        assert_eq!(x, y);
        assert_eq!(ctx.statistics().expansion_count, 1);
    }

    #[test]
    fn fresh_variables_are_fresh() {
        let mut ctx = DqbfContext::from_parts(conjunction_parts(), Config::default()).unwrap();

        let x = ctx
            .expansion_variable(3, &[CLiteral::from_int(1), CLiteral::from_int(2)])
            .unwrap();
        let y = ctx
            .expansion_variable(3, &[CLiteral::from_int(1), CLiteral::from_int(-2)])
            .unwrap();

        assert_ne!(x, y);
        assert!(y > x);
        assert_eq!(ctx.statistics().expansion_count, 2);
    }

    #[test]
    fn allocation_sits_above_the_input() {
        // The matrix mentions an unnamed atom well above the named atoms.
        let the_parts = parts(
            &[("a", 1)],
            &[("a", &[])],
            &[&[1, 900], &[1, -900]],
            &[],
            1,
        );
        let mut ctx = DqbfContext::from_parts(the_parts, Config::default()).unwrap();

        assert!(ctx.counter.value() >= 900);

        let x = ctx.expansion_variable(1, &[]).unwrap();
        assert!(x > 900);
    }

    #[test]
    fn preconditions_are_checked() {
        let mut ctx = DqbfContext::from_parts(conjunction_parts(), Config::default()).unwrap();

        // u1 is not an existential.
        assert_eq!(
            ctx.expansion_variable(1, &[]),
            Err(ContextError::UnknownExistential(1))
        );

        // e does not depend on the output gate.
        assert_eq!(
            ctx.expansion_variable(3, &[CLiteral::from_int(5)]),
            Err(ContextError::OutsideDependencies {
                existential: 3,
                literal: CLiteral::from_int(5),
            })
        );

        // u1 has no decision list.
        assert_eq!(
            ctx.set_default_value(1, true),
            Err(ContextError::UninitialisedExistential(1))
        );
    }
}

mod counterexamples {
    use super::*;

    #[test]
    fn cores_are_existential() {
        let mut ctx = DqbfContext::from_parts(conjunction_parts(), Config::default()).unwrap();

        let counterexample = ctx
            .get_counterexample()
            .unwrap()
            .expect("the fresh model is refutable");

        assert!(!counterexample.existential_core.is_empty());
        for literal in &counterexample.existential_core {
            assert!(ctx.existential_atoms().contains(&literal.atom()));
        }
        assert_eq!(
            counterexample.universal_assignment.len(),
            ctx.universal_atoms().len()
        );
    }
}

mod oracle {
    use super::*;

    /// An engine oracle: every odd solve is satisfiable with an all-false
    /// model, every even solve is unsatisfiable with every assumption failed.
    ///
    /// Driving refinement with the oracle repeats one counterexample forever,
    /// which the cycle check must refuse.
    #[derive(Default)]
    struct OracleEngine {
        solves: usize,
        assumptions: Vec<CLiteral>,
        last_assumptions: Vec<CLiteral>,
    }

    impl PropositionalEngine for OracleEngine {
        fn ensure_atom(&mut self, _atom: Atom) {}

        fn add_clause(&mut self, _clause: impl Clause) -> Result<ClauseOk, EngineError> {
            Ok(ClauseOk::Added)
        }

        fn assume(&mut self, literal: CLiteral) {
            self.assumptions.push(literal);
        }

        fn set_phase(&mut self, _literal: CLiteral) {}

        fn solve(&mut self) -> Result<Report, EngineError> {
            self.solves += 1;
            self.last_assumptions = std::mem::take(&mut self.assumptions);
            match self.solves % 2 {
                1 => Ok(Report::Satisfiable),
                _ => Ok(Report::Unsatisfiable),
            }
        }

        fn value_of(&self, _atom: Atom) -> Option<bool> {
            Some(false)
        }

        fn failed_assumptions(&self) -> Vec<CLiteral> {
            self.last_assumptions.clone()
        }
    }

    #[test]
    fn repeated_counterexamples_are_refused() {
        let the_parts = parts(
            &[("u", 1), ("e", 2), ("g", 3)],
            &[("e", &["u"])],
            &[&[3]],
            &["u"],
            3,
        );

        let mut ctx = GenericDqbfContext::with_engines(
            the_parts,
            OracleEngine::default(),
            OracleEngine::default(),
        )
        .unwrap();

        assert_eq!(
            ctx.solve(),
            Err(ContextError::CycleDetected { iteration: 2 })
        );
    }
}
