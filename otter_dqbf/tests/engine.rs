use otter_dqbf::{
    config::Config,
    engine::{ClauseOk, Engine, PropositionalEngine},
    reports::Report,
    structures::literal::{CLiteral, Literal},
};

mod basic {
    use super::*;

    #[test]
    fn one_literal() {
        let mut engine = Engine::from_config(Config::default());
        let p = engine.fresh_atom();

        assert_eq!(
            engine.add_clause(CLiteral::new(p, true)),
            Ok(ClauseOk::Added)
        );

        assert_eq!(engine.solve(), Ok(Report::Satisfiable));
        assert_eq!(engine.value_of(p), Some(true));
    }

    #[test]
    fn conflict() {
        let mut engine = Engine::from_config(Config::default());

        let p = CLiteral::new(engine.fresh_atom(), true);
        let q = CLiteral::new(engine.fresh_atom(), true);

        assert!(engine.add_clause(vec![p, q]).is_ok());
        assert!(engine.add_clause(vec![-p, -q]).is_ok());
        assert!(engine.add_clause(vec![p, -q]).is_ok());
        assert!(engine.add_clause(vec![-p, q]).is_ok());

        assert_eq!(engine.solve(), Ok(Report::Unsatisfiable));
    }

    #[test]
    fn unit_conjunct() {
        let mut engine = Engine::from_config(Config::default());

        let p = CLiteral::new(engine.fresh_atom(), true);
        let q = CLiteral::new(engine.fresh_atom(), true);

        assert!(engine.add_clause(vec![p, q]).is_ok());
        assert!(engine.add_clause(-p).is_ok());

        assert_eq!(engine.solve(), Ok(Report::Satisfiable));

        assert_eq!(engine.value_of(p.atom()), Some(false));
        assert_eq!(engine.value_of(q.atom()), Some(true));
    }

    #[test]
    fn tautology_skip() {
        let mut engine = Engine::from_config(Config::default());

        let p = CLiteral::new(engine.fresh_atom(), true);
        let q = CLiteral::new(engine.fresh_atom(), true);

        assert_eq!(
            engine.add_clause(vec![p, -q, -p]),
            Ok(ClauseOk::Tautology)
        );
    }

    #[test]
    fn incremental_additions() {
        let mut engine = Engine::from_config(Config::default());

        let p = CLiteral::new(engine.fresh_atom(), true);
        let q = CLiteral::new(engine.fresh_atom(), true);

        assert!(engine.add_clause(vec![p, q]).is_ok());
        assert_eq!(engine.solve(), Ok(Report::Satisfiable));

        // Forbid the valuation just found, on the examined atoms.
        let p_value = engine.value_of(p.atom()).expect("p valued");
        let q_value = engine.value_of(q.atom()).expect("q valued");
        assert!(engine
            .add_clause(vec![
                CLiteral::new(p.atom(), !p_value),
                CLiteral::new(q.atom(), !q_value)
            ])
            .is_ok());
        assert_eq!(engine.solve(), Ok(Report::Satisfiable));

        // Close off the remaining valuations.
        assert!(engine.add_clause(vec![-p, -q]).is_ok());
        assert!(engine.add_clause(vec![p, -q]).is_ok());
        assert!(engine.add_clause(vec![-p, q]).is_ok());
        assert_eq!(engine.solve(), Ok(Report::Unsatisfiable));

        // Unsatisfiability is permanent.
        assert_eq!(engine.solve(), Ok(Report::Unsatisfiable));
    }

    #[test]
    fn empty_clause_unsatisfiable() {
        let mut engine = Engine::from_config(Config::default());
        let _ = engine.fresh_atom();

        assert_eq!(engine.add_clause(vec![]), Ok(ClauseOk::Added));
        assert_eq!(engine.solve(), Ok(Report::Unsatisfiable));
    }
}

mod assumptions {
    use super::*;

    #[test]
    fn hold_for_one_solve() {
        let mut engine = Engine::from_config(Config::default());

        let p = CLiteral::new(engine.fresh_atom(), true);
        let q = CLiteral::new(engine.fresh_atom(), true);

        assert!(engine.add_clause(vec![-p, q]).is_ok());

        engine.assume(p);
        assert_eq!(engine.solve(), Ok(Report::Satisfiable));
        assert_eq!(engine.value_of(p.atom()), Some(true));
        assert_eq!(engine.value_of(q.atom()), Some(true));

        // The next solve is unconstrained by the previous assumption.
        engine.assume(-p);
        assert_eq!(engine.solve(), Ok(Report::Satisfiable));
        assert_eq!(engine.value_of(p.atom()), Some(false));
    }

    #[test]
    fn direct_failure() {
        let mut engine = Engine::from_config(Config::default());

        let p = CLiteral::new(engine.fresh_atom(), true);
        let q = CLiteral::new(engine.fresh_atom(), true);

        assert!(engine.add_clause(vec![-p, q]).is_ok());
        assert!(engine.add_clause(-q).is_ok());

        engine.assume(p);
        assert_eq!(engine.solve(), Ok(Report::Unsatisfiable));

        assert!(engine.failed_assumptions().contains(&p));

        // Without the assumption the formula is satisfiable.
        assert_eq!(engine.solve(), Ok(Report::Satisfiable));
    }

    #[test]
    fn multiple_failures() {
        let mut engine = Engine::from_config(Config::default());

        let p = CLiteral::new(engine.fresh_atom(), true);
        let q = CLiteral::new(engine.fresh_atom(), true);
        let r = CLiteral::new(engine.fresh_atom(), true);
        let s = CLiteral::new(engine.fresh_atom(), true);
        let t = CLiteral::new(engine.fresh_atom(), true);
        let u = CLiteral::new(engine.fresh_atom(), true);

        assert!(engine.add_clause(vec![-p, q]).is_ok());
        assert!(engine.add_clause(vec![-r, s]).is_ok());
        assert!(engine.add_clause(vec![-s, t]).is_ok());
        assert!(engine.add_clause(vec![-q, -t]).is_ok());

        engine.assume_all(&[p, r, u]);
        assert_eq!(engine.solve(), Ok(Report::Unsatisfiable));

        let failed = engine.failed_assumptions();
        assert!(failed.contains(&p));
        assert!(failed.contains(&r));
        assert!(!failed.contains(&u));
    }

    #[test]
    fn conflicting_assumptions() {
        let mut engine = Engine::from_config(Config::default());

        let p = CLiteral::new(engine.fresh_atom(), true);

        engine.assume_all(&[p, -p]);
        assert_eq!(engine.solve(), Ok(Report::Unsatisfiable));

        let failed = engine.failed_assumptions();
        assert!(failed.contains(&p));
        assert!(failed.contains(&-p));
    }
}

mod phases {
    use super::*;

    #[test]
    fn hints_bias_free_atoms() {
        let mut engine = Engine::from_config(Config::default());

        let p = CLiteral::new(engine.fresh_atom(), true);
        let q = CLiteral::new(engine.fresh_atom(), true);

        assert!(engine.add_clause(vec![p, q]).is_ok());

        engine.set_phase(p);
        engine.set_phase(-q);
        assert_eq!(engine.solve(), Ok(Report::Satisfiable));
        assert_eq!(engine.value_of(p.atom()), Some(true));
        assert_eq!(engine.value_of(q.atom()), Some(false));

        engine.set_phase(-p);
        engine.set_phase(q);
        assert_eq!(engine.solve(), Ok(Report::Satisfiable));
        assert_eq!(engine.value_of(p.atom()), Some(false));
        assert_eq!(engine.value_of(q.atom()), Some(true));
    }

    #[test]
    fn determinism() {
        let run = || {
            let mut engine = Engine::from_config(Config::default());
            let atoms: Vec<_> = (0..8)
                .map(|_| CLiteral::new(engine.fresh_atom(), true))
                .collect();

            for window in atoms.windows(2) {
                assert!(engine.add_clause(vec![-window[0], window[1]]).is_ok());
                assert!(engine.add_clause(vec![window[0], -window[1]]).is_ok());
            }

            assert_eq!(engine.solve(), Ok(Report::Satisfiable));
            atoms
                .iter()
                .map(|literal| engine.value_of(literal.atom()))
                .collect::<Vec<_>>()
        };

        assert_eq!(run(), run());
    }
}
