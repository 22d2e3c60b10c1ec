//! Regression tests of the decision list encoding.

use std::collections::{BTreeMap, HashMap};

use otter_dqbf::{
    builder::FormulaParts,
    config::Config,
    context::DqbfContext,
    engine::PropositionalEngine,
    generic::counter::Counter,
    reports::Report,
    structures::literal::{CLiteral, Literal},
};

/// ∀u ∃e(u), with a trivially true output gate: room to grow a chain by hand.
fn chain_parts() -> FormulaParts {
    let mut name_to_id = HashMap::default();
    let mut id_to_name = BTreeMap::default();
    for (name, id) in [("u", 1), ("e", 2), ("g", 3)] {
        name_to_id.insert(name.to_string(), id);
        id_to_name.insert(id, name.to_string());
    }

    let mut dependencies = BTreeMap::default();
    dependencies.insert("e".to_string(), vec!["u".to_string()]);

    FormulaParts {
        name_to_id,
        id_to_name,
        dependencies,
        matrix: vec![vec![CLiteral::new(3, true)]],
        universals: vec!["u".to_string()],
        output_gate: 3,
        counter: Counter::new(0),
    }
}

/// The record of the `index`th rule's fire variable (zero-based).
fn fire_var(ctx: &DqbfContext, index: usize) -> CLiteral {
    CLiteral::new(ctx.all_rule_fire_vars[index].fire_var, true)
}

#[test]
fn a_fire_variable_fires_when_its_premise_holds_first() {
    let mut ctx = DqbfContext::from_parts(chain_parts(), Config::default()).unwrap();

    let u = CLiteral::new(1, true);
    ctx.add_rule(2, &[u], true, None).unwrap();

    // With u true and the sentinel a root fact, the first rule must fire.
    let f1 = fire_var(&ctx, 0);
    ctx.counterexample_engine.assume(u);
    ctx.counterexample_engine.assume(-f1);
    assert_eq!(
        ctx.counterexample_engine.solve(),
        Ok(Report::Unsatisfiable)
    );
}

#[test]
fn a_shadowed_rule_is_not_forced_to_fire() {
    let mut ctx = DqbfContext::from_parts(chain_parts(), Config::default()).unwrap();

    let u = CLiteral::new(1, true);
    ctx.add_rule(2, &[u], true, None).unwrap();
    ctx.add_rule(2, &[u], false, None).unwrap();

    // Both premises hold, so the first rule fires and shadows the second:
    // the second fire variable must be free to be false.
    // A naive closing clause omitting the no-rule-fired guard would force it.
    let f2 = fire_var(&ctx, 1);
    ctx.counterexample_engine.assume(u);
    ctx.counterexample_engine.assume(-f2);
    assert_eq!(ctx.counterexample_engine.solve(), Ok(Report::Satisfiable));

    // And, once the first rule fires, the chain records that a rule fired.
    let nrf1 = CLiteral::new(ctx.all_no_rule_fired_vars[1].no_rule_fired_var, true);
    ctx.counterexample_engine.assume_all(&[u, nrf1]);
    assert_eq!(
        ctx.counterexample_engine.solve(),
        Ok(Report::Unsatisfiable)
    );
}

#[test]
fn selection_follows_the_chain_order() {
    let mut ctx = DqbfContext::from_parts(chain_parts(), Config::default()).unwrap();

    let u = CLiteral::new(1, true);
    let e = CLiteral::new(2, true);

    // Rule 1: u ⇒ e. Rule 2: always ⇒ ¬e.
    ctx.add_rule(2, &[u], true, None).unwrap();
    ctx.add_rule(2, &[], false, None).unwrap();

    let permanent = [
        CLiteral::new(ctx.all_value_vars[0].value_var, true),
        CLiteral::new(ctx.all_value_vars[1].value_var, false),
    ];

    // With u true the first rule selects, so e is true.
    ctx.counterexample_engine.assume_all(&permanent);
    ctx.counterexample_engine.assume_all(&[u, -e]);
    assert_eq!(
        ctx.counterexample_engine.solve(),
        Ok(Report::Unsatisfiable)
    );

    // With u false the second rule selects, so e is false.
    ctx.counterexample_engine.assume_all(&permanent);
    ctx.counterexample_engine.assume_all(&[-u, e]);
    assert_eq!(
        ctx.counterexample_engine.solve(),
        Ok(Report::Unsatisfiable)
    );
}
