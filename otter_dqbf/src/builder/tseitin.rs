//! Tseitin conversion of parsed gates to clauses.
//!
//! Each gate atom is made equivalent to its definition:
//!
//! - `g = and(l₁…lₖ)`: `(¬g ∨ lᵢ)` for each input, and `(g ∨ ¬l₁ ∨ … ∨ ¬lₖ)`.
//! - `g = or(l₁…lₖ)`: `(g ∨ ¬lᵢ)` for each input, and `(¬g ∨ l₁ ∨ … ∨ lₖ)`.
//! - `g = xor(l₁, l₂)`: the four-clause biconditional.
//!   Wider xor gates are chained through fresh auxiliary atoms, so each link
//!   is a two-input xor.

use std::collections::{BTreeMap, HashMap};

use crate::{
    builder::dqcir::{Gate, GateKind},
    generic::counter::Counter,
    structures::{
        atom::Atom,
        clause::CClause,
        literal::{CLiteral, Literal},
    },
};

/// Converts `gates` to clauses, minting auxiliary atoms from `counter` as required.
pub fn gates_to_cnf(
    gates: &[(Atom, Gate)],
    counter: &mut Counter,
    name_to_id: &mut HashMap<String, Atom>,
    id_to_name: &mut BTreeMap<Atom, String>,
) -> Vec<CClause> {
    let mut cnf = Vec::default();

    for (gate_id, gate) in gates {
        let inputs: Vec<CLiteral> = gate
            .inputs
            .iter()
            .map(|(atom, negated)| CLiteral::new(*atom, !negated))
            .collect();

        match gate.kind {
            GateKind::And => tseitin_and(*gate_id, &inputs, &mut cnf),
            GateKind::Or => tseitin_or(*gate_id, &inputs, &mut cnf),
            GateKind::Xor => {
                tseitin_xor(*gate_id, &inputs, &mut cnf, counter, name_to_id, id_to_name)
            }
        }
    }

    cnf
}

fn tseitin_and(gate: Atom, inputs: &[CLiteral], cnf: &mut Vec<CClause>) {
    let g = CLiteral::new(gate, true);

    for input in inputs {
        cnf.push(vec![-g, *input]);
    }

    let mut closing = vec![g];
    for input in inputs {
        closing.push(-*input);
    }
    cnf.push(closing);
}

fn tseitin_or(gate: Atom, inputs: &[CLiteral], cnf: &mut Vec<CClause>) {
    let g = CLiteral::new(gate, true);

    for input in inputs {
        cnf.push(vec![g, -*input]);
    }

    let mut closing = vec![-g];
    for input in inputs {
        closing.push(*input);
    }
    cnf.push(closing);
}

fn tseitin_xor(
    gate: Atom,
    inputs: &[CLiteral],
    cnf: &mut Vec<CClause>,
    counter: &mut Counter,
    name_to_id: &mut HashMap<String, Atom>,
    id_to_name: &mut BTreeMap<Atom, String>,
) {
    let g = CLiteral::new(gate, true);

    match inputs {
        [] => {
            // An empty xor is false.
            cnf.push(vec![-g]);
        }

        [input] => {
            cnf.push(vec![-g, *input]);
            cnf.push(vec![g, -*input]);
        }

        [left, right] => {
            tseitin_xor2(g, *left, *right, cnf);
        }

        [first, middle @ .., last] => {
            // Chain through auxiliary atoms, one per internal link.
            let mut accumulated = *first;
            for input in middle {
                let aux = fresh_aux(gate, counter, name_to_id, id_to_name);
                tseitin_xor2(aux, accumulated, *input, cnf);
                accumulated = aux;
            }
            tseitin_xor2(g, accumulated, *last, cnf);
        }
    }
}

/// The four clauses of `out ≡ xor(a, b)`.
fn tseitin_xor2(out: CLiteral, a: CLiteral, b: CLiteral, cnf: &mut Vec<CClause>) {
    cnf.push(vec![-out, -a, -b]);
    cnf.push(vec![-out, a, b]);
    cnf.push(vec![out, -a, b]);
    cnf.push(vec![out, a, -b]);
}

/// A fresh named auxiliary literal for the xor chain of `gate`.
fn fresh_aux(
    gate: Atom,
    counter: &mut Counter,
    name_to_id: &mut HashMap<String, Atom>,
    id_to_name: &mut BTreeMap<Atom, String>,
) -> CLiteral {
    let aux = counter.increment();
    let name = format!("_aux_xor_{gate}_{aux}");
    name_to_id.insert(name.clone(), aux);
    id_to_name.insert(aux, name);
    CLiteral::new(aux, true)
}
