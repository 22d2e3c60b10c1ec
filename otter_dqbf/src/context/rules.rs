/*!
The decision list of an existential, encoded propositionally.

# Overview

The candidate model of each existential *e* is an ordered list of rules
premise₁ ⇒ v₁, premise₂ ⇒ v₂, …, default, over three families of variables
wired into the counterexample engine:

- *fire* variables, one per rule, true when the premise of the rule holds
  and no earlier rule fired.
- *no-rule-fired* variables, one per rule, true when no rule up to that rule
  fired --- with a sentinel, asserted true, closing the empty prefix.
- *value* variables, one per rule, holding the value *e* takes when the rule
  is selected.

The tail of the chain is a *default* rule: a fire variable which has not yet
been bound to any premise.
During a counterexample query the tail is assumed true, so if no rule of the
chain fires the current default-value literal dictates *e*.
Adding a rule binds the tail to the premise of the rule and allocates a
fresh tail.

# Growth

The chain only grows: no rule, clause, or variable is ever retracted, and
each of [init_model](GenericDqbfContext::init_model),
[add_rule](GenericDqbfContext::add_rule) allocates strictly fresh atoms.
*/

use crate::{
    context::{GenericDqbfContext, NoRuleFiredRecord, RuleFireRecord, ValueRecord},
    engine::PropositionalEngine,
    misc::log::targets::{self},
    structures::{
        atom::Atom,
        literal::{CLiteral, Literal},
    },
    types::err::ContextError,
};

impl<E: PropositionalEngine> GenericDqbfContext<E> {
    /// Initialises the decision list of `existential`, with a true default.
    ///
    /// Call sites follow with [set_default_value](GenericDqbfContext::set_default_value)
    /// to force the desired initial default.
    /// Idempotent: initialising an initialised existential is a no-op.
    pub fn init_model(&mut self, existential: Atom) -> Result<(), ContextError> {
        if !self.existential_set.contains(&existential) {
            return Err(ContextError::UnknownExistential(existential));
        }

        if self.value_vars.contains_key(&existential) {
            return Ok(());
        }

        let existential_name = self.name_of(existential);

        let value_var = self.counter.increment();
        self.value_vars
            .insert(existential, CLiteral::new(value_var, true));
        self.id_to_name
            .insert(value_var, format!("{existential_name}_value_1"));
        self.all_value_vars.push(ValueRecord {
            existential,
            value_var,
            rule_index: 1,
        });

        let no_rule_fired = self.counter.increment();
        self.no_rule_fired_vars.insert(existential, no_rule_fired);
        self.id_to_name
            .insert(no_rule_fired, format!("{existential_name}_nofired_0"));
        self.all_no_rule_fired_vars.push(NoRuleFiredRecord {
            existential,
            no_rule_fired_var: no_rule_fired,
            rule_index: 0,
        });

        let fire_var = self.counter.increment();
        self.rule_fire_vars.insert(existential, fire_var);
        self.id_to_name
            .insert(fire_var, format!("{existential_name}_fire_1"));
        self.all_rule_fire_vars.push(RuleFireRecord {
            existential,
            fire_var,
            premise: String::from("default"),
        });

        self.rule_numbers.insert(existential, 1);

        // The empty prefix of the chain fired no rule.
        self.counterexample_engine
            .add_clause(CLiteral::new(no_rule_fired, true))
            .map_err(ContextError::Engine)?;

        // When the sentinel holds and the default rule fires, e ≡ value_var.
        let n = CLiteral::new(no_rule_fired, false);
        let f = CLiteral::new(fire_var, false);
        let e = CLiteral::new(existential, true);
        let v = CLiteral::new(value_var, true);
        self.counterexample_engine
            .add_clause(vec![n, f, -e, v])
            .map_err(ContextError::Engine)?;
        self.counterexample_engine
            .add_clause(vec![n, f, e, -v])
            .map_err(ContextError::Engine)?;

        log::debug!(target: targets::RULES, "Initialised model of {existential_name}: value {value_var}, sentinel {no_rule_fired}, fire {fire_var}");

        Ok(())
    }

    /// Sets the default value of `existential` to `value`, by flipping the
    /// polarity of the current default-value literal.
    pub fn set_default_value(
        &mut self,
        existential: Atom,
        value: bool,
    ) -> Result<(), ContextError> {
        match self.value_vars.get_mut(&existential) {
            None => Err(ContextError::UninitialisedExistential(existential)),
            Some(literal) => {
                *literal = CLiteral::new(literal.atom(), value);
                Ok(())
            }
        }
    }

    /// Extends the decision list of `existential` with the rule
    /// `premise ⇒ conclusion`.
    ///
    /// An empty premise is interpreted as "always".
    /// When `value_var` is given the conclusion of the rule is the value of
    /// that variable, and `conclusion` is ignored; otherwise the conclusion
    /// polarity is frozen through a permanent assumption.
    pub fn add_rule(
        &mut self,
        existential: Atom,
        premise: &[CLiteral],
        conclusion: bool,
        value_var: Option<Atom>,
    ) -> Result<(), ContextError> {
        if !self.value_vars.contains_key(&existential) {
            return Err(ContextError::UninitialisedExistential(existential));
        }

        let existential_name = self.name_of(existential);

        let previous_no_rule_fired = self.no_rule_fired_vars[&existential];
        let this_fire = self.rule_fire_vars[&existential];
        let this_value = self.value_vars[&existential].atom();

        let rule_number = self.rule_numbers[&existential];
        self.rule_numbers.insert(existential, rule_number + 1);

        let next_fire = self.counter.increment();
        let this_no_rule_fired = self.counter.increment();
        let next_value = self.counter.increment();

        self.rule_fire_vars.insert(existential, next_fire);
        self.no_rule_fired_vars.insert(existential, this_no_rule_fired);
        self.value_vars
            .insert(existential, CLiteral::new(next_value, true));

        let premise_name = match premise.is_empty() {
            true => String::from("true"),
            false => Self::format_literals(premise),
        };

        // The now-finalised fire variable is renamed to reflect its premise.
        self.id_to_name.insert(
            this_fire,
            format!("{existential_name}_fire_{rule_number}_premise_{premise_name}"),
        );
        for record in self.all_rule_fire_vars.iter_mut() {
            if record.existential == existential && record.fire_var == this_fire {
                record.premise = premise_name.clone();
                break;
            }
        }

        self.id_to_name.insert(
            next_fire,
            format!("{existential_name}_fire_{}", rule_number + 1),
        );
        self.id_to_name.insert(
            this_no_rule_fired,
            format!("{existential_name}_nofired_{rule_number}"),
        );
        self.id_to_name.insert(
            next_value,
            format!("{existential_name}_value_{}", rule_number + 1),
        );

        self.all_rule_fire_vars.push(RuleFireRecord {
            existential,
            fire_var: next_fire,
            premise: String::from("default"),
        });
        self.all_no_rule_fired_vars.push(NoRuleFiredRecord {
            existential,
            no_rule_fired_var: this_no_rule_fired,
            rule_index: rule_number,
        });
        self.all_value_vars.push(ValueRecord {
            existential,
            value_var: next_value,
            rule_index: rule_number + 1,
        });

        // this_fire ⇔ premise ∧ previous_no_rule_fired.
        let fire = CLiteral::new(this_fire, true);
        let prev_nf = CLiteral::new(previous_no_rule_fired, true);
        for literal in premise {
            self.counterexample_engine
                .add_clause(vec![-fire, *literal])
                .map_err(ContextError::Engine)?;
        }
        let mut closing = vec![fire, -prev_nf];
        for literal in premise {
            closing.push(-*literal);
        }
        self.counterexample_engine
            .add_clause(closing)
            .map_err(ContextError::Engine)?;

        // this_no_rule_fired ⇔ previous_no_rule_fired ∧ ¬this_fire.
        let nrf = CLiteral::new(this_no_rule_fired, true);
        self.counterexample_engine
            .add_clause(vec![-nrf, prev_nf])
            .map_err(ContextError::Engine)?;
        self.counterexample_engine
            .add_clause(vec![-nrf, -fire])
            .map_err(ContextError::Engine)?;
        self.counterexample_engine
            .add_clause(vec![nrf, -prev_nf, fire])
            .map_err(ContextError::Engine)?;

        // When the next rule fires and no rule up to this rule fired, e ≡ next_value.
        let next_f = CLiteral::new(next_fire, true);
        let e = CLiteral::new(existential, true);
        let next_v = CLiteral::new(next_value, true);
        self.counterexample_engine
            .add_clause(vec![-next_f, -nrf, -e, next_v])
            .map_err(ContextError::Engine)?;
        self.counterexample_engine
            .add_clause(vec![-next_f, -nrf, e, -next_v])
            .map_err(ContextError::Engine)?;

        // The conclusion fixes this rule's value slot.
        let this_v = CLiteral::new(this_value, true);
        match value_var {
            None => {
                let frozen = CLiteral::new(this_value, conclusion);
                self.permanent_assumptions.push(frozen);
            }

            Some(value_var) => {
                let x = CLiteral::new(value_var, true);
                self.counterexample_engine
                    .add_clause(vec![-this_v, x])
                    .map_err(ContextError::Engine)?;
                self.counterexample_engine
                    .add_clause(vec![this_v, -x])
                    .map_err(ContextError::Engine)?;
            }
        }

        log::debug!(target: targets::RULES, "Rule {rule_number} of {existential_name}: premise {premise_name}, value slot {this_value}");

        Ok(())
    }
}
