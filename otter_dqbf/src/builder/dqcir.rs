//! A parser for the DQCIR format.
//!
//! For an overview of the format, see the [builder](crate::builder) module
//! documentation.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::io::BufRead;

use crate::{
    builder::{tseitin, FormulaParts},
    generic::counter::Counter,
    structures::atom::Atom,
    types::err::ParseError,
};

/// The kind of a gate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateKind {
    And,
    Or,
    Xor,
}

/// A gate: a kind together with input literals as (atom, negated) pairs.
#[derive(Clone, Debug)]
pub struct Gate {
    pub kind: GateKind,
    pub inputs: Vec<(Atom, bool)>,
}

/// The parser.
///
/// Lines are examined one at a time, and quantifier structure, gates, and
/// the output gate are accumulated.
#[derive(Default)]
pub struct DqcirParser {
    /// Mapping from variable names to atoms.
    name_to_id: HashMap<String, Atom>,

    /// Mapping from atoms to variable names.
    id_to_name: BTreeMap<Atom, String>,

    /// The universal variables declared, as a set.
    forall_vars: HashSet<String>,

    /// The universal variables declared, in order.
    forall_vars_ordered: Vec<String>,

    /// The existential variables declared, as a set.
    exists_vars: HashSet<String>,

    /// The dependencies of each existential variable.
    dependencies: BTreeMap<String, Vec<String>>,

    /// The gates of the formula, keyed by gate atom, in declaration order.
    gates: Vec<(Atom, Gate)>,

    /// The output gate, if declared.
    output_gate: Option<Atom>,

    /// The atom allocator.
    counter: Counter,

    /// The current line, for error reports.
    line_number: usize,
}

impl DqcirParser {
    /// Parses the DQCIR formula in `reader`.
    pub fn parse(&mut self, reader: impl BufRead) -> Result<(), ParseError> {
        for line in reader.lines() {
            let Ok(line) = line else {
                return Err(ParseError::NoFile);
            };
            self.line_number += 1;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            self.parse_line(line)?;
        }
        Ok(())
    }

    /// Parses the DQCIR formula in `content`.
    pub fn parse_str(&mut self, content: &str) -> Result<(), ParseError> {
        self.parse(content.as_bytes())
    }

    /// Converts the parsed gates to clauses and surrenders the parts of the formula.
    ///
    /// Errs if no output gate was declared.
    pub fn into_parts(mut self) -> Result<FormulaParts, ParseError> {
        let Some(output_gate) = self.output_gate else {
            return Err(ParseError::NoOutputGate);
        };

        let matrix = tseitin::gates_to_cnf(
            &self.gates,
            &mut self.counter,
            &mut self.name_to_id,
            &mut self.id_to_name,
        );

        Ok(FormulaParts {
            name_to_id: self.name_to_id,
            id_to_name: self.id_to_name,
            dependencies: self.dependencies,
            matrix,
            universals: self.forall_vars_ordered,
            output_gate,
            counter: self.counter,
        })
    }

    /// The atom of `name`, minting a fresh atom for an unseen name.
    fn id_of(&mut self, name: &str) -> Atom {
        match self.name_to_id.get(name) {
            Some(id) => *id,
            None => {
                let id = self.counter.increment();
                self.name_to_id.insert(name.to_string(), id);
                self.id_to_name.insert(id, name.to_string());
                id
            }
        }
    }

    /// A literal from its textual form: a name, or a `-`-prefixed name.
    fn literal_of(&mut self, token: &str) -> Result<(Atom, bool), ParseError> {
        let token = token.trim();
        match token.strip_prefix('-') {
            Some(name) if !name.is_empty() => Ok((self.id_of(name), true)),
            Some(_) => Err(ParseError::Negation),
            None if token.is_empty() => Err(ParseError::Empty),
            None => Ok((self.id_of(token), false)),
        }
    }

    fn parse_line(&mut self, line: &str) -> Result<(), ParseError> {
        if let Some(rest) = line.strip_prefix("forall(") {
            self.parse_forall(self.strip_close(rest)?)
        } else if let Some(rest) = line.strip_prefix("exists(") {
            self.parse_exists(self.strip_close(rest)?)
        } else if let Some(rest) = line.strip_prefix("depend(") {
            self.parse_depend(self.strip_close(rest)?.to_string())
        } else if let Some(rest) = line.strip_prefix("output(") {
            self.parse_output(self.strip_close(rest)?.to_string())
        } else if line.contains('=') {
            self.parse_gate(line)
        } else {
            Err(ParseError::MissingDelimiter(self.line_number))
        }
    }

    /// The argument list of a directive, with the closing parenthesis removed.
    fn strip_close<'l>(&self, rest: &'l str) -> Result<&'l str, ParseError> {
        match rest.rfind(')') {
            Some(close) => Ok(&rest[..close]),
            None => Err(ParseError::MissingDelimiter(self.line_number)),
        }
    }

    fn parse_forall(&mut self, names: &str) -> Result<(), ParseError> {
        for name in names.split(',') {
            let name = name.trim();
            if name.is_empty() {
                continue;
            }
            self.id_of(name);
            if self.forall_vars.insert(name.to_string()) {
                self.forall_vars_ordered.push(name.to_string());
            }
        }
        Ok(())
    }

    fn parse_exists(&mut self, names: &str) -> Result<(), ParseError> {
        for name in names.split(',') {
            let name = name.trim();
            if name.is_empty() {
                continue;
            }
            self.id_of(name);
            self.exists_vars.insert(name.to_string());
            // Without an explicit dependency set, an existential depends on
            // every universal declared so far.
            self.dependencies
                .insert(name.to_string(), self.forall_vars_ordered.clone());
        }
        Ok(())
    }

    fn parse_depend(&mut self, content: String) -> Result<(), ParseError> {
        let mut parts = content.split(',');
        let Some(existential) = parts.next() else {
            return Err(ParseError::Empty);
        };
        let existential = existential.trim().to_string();
        if existential.is_empty() {
            return Err(ParseError::Empty);
        }

        self.id_of(&existential);
        self.exists_vars.insert(existential.clone());

        let mut dependency_names = Vec::default();
        for name in parts {
            let name = name.trim();
            if name.is_empty() {
                continue;
            }
            self.id_of(name);
            dependency_names.push(name.to_string());
        }
        self.dependencies.insert(existential, dependency_names);
        Ok(())
    }

    fn parse_output(&mut self, name: String) -> Result<(), ParseError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ParseError::Empty);
        }
        self.output_gate = Some(self.id_of(name));
        Ok(())
    }

    fn parse_gate(&mut self, line: &str) -> Result<(), ParseError> {
        let Some((gate_name, definition)) = line.split_once('=') else {
            return Err(ParseError::MissingDelimiter(self.line_number));
        };
        let gate_name = gate_name.trim();
        if gate_name.is_empty() {
            return Err(ParseError::Empty);
        }
        let definition = definition.trim();

        // The gate keyword is case-insensitive, while input names are not.
        let Some(open) = definition.find('(') else {
            return Err(ParseError::MissingDelimiter(self.line_number));
        };
        let kind = match definition[..open].trim().to_ascii_lowercase().as_str() {
            "and" => GateKind::And,
            "or" => GateKind::Or,
            "xor" => GateKind::Xor,
            _ => return Err(ParseError::UnknownGate(self.line_number)),
        };

        let arguments = self.strip_close(&definition[open + 1..])?.to_string();

        let mut inputs = Vec::default();
        for token in arguments.split(',') {
            let token = token.trim();
            if token.is_empty() {
                continue;
            }
            inputs.push(self.literal_of(token)?);
        }

        let gate_id = self.id_of(gate_name);
        self.gates.push((gate_id, Gate { kind, inputs }));
        Ok(())
    }

    /// A count of the gates parsed.
    pub fn gate_count(&self) -> usize {
        self.gates.len()
    }

    /// A count of the universal variables parsed.
    pub fn universal_count(&self) -> usize {
        self.forall_vars_ordered.len()
    }

    /// A count of the existential variables parsed.
    pub fn existential_count(&self) -> usize {
        self.exists_vars.len()
    }
}
