//! Tests of the DQCIR builder: parsing, Tseitin conversion, and solving
//! parsed formulas end to end.

use otter_dqbf::{
    builder::DqcirParser,
    config::Config,
    context::DqbfContext,
    reports::Report,
    types::err::ParseError,
};

mod parsing {
    use super::*;

    #[test]
    fn quantifiers_gates_and_comments() {
        let mut parser = DqcirParser::default();
        parser
            .parse_str(
                "# a small formula
                forall(u1, u2)

                exists(e1)
                depend(e2, u1)
                g1 = and(u1, -e1)
                g2 = OR(g1, e2)
                output(g2)",
            )
            .unwrap();

        assert_eq!(parser.universal_count(), 2);
        assert_eq!(parser.existential_count(), 2);
        assert_eq!(parser.gate_count(), 2);
    }

    #[test]
    fn exists_defaults_to_all_prior_universals() {
        let mut parser = DqcirParser::default();
        parser
            .parse_str(
                "forall(u1)
                exists(e1)
                forall(u2)
                exists(e2)
                g = and(e1, e2)
                output(g)",
            )
            .unwrap();

        let parts = parser.into_parts().unwrap();
        assert_eq!(parts.dependencies["e1"], vec!["u1".to_string()]);
        assert_eq!(
            parts.dependencies["e2"],
            vec!["u1".to_string(), "u2".to_string()]
        );
    }

    #[test]
    fn missing_output_gate() {
        let mut parser = DqcirParser::default();
        parser
            .parse_str(
                "exists(e)
                g = and(e)",
            )
            .unwrap();

        assert!(matches!(
            parser.into_parts(),
            Err(ParseError::NoOutputGate)
        ));
    }

    #[test]
    fn unknown_gate_kind() {
        let mut parser = DqcirParser::default();
        let result = parser.parse_str("g = nand(a, b)");

        assert!(matches!(result, Err(ParseError::UnknownGate(1))));
    }

    #[test]
    fn wide_xor_chains_through_auxiliaries() {
        let mut parser = DqcirParser::default();
        parser
            .parse_str(
                "exists(a, b, c)
                g = xor(a, b, c)
                output(g)",
            )
            .unwrap();

        let parts = parser.into_parts().unwrap();

        // One internal link and the closing link: four clauses each.
        assert_eq!(parts.matrix.len(), 8);
        assert!(parts
            .name_to_id
            .keys()
            .any(|name| name.starts_with("_aux_xor_")));
    }
}

mod solving {
    use super::*;

    fn solve(text: &str) -> Report {
        let mut parser = DqcirParser::default();
        parser.parse_str(text).unwrap();
        let mut ctx =
            DqbfContext::from_parts(parser.into_parts().unwrap(), Config::default()).unwrap();
        ctx.solve().unwrap()
    }

    #[test]
    fn copying_is_satisfiable() {
        let report = solve(
            "forall(u)
            depend(e, u)
            g = xor(u, -e)
            output(g)",
        );
        assert_eq!(report, Report::Satisfiable);
    }

    #[test]
    fn blind_copying_is_unsatisfiable() {
        let report = solve(
            "forall(u)
            depend(e)
            g = xor(u, -e)
            output(g)",
        );
        assert_eq!(report, Report::Unsatisfiable);
    }

    #[test]
    fn henkin_agreement_is_unsatisfiable() {
        let report = solve(
            "forall(u1, u2)
            depend(e1, u1)
            depend(e2, u2)
            g1 = xor(u1, u2)
            g2 = xor(e1, -g1)
            g3 = xor(e1, -e2)
            go = and(g2, g3)
            output(go)",
        );
        assert_eq!(report, Report::Unsatisfiable);
    }

    #[test]
    fn full_dependence_restores_satisfiability() {
        // As above, though with both existentials seeing both universals.
        let report = solve(
            "forall(u1, u2)
            exists(e1, e2)
            g1 = xor(u1, u2)
            g2 = xor(e1, -g1)
            g3 = xor(e1, -e2)
            go = and(g2, g3)
            output(go)",
        );
        assert_eq!(report, Report::Satisfiable);
    }
}
