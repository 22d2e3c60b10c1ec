/*!
Configuration of an engine, and of a context.

All configuration for a context is contained within its [Config], and the
context passes a clone of the configuration to each engine it owns.
Options are wrapped in a [ConfigOption], which carries the name of the
option and the range of permissible values for use by external interfaces.
*/

mod config_option;
pub use config_option::ConfigOption;

use crate::generic::luby::LubyRepresentation;

/// The probability of assigning positive polarity to an atom when freely choosing a value.
pub type PolarityLean = f64;

/// The probability of making a random decision, over taking the most active atom.
pub type RandomDecisionBias = f64;

/// A measure of atom activity.
pub type Activity = f64;

/// The primary configuration structure.
#[derive(Clone)]
pub struct Config {
    /// The `u` value to multiply the luby sequence by when determining whether to perform a restart.
    pub luby_u: ConfigOption<LubyRepresentation>,

    /// The probability of assigning positive polarity to an atom when freely choosing a value.
    pub polarity_lean: ConfigOption<PolarityLean>,

    /// The probability of making a random decision, over taking the most active atom.
    pub random_decision_bias: ConfigOption<RandomDecisionBias>,

    /// Default to the last set value of an atom when choosing a value for the atom.
    ///
    /// Phase saving is what carries decision-polarity hints between solves,
    /// so disabling it also disables the hints.
    pub phase_saving: ConfigOption<bool>,

    /// Permit (luby scheduled) restarts.
    pub restarts: ConfigOption<bool>,

    /// The amount to bump the activity of an atom seen during conflict analysis.
    pub atom_bump: ConfigOption<Activity>,

    /// The factor to decay the activity of all atoms by after a conflict.
    pub atom_decay: ConfigOption<Activity>,
}

impl Default for Config {
    /// The default configuration is deterministic: any two solves of the same
    /// formula make the same decisions.
    fn default() -> Self {
        Config {
            luby_u: ConfigOption {
                name: "luby_u",
                min: LubyRepresentation::MIN,
                max: LubyRepresentation::MAX,
                value: 128,
            },

            polarity_lean: ConfigOption {
                name: "polarity_lean",
                min: 0.0,
                max: 1.0,
                value: 0.0,
            },

            random_decision_bias: ConfigOption {
                name: "random_decision_bias",
                min: 0.0,
                max: 1.0,
                value: 0.0,
            },

            phase_saving: ConfigOption {
                name: "phase_saving",
                min: false,
                max: true,
                value: true,
            },

            restarts: ConfigOption {
                name: "restarts",
                min: false,
                max: true,
                value: true,
            },

            atom_bump: ConfigOption {
                name: "atom_bump",
                min: 0.0,
                max: Activity::MAX,
                value: 1.0,
            },

            atom_decay: ConfigOption {
                name: "atom_decay",
                min: 1.0,
                max: Activity::MAX,
                value: 1.05,
            },
        }
    }
}
