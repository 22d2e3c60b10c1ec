/// An option with a name and permissible range, for use by external interfaces.
#[derive(Clone, Copy)]
pub struct ConfigOption<T> {
    /// The name of the option, as used by external interfaces.
    pub name: &'static str,

    /// The minimum permissible value of the option.
    pub min: T,

    /// The maximum permissible value of the option.
    pub max: T,

    /// The current value of the option.
    pub value: T,
}

impl<T: Copy> ConfigOption<T> {
    /// The minimum and maximum permissible values of the option.
    pub fn min_max(&self) -> (T, T) {
        (self.min, self.max)
    }
}
