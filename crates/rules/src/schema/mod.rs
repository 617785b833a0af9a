//! Rule and build-parameter types with serde deserialization.
//!
//! - `Rule`: one scheduled job as written in the rules YAML
//! - `RuleField`: names of the validated string fields, for error reporting
//! - `BuildParams`: per-build settings (region, cluster, target environment)

mod params;
mod rule;

pub use params::*;
pub use rule::*;
