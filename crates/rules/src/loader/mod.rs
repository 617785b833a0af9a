//! Filesystem access for a build: reading the rule list and template,
//! decoding the rule YAML, and writing the finished document atomically.

mod core;
mod writer;

#[cfg(test)]
mod tests;

pub use self::core::{decode_rules, load_rules, read_template};
pub use self::writer::write_atomic;
