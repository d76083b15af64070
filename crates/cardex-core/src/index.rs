//! Derived secondary indexes over stored card records.
//!
//! Each index kind maps a derived key to a posting set of record ids. The
//! builder only ever adds postings; drift left behind by deleted or renamed
//! records is swept by the maintainer.

mod builder;
pub mod keys;
mod maintainer;

pub use builder::IndexBuilder;
pub use keys::{exact_key, name_ngrams, prefix_keys, word_tokens};
pub use maintainer::IndexMaintainer;

#[cfg(test)]
mod tests;
