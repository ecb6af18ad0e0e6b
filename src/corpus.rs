//! Corpus building: raw dataset in, cleaned recipes out.
//!
//! [`builder::CorpusBuilder`] normalizes every record of a dataset and counts
//! what it skipped. [`io`] reads the raw dataset and reads/writes the cleaned
//! corpus file.

pub mod builder;
pub mod io;

pub use builder::{CorpusBuild, CorpusBuilder, CorpusStats};
pub use io::{load_corpus, load_dataset, save_corpus};
