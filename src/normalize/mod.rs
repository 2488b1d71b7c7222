//! Normalization of extracted fields: names, times and values.
//!
//! Every step here returns an explicit absence (`Option`) or a typed error;
//! the adapter decides what a failure means for the run.

pub mod names;
pub mod time;
pub mod value;

pub use names::{clean_name, NameResolver, PinyinTransliterator, Transliterator};
pub use time::{normalize_time, DateAssembly, FragmentOrder};
pub use value::{normalize_value, NumberPattern};
