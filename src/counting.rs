//! Counting structures used while accumulating training statistics.
//!
//! Every structure here follows the same policy: reading a key that was
//! never written yields the default (zero, or the caller-supplied fallback
//! for [`NestedDictionary::safe_get`]) instead of an error.

pub mod counter;
pub mod nested_counter;
pub mod nested_dictionary;

pub use counter::Counter;
pub use nested_counter::NestedCounter;
pub use nested_dictionary::NestedDictionary;
