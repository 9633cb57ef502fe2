//! User interface components.
//!
//! Rendering is a pure projection of component state; nothing is read back
//! from the drawn buffer.

mod components;

pub use components::{
    replace_seed_word, seed_word, AutoCompleteBox, SearchRequest, TextInput, CYCLE_KEY,
};
