//! Reusable UI components.

mod autocomplete;
mod input;

pub use autocomplete::{
    replace_seed_word, seed_word, AutoCompleteBox, SearchRequest, CYCLE_KEY,
};
pub use input::TextInput;
