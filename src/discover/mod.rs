//! JSON structure discovery - infer latent key structure from sampled rows
//!
//! Two extractors with different shape assumptions run over the same sampled
//! text values: the generic dotted key-path walk and the dynamic-form
//! `{key, id, value}` walk. Their results accumulate into the inventories
//! consumed by SQL synthesis.

pub mod keys;
pub mod forms;
pub mod inventory;

pub use keys::KeyExtractor;
pub use forms::NestedFormExtractor;
pub use inventory::{FormsEntry, KeyInventory, NestedFormInventory, TableForms};
