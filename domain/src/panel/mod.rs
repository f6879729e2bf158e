//! Panel membership: who answers (personas), what is asked (criteria),
//! and how the ask is phrased (prompt templates).

pub mod criterion;
pub mod persona;
pub mod template;

pub use criterion::{AnchorSet, Criterion};
pub use persona::Persona;
pub use template::PromptTemplate;
