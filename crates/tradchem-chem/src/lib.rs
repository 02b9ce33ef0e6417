//! Utilidades SMILES para TradChem.
//!
//! Este crate aísla la capacidad quimioinformática detrás del trait
//! [`ChemEngine`]: los consumidores reciben el motor por inyección explícita
//! y nunca asumen que está disponible. Un SMILES inválido es un resultado
//! normal (`false` / `None`), jamás un error.

mod elements;
mod engine;
mod parser;

pub use engine::{BuiltinEngine, ChemEngine, DisabledEngine, MolecularProperties};
pub use parser::SmilesError;
