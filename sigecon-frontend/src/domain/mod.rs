//! Contract and order arithmetic kept on the BFF side: pt-BR numeric
//! parsing, item filtering, balance classification, quantity clamping
//! and role capabilities. Everything here is pure so it can be unit
//! tested without a backend.
pub mod balance;
pub mod capability;
pub mod cpf;
pub mod format;
pub mod items;
pub mod parse;
pub mod quantity;
