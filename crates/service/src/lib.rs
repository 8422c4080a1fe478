//! Service layer for the collection and tires backends.
//! - Repositories own SQL; services own validation and error mapping.
//! - Reuses entity definitions and validation from the `models` crate.

pub mod errors;
pub mod period;
pub mod filter;
pub mod collection;
pub mod tire;
pub mod company;
pub mod bulk_import;
#[cfg(test)]
pub mod test_support;
