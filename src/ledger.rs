// Thin re-export module: implementation is in the `ledger/` submodules to keep
// chain management, balance replay, and validation separable.

pub mod balances;
pub mod chain;
pub mod validation;

pub use balances::*;
pub use chain::*;
pub use validation::*;
