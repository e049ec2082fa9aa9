//! Evolution module providing point substitution and horizontal transfer.
//!
//! This module implements the two evolutionary processes shared by the
//! forward and coalescent engines:
//! - **Mutation**: Point substitutions under a uniform or Kimura model
//! - **Transfer**: Homologous replacement of a circular window from a donor

pub mod mutation;
pub mod transfer;

pub use mutation::{SubstitutionKind, SubstitutionModel};
pub use transfer::{TransferModel, TransferUnit};
