// SPDX-License-Identifier: MIT

pub mod app;
pub mod balance;
pub mod plans;
pub mod registry;

pub use registry::ContractKind;
