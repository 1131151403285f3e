//! Client-side building blocks for the Cambiatus EOS contracts: typed
//! actions and their wire encoding, multisig proposals, table queries and
//! chain error parsing.

pub mod action;
pub mod config;
pub mod error;
pub mod failure;
pub mod multisig;
pub mod name;
pub mod permission;
pub mod rpc;
pub mod table;
pub mod transaction;

pub use error::{Error, Result};
