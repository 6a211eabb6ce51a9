//! Logic modules: turn installed kernel packages into metapackage names.
//!
//! Data flows one way through the stages below; none of them keeps state
//! between calls or touches the system.
//!
//! # Modules
//!
//! - `extract`: Package names to structured facts
//! - `classify`: Facts to hardware-enablement / family stacks
//! - `rank`: Selects the current kernel across stacks
//! - `naming`: Selected flavour and stack to metapackage name
//! - `resolver`: Facade running the whole pipeline

pub mod classify;
pub mod extract;
pub mod naming;
pub mod rank;
pub mod resolver;
