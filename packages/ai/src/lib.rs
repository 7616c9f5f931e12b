// ABOUTME: Instruction generation service and per-vendor protocol adapters
// ABOUTME: Normalizes heterogeneous AI provider APIs behind one call

pub mod adapters;
pub mod service;

pub use service::{InstructionError, InstructionRequest, InstructionService};
