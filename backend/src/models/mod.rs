//! Domain models for the seat inventory simulator

pub mod catalogue;
pub mod event;
pub mod inventory;
pub mod state;

// Re-exports
pub use catalogue::{Catalogue, ClassId, CustomerClass, Product, ProductId};
pub use event::{Event, EventLog, RejectionReason};
pub use inventory::{InventoryState, SoldOutTransitions};
pub use state::ReplicationState;
