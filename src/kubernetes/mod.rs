mod client;
pub mod resources;

pub use client::InventoryClient;
pub use resources::GroupVersionResource;
