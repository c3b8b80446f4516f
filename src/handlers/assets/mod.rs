//! Master data endpoints of the six stocked asset kinds.

pub mod extruders;
pub mod inventory;
pub mod materials;
pub mod others;
pub mod products;
pub mod spareparts;
