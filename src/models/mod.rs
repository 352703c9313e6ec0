//! Data models for the rxlens prescription analysis toolkit.

pub mod medicine;
pub mod order;

pub use medicine::{
    normalize_name, Alternatives, DosageBand, DosageEntry, DosageRecommendation, Interaction,
    MedicineRecord,
};
pub use order::{Order, OrderRequest, OrderStatus, PlacedOrder};
