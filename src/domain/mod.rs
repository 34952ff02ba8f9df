pub mod entities;
pub mod filter;
pub mod normalize;
pub mod reconcile;
pub mod summary;
