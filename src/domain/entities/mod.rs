pub mod change;
pub mod dataset;
pub mod edit;
pub mod session;
pub mod snapshot;
pub mod ticket;
