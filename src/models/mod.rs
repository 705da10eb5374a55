//! Premium models.
//!
//! `model` defines the `PremiumModel` seam and its row schema; `linear` and
//! `remote` are the two concrete sources (local artifact, HTTP endpoint).

pub mod linear;
pub mod model;
pub mod remote;

pub use linear::LinearModel;
pub use model::*;
pub use remote::RemoteModel;
