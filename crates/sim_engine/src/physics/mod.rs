//! Physics: collision shapes, narrow-phase contacts, rigid bodies, and the
//! detection/response pipeline

mod contact;
mod pipeline;
mod rigid_body;
mod shape;

pub use contact::{test_contact, Contact};
pub use pipeline::{resolve_contact, CollisionPair, CollisionPipeline};
pub use rigid_body::RigidBody;
pub use shape::CollisionShape;
