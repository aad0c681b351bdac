//! Sea-ORM entities backing the rental platform.

pub mod category;
pub mod feature;
pub mod location;
pub mod payment;
pub mod rental;
pub mod user;
pub mod vehicle;
pub mod vehicle_feature;
