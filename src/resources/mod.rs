//! API representations of the stored entities, their write payloads and the
//! trait implementations that give them CRUD and search behaviour.

pub mod payment;
pub mod reference;
pub mod rental;
pub mod user;
pub mod vehicle;

pub use payment::{Payment, PaymentCreate};
pub use reference::{Category, Feature, Location, LocationCreate, NamedCreate};
pub use rental::{Rental, RentalCreate};
pub use user::{User, UserCreate, UserUpdate};
pub use vehicle::{Vehicle, VehicleCreate, VehicleUpdate};
