pub mod location;

pub use location::Entity as LocationEntity;
