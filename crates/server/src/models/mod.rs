//! Domain models mapped from database rows and serialized to the API.

pub mod rating;
pub mod store;
pub mod user;

pub use rating::{Rating, RatingWithRater};
pub use store::{Store, StoreListing, StoreWithOwnRating};
pub use user::{PublicUser, User, UserDetail};
