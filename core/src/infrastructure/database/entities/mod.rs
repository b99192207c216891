//! Sea-ORM entity definitions
//!
//! These map our domain models to database tables.

pub mod appointment;
pub mod order;
pub mod order_photo;
pub mod progress_entry;
pub mod session;
pub mod user;

// Re-export all entities
pub use appointment::Entity as Appointment;
pub use order::Entity as Order;
pub use order_photo::Entity as OrderPhoto;
pub use progress_entry::Entity as ProgressEntry;
pub use session::Entity as Session;
pub use user::Entity as User;

// Re-export active models for easy access
pub use appointment::ActiveModel as AppointmentActive;
pub use order::ActiveModel as OrderActive;
pub use order_photo::ActiveModel as OrderPhotoActive;
pub use progress_entry::ActiveModel as ProgressEntryActive;
pub use session::ActiveModel as SessionActive;
pub use user::ActiveModel as UserActive;
