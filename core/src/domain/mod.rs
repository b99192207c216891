//! Domain vocabulary: workflow stages, service kinds, gallery slots

pub mod appointment;
pub mod gallery;
pub mod order;
pub mod status;

pub use appointment::AppointmentKind;
pub use order::ServiceKind;
pub use status::OrderStatus;
