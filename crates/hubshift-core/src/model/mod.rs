//! Domain models for the marketplace

pub mod application;
pub mod conversation;
pub mod professional;
pub mod session;
pub mod shift;
pub mod user;
pub mod venue;

pub use application::{Application, ApplicationStatus, ApplicationUpdate};
pub use conversation::Conversation;
pub use professional::{ProfessionalProfile, RsaCertificate, Strike};
pub use session::{hash_token, Session};
pub use shift::{NewShift, Shift, ShiftStatus};
pub use user::{normalize_email, AuthProvider, Role, User};
pub use venue::{Day, DayHours, OperatingHours, VenueProfile};
