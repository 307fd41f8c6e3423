//! Data models for the booking service.
//!
//! - `User`: the signed-in customer, owned by the session
//! - `Provider`: a barber listed on the dashboard
//! - `Appointment`: a booked slot returned by the API

pub mod appointment;
pub mod provider;
pub mod user;

pub use appointment::{Appointment, NewAppointment};
pub use provider::Provider;
pub use user::{NewUser, ProfileUpdate, User};
