//! Session lifecycle: login, bearer validation, refresh and logout.

mod service;


pub use service::{BearerValidator, SessionService};
