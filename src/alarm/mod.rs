pub mod matcher;
pub mod model;
pub mod projector;
pub mod session;
pub mod snooze;
pub mod store;
