// Adapters layer: concrete implementations for external systems (http, notification, timer).

pub mod http;
pub mod notify;
pub mod timer;
