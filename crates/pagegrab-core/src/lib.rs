pub mod config;
pub mod logging;

pub mod classify;
pub mod downloads;
pub mod fetch;
pub mod manifest;
pub mod resource;
pub mod scanner;
pub mod session;
pub mod storage;
pub mod url_model;
pub mod view;

pub use resource::{Resource, ResourceKind};
pub use session::{Event, Filters, Notice, Outcome, Session};
