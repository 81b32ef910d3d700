pub mod event;
pub mod log;

pub use event::Event;
pub use log::EventLog;
