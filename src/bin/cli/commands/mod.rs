pub mod due;
pub mod fail;
pub mod list;
pub mod master;
pub mod remove;
pub mod stats;
pub mod watch;
