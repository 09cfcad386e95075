pub mod clock;
pub mod local;
pub mod system_clock;
