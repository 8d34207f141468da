pub mod dispatch;
pub mod intro;
pub mod providers;
pub mod reviews;
pub mod suggestion;
