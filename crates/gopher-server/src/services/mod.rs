//! Use-case services, one repository operation each

pub mod adding;
pub mod fetching;
pub mod modifying;
pub mod removing;

pub use adding::AddingService;
pub use fetching::FetchingService;
pub use modifying::ModifyingService;
pub use removing::RemovingService;
