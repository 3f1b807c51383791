pub mod sign_up;
pub mod update_profile;

pub use sign_up::*;
pub use update_profile::*;
