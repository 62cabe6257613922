pub mod policy;
pub mod tracker;

pub use policy::LockoutPolicy;
pub use tracker::normalize_identity;
pub use tracker::AttemptGuard;
pub use tracker::IdentityLocked;
pub use tracker::LockoutEntry;
pub use tracker::LockoutTracker;
