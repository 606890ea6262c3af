pub mod assignment;
pub mod catalog;
pub mod distribution;
pub mod error;

pub use assignment::{assign_deal, assign_roles};
pub use catalog::{night_action_for, role_for};
pub use distribution::{DistributionTable, RoleDistribution};
pub use error::{RosterError, RosterErrorKind};
