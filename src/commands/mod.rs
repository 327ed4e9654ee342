//! Administrative commands. Each one runs sequentially against a single
//! authenticated client and prints one line per unit of work.

mod batch_update;
pub mod config;
mod export;
mod manage_team;
mod onboard;
mod reassign;

pub use batch_update::{BatchReport, MemberRow, batch_update_users, read_rows};
pub use config::ConnectionArgs;
pub use export::export_workbook;
pub use manage_team::{build_membership, manage_team};
pub use onboard::{GrantTarget, Onboarding, onboard_member};
pub use reassign::reassign_docs;
