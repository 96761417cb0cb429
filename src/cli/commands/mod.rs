mod grant_credits;
mod init;

pub use grant_credits::cmd_grant_credits;
pub use init::cmd_init;
