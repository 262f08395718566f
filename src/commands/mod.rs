//! Command surface: `/connect`, `/transcribe`, `/stop`, `/disconnect`, `/help`

mod handlers;
mod responses;

pub use handlers::CommandHandler;
pub use responses::{Command, CommandContext, CommandResponse};
