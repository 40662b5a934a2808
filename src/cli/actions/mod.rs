pub mod server;

use anyhow::Result;

/// Actions the CLI can dispatch to.
#[derive(Debug)]
pub enum Action {
    Server(server::Args),
}

impl Action {
    /// Execute the action.
    ///
    /// # Errors
    /// Returns an error if the underlying handler fails.
    pub async fn execute(self) -> Result<()> {
        match self {
            Self::Server(args) => server::handle(args).await,
        }
    }
}
