use clap::{Parser, Subcommand};

/// Maintenance tasks for clinic administrator accounts.
#[derive(Debug, Parser)]
#[clap(name = "clinic-admin", version)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: AdminCommand,
}

#[derive(Debug, Subcommand, PartialEq)]
pub enum AdminCommand {
    /// Create an admin account; an existing username is left untouched.
    Create {
        #[clap(long, short = 'u')]
        username: String,
        #[clap(long, short = 'p')]
        password: String,
    },
    /// Delete an admin account, keeping at least one admin.
    Delete {
        #[clap(long, short = 'u')]
        username: String,
    },
}
