//! `token` subcommands: API bearer tokens for existing users.

use clap::{Args, Subcommand};

mod issue;
mod list;
mod revoke;

#[derive(Debug, Args)]
pub(crate) struct TokenCommand {
    #[command(subcommand)]
    command: TokenSubcommand,
}

#[derive(Debug, Subcommand)]
enum TokenSubcommand {
    /// Issue a new token; the raw value is printed once
    Issue(issue::IssueTokenArgs),

    /// List a user's tokens, revoked ones included
    List(list::ListTokensArgs),

    /// Revoke a token so it no longer authenticates
    Revoke(revoke::RevokeTokenArgs),
}

pub(crate) async fn run(command: TokenCommand) -> Result<(), String> {
    let TokenCommand { command } = command;

    match command {
        TokenSubcommand::Issue(args) => issue::run(args).await,
        TokenSubcommand::List(args) => list::run(args).await,
        TokenSubcommand::Revoke(args) => revoke::run(args).await,
    }
}
