use clap::Args;
use storefront_app::auth::PgAuthService;
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct RevokeTokenArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// One or more token UUIDs, as printed by `token list`
    #[arg(required = true)]
    tokens: Vec<Uuid>,
}

pub(crate) async fn run(args: RevokeTokenArgs) -> Result<(), String> {
    let service = PgAuthService::new(crate::cli::connect(&args.database_url).await?);

    for token in args.tokens {
        let outcome = match service.revoke_api_token(token).await {
            Ok(true) => "revoked",
            Ok(false) => "already inactive",
            Err(error) => return Err(format!("failed to revoke token {token}: {error}")),
        };

        println!("{token}: {outcome}");
    }

    Ok(())
}
