use clap::Args;
use storefront_app::{
    auth::PgAuthService,
    domain::users::{
        PgUsersService, UsersService,
        data::NewUser,
        records::{UserRole, UserUuid},
    },
};
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct CreateUserArgs {
    /// User display name
    #[arg(long)]
    name: String,

    /// `customer` or `staff`
    #[arg(long, default_value = "customer")]
    role: UserRole,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Optional user UUID; generated when omitted
    #[arg(long)]
    user_uuid: Option<Uuid>,

    /// Also issue an API token for the new user
    #[arg(long)]
    with_token: bool,
}

pub(crate) async fn run(args: CreateUserArgs) -> Result<(), String> {
    let pool = crate::cli::connect(&args.database_url).await?;

    let uuid = args.user_uuid.map_or_else(UserUuid::new, UserUuid::from_uuid);

    let user = PgUsersService::new(pool.clone())
        .create_user(NewUser {
            uuid,
            name: args.name,
            role: args.role,
        })
        .await
        .map_err(|error| format!("failed to create user: {error}"))?;

    println!("user_uuid: {}", user.uuid);
    println!("user_name: {}", user.name);
    println!("user_role: {}", user.role);

    if args.with_token {
        let issued = PgAuthService::new(pool)
            .issue_api_token(user.uuid)
            .await
            .map_err(|error| format!("failed to create token: {error}"))?;

        println!("token_uuid: {}", issued.record.uuid);
        println!("api_token: {}", issued.token);
        println!("store this token now; it is only shown once");
    }

    Ok(())
}
