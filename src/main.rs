use clap::Parser;
use dazl_rust::{cli, commands, config, error, logging};
use cli::{Cli, Commands, OpportunityCommand, PhdCommand, ProfileCommand, ProjectCommand, ReportCommand, SignupCommand};
use commands::profile::ProfileChanges;
use commands::Context;
use config::Config;
use dazl_common::payload::SubmitAction;
use error::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    let config = Config::load()?;

    let command = match cli.command {
        Commands::Config { set_base_url, show } => {
            let mut config = config;

            if let Some(url) = set_base_url {
                config.set_base_url(url)?;
                println!("✔ APIのURLを設定しました");
            }

            if show {
                println!("設定:");
                println!("  API: {}", config.base_url);
                println!("  タイムアウト: {}秒", config.timeout_seconds);
                println!("  セッション: {}", config.session_path()?.display());
            }
            return Ok(());
        }
        other => other,
    };

    let mut ctx = Context::load(config)?;
    if let Err(err) = run(&mut ctx, command).await {
        commands::print_notice(&commands::failure_notice(&err));
        std::process::exit(1);
    }
    Ok(())
}

async fn run(ctx: &mut Context, command: Commands) -> Result<()> {
    match command {
        Commands::Signup { account } => match account {
            SignupCommand::Agent(args) => commands::account::signup_agent(ctx, args).await,
            SignupCommand::Customer(args) => commands::account::signup_customer(ctx, args).await,
        },

        Commands::Login { email, password } => commands::account::login(ctx, email, password).await,

        Commands::Logout => commands::account::logout(ctx),

        Commands::Phd { step } => match step {
            PhdCommand::Start { first_name, last_name, email, location } => {
                println!("🏠 dazl - PHD作成 [1/2] 売主情報\n");
                commands::phd::start(ctx, first_name, last_name, email, location).await
            }
            PhdCommand::Price { low, high, value } => {
                println!("🏠 dazl - PHD作成 [2/2] 価格レンジ\n");
                commands::phd::price(ctx, low, high, value)
            }
            PhdCommand::Rooms => commands::phd::rooms(ctx).await,
        },

        Commands::Project { action } => match action {
            ProjectCommand::Features { room } => commands::project::features(ctx, &room).await,
            ProjectCommand::AddRoom(args) => {
                commands::project::capture_room(ctx, args, SubmitAction::AddAnother).await
            }
            ProjectCommand::Submit(args) => {
                commands::project::capture_room(ctx, args, SubmitAction::Submit).await
            }
        },

        Commands::Contact(args) => commands::contact::send(ctx, args).await,

        Commands::Profile { action } => match action {
            ProfileCommand::Show => commands::profile::show(ctx).await,
            ProfileCommand::Update {
                first_name,
                last_name,
                email,
                company_name,
                city,
                state,
                zip_code,
                number,
            } => {
                let changes = ProfileChanges {
                    first_name,
                    last_name,
                    email,
                    company_name,
                    city,
                    state,
                    zip_code,
                    number,
                };
                commands::profile::update(ctx, changes).await
            }
        },

        Commands::Report { action } => match action {
            ReportCommand::View { id } => commands::report::view(ctx, &id).await,
            ReportCommand::Bid { id, room, status } => commands::report::bid(ctx, &id, &room, status).await,
            ReportCommand::Mail { id, email } => commands::report::mail(ctx, &id, &email).await,
        },

        Commands::Opportunity { action } => match action {
            OpportunityCommand::View { id } => commands::report::view_opportunity(ctx, &id).await,
            OpportunityCommand::Respond { id, interested, decline, message, yes } => {
                let choice = match (interested, decline) {
                    (true, _) => Some(true),
                    (_, true) => Some(false),
                    _ => None,
                };
                commands::report::respond(ctx, &id, choice, message, yes).await
            }
            OpportunityCommand::Delete { id, yes } => {
                commands::report::delete_opportunity(ctx, &id, yes).await
            }
        },

        Commands::Config { .. } => Ok(()),
    }
}
