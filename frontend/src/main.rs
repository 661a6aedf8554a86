use std::process::ExitCode;

use clap::Parser;
use dishpoll_shared::{
    parse_rank, Catalog, Error, ErrorCode, Leaderboard, Notification, NotificationSink, Result, Session, User,
    VoteStore,
};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

mod catalog;
mod config;
mod notify;
mod render;
mod storage;

use crate::{
    config::{Cli, Command, Config},
    notify::ConsoleSink,
    storage::FileStorage,
};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

struct App {
    config: Config,
    storage: FileStorage,
    session: Session<FileStorage>,
}

impl App {
    fn open(config: Config) -> Result<Self> {
        let storage = FileStorage::open(&config.data_dir)?;
        let session = Session::load(storage.clone(), Box::new(ConsoleSink))?;
        debug!("Using data directory {}", config.data_dir.display());
        Ok(Self { config, storage, session })
    }

    fn votes(&self) -> Result<VoteStore<FileStorage>> {
        VoteStore::load(self.storage.clone(), Box::new(ConsoleSink))
    }

    fn user(&self) -> Result<User> {
        self.session.require_user()
            .cloned()
            .map_err(|e| Error::new(e.code, "Not logged in. Run `dishpoll login <USERNAME> --password <PASSWORD>` first"))
    }

    async fn catalog(&self) -> Result<Catalog> {
        catalog::fetch_dishes(&self.config.catalog_source(), &ConsoleSink).await
    }

    async fn run(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Login(args) => {
                let directory = self.config.directory()?;
                self.session.login(&directory, &args.username, &args.password)?;
            }
            Command::Logout => self.session.logout()?,
            Command::Whoami => match self.session.current_user() {
                Some(user) => println!("{} (id {})", user.username, user.id),
                None => ConsoleSink.notify(Notification::info("Not logged in")),
            },
            Command::Dishes => {
                let user = self.user()?;
                let catalog = self.catalog().await?;
                let votes = self.votes()?;
                print!("{}", render::render_dishes(&catalog, &votes.vote_map(user.id)));
            }
            Command::Vote(args) => {
                let user = self.user()?;
                let rank = parse_rank(&args.rank)?;
                let catalog = self.catalog().await?;
                let dish = catalog.find_str(&args.dish)
                    .ok_or_else(|| Error::new(ErrorCode::NotFound, format!("No dish with id {}", args.dish.trim())))?;

                let mut votes = self.votes()?;
                votes.set_vote(user.id, dish.id, rank)?;
                info!("User {} set dish {} to rank {:?}", user.id, dish.id, rank);
                print!("{}", render::render_dishes(&catalog, &votes.vote_map(user.id)));
            }
            Command::Results(args) => {
                let user = self.user()?;
                let catalog = self.catalog().await?;
                let votes = self.votes()?;
                let board = Leaderboard::build(&catalog, votes.table(), user.id);
                if args.json {
                    let json = serde_json::to_string_pretty(&board)
                        .map_err(|e| Error::with_details(ErrorCode::CorruptData, "Failed to encode results", e.to_string()))?;
                    println!("{json}");
                } else {
                    print!("{}", render::render_results(&board));
                }
            }
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let result = match App::open(cli.config) {
        Ok(mut app) => app.run(cli.command).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("error: {}", e.message);
            if let Some(details) = &e.details {
                eprintln!("  caused by: {details}");
            }
            ExitCode::FAILURE
        }
    }
}
