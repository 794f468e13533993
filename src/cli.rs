// command line interface

use crate::config::{self, Config};
use crate::core::{AskOptions, DEFAULT_SESSION, Db, OpenAi, Store, ask};
use crate::output::Output;
use crate::progress::Spinner;
use clap::{Args, Parser, Subcommand};
use miette::Result;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gab", about = "Ask an LLM questions from the terminal")]
struct Cli {
    /// session database url
    #[arg(long, env = "GAB_DATABASE_URL", global = true)]
    db: Option<String>,

    /// conversation session to use
    #[arg(long, short, default_value = DEFAULT_SESSION, global = true)]
    session: String,

    /// more logging (-v info, -vv debug, -vvv trace)
    #[arg(long, short, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// ask a question in the current session
    Ask(AskArgs),

    /// show the current session's messages
    History,

    /// manage sessions
    #[command(subcommand)]
    Session(SessionCommand),
}

#[derive(Args)]
struct AskArgs {
    /// the question (read from stdin when omitted)
    words: Vec<String>,

    /// read the question from a file
    #[arg(long, conflicts_with = "words")]
    file: Option<PathBuf>,

    /// don't save this question or its answer
    #[arg(long, short)]
    forget: bool,

    /// model to ask
    #[arg(long, short, env = "GAB_MODEL")]
    model: Option<String>,

    /// api key (defaults to OPENAI_KEY or OPENAI_API_KEY)
    #[arg(long, short = 'k')]
    api_key: Option<String>,

    /// base url of an openai-compatible api
    #[arg(long, env = "GAB_BASE_URL")]
    base_url: Option<String>,
}

#[derive(Subcommand)]
enum SessionCommand {
    /// create a session
    New {
        name: String,

        /// system hint sent before every question
        #[arg(long, default_value = "")]
        hint: String,
    },

    /// list sessions
    List,

    /// replace a session's hint
    Hint { name: String, hint: String },

    /// delete a session's messages, keeping the session
    Clear { name: String },

    /// delete a session and its messages
    Delete { name: String },
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    crate::logging::init(cli.verbose);

    let url = cli.db.unwrap_or_else(config::default_database_url);
    let db = Db::connect(&url).await?;
    let out = Output::new();

    match cli.command {
        Commands::Ask(args) => {
            // bail before touching the network if there's nothing to ask
            let question = crate::input::read(&args.words, args.file.as_deref())?;

            let config = Config::default()
                .with_api_key(args.api_key)
                .with_model(args.model)
                .with_base_url(args.base_url);
            let client = OpenAi::new(&config)?;

            let session = db.session(&cli.session).await?;
            let opts = AskOptions {
                model: &config.model,
                ephemeral: args.forget,
            };

            let answer = ask(&db, &client, &Spinner::new(), &session, &question, opts).await?;
            out.message(&answer);
        }

        Commands::History => {
            let session = db.session(&cli.session).await?;
            out.history(&session);
        }

        Commands::Session(cmd) => match cmd {
            SessionCommand::New { name, hint } => {
                db.create_session(&name, &hint).await?;
                println!("created session {name}");
            }
            SessionCommand::List => {
                let sessions = db.list_sessions().await?;
                out.sessions(&sessions, &cli.session);
            }
            SessionCommand::Hint { name, hint } => {
                db.set_hint(&name, &hint).await?;
                println!("updated hint for {name}");
            }
            SessionCommand::Clear { name } => {
                let removed = db.clear_session(&name).await?;
                println!("removed {removed} messages from {name}");
            }
            SessionCommand::Delete { name } => {
                db.delete_session(&name).await?;
                println!("deleted session {name}");
            }
        },
    }

    Ok(())
}
