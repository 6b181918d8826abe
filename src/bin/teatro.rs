use std::path::PathBuf;

use anyhow::{anyhow, Context};
use clap::{Args, Parser, Subcommand};
use teatro_manager::auth::AuthMode;
use teatro_manager::config::ClientOptions;
use teatro_manager::obras::{Obra, ObraDraft};
use teatro_manager::ui::{Feedback, ObrasScreen, Route, CREATED_MESSAGE, UPDATED_MESSAGE};
use teatro_manager::TeatroManager;

#[derive(Parser, Debug)]
#[clap(name = "teatro", version)]
#[clap(about = "Manage theater productions from the command line", long_about = None)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,

    /// API base URL. Falls back to TEATRO_API_URL, then the local default.
    #[clap(long)]
    api_url: Option<String>,

    /// File holding the session token. Falls back to TEATRO_STORAGE_PATH.
    #[clap(long)]
    storage: Option<PathBuf>,

    /// Output debug logs to stderr
    #[clap(long)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Sign in and store the session token
    Login {
        #[clap(long, short)]
        username: String,
        #[clap(long, short)]
        password: String,
    },
    /// Create an account and store the session token
    Register {
        #[clap(long, short)]
        username: String,
        #[clap(long, short)]
        password: String,
        /// Password confirmation
        #[clap(long)]
        confirm: String,
    },
    /// Forget the stored token
    Logout,
    /// List productions
    List {
        /// Only show productions whose name or director contains this text
        #[clap(long, short)]
        search: Option<String>,
    },
    /// Show one production
    Show { id: i64 },
    /// Create a production
    Create(ObraFields),
    /// Update a production; omitted fields keep their value
    Update {
        id: i64,
        #[clap(flatten)]
        fields: ObraFields,
    },
    /// Delete a production
    Delete { id: i64 },
}

#[derive(Args, Debug)]
struct ObraFields {
    #[clap(long)]
    name: Option<String>,
    #[clap(long)]
    director: Option<String>,
    /// YYYY-MM-DD or DD/MM/YYYY
    #[clap(long)]
    date: Option<String>,
    #[clap(long)]
    venue: Option<String>,
    #[clap(long)]
    cast: Option<String>,
    #[clap(long)]
    description: Option<String>,
    /// 1 to 10
    #[clap(long)]
    rating: Option<String>,
}

impl ObraFields {
    fn apply(self, draft: &mut ObraDraft) {
        let ObraFields {
            name,
            director,
            date,
            venue,
            cast,
            description,
            rating,
        } = self;
        for (slot, value) in [
            (&mut draft.name, name),
            (&mut draft.director, director),
            (&mut draft.date, date),
            (&mut draft.venue, venue),
            (&mut draft.cast, cast),
            (&mut draft.description, description),
            (&mut draft.rating, rating),
        ] {
            if let Some(value) = value {
                *slot = value;
            }
        }
    }
}

fn default_storage_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|dir| dir.join("teatro-manager").join("storage.json"))
}

fn print_obra(obra: &Obra) {
    let id = obra.id.map(|id| id.to_string()).unwrap_or_else(|| "-".to_string());
    println!(
        "[{}] {} | {} | {} | nota {}",
        id, obra.name, obra.director, obra.date, obra.rating
    );
}

fn print_details(obra: &Obra) {
    print_obra(obra);
    println!("  local:     {}", obra.venue);
    println!("  elenco:    {}", obra.cast);
    if let Some(description) = &obra.description {
        println!("  descrição: {}", description);
    }
}

/// Print the banner; errors become the command's failure
fn report(feedback: Option<Feedback>) -> anyhow::Result<()> {
    match feedback {
        Some(feedback) if feedback.is_error() => Err(anyhow!(feedback.message)),
        Some(feedback) => {
            println!("{}", feedback);
            Ok(())
        }
        None => Ok(()),
    }
}

/// Load the list, failing when the session is gone
async fn load(screen: &mut ObrasScreen) -> anyhow::Result<()> {
    screen.on_focus().await;
    if screen.route() == Route::Auth {
        report(screen.take_feedback())?;
        return Err(anyhow!("not signed in, run `teatro login` first"));
    }
    report(screen.take_feedback())
}

/// Report a save by its own outcome; a failed list reload afterwards is only
/// a warning
async fn save(screen: &mut ObrasScreen, success: &str) -> anyhow::Result<()> {
    match screen.save().await {
        Ok(_) => {
            if let Some(feedback) = screen.take_feedback().filter(Feedback::is_error) {
                log::warn!("saved, but reloading the list failed: {}", feedback.message);
            }
            println!("{}", success);
            Ok(())
        }
        Err(e) => match screen.take_feedback() {
            Some(feedback) => Err(anyhow!(feedback.message)),
            None => Err(e.into()),
        },
    }
}

fn find(screen: &ObrasScreen, id: i64) -> anyhow::Result<Obra> {
    screen
        .find(id)
        .cloned()
        .ok_or_else(|| anyhow!("no production with id {}", id))
}

async fn run() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let mut logger = pretty_env_logger::formatted_builder();
    if let Ok(filter) = std::env::var("RUST_LOG") {
        logger.parse_filters(&filter);
    } else if cli.debug {
        logger.filter_level(log::LevelFilter::Debug);
    } else {
        logger.filter_level(log::LevelFilter::Warn);
    }
    logger.init();

    let mut options = ClientOptions::from_env()?;
    if let Some(url) = &cli.api_url {
        options = options.with_api_url(url);
    }
    if let Some(path) = cli.storage.clone() {
        options = options.with_storage_path(Some(path));
    } else if options.storage_path.is_none() {
        options = options.with_storage_path(default_storage_path());
    }
    let options = options.without_delays();

    let teatro = TeatroManager::new_with_options(options).context("failed to build client")?;

    match cli.command {
        Commands::Login { username, password } => {
            let mut screen = teatro.auth_screen();
            screen.set_mode(AuthMode::Login);
            screen.username = username;
            screen.password = password;
            screen.submit().await;
            report(screen.take_feedback())?;
        }
        Commands::Register {
            username,
            password,
            confirm,
        } => {
            let mut screen = teatro.auth_screen();
            screen.set_mode(AuthMode::Register);
            screen.username = username;
            screen.password = password;
            screen.password_confirm = confirm;
            screen.submit().await;
            report(screen.take_feedback())?;
        }
        Commands::Logout => {
            let mut screen = teatro.obras_screen();
            screen.logout();
            println!("Sessão encerrada.");
        }
        Commands::List { search } => {
            let mut screen = teatro.obras_screen();
            load(&mut screen).await?;
            if let Some(term) = search {
                screen.set_search(&term);
            }
            let obras = screen.filtered();
            if obras.is_empty() {
                println!("Nenhuma obra encontrada.");
            }
            for obra in obras {
                print_obra(obra);
            }
        }
        Commands::Show { id } => {
            let mut screen = teatro.obras_screen();
            load(&mut screen).await?;
            print_details(&find(&screen, id)?);
        }
        Commands::Create(fields) => {
            let mut screen = teatro.obras_screen();
            if !teatro.session().has_valid_token() {
                return Err(anyhow!("not signed in, run `teatro login` first"));
            }
            screen.new_draft();
            fields.apply(screen.draft_mut());
            save(&mut screen, CREATED_MESSAGE).await?;
        }
        Commands::Update { id, fields } => {
            let mut screen = teatro.obras_screen();
            load(&mut screen).await?;
            let obra = find(&screen, id)?;
            screen.start_edit(&obra);
            fields.apply(screen.draft_mut());
            save(&mut screen, UPDATED_MESSAGE).await?;
        }
        Commands::Delete { id } => {
            let mut screen = teatro.obras_screen();
            load(&mut screen).await?;
            let obra = find(&screen, id)?;
            screen.delete(&obra).await;
            report(screen.take_feedback())?;
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
