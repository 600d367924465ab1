//! `peerconnect` - CLI for the peerconnect library
//!
//! This binary renders the pages and views on the terminal and persists the
//! profile and connection requests in the local store.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context as _;
use clap::Parser;
use tracing::{debug, info};

use peerconnect::cli::{
    Cli, Command, ConfigCommand, DiscoverCommand, ProfileCommand, ProfileSaveArgs,
};
use peerconnect::connections::connected_students;
use peerconnect::pages::{LoginForm, RegisterForm};
use peerconnect::{
    display, init_logging, Config, ConnectionsView, Dashboard, Directory, DiscoveryView, LoadState,
    Notice, ProfileManager, Route, Storage, Store, Tab,
};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone())?;

    // Commands that never touch the store
    match cli.command {
        Command::Home => {
            println!("{}", display::home_page());
            Ok(ExitCode::SUCCESS)
        }
        Command::Routes => {
            println!("{}", display::navbar());
            Ok(ExitCode::SUCCESS)
        }
        Command::Login { email, password } => Ok(report(&LoginForm::new(email, password).submit())),
        Command::Register {
            name,
            email,
            password,
        } => Ok(report(&RegisterForm::new(name, email, password).submit())),
        Command::Config(config_cmd) => handle_config(&config, config_cmd),
        command => {
            let mut app = App::open(config)?;
            app.run(command).await
        }
    }
}

/// Print a notice and map it to an exit code.
fn report(notice: &Notice) -> ExitCode {
    println!("{}", display::notice(notice));
    if notice.is_error() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Configuration, directory and store for commands that need them.
#[derive(Debug)]
struct App {
    config: Config,
    directory: Directory,
    store: Store,
}

impl App {
    fn open(config: Config) -> anyhow::Result<Self> {
        let directory = match &config.directory.path {
            Some(path) => Directory::from_json_file(path)
                .with_context(|| format!("failed to load directory {}", path.display()))?,
            None => Directory::canonical(),
        };
        debug!("Directory has {} students", directory.len());

        let storage = Storage::open(config.database_path())?;
        let store = Store::load(storage)?;
        Ok(Self {
            config,
            directory,
            store,
        })
    }

    async fn run(&mut self, command: Command) -> anyhow::Result<ExitCode> {
        match command {
            Command::Open { path } => self.open_route(&path).await,
            Command::Profile(ProfileCommand::Show { json }) => self.show_profile(json),
            Command::Profile(ProfileCommand::Save(args)) => self.save_profile(&args),
            Command::Discover(cmd) => self.discover(&cmd).await,
            Command::Departments => {
                for department in self.directory.departments() {
                    println!("{department}");
                }
                Ok(ExitCode::SUCCESS)
            }
            Command::Connect { id } => {
                let mut view = DiscoveryView::new(&self.directory, &mut self.store, Duration::ZERO);
                Ok(report(&view.connect(id)))
            }
            Command::Connections { json } => self.show_connections(json),
            Command::Disconnect { id } => {
                let mut view = ConnectionsView::new(&self.directory, &mut self.store);
                Ok(report(&view.remove(id)))
            }
            Command::Dashboard(cmd) => self.dashboard(cmd.tab.into()).await,
            Command::Status(status_cmd) => self.status(status_cmd.json),
            Command::Reset { yes } => self.reset(yes),
            Command::Home
            | Command::Routes
            | Command::Login { .. }
            | Command::Register { .. }
            | Command::Config(_) => Err(anyhow::anyhow!("command does not use the store")),
        }
    }

    async fn open_route(&mut self, path: &str) -> anyhow::Result<ExitCode> {
        let route: Route = path.parse()?;
        info!(%route, "Opening page");
        println!("{}", display::navbar());
        println!();
        match route {
            Route::Home => println!("{}", display::home_page()),
            Route::Login => println!("{}", display::login_page()),
            Route::Register => println!("{}", display::register_page()),
            Route::Profile => return self.show_profile(false),
            Route::Discover => {
                let cmd = DiscoverCommand {
                    query: String::new(),
                    department: String::new(),
                    json: false,
                };
                return self.discover(&cmd).await;
            }
        }
        Ok(ExitCode::SUCCESS)
    }

    fn show_profile(&mut self, json: bool) -> anyhow::Result<ExitCode> {
        let manager = ProfileManager::new(&mut self.store);
        if json {
            let value = serde_json::json!({
                "editing": manager.is_editing(),
                "profile": manager.load(),
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        } else {
            println!("{}", display::profile(manager.draft(), manager.mode()));
        }
        Ok(ExitCode::SUCCESS)
    }

    fn save_profile(&mut self, args: &ProfileSaveArgs) -> anyhow::Result<ExitCode> {
        let mut manager = ProfileManager::new(&mut self.store);
        manager.edit();
        let picture = std::mem::take(&mut manager.draft_mut().profile_pic);
        *manager.draft_mut() = args.to_profile();
        manager.draft_mut().profile_pic = picture;
        if let Some(path) = &args.picture {
            manager.upload_picture(path)?;
        }

        let notice = manager.submit();
        let code = report(&notice);
        if !notice.is_error() {
            println!();
            println!("{}", display::profile(manager.load(), manager.mode()));
        }
        Ok(code)
    }

    async fn discover(&mut self, cmd: &DiscoverCommand) -> anyhow::Result<ExitCode> {
        let mut view = DiscoveryView::new(
            &self.directory,
            &mut self.store,
            self.config.loading_delay(),
        );
        view.set_search(cmd.query.as_str());
        view.set_department(cmd.department.as_str());

        if view.state() == LoadState::Loading {
            if !cmd.json {
                eprintln!("Loading students...");
            }
            view.wait_until_ready().await;
        }

        let cards = view.results();
        if cmd.json {
            println!("{}", serde_json::to_string_pretty(&cards)?);
        } else {
            println!("{}", display::discovery_list(&cards));
        }
        Ok(ExitCode::SUCCESS)
    }

    fn show_connections(&mut self, json: bool) -> anyhow::Result<ExitCode> {
        let view = ConnectionsView::new(&self.directory, &mut self.store);
        let connections = view.connections();
        if json {
            println!("{}", serde_json::to_string_pretty(&connections)?);
        } else {
            println!("{}", display::connections_list(&connections));
        }
        Ok(ExitCode::SUCCESS)
    }

    async fn dashboard(&mut self, tab: Tab) -> anyhow::Result<ExitCode> {
        let mut dashboard = Dashboard::new(
            &self.directory,
            &mut self.store,
            self.config.loading_delay(),
        );
        dashboard.select(tab);
        let stats = dashboard.stats();

        let panel = match dashboard.tab() {
            Tab::Profile => {
                let manager = dashboard.profile_view();
                display::profile(manager.draft(), manager.mode())
            }
            Tab::Browse => {
                let mut view = dashboard.discovery_view();
                view.wait_until_ready().await;
                let cards = view.results();
                display::discovery_list(&cards)
            }
            Tab::Connections => {
                let view = dashboard.connections_view();
                let connections = view.connections();
                display::connections_list(&connections)
            }
        };

        println!("{}", display::dashboard(&stats, tab, &panel));
        Ok(ExitCode::SUCCESS)
    }

    fn status(&self, json: bool) -> anyhow::Result<ExitCode> {
        let stats = self.store.storage().stats()?;
        let profile = self.store.profile();
        let connections = connected_students(&self.directory, &self.store).len();
        let database_path = self.store.storage().path();

        if json {
            let status = serde_json::json!({
                "database_path": database_path,
                "total_keys": stats.total_keys,
                "last_write": stats.last_write.map(|t| t.to_rfc3339()),
                "db_size_bytes": stats.db_size_bytes,
                "profile_saved": !profile.is_blank(),
                "connections": connections,
                "directory_size": self.directory.len(),
            });
            println!("{}", serde_json::to_string_pretty(&status)?);
        } else {
            let last_write = stats
                .last_write
                .map_or_else(|| "never".to_string(), |t| t.to_rfc3339());
            let name = if profile.is_blank() {
                "(not set)"
            } else {
                profile.name.as_str()
            };
            println!("peerconnect status");
            println!("------------------");
            println!("Database:      {}", database_path.display());
            println!("Stored keys:   {}", stats.total_keys);
            println!("Last write:    {last_write}");
            println!("Size:          {} bytes", stats.db_size_bytes);
            println!("Profile:       {name}");
            println!("Connections:   {connections}");
            println!("Directory:     {} students", self.directory.len());
        }
        Ok(ExitCode::SUCCESS)
    }

    fn reset(&mut self, yes: bool) -> anyhow::Result<ExitCode> {
        if !yes {
            println!("This will erase your profile and all connections.");
            println!("Use --yes to confirm.");
            return Ok(ExitCode::SUCCESS);
        }
        let removed = self.store.clear()?;
        println!("Removed {removed} stored keys.");
        Ok(ExitCode::SUCCESS)
    }
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<ExitCode> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                let directory = config
                    .directory
                    .path
                    .as_ref()
                    .map_or_else(|| "(built-in)".to_string(), |p| p.display().to_string());
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:      {}", config.database_path().display());
                println!();
                println!("[Discovery]");
                println!("  Loading delay (ms): {}", config.discovery.loading_delay_ms);
                println!();
                println!("[Directory]");
                println!("  Path:               {directory}");
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => {
                    println!("Configuration error: {e}");
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}
