use std::{
    fs::{self, OpenOptions},
    path::PathBuf,
    sync::{Arc, Mutex},
};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use lms_api::{CourseFilter, CourseSort, MockApi, QuizFilter, RegistrationForm, SessionError, SessionManager, UserFilter};
use lms_tui::{
    locale::Locale,
    nav::{MenuRow, MenuViewModel, compute_breadcrumb, menu_for},
};
use lms_types::Role;
use lms_util::{JsonSessionStore, LmsConfig, UserPreferences, resolve_config_path};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

const LOG_PATH_ENV: &str = "LMS_LOG_PATH";

#[derive(Debug, Parser)]
#[command(name = "lms", version, about = "Learning management system shell")]
struct Cli {
    /// Config file; defaults to $LMS_CONFIG_PATH or <config_dir>/lms/config.json.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Sign in and persist the session.
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
        #[arg(long, default_value = "student")]
        role: Role,
    },
    /// Create an account and sign in.
    Register(RegisterArgs),
    /// Clear the persisted session.
    Logout,
    /// Show the signed-in user.
    Whoami,
    /// Print the sidebar menu for a role (the signed-in role by default).
    Menu {
        #[arg(long)]
        role: Option<Role>,
        #[arg(long)]
        json: bool,
    },
    /// Print the breadcrumb trail for a page.
    Breadcrumb {
        #[arg(long)]
        role: Role,
        #[arg(long)]
        page: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Query the mock gateway and print the response envelope.
    #[command(subcommand)]
    Api(ApiCommand),
}

#[derive(Debug, Args)]
struct RegisterArgs {
    #[arg(long)]
    username: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    password: String,
    /// Defaults to --password.
    #[arg(long)]
    confirm_password: Option<String>,
    #[arg(long)]
    role: Role,
}

#[derive(Debug, Args)]
struct PageArgs {
    #[arg(long)]
    page: Option<usize>,
    #[arg(long)]
    limit: Option<usize>,
}

#[derive(Debug, Subcommand)]
enum ApiCommand {
    Users {
        #[arg(long)]
        role: Option<Role>,
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        active: Option<bool>,
        #[command(flatten)]
        paging: PageArgs,
    },
    Courses {
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        teacher: Option<String>,
        /// title, created or students
        #[arg(long)]
        sort: Option<CourseSort>,
        #[command(flatten)]
        paging: PageArgs,
    },
    Quizzes {
        #[arg(long)]
        course: Option<String>,
        #[arg(long)]
        status: Option<String>,
        #[command(flatten)]
        paging: PageArgs,
    },
    /// Progress for --user, or for the signed-in user.
    Progress {
        #[arg(long)]
        user: Option<String>,
        #[arg(long)]
        course: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => LmsConfig::load_from(path),
        None => LmsConfig::load(),
    }
    .context("failed to load config")?;

    // No subcommand => TUI
    let Some(command) = cli.command else {
        init_tracing(&config, true);
        return lms_tui::run(config).await;
    };
    init_tracing(&config, false);
    run_command(config, command).await
}

/// Installs the subscriber. The full-screen shell logs to a file so output
/// does not tear the terminal; one-shot commands log to stderr.
fn init_tracing(config: &LmsConfig, to_file: bool) {
    let default_level = if config.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    if to_file {
        let path = resolve_config_path(LOG_PATH_ENV, "lms.log");
        if let Some(parent) = path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        match OpenOptions::new().create(true).append(true).open(&path) {
            Ok(file) => {
                let _ = tracing_subscriber::fmt()
                    .with_env_filter(filter)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file))
                    .try_init();
            }
            Err(error) => eprintln!("cannot open log file {}: {error}; logging disabled", path.display()),
        }
        return;
    }
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

async fn run_command(config: LmsConfig, command: Command) -> Result<()> {
    let preferences = Arc::new(UserPreferences::new().unwrap_or_else(|error| {
        tracing::warn!(error = %error, "preferences unavailable; using in-memory store");
        UserPreferences::ephemeral()
    }));
    let mut locale = Locale::new(preferences, config.data_dir.as_deref());
    locale.init().await;

    let store = JsonSessionStore::new(None::<PathBuf>).context("failed to open session store")?;
    let session = SessionManager::new(MockApi::from_config(&config), Arc::new(store));
    session.load_session();

    match command {
        Command::Login { username, password, role } => {
            let success = session
                .login(&username, &password, role)
                .await
                .map_err(|error| session_failure(&locale, error))?;
            println!(
                "{}",
                locale.translate_with("auth.loginSuccess", &[("name", success.user.display_name())])
            );
        }
        Command::Register(args) => {
            let form = RegistrationForm {
                confirm_password: args.confirm_password.unwrap_or_else(|| args.password.clone()),
                username: args.username,
                email: args.email,
                password: args.password,
                role: Some(args.role),
            };
            let success = session
                .register(&form)
                .await
                .map_err(|error| session_failure(&locale, error))?;
            println!(
                "{}",
                locale.translate_with("auth.loginSuccess", &[("name", success.user.display_name())])
            );
        }
        Command::Logout => {
            session.logout().context("failed to clear session")?;
            println!("{}", locale.translate("auth.logoutSuccess"));
        }
        Command::Whoami => match session.current_user() {
            Some(user) => {
                let role = locale.translate(&format!("roles.{}", user.role)).into_owned();
                println!(
                    "{}",
                    locale.translate_with("auth.signedInAs", &[("name", user.display_name()), ("role", &role)])
                );
            }
            None => println!("{}", locale.translate("auth.notSignedIn")),
        },
        Command::Menu { role, json } => {
            let role = role.or_else(|| session.current_role());
            let model = MenuViewModel::from_definition(menu_for(role), None);
            if json {
                print_json(&model)?;
            } else {
                for row in model.rows() {
                    match row {
                        MenuRow::Section { title_key } => println!("{}", locale.translate(title_key).to_uppercase()),
                        MenuRow::Item { item, .. } => {
                            println!("  {:<20} {}  ({})", item.id, locale.translate(item.label_key), item.target)
                        }
                    }
                }
            }
        }
        Command::Breadcrumb { role, page, json } => {
            let breadcrumb = compute_breadcrumb(menu_for(Some(role)), page.as_deref());
            if json {
                print_json(&breadcrumb)?;
            } else {
                let labels: Vec<String> = breadcrumb
                    .crumbs()
                    .iter()
                    .map(|crumb| locale.translate(crumb.label_key).into_owned())
                    .collect();
                println!("{}", labels.join(" › "));
            }
        }
        Command::Api(command) => run_api(&session, command).await?,
    }
    Ok(())
}

async fn run_api(session: &SessionManager, command: ApiCommand) -> Result<()> {
    let api = session.api();
    match command {
        ApiCommand::Users {
            role,
            search,
            active,
            paging,
        } => {
            let filter = UserFilter {
                role,
                search,
                is_active: active,
                page: paging.page,
                limit: paging.limit,
            };
            print_json(&api.get_users(&filter).await)
        }
        ApiCommand::Courses {
            category,
            search,
            status,
            teacher,
            sort,
            paging,
        } => {
            let filter = CourseFilter {
                category,
                search,
                status,
                teacher_id: teacher,
                sort_by: sort,
                page: paging.page,
                limit: paging.limit,
            };
            print_json(&api.get_courses(&filter).await)
        }
        ApiCommand::Quizzes { course, status, paging } => {
            let filter = QuizFilter {
                course_id: course,
                status,
                page: paging.page,
                limit: paging.limit,
            };
            print_json(&api.get_quizzes(&filter).await)
        }
        ApiCommand::Progress { user, course } => {
            let Some(user_id) = user.or_else(|| session.current_user().map(|user| user.id)) else {
                bail!("no --user given and no one is signed in");
            };
            print_json(&api.get_user_progress(&user_id, course.as_deref()).await)
        }
    }
}

fn session_failure(locale: &Locale, error: SessionError) -> anyhow::Error {
    match error {
        SessionError::Invalid(key) => anyhow::anyhow!("{}", locale.translate(key)),
        SessionError::Rejected(reason) => {
            anyhow::anyhow!("{}", locale.translate_with("auth.loginFailed", &[("reason", &reason)]))
        }
        other => anyhow::Error::new(other),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
