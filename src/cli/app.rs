//! Main CLI application

use crate::config::{parse_config_auto, parse_config_file, Config, DEFAULT_TIMEOUT_SECS};
use crate::error::Result;
use crate::runner::{execute, generate, list_tasks, Context, Verbosity};
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;
use std::time::Duration;

/// CLI application
pub struct App {
    /// The clap command
    command: Command,
    /// Parsed configuration
    config: Config,
}

impl App {
    /// Create a new app with automatic config discovery
    pub fn new() -> Result<Self> {
        let (config, _config_path) = parse_config_auto()?;
        Ok(App {
            command: build_command(),
            config,
        })
    }

    /// Create app with a specific config file
    pub fn with_config_file(path: PathBuf) -> Result<Self> {
        let config = parse_config_file(&path)?;
        Ok(App {
            command: build_command(),
            config,
        })
    }

    /// Run the application with command line arguments
    pub fn run(mut self) -> Result<()> {
        let matches = self.command.clone().get_matches();
        let verbosity = get_verbosity(&matches);

        let (subcommand, sub_matches) = match matches.subcommand() {
            Some((name, sub_matches)) => (name.to_string(), sub_matches),
            None => {
                // No subcommand specified, show help
                self.command.print_help()?;
                println!();
                return Ok(());
            }
        };

        let ctx = Context::new(self.config)
            .with_verbosity(verbosity)
            .with_log_for(&subcommand);

        let result = match subcommand.as_str() {
            "task" => run_generate(sub_matches, &ctx),
            "task-exec" => run_execute(sub_matches, &ctx),
            "list" => run_list(&ctx),
            _ => unreachable!("unknown subcommand: {}", subcommand),
        };

        // Every phase failure is logged with its context before it surfaces
        // as the process exit status.
        if let Err(e) = &result {
            ctx.error(&e.to_string());
        }
        result
    }
}

/// Build the clap command
fn build_command() -> Command {
    Command::new("pagetask")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Scaffold per-URL page tasks and run them against cached HTML")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Path to pagetask.yml config file")
                .global(true),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Only print progress markers and errors")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("silent")
                .short('s')
                .long("silent")
                .help("Print nothing to the console (log file only)")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Print verbose output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("task")
                .about("Generate a task directory from a URL")
                .arg(
                    Arg::new("url")
                        .value_name("URL")
                        .help("Page URL to scaffold a task for")
                        .required(true),
                )
                .arg(
                    Arg::new("force")
                        .short('f')
                        .long("force")
                        .help("Overwrite existing task files")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("timeout")
                        .short('t')
                        .long("timeout")
                        .value_name("SECONDS")
                        .help("Request timeout in seconds")
                        .value_parser(clap::value_parser!(u64)),
                ),
        )
        .subcommand(
            Command::new("task-exec")
                .about("Run a generated task's execute entry point")
                .arg(
                    Arg::new("task")
                        .value_name("DOTTED_NAME")
                        .help("Dotted task identity, e.g. com.example.news")
                        .required(true),
                ),
        )
        .subcommand(Command::new("list").about("List generated tasks"))
}

fn run_generate(matches: &ArgMatches, ctx: &Context) -> Result<()> {
    let url = matches
        .get_one::<String>("url")
        .expect("url is a required argument");
    let force = matches.get_flag("force");
    let timeout_secs = matches
        .get_one::<u64>("timeout")
        .copied()
        .unwrap_or(if ctx.config.timeout > 0 {
            ctx.config.timeout
        } else {
            DEFAULT_TIMEOUT_SECS
        });

    let dotted = generate(url, force, Duration::from_secs(timeout_secs), ctx)?;
    println!("{}", dotted);
    Ok(())
}

fn run_execute(matches: &ArgMatches, ctx: &Context) -> Result<()> {
    let dotted = matches
        .get_one::<String>("task")
        .expect("task is a required argument");

    let value = execute(dotted, ctx)?;
    print!("{}", value);
    Ok(())
}

fn run_list(ctx: &Context) -> Result<()> {
    for name in list_tasks(ctx)? {
        println!("{}", name);
    }
    Ok(())
}

/// Get verbosity level from matches
fn get_verbosity(matches: &ArgMatches) -> Verbosity {
    if matches.get_flag("silent") {
        Verbosity::Silent
    } else if matches.get_flag("quiet") {
        Verbosity::Quiet
    } else if matches.get_flag("verbose") {
        Verbosity::Verbose
    } else {
        Verbosity::Normal
    }
}

/// Run the CLI application with provided arguments
pub fn run() -> Result<()> {
    // Check if --config flag is provided first
    let args: Vec<String> = std::env::args().collect();
    let config_path = extract_config_arg(&args);

    let app = if let Some(path) = config_path {
        App::with_config_file(path)?
    } else {
        App::new()?
    };

    app.run()
}

/// Extract --config argument before clap parsing
fn extract_config_arg(args: &[String]) -> Option<PathBuf> {
    for i in 0..args.len() {
        if (args[i] == "--config" || args[i] == "-c") && i + 1 < args.len() {
            return Some(PathBuf::from(&args[i + 1]));
        }
    }
    None
}
