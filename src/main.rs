use anyhow::{anyhow, Result};
use clap::{Arg, ArgMatches, Command};
use colored::*;
use dialoguer::{theme::ColorfulTheme, Confirm, Input};
use indicatif::ProgressBar;
use std::process::ExitCode;
use std::time::Duration;

use fs_sorter::{
    classifier::Classifier,
    config::{self, Config},
    console::{print_error, print_no_files_moved, render_apply_report, render_plan_summary},
    logging::init_logging,
    organizer::{FileOrganizer, RunOutcome},
    providers::OpenAiClassifier,
    utils::{print_tree, resolve_root},
    OrganizerError,
};

fn directory_arg() -> Arg {
    Arg::new("directory")
        .help("Root folder to analyze (e.g. ~/Downloads)")
        .required(true)
        .index(1)
}

fn min_confidence_arg() -> Arg {
    Arg::new("min-confidence")
        .long("min-confidence")
        .help("Minimum LLM confidence required to auto-assign a category")
        .value_parser(clap::value_parser!(f64))
}

fn build_cli() -> Command {
    Command::new("sorter")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Sort files into category folders using extension rules and an LLM")
        .subcommand_required(false)
        .after_help(
            "Exit status: 0 when the plan was shown or applied, 1 on error, \
            2 when the plan was declined, 3 when the directory holds no files.",
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .help("Print diagnostic logging to stderr")
                .action(clap::ArgAction::SetTrue),
        )
        .subcommand(
            Command::new("scan")
                .about("Classify files and show the proposed plan without moving anything")
                .arg(directory_arg())
                .arg(min_confidence_arg()),
        )
        .subcommand(
            Command::new("organize")
                .about("Classify files, show the plan and move them after confirmation")
                .arg(directory_arg())
                .arg(min_confidence_arg())
                .arg(
                    Arg::new("yes")
                        .long("yes")
                        .short('y')
                        .help("Apply the plan without asking for confirmation")
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("show-tree")
                        .long("show-tree")
                        .help("Show current directory tree")
                        .action(clap::ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("config")
                .about("Configuration management")
                .subcommand(Command::new("edit").about("Edit the configuration interactively"))
                .subcommand(Command::new("show").about("Show current configuration"))
                .subcommand(Command::new("reset").about("Delete the saved configuration")),
        )
        .subcommand(Command::new("version").about("Display version information"))
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let matches = build_cli().get_matches();
    init_logging(matches.get_flag("verbose"));

    let result = match matches.subcommand() {
        Some(("scan", sub_matches)) => run_pipeline(sub_matches, false).await,
        Some(("organize", sub_matches)) => run_pipeline(sub_matches, true).await,
        Some(("config", sub_matches)) => run_config_command(sub_matches),
        Some(("version", _)) => {
            print_version();
            Ok(0)
        }
        None => {
            println!("{}", "🤖 AI File Organizer".cyan().bold());
            println!("Use 'sorter --help' for usage information");
            println!("Quick start: sorter scan <directory>");
            Ok(0)
        }
        _ => unreachable!(),
    };

    match result {
        Ok(code) => Ok(ExitCode::from(code)),
        Err(e) => match e.downcast_ref::<OrganizerError>() {
            Some(err) => {
                report_error(err);
                Ok(ExitCode::from(1))
            }
            None => Err(e),
        },
    }
}

fn report_error(err: &OrganizerError) {
    print_error(&err.to_string());

    match err {
        OrganizerError::MissingCredential(var) => {
            eprintln!("\n{}", "💡 Tip: Make sure to set your API key:".yellow());
            eprintln!("  export {}=your_key_here", var);
            print_no_files_moved();
        }
        OrganizerError::ClassifierUnavailable(_) | OrganizerError::ResponseUnparseable(_) => {
            println!("Classification aborted. No files were moved.");
        }
        OrganizerError::Logging { .. } => {
            eprintln!(
                "{}",
                "Files may have been moved, but the move log is incomplete.".yellow()
            );
        }
        _ if err.nothing_moved() => print_no_files_moved(),
        _ => {}
    }
}

async fn run_pipeline(matches: &ArgMatches, apply: bool) -> Result<u8> {
    let directory = matches
        .get_one::<String>("directory")
        .ok_or_else(|| anyhow!("missing directory argument"))?;
    let root = resolve_root(directory)?;

    let mut config = Config::load_or_default()?;
    if let Some(min_confidence) = matches.get_one::<f64>("min-confidence") {
        config.min_confidence = *min_confidence;
    }
    config.validate()?;

    println!("{}", "🤖 AI File Organizer".cyan().bold());
    println!("Target directory: {}\n", root.display().to_string().yellow());

    if apply && matches.get_flag("show-tree") {
        println!("{}", "Current Directory Structure:".green().bold());
        print_tree(&root, "", true);
        println!();
    }

    let remote = OpenAiClassifier::from_config(&config)?;
    let classifier = Classifier::new(remote, config.min_confidence)?;
    let organizer = FileOrganizer::new(classifier, root.clone());

    println!("{}", "Scanning and classifying files...".green());
    let spinner = ProgressBar::new_spinner();
    spinner.set_message("Classifying files (rule-based and LLM)...");
    spinner.enable_steady_tick(Duration::from_millis(100));
    let plan = organizer.plan().await;
    spinner.finish_and_clear();

    let Some(plan) = plan? else {
        println!("No files found under '{}'.", root.display());
        print_no_files_moved();
        return Ok(RunOutcome::NoFiles.exit_code());
    };

    println!();
    print!("{}", render_plan_summary(&plan));
    println!();

    if !apply {
        println!(
            "{}",
            "Scan complete. This was a read-only run. No files were moved.".green()
        );
        return Ok(RunOutcome::Planned.exit_code());
    }

    let confirmed = matches.get_flag("yes")
        || Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt("Apply this plan?")
            .default(false)
            .interact()?;

    if !confirmed {
        println!("{}", "No changes applied.".yellow());
        print_no_files_moved();
        return Ok(RunOutcome::Declined.exit_code());
    }

    println!("\n{}", "Applying organization plan...".green().bold());
    let report = organizer.apply(&plan)?;
    print!("{}", render_apply_report(&report));

    Ok(RunOutcome::Applied(report).exit_code())
}

fn run_config_command(matches: &ArgMatches) -> Result<u8> {
    match matches.subcommand() {
        Some(("edit", _)) => config_edit()?,
        Some(("show", _)) => config_show()?,
        Some(("reset", _)) => config_reset()?,
        None => {
            println!("{}", "Configuration Management".cyan().bold());
            println!("Available commands:");
            println!("  edit  - Edit configuration interactively");
            println!("  show  - Show current configuration");
            println!("  reset - Reset configuration");
            println!("\nUse 'sorter config --help' for more information");
        }
        _ => unreachable!(),
    }

    Ok(0)
}

fn config_edit() -> Result<()> {
    println!("{}", "🔧 Configuration Editor".cyan().bold());
    let current = Config::load_or_default()?;
    let theme = ColorfulTheme::default();

    let config = Config {
        model_name: Input::with_theme(&theme)
            .with_prompt("Model")
            .default(current.model_name)
            .interact_text()?,
        api_base_url: Input::with_theme(&theme)
            .with_prompt("API base URL")
            .default(current.api_base_url)
            .interact_text()?,
        min_confidence: Input::with_theme(&theme)
            .with_prompt("Minimum LLM confidence (0-1)")
            .default(current.min_confidence)
            .validate_with(|value: &f64| config::validate_min_confidence(*value).map_err(|e| e.to_string()))
            .interact_text()?,
        request_timeout_secs: Input::with_theme(&theme)
            .with_prompt("Request timeout (seconds)")
            .default(current.request_timeout_secs)
            .interact_text()?,
    };

    let path = config.save()?;
    println!("Configuration saved to: {}", path.display());
    println!("{}", "✅ Configuration updated successfully!".green().bold());

    Ok(())
}

fn config_show() -> Result<()> {
    println!("{}", "📋 Current Configuration".cyan().bold());

    let config_path = Config::get_config_file_path()?;
    let config = match Config::load()? {
        Some(config) => {
            println!("Config file: {}", config_path.display().to_string().yellow());
            config
        }
        None => {
            println!(
                "{}",
                "No configuration found, showing defaults. Run 'sorter config edit' to create one."
                    .yellow()
            );
            Config::default()
        }
    };

    println!("Model: {}", config.model_name.green());
    println!("API base URL: {}", config.api_base_url.green());
    println!("Minimum confidence: {}", config.min_confidence.to_string().green());
    println!("Request timeout: {}s", config.request_timeout_secs.to_string().green());

    Ok(())
}

fn config_reset() -> Result<()> {
    let config_path = Config::get_config_file_path()?;

    if !config_path.exists() {
        println!("{}", "No configuration file found.".yellow());
        return Ok(());
    }

    let confirmed = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt("Are you sure you want to reset the configuration?")
        .default(false)
        .interact()?;

    if confirmed {
        std::fs::remove_file(&config_path)?;
        println!("{}", "✅ Configuration reset successfully!".green().bold());
    } else {
        println!("Configuration reset cancelled.");
    }

    Ok(())
}

fn print_version() {
    println!("{}", format!("sorter {}", env!("CARGO_PKG_VERSION")).bold());
    let key_status = if config::api_key_present() { "set" } else { "not set" };
    println!("{}: {}", config::API_KEY_ENV_VAR, key_status);
}
