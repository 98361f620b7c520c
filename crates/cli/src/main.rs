use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, Command};
use lexiread_config::ConfigManager;
use std::path::PathBuf;

mod commands;

fn story_arg() -> Arg {
    Arg::new("story")
        .required(true)
        .value_name("STORY_ID")
        .help("Story id from the catalog")
}

fn font_arg() -> Arg {
    Arg::new("font")
        .short('f')
        .long("font")
        .value_name("SIZE")
        .help("Font size on the 1-100 scale (defaults to reader.default_font_size)")
        .value_parser(value_parser!(u8).range(1..=100))
}

fn page_arg() -> Arg {
    Arg::new("page")
        .short('p')
        .long("page")
        .value_name("PAGE")
        .help("Page to open, starting at 1")
        .value_parser(value_parser!(usize))
}

fn json_arg() -> Arg {
    Arg::new("json")
        .long("json")
        .help("Print JSON instead of text")
        .action(ArgAction::SetTrue)
}

fn build_cli() -> Command {
    Command::new("lexiread")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Lexiread Team")
        .about("Graded reader: daily free stories, paginated reading and read-aloud")
        .arg(
            Arg::new("config-dir")
                .short('c')
                .long("config-dir")
                .value_name("DIR")
                .help("Directory holding config.toml (defaults to the platform config dir)")
                .value_parser(value_parser!(PathBuf))
                .global(true),
        )
        .arg(
            Arg::new("catalog")
                .long("catalog")
                .value_name("FILE")
                .help("JSON file with the story catalog")
                .default_value("stories.json")
                .value_parser(value_parser!(PathBuf))
                .global(true),
        )
        .arg(
            Arg::new("date")
                .long("date")
                .value_name("YYYY-MM-DD")
                .help("Pretend today is this date (defaults to the local date)")
                .global(true),
        )
        .subcommand(
            Command::new("daily")
                .about("Show today's free and preview stories")
                .arg(json_arg()),
        )
        .subcommand(
            Command::new("list")
                .about("List the catalog with lock labels")
                .arg(
                    Arg::new("search")
                        .short('s')
                        .long("search")
                        .value_name("TEXT")
                        .help("Title contains TEXT"),
                )
                .arg(
                    Arg::new("level")
                        .short('l')
                        .long("level")
                        .value_name("LEVEL")
                        .help("Proficiency level, e.g. A1"),
                )
                .arg(
                    Arg::new("category")
                        .long("category")
                        .value_name("CATEGORY")
                        .help("Exact category"),
                )
                .arg(
                    Arg::new("read-time")
                        .long("read-time")
                        .value_name("BUCKET")
                        .help("Read time bucket: 1-3, 4-7 or 8+"),
                )
                .arg(
                    Arg::new("rating")
                        .long("rating")
                        .value_name("STARS")
                        .help("Minimum rating: 1+ to 4+"),
                )
                .arg(json_arg()),
        )
        .subcommand(
            Command::new("read")
                .about("Open a story at a page, resuming saved progress")
                .arg(story_arg())
                .arg(page_arg())
                .arg(font_arg())
                .arg(
                    Arg::new("mark")
                        .short('m')
                        .long("mark")
                        .value_name("WORD")
                        .help("Mark a word on the page (0-based) to highlight on the next visit")
                        .value_parser(value_parser!(usize)),
                ),
        )
        .subcommand(
            Command::new("narrate")
                .about("Read a page aloud on the console speech engine")
                .arg(story_arg())
                .arg(page_arg())
                .arg(font_arg())
                .arg(
                    Arg::new("rate")
                        .short('r')
                        .long("rate")
                        .value_name("RATE")
                        .help("Speech rate from 0.5 to 2.0")
                        .value_parser(value_parser!(f32)),
                )
                .arg(
                    Arg::new("faster")
                        .long("faster")
                        .action(ArgAction::Count)
                        .help("Speed up by one rate step; repeat for more"),
                )
                .arg(
                    Arg::new("slower")
                        .long("slower")
                        .action(ArgAction::Count)
                        .help("Slow down by one rate step; repeat for more"),
                ),
        )
        .subcommand(
            Command::new("pronounce")
                .about("Pronounce a single word")
                .arg(Arg::new("word").required(true).value_name("WORD")),
        )
        .subcommand(
            Command::new("progress")
                .about("Inspect saved reading progress")
                .subcommand_required(true)
                .subcommand(
                    Command::new("show")
                        .about("Show the checkpoint for a story")
                        .arg(story_arg()),
                )
                .subcommand(
                    Command::new("clear")
                        .about("Forget the checkpoint for a story")
                        .arg(story_arg()),
                ),
        )
        .subcommand(
            Command::new("config")
                .about("Manage the configuration file")
                .subcommand_required(true)
                .subcommand(
                    Command::new("init").about("Write a default config file if none exists"),
                )
                .subcommand(Command::new("show").about("Print the effective configuration"))
                .subcommand(Command::new("validate").about("Check the config file for errors"))
                .subcommand(Command::new("reset").about("Overwrite the config file with defaults"))
                .subcommand(Command::new("path").about("Print the config file location")),
        )
}

fn main() -> Result<()> {
    let matches = build_cli().get_matches();

    let manager = match matches.get_one::<PathBuf>("config-dir") {
        Some(dir) => ConfigManager::with_directory(dir.clone()),
        None => ConfigManager::new(),
    }
    .context("Failed to locate the config directory")?;

    let config = manager
        .load_with_env_overrides()
        .context("Failed to load configuration")?;

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.app.log_level.to_string()),
    )
    .init();

    if let Some(("config", sub_matches)) = matches.subcommand() {
        return commands::config_command(&manager, &config, sub_matches);
    }

    let catalog_path = matches
        .get_one::<PathBuf>("catalog")
        .cloned()
        .unwrap_or_else(|| PathBuf::from("stories.json"));
    let today = match matches.get_one::<String>("date") {
        Some(raw) => commands::parse_date(raw)?,
        None => chrono::Local::now().date_naive(),
    };

    let mut ctx = commands::CliContext::new(manager, config, catalog_path, today);

    match matches.subcommand() {
        Some(("daily", sub_matches)) => commands::show_daily(&ctx, sub_matches),
        Some(("list", sub_matches)) => commands::list_stories(&ctx, sub_matches),
        Some(("read", sub_matches)) => commands::read_story(&mut ctx, sub_matches),
        Some(("narrate", sub_matches)) => commands::narrate_story(&ctx, sub_matches),
        Some(("pronounce", sub_matches)) => commands::pronounce(&ctx, sub_matches),
        Some(("progress", sub_matches)) => commands::progress_command(&mut ctx, sub_matches),
        _ => {
            build_cli().print_help()?;
            Ok(())
        }
    }
}
