use clap::{value_parser, Arg, ArgAction, Command};

fn raw_flag() -> Arg {
    Arg::new("raw")
        .long("raw")
        .help("Print the decoded JSON mapping instead of a summary")
        .action(ArgAction::SetTrue)
}

fn limit_arg() -> Arg {
    Arg::new("limit")
        .long("limit")
        .short('n')
        .num_args(1)
        .value_parser(value_parser!(usize))
        .help("Only show the first N stories")
}

pub fn build_cli() -> Command {
    Command::new("hn")
        .about("Rate-limited Hacker News API client")
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .num_args(1)
                .global(true)
                .help("Override RUST_LOG level (e.g., info, debug)"),
        )
        .arg(
            Arg::new("version")
                .long("version")
                .help("Print version and exit")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("base-url")
                .long("base-url")
                .num_args(1)
                .global(true)
                .help("API base URL (overrides HN_API_URL)"),
        )
        .arg(
            Arg::new("interval-ms")
                .long("interval-ms")
                .num_args(1)
                .global(true)
                .value_parser(value_parser!(u64))
                .help("Minimum milliseconds between requests (overrides HN_MIN_INTERVAL_MS)"),
        )
        .subcommand(
            Command::new("item")
                .about("Show one item")
                .arg(Arg::new("id").required(true).help("Item id"))
                .arg(raw_flag()),
        )
        .subcommand(
            Command::new("user")
                .about("Show one user profile")
                .arg(Arg::new("name").required(true).help("Case-sensitive user name"))
                .arg(raw_flag()),
        )
        .subcommand(
            Command::new("top")
                .about("List top story ids")
                .arg(limit_arg()),
        )
        .subcommand(Command::new("max-item").about("Print the current largest item id"))
        .subcommand(
            Command::new("updates")
                .about("Show recently changed items and profiles")
                .arg(raw_flag()),
        )
        .subcommand(
            Command::new("top-stories")
                .about("Print title, author, url and id of each top story")
                .arg(limit_arg()),
        )
}

pub fn init_logging(level: Option<&str>) {
    // Explicit level wins, then RUST_LOG, then info
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if let Some(lvl) = level {
        builder.parse_filters(lvl);
    }
    builder.init();
}
