mod config;
mod test_runner;

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};
use log::{LevelFilter, debug, warn};

use rangegen::expand::{DEFAULT_RANGE_LIMIT, expand};
use rangegen::{Interval, render, verify};

use crate::config::{Config, Mode};

const SUBCOMMANDS: &[&str] = &["gen", "check", "expand", "test", "help"];
const USAGE: &str = "Usage: patgen <min> <max>";
const VALUE_FLAGS: &[&str] = &[
    "-m", "--mode", "--ceiling", "-p", "--priority", "-a", "--app", "-r", "--ranges", "-c",
    "--config",
];

#[derive(Parser)]
#[command(name = "patgen", version, about = "Dialplan pattern match generator")]
struct Cli {
    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Log more (-v info, -vv debug, -vvv trace). RUST_LOG overrides.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate the patterns matching a number range
    Gen(GenArgs),

    /// Validate dialplan patterns
    Check(CheckArgs),

    /// List the numbers a pattern matches, as ranges
    Expand(ExpandArgs),

    /// Run .toml range fixtures
    Test(TestArgs),
}

#[derive(clap::Args)]
struct GenArgs {
    /// Range bounds: <min> <max>
    #[arg(value_name = "NUMBER", allow_negative_numbers = true)]
    numbers: Vec<String>,

    /// Cover flavour
    #[arg(short, long, value_enum)]
    mode: Option<Mode>,

    /// Largest supported number length, in digits
    #[arg(long, value_name = "DIGITS")]
    ceiling: Option<u32>,

    /// Priority written before the application
    #[arg(short, long)]
    priority: Option<u32>,

    /// Application appended to each line, e.g. "Return(ok)"
    #[arg(short, long, value_name = "APPLICATION")]
    app: Option<String>,

    /// Read one range per line from a file ("-" for stdin) instead of <min> <max>
    #[arg(short, long, value_name = "FILE")]
    ranges: Option<PathBuf>,

    /// TOML config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print patterns only, without the `exten => ` prefix
    #[arg(long)]
    bare: bool,

    /// Warn about numbers left uncovered or matched by more than one pattern
    #[arg(long)]
    verify: bool,
}

#[derive(clap::Args)]
struct CheckArgs {
    /// Patterns to validate
    #[arg(required = true)]
    patterns: Vec<String>,
}

#[derive(clap::Args)]
struct ExpandArgs {
    /// Pattern to expand
    pattern: String,

    /// Give up after this many ranges
    #[arg(long, default_value_t = DEFAULT_RANGE_LIMIT)]
    limit: usize,
}

#[derive(clap::Args)]
struct TestArgs {
    /// Path to a .toml case or a directory containing them
    path: String,

    /// Run only cases in these categories (subfolder names). Repeatable.
    #[arg(short, long)]
    category: Vec<String>,

    /// List available categories and exit
    #[arg(long)]
    list_categories: bool,
}

fn main() {
    // `patgen 234 742` works like `patgen gen 234 742`.
    let mut args: Vec<String> = std::env::args().collect();
    match first_positional(&args) {
        Some(pos) => {
            if !SUBCOMMANDS.contains(&args[pos].as_str()) {
                args.insert(1, "gen".to_string());
            }
        }
        None => {
            let wants_info = args
                .iter()
                .skip(1)
                .any(|a| matches!(a.as_str(), "-h" | "--help" | "-V" | "--version"));
            // `patgen --ranges FILE` has no positional but is still a `gen` call.
            let gen_flags = args.iter().skip(1).any(|a| {
                matches!(a.as_str(), "-r" | "-c")
                    || a.starts_with("--ranges")
                    || a.starts_with("--config")
            });
            if gen_flags && !wants_info {
                args.insert(1, "gen".to_string());
            } else if !wants_info {
                println!("{}", USAGE);
                return;
            }
        }
    }

    let cli = Cli::parse_from(&args);
    init_logging(cli.verbose);

    let exit_code = match cli.command {
        Command::Gen(gen_args) => do_gen(gen_args),
        Command::Check(check_args) => do_check(&check_args.patterns, cli.no_color),
        Command::Expand(expand_args) => do_expand(expand_args, cli.no_color),
        Command::Test(test_args) => {
            let path = Path::new(&test_args.path);
            if test_args.list_categories {
                test_runner::list_categories(path);
                0
            } else {
                test_runner::run_tests(path, cli.no_color, &test_args.category)
            }
        }
    };
    process::exit(exit_code);
}

/// Index of the first positional argument, skipping the values of `gen` options.
fn first_positional(args: &[String]) -> Option<usize> {
    let mut i = 1;
    while i < args.len() {
        let arg = args[i].as_str();
        if is_positional(arg) {
            return Some(i);
        }
        if VALUE_FLAGS.contains(&arg) {
            i += 1;
        }
        i += 1;
    }
    None
}

/// Positional arguments, counting negative numbers such as `-5`.
fn is_positional(arg: &str) -> bool {
    match arg.strip_prefix('-') {
        Some(rest) => rest.starts_with(|c: char| c.is_ascii_digit()),
        None => true,
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

fn do_gen(args: GenArgs) -> i32 {
    let mut config = match &args.config {
        Some(path) => match Config::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("error: {}", e);
                return 1;
            }
        },
        None => Config::default(),
    };

    // Command-line flags win over the config file.
    if let Some(mode) = args.mode {
        config.mode = mode;
    }
    if let Some(ceiling) = args.ceiling {
        config.ceiling_digits = ceiling;
    }
    if let Some(priority) = args.priority {
        config.output.priority = Some(priority);
    }
    if let Some(app) = &args.app {
        config.output.application = Some(app.clone());
    }
    if config.output.priority.is_some() && config.output.application.is_none() {
        warn!("priority given without an application; lines will carry the pattern only");
    }

    let partitioner = match config.partitioner() {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {}", e);
            return 1;
        }
    };

    let intervals = match collect_intervals(&args) {
        Ok(Some(intervals)) => intervals,
        Ok(None) => {
            println!("{}", USAGE);
            return 0;
        }
        Err(msg) => {
            eprintln!("error: {}", msg);
            return 1;
        }
    };
    debug!("{} range(s), {:?}", intervals.len(), partitioner);

    let mut stdout = std::io::stdout().lock();
    for interval in &intervals {
        let blocks = match partitioner.partition_interval(interval) {
            Ok(blocks) => blocks,
            Err(e) => {
                eprintln!("error: {}", e);
                return 1;
            }
        };

        if args.verify {
            for defect in verify(interval.min, interval.max, &blocks) {
                eprintln!("warning: {}..={}: {}", interval.min, interval.max, defect);
            }
        }

        for block in &blocks {
            let pattern = render(block);
            let line = if args.bare {
                pattern
            } else {
                config.output.format_line(&pattern)
            };
            if writeln!(stdout, "{}", line).is_err() {
                return 1;
            }
        }
    }
    0
}

/// The ranges to generate, or `None` when the arguments call for the usage text.
fn collect_intervals(args: &GenArgs) -> Result<Option<Vec<Interval>>, String> {
    let Some(path) = &args.ranges else {
        if args.numbers.len() != 2 {
            return Ok(None);
        }
        return Interval::parse(&args.numbers[0], &args.numbers[1])
            .map(|interval| Some(vec![interval]))
            .map_err(|e| e.to_string());
    };

    if !args.numbers.is_empty() {
        return Err("give either <min> <max> or --ranges, not both".to_string());
    }

    let text = if path.as_os_str() == "-" {
        std::io::read_to_string(std::io::stdin())
    } else {
        std::fs::read_to_string(path)
    }
    .map_err(|e| format!("cannot read '{}': {}", path.display(), e))?;

    let mut intervals = Vec::new();
    for (i, line) in text.lines().enumerate() {
        match Interval::parse_line(line) {
            Ok(Some(interval)) => intervals.push(interval),
            Ok(None) => {}
            Err(e) => return Err(format!("{}:{}: {}", path.display(), i + 1, e)),
        }
    }
    Ok(Some(intervals))
}

fn color_choice(no_color: bool) -> ColorChoice {
    if no_color {
        ColorChoice::Never
    } else {
        ColorChoice::Auto
    }
}

/// Parse a pattern, printing diagnostics for every error.
fn parse_reporting(
    text: &str,
    name: String,
    files: &mut SimpleFiles<String, String>,
    writer: &StandardStream,
) -> Option<dialplan::Pattern> {
    let file_id = files.add(name, text.to_string());
    match dialplan::Parser::new(text.to_string(), file_id).parse() {
        Ok(pattern) => Some(pattern),
        Err(errors) => {
            let config = term::Config::default();
            for error in &errors {
                let diagnostic = error.to_diagnostic();
                let _ = term::emit_to_write_style(&mut writer.lock(), &config, files, &diagnostic);
            }
            None
        }
    }
}

fn do_check(patterns: &[String], no_color: bool) -> i32 {
    let writer = StandardStream::stderr(color_choice(no_color));
    let mut files = SimpleFiles::new();
    let mut failed = false;

    for (i, text) in patterns.iter().enumerate() {
        let Some(pattern) = parse_reporting(text, format!("<pattern {}>", i + 1), &mut files, &writer)
        else {
            failed = true;
            continue;
        };

        let canonical = pattern.to_string();
        let matches = match pattern.count() {
            Some(n) => format!("matches {} extension(s)", n),
            None => "matches variable-length extensions".to_string(),
        };
        if canonical == *text {
            println!("{}: ok, {}", text, matches);
        } else {
            println!("{}: ok, {} (canonical form {})", text, matches, canonical);
        }
    }

    if failed { 1 } else { 0 }
}

fn do_expand(args: ExpandArgs, no_color: bool) -> i32 {
    let writer = StandardStream::stderr(color_choice(no_color));
    let mut files = SimpleFiles::new();
    let Some(pattern) = parse_reporting(&args.pattern, "<pattern>".to_string(), &mut files, &writer)
    else {
        return 1;
    };

    match expand(&pattern, args.limit) {
        Ok(ranges) => {
            let mut stdout = std::io::stdout().lock();
            for range in ranges {
                let line = if range.start() == range.end() {
                    range.start().to_string()
                } else {
                    format!("{}-{}", range.start(), range.end())
                };
                if writeln!(stdout, "{}", line).is_err() {
                    return 1;
                }
            }
            0
        }
        Err(e) => {
            eprintln!("error: {}", e);
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gen_args(numbers: &[&str]) -> GenArgs {
        GenArgs {
            numbers: numbers.iter().map(|s| s.to_string()).collect(),
            mode: None,
            ceiling: None,
            priority: None,
            app: None,
            ranges: None,
            config: None,
            bare: false,
            verify: false,
        }
    }

    #[test]
    fn negative_numbers_count_as_positional() {
        assert!(is_positional("234"));
        assert!(is_positional("-5"));
        assert!(!is_positional("-v"));
        assert!(!is_positional("--mode"));
    }

    #[test]
    fn option_values_are_not_positional() {
        let args: Vec<String> = ["patgen", "--mode", "exact", "-v", "234", "742"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(first_positional(&args), Some(4));
        let args: Vec<String> = ["patgen", "-r", "ranges.txt"].iter().map(|s| s.to_string()).collect();
        assert_eq!(first_positional(&args), None);
    }

    #[test]
    fn shorthand_parses_as_gen() {
        let cli = Cli::try_parse_from(["patgen", "gen", "234", "742", "--mode", "exact"]).unwrap();
        let Command::Gen(args) = cli.command else {
            panic!("expected gen");
        };
        assert_eq!(args.numbers, vec!["234", "742"]);
        assert_eq!(args.mode, Some(Mode::Exact));
    }

    #[test]
    fn wrong_argument_count_asks_for_usage() {
        assert_eq!(collect_intervals(&gen_args(&["5"])), Ok(None));
        assert_eq!(collect_intervals(&gen_args(&["1", "2", "3"])), Ok(None));
        assert_eq!(
            collect_intervals(&gen_args(&["234", "742"])),
            Ok(Some(vec![Interval::new(234, 742)]))
        );
    }

    #[test]
    fn bad_bounds_are_errors() {
        let err = collect_intervals(&gen_args(&["-5", "10"])).unwrap_err();
        assert!(err.contains("negative"), "{}", err);
        let err = collect_intervals(&gen_args(&["1.5", "10"])).unwrap_err();
        assert!(err.contains("not a non-negative integer"), "{}", err);
    }

    #[test]
    fn ranges_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ranges.txt");
        std::fs::write(&path, "# sales\n2000-2099\n\n134 142 # lab\n").unwrap();
        let mut args = gen_args(&[]);
        args.ranges = Some(path.clone());
        assert_eq!(
            collect_intervals(&args),
            Ok(Some(vec![Interval::new(2000, 2099), Interval::new(134, 142)]))
        );

        std::fs::write(&path, "1-2\nfoo\n").unwrap();
        let err = collect_intervals(&args).unwrap_err();
        assert!(err.ends_with(":2: malformed range \"foo\": expected `<min> <max>` or `<min>-<max>`"), "{}", err);
    }

    #[test]
    fn ranges_file_excludes_numbers() {
        let mut args = gen_args(&["1", "2"]);
        args.ranges = Some(PathBuf::from("ranges.txt"));
        assert!(collect_intervals(&args).is_err());
    }
}
