use clap::Parser;
use log::LevelFilter;
use std::fs;
use std::path::Path;

use pluck::{
    load_config, // The load_config function
    Config,
    GenerateOperation,
    Generator,
    IgnoreSet,
};

/// A simple program to convert a code repository into an LLM prompt,
/// honouring per-directory ignore files
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// The command or config name
    command_or_config: Option<String>,

    /// Additional arguments
    #[arg(allow_hyphen_values = true)]
    args: Vec<String>,

    /// Verbose mode
    #[arg(long)]
    verbose: bool,

    /// Quiet mode
    #[arg(long)]
    quiet: bool,
}

// Define reserved keywords to prevent them from being used as config names
const RESERVED_KEYWORDS: &[&str] = &["generate", "check", "help", "--help", "-h"];

fn main() {
    let cli = Cli::parse();

    // Set up logging based on verbosity flags
    if cli.verbose {
        env_logger::builder()
            .filter_level(LevelFilter::Debug)
            .init();
    } else if cli.quiet {
        env_logger::builder()
            .filter_level(LevelFilter::Error)
            .init();
    } else {
        env_logger::builder().filter_level(LevelFilter::Warn).init();
    }

    let command_or_config = cli.command_or_config.as_deref();

    match command_or_config {
        Some("generate") => {
            // Parse arguments for 'generate' command
            let generate_cli = match GenerateCli::try_parse_from(
                std::iter::once("generate").chain(cli.args.iter().map(|s| s.as_str())),
            ) {
                Ok(cli) => cli,
                Err(e) => {
                    eprintln!("{}", e);
                    std::process::exit(1);
                }
            };

            // Build a Config object from the parsed CLI arguments
            let config = Config {
                path: Some(generate_cli.path),
                ignore: Some(generate_cli.ignore),
                output: generate_cli.output,
                delimiter: Some(generate_cli.delimiter),
                language: generate_cli.language,
                prompts: None,
                use_rules: Some(!generate_cli.no_rules),
            };

            run_and_write(&config);
        }
        Some("check") => {
            // Parse arguments for 'check' command
            let check_cli = match CheckCli::try_parse_from(
                std::iter::once("check").chain(cli.args.iter().map(|s| s.as_str())),
            ) {
                Ok(cli) => cli,
                Err(e) => {
                    eprintln!("{}", e);
                    std::process::exit(1);
                }
            };
            run_check(&check_cli);
        }
        Some(reserved) if RESERVED_KEYWORDS.contains(&reserved) => {
            // Prevent usage of reserved keywords as config names
            eprintln!(
                "'{}' is a reserved keyword and cannot be used as a config name.",
                reserved
            );
            std::process::exit(1);
        }
        Some(config_name) => {
            // Load and run the configuration named 'config_name'
            match load_config() {
                Ok(configs) => {
                    if let Some(config) = configs.get(config_name) {
                        run_and_write(config);
                    } else {
                        eprintln!("Configuration '{}' not found in pluck.yaml", config_name);
                        std::process::exit(1);
                    }
                }
                Err(e) => {
                    eprintln!("Failed to load pluck.yaml: {}", e);
                    std::process::exit(1);
                }
            }
        }
        None => {
            // No command or config name provided, run default config 'base'
            match load_config() {
                Ok(configs) => {
                    if let Some(config) = configs.get(pluck::DEFAULT_CONFIG_KEY) {
                        run_and_write(config);
                    } else {
                        eprintln!("Configuration 'base' not found in pluck.yaml");
                        std::process::exit(1);
                    }
                }
                Err(e) => {
                    eprintln!("Failed to load pluck.yaml: {}", e);
                    std::process::exit(1);
                }
            }
        }
    }
}

/// Runs the generator and writes the prompt to the configured output
/// file, or to stdout when none is set.
fn run_and_write(config: &Config) {
    let generator = Generator;
    match generator.run(config) {
        Ok((prompt, errors)) => {
            if let Some(output) = config.output.as_deref() {
                if let Err(e) = fs::write(output, &prompt) {
                    eprintln!("Unable to write to file {}: {}", output, e);
                    std::process::exit(1);
                }
            } else {
                println!("{}", prompt);
            }
            for error in errors {
                log::warn!("{}", error);
            }
        }
        Err(e) => {
            eprintln!("Error generating prompt: {}", e);
            std::process::exit(1);
        }
    }
}

/// Prints the verdict for each target path, with the deciding pattern.
fn run_check(check_cli: &CheckCli) {
    let root = Path::new(&check_cli.path);
    let rules = match IgnoreSet::load(root) {
        Some(rules) => rules,
        None => {
            eprintln!("'{}' is not a readable directory", check_cli.path);
            std::process::exit(1);
        }
    };

    for target in &check_cli.targets {
        let absolute = rules.root().join(target);
        let is_dir = absolute.is_dir();
        match rules.last_match(&absolute, is_dir) {
            Some(rule) if !rule.is_negation() => {
                println!("ignored    {}  (pattern '{}')", target, rule.pattern());
            }
            Some(rule) => {
                println!("included   {}  (pattern '{}')", target, rule.pattern());
            }
            None => println!("included   {}", target),
        }
    }
}

/// CLI parser for the `generate` command
#[derive(Parser)]
struct GenerateCli {
    /// The path to the code repository, default value is current directory
    #[arg(short, long, default_value = ".")]
    path: String,

    /// Extra pattern lines to ignore, applied at the root of the scan
    #[arg(short, long)]
    ignore: Vec<String>,

    /// Output file
    #[arg(short, long)]
    output: Option<String>,

    /// Custom code block delimiters
    #[arg(long, default_value = "```")]
    delimiter: String,

    /// Programming language of the repository
    #[arg(long)]
    language: Option<String>,

    /// Do not read per-directory rule files
    #[arg(long)]
    no_rules: bool,
}

/// CLI parser for the `check` command
#[derive(Parser)]
struct CheckCli {
    /// Root directory whose rule files are consulted
    #[arg(short, long, default_value = ".")]
    path: String,

    /// Paths, relative to the root, to test
    targets: Vec<String>,
}
