use changelog_locales::changelog::{CommitHistory, summarize_page};
use changelog_locales::config::{self, DEFAULT_CONFIG_FILE};
use changelog_locales::output;
use changelog_locales::time::{self, BasicTimeFormatter};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "changelog-locales")]
#[command(about = "Locale resolution for git changelog widgets")]
#[command(long_about = "\
Locale resolution for git changelog widgets

Resolves a requested locale tag to a bundle of changelog strings and previews
the localized changelog of a page.

Resolution (first match wins):
  1. Exact tag          zh-Hant
  2. Primary subtag     zh
  3. default_locale     en

Bundles and aliases come from locales.toml, layered over the stock English
and Chinese bundles. Run 'changelog-locales gen-config' to print a documented
locales.toml.")]
#[command(version)]
struct Cli {
    /// Locale configuration file (stock bundles are used if it does not exist)
    #[arg(long, default_value = DEFAULT_CONFIG_FILE, global = true)]
    config: PathBuf,

    /// Requested locale tag [default: OS locale]
    #[arg(long, global = true)]
    lang: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show which bundle a locale tag resolves to
    Resolve {
        /// Tag to resolve (overrides --lang)
        tag: Option<String>,
    },
    /// List locale tags grouped by shared bundle
    List,
    /// Print the localized changelog of one page
    Changelog {
        /// JSON array of commit records
        #[arg(long)]
        commits: PathBuf,
        /// Page path as it appears in the commit records
        #[arg(long)]
        page: String,
        /// Reference time in Unix milliseconds [default: now]
        #[arg(long)]
        now: Option<i64>,
    },
    /// Validate the locale configuration
    Check,
    /// Print a stock locales.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Resolve { tag } => {
            let resolver = config::load_config(&cli.config)?.build_resolver()?;
            let requested = tag.unwrap_or_else(|| requested_tag(cli.lang));
            output::print_resolution(&resolver, &requested);
        }
        Command::List => {
            let resolver = config::load_config(&cli.config)?.build_resolver()?;
            output::print_table(&resolver);
        }
        Command::Changelog { commits, page, now } => {
            let resolver = config::load_config(&cli.config)?.build_resolver()?;
            let bundle = resolver.resolve(&requested_tag(cli.lang));
            let history = CommitHistory::load(&commits)?;
            let now = now.unwrap_or_else(time::now_ms);
            let summary = summarize_page(&history, &page, bundle, &BasicTimeFormatter, now);
            output::print_changelog(&summary);
        }
        Command::Check => {
            let locales = config::load_config(&cli.config)?;
            locales.build_resolver()?;
            let source = cli.config.exists().then_some(cli.config.as_path());
            output::print_check(&locales, source);
            println!("==> Locale configuration is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// `--lang` if given, else the OS locale, else empty (resolves to default).
fn requested_tag(lang: Option<String>) -> String {
    lang.or_else(sys_locale::get_locale).unwrap_or_default()
}
