use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use l10n_format::{parse_locale, Arg, Catalog};
use l10n_plural::parse_rules;
use l10n_session::{RegistryConfig, SessionRegistry};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "l10n-cli",
    about = "Format messages through per-caller localization sessions",
    author,
    version
)]
struct Cli {
    /// 語言包資料夾，可重複指定。 / Catalog directory containing locale JSON packs (repeatable).
    #[arg(long = "catalog", global = true, value_name = "DIR")]
    catalogs: Vec<PathBuf>,
    /// 登錄表設定檔。 / Registry config file; its catalog directories are loaded before --catalog ones.
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 透過工作階段格式化訊息。 / Format a message through a session.
    Format(FormatArgs),
    /// 顯示語言包統計。 / Show catalog statistics.
    Catalog(CatalogArgs),
}

#[derive(Args)]
struct FormatArgs {
    /// 工作階段識別碼。 / Session identity used for the lookup.
    #[arg(long, default_value = "cli", value_name = "ID")]
    session: String,
    /// 註冊工作階段所用語系；略過時使用預設語系。 / Locale to register the session with; the default locale is used when omitted.
    #[arg(long, value_name = "TAG")]
    locale: Option<String>,
    /// 複數規則：運算式與樣板。 / Plural rule as an expression and its template, e.g. --plural '[1]>1' '%d items'.
    #[arg(long, num_args = 2, value_names = ["EXPR", "TEMPLATE"])]
    plural: Vec<String>,
    /// 訊息樣板。 / Message template.
    #[arg(value_name = "TEMPLATE")]
    template: String,
    /// 樣板參數；整數與浮點數會自動轉換。 / Template arguments; integers and floats are detected automatically.
    #[arg(value_name = "ARG", allow_hyphen_values = true)]
    args: Vec<String>,
}

#[derive(Args)]
struct CatalogArgs {
    /// 比對缺少鍵時的參考語系。 / Reference locale code used to report missing keys.
    #[arg(long, value_name = "CODE")]
    reference: Option<String>,
    /// 遇到缺少鍵時使程序失敗。 / Fail when a locale is missing keys relative to the reference.
    #[arg(long, requires = "reference")]
    fail_on_missing: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(io::stderr)
        .init();

    if let Err(err) = run() {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let Cli {
        catalogs,
        config,
        command,
    } = Cli::parse();
    let registry = build_registry(config, catalogs)?;
    match command {
        Commands::Format(args) => execute_format(&registry, args),
        Commands::Catalog(args) => execute_catalog(&registry, args),
    }
}

fn build_registry(config: Option<PathBuf>, catalogs: Vec<PathBuf>) -> Result<SessionRegistry> {
    let mut config = match config {
        Some(path) => RegistryConfig::load(&path)
            .with_context(|| format!("load registry config {}", path.display()))?,
        None => RegistryConfig::default(),
    };
    config.catalog_dirs.extend(catalogs);
    debug!(dirs = ?config.catalog_dirs, "loading catalogs");

    let default_locale = config.default_locale()?;
    let catalog = Catalog::load_from_dirs(&config.catalog_dirs).context("load catalogs")?;
    Ok(SessionRegistry::with_default_locale(
        Arc::new(catalog),
        default_locale,
    ))
}

fn execute_format(registry: &SessionRegistry, args: FormatArgs) -> Result<()> {
    if let Some(tag) = args.locale.as_deref() {
        let locale = parse_locale(tag)?;
        registry.register(args.session.clone(), locale);
    }

    let values: Vec<Arg> = args.args.iter().map(|raw| parse_arg(raw)).collect();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    if args.plural.is_empty() {
        registry.fprintf(&args.session, &mut out, &args.template, &values)?;
    } else {
        let rules = parse_rules(&args.plural);
        if rules.is_empty() {
            warn!("none of the --plural expressions could be parsed");
        }
        registry.fprintf_plural(&args.session, &mut out, &args.template, &values, &rules)?;
    }
    writeln!(out)?;
    Ok(())
}

fn execute_catalog(registry: &SessionRegistry, args: CatalogArgs) -> Result<()> {
    let catalog = registry.catalog();
    let stats = catalog.catalog_stats();
    println!(
        "Loaded {} locale(s); default locale: {}",
        stats.len(),
        registry.default_locale()
    );

    let mut total_missing = 0usize;
    for stats in stats {
        let mut line = format!(
            " - {} [{}]: {} strings",
            stats.display_name, stats.code, stats.total_entries
        );
        let Some(reference) = args.reference.as_deref() else {
            println!("{line}");
            continue;
        };
        if stats.code == reference {
            line.push_str(" [reference]");
            println!("{line}");
            continue;
        }
        let missing = catalog
            .missing_keys(reference, &stats.code)
            .with_context(|| format!("reference locale '{reference}' is not loaded"))?;
        if !missing.is_empty() {
            line.push_str(&format!(", missing {} key(s)", missing.len()));
        }
        println!("{line}");
        for key in missing.iter().take(5) {
            println!("     · {key}");
        }
        if missing.len() > 5 {
            println!("     · ... {} more", missing.len() - 5);
        }
        total_missing += missing.len();
    }

    if total_missing > 0 && args.fail_on_missing {
        bail!("{total_missing} missing catalog key(s) detected");
    }
    Ok(())
}

fn parse_arg(raw: &str) -> Arg {
    if let Ok(value) = raw.parse::<i64>() {
        Arg::Int(value)
    } else if let Some(value) = raw
        .parse::<f64>()
        .ok()
        .filter(|_| raw.bytes().any(|byte| byte.is_ascii_digit()))
    {
        Arg::Float(value)
    } else {
        Arg::from(raw)
    }
}
