use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use l10n_format::{placeholder_count, Catalog};

#[derive(Debug, Parser)]
#[command(
    name = "catalog-lint",
    about = "Validates message catalog packs",
    version
)]
struct Args {
    /// 語言包資料夾路徑；預設為 assets/langs。 / Directory that contains locale JSON packs (defaults to assets/langs).
    #[arg(value_name = "DIR", default_value = "assets/langs")]
    directory: PathBuf,
    /// 佔位符數量不一致時使程序失敗。 / Fail when a translation uses a different number of `%` markers than its key.
    #[arg(long)]
    fail_on_mismatch: bool,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("catalog-lint error: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = Args::parse();
    let catalog = Catalog::load_from_dir(&args.directory)
        .with_context(|| format!("load catalog packs from {}", args.directory.display()))?;

    let stats = catalog.catalog_stats();
    println!("Loaded {} locale(s)", stats.len());

    let mut total_mismatched = 0usize;
    for stats in stats {
        let mismatched: Vec<(&str, usize, usize)> = catalog
            .entries(&stats.code)
            .into_iter()
            .filter_map(|(key, translation)| {
                let expected = placeholder_count(key);
                let found = placeholder_count(translation);
                (expected != found).then_some((key, expected, found))
            })
            .collect();

        let mut line = format!(
            " - {} [{}]: {} strings",
            stats.display_name, stats.code, stats.total_entries
        );
        if mismatched.is_empty() {
            println!("{line}");
            continue;
        }
        line.push_str(&format!(", {} placeholder mismatch(es)", mismatched.len()));
        println!("{line}");
        for (key, expected, found) in mismatched.iter().take(5) {
            println!("     · {key:?}: expected {expected} marker(s), found {found}");
        }
        if mismatched.len() > 5 {
            println!("     · ... {} more", mismatched.len() - 5);
        }
        total_mismatched += mismatched.len();
    }

    if total_mismatched > 0 {
        eprintln!("Found {total_mismatched} translation(s) with mismatched placeholders");
        if args.fail_on_mismatch {
            bail!("placeholder mismatches detected");
        }
    }

    Ok(())
}
