use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

use ts_catalog::{
    CatalogStats, Localizer, Translator, TranslatorOptions, load_catalog_from_file,
    save_catalog_to_file, validate, write_catalog,
};
use ts_catalog_tools::{
    STORED_LANGUAGE_ENV, VerbosityLevel, format_issues, format_stats, init_logging,
    language_settings,
};

fn lookup_args() -> [Arg; 4] {
    [
        Arg::new("context")
            .help("Context (UI component) name, e.g. AddressBookPage")
            .required(true),
        Arg::new("source")
            .help("Source text to translate")
            .required(true),
        Arg::new("comment")
            .long("comment")
            .short('c')
            .help("Disambiguation comment")
            .default_value(""),
        Arg::new("count")
            .long("count")
            .short('n')
            .help("Count used to pick a plural form")
            .value_parser(value_parser!(usize)),
    ]
}

fn include_unfinished_arg() -> Arg {
    Arg::new("include-unfinished")
        .long("include-unfinished")
        .help("Use unfinished translations instead of the source text")
        .action(ArgAction::SetTrue)
}

fn files_arg() -> Arg {
    Arg::new("files")
        .help("TS files")
        .required(true)
        .num_args(1..)
        .value_parser(value_parser!(PathBuf))
}

fn cli() -> Command {
    Command::new("tscat")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Inspect, validate and query Qt Linguist translation catalogs")
        .subcommand_required(true)
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Show more diagnostics (repeat for more)")
                .action(ArgAction::Count)
                .global(true),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .short('q')
                .help("Only report errors")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("lookup")
                .about("Translate a string using a single catalog")
                .arg(
                    Arg::new("file")
                        .help("TS file")
                        .required(true)
                        .value_parser(value_parser!(PathBuf)),
                )
                .args(lookup_args())
                .arg(include_unfinished_arg()),
        )
        .subcommand(
            Command::new("resolve")
                .about("Translate a string the way the application would for a locale")
                .args(lookup_args())
                .arg(
                    Arg::new("dir")
                        .long("dir")
                        .short('d')
                        .help("Directory containing <prefix>_<locale>.ts files")
                        .default_value(".")
                        .value_parser(value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("prefix")
                        .long("prefix")
                        .short('p')
                        .help("Catalog file name prefix")
                        .default_value("bitcoin"),
                )
                .arg(
                    Arg::new("lang")
                        .long("lang")
                        .short('l')
                        .help(format!(
                            "Locale, e.g. zh_CN (default: ${}, then the system locale)",
                            STORED_LANGUAGE_ENV
                        )),
                )
                .arg(include_unfinished_arg()),
        )
        .subcommand(
            Command::new("validate")
                .about("Check catalogs for integrity problems")
                .arg(files_arg())
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Print the reports as JSON")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("stats")
                .about("Show translation progress")
                .arg(files_arg())
                .arg(
                    Arg::new("per-context")
                        .long("per-context")
                        .help("Break progress down by context")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Print the statistics as JSON")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("format")
                .about("Rewrite a catalog in canonical lupdate layout")
                .arg(
                    Arg::new("file")
                        .help("TS file")
                        .required(true)
                        .value_parser(value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Write here instead of stdout")
                        .value_parser(value_parser!(PathBuf)),
                ),
        )
        .subcommand(
            Command::new("dump")
                .about("Print a catalog as JSON")
                .arg(
                    Arg::new("file")
                        .help("TS file")
                        .required(true)
                        .value_parser(value_parser!(PathBuf)),
                ),
        )
}

fn main() -> ExitCode {
    let matches = cli().get_matches();
    init_logging(VerbosityLevel::from_flags(
        matches.get_flag("quiet"),
        matches.get_count("verbose"),
    ));

    match run(&matches) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("tscat: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(matches: &ArgMatches) -> Result<bool, Box<dyn Error>> {
    match matches.subcommand() {
        Some(("lookup", sub)) => lookup(sub),
        Some(("resolve", sub)) => resolve(sub),
        Some(("validate", sub)) => validate_files(sub),
        Some(("stats", sub)) => stats(sub),
        Some(("format", sub)) => format(sub),
        Some(("dump", sub)) => dump(sub),
        _ => Err("no subcommand given".into()),
    }
}

fn required<'a, T>(matches: &'a ArgMatches, id: &str) -> Result<&'a T, Box<dyn Error>>
where
    T: Clone + Send + Sync + 'static,
{
    matches
        .get_one::<T>(id)
        .ok_or_else(|| format!("missing argument '{}'", id).into())
}

fn files(matches: &ArgMatches) -> Vec<&PathBuf> {
    matches
        .get_many::<PathBuf>("files")
        .map(|files| files.collect())
        .unwrap_or_default()
}

fn translator_options(matches: &ArgMatches) -> TranslatorOptions {
    TranslatorOptions {
        include_unfinished: matches.get_flag("include-unfinished"),
    }
}

fn lookup(matches: &ArgMatches) -> Result<bool, Box<dyn Error>> {
    let file = required::<PathBuf>(matches, "file")?;
    let context = required::<String>(matches, "context")?;
    let source = required::<String>(matches, "source")?;
    let comment = required::<String>(matches, "comment")?;
    let count = matches.get_one::<usize>("count").copied();

    let catalog = load_catalog_from_file(file)?;
    let translator = Translator::from_catalog(&catalog, translator_options(matches));
    println!("{}", translator.tr_n(context, source, comment, count));
    Ok(true)
}

fn resolve(matches: &ArgMatches) -> Result<bool, Box<dyn Error>> {
    let dir = required::<PathBuf>(matches, "dir")?;
    let prefix = required::<String>(matches, "prefix")?;
    let context = required::<String>(matches, "context")?;
    let source = required::<String>(matches, "source")?;
    let comment = required::<String>(matches, "comment")?;
    let count = matches.get_one::<usize>("count").copied();

    let settings = language_settings(matches.get_one::<String>("lang").map(String::as_str));
    let lang_territory = settings.resolve();
    info!("Using locale {}", lang_territory);

    let localizer = Localizer::load(dir, prefix, &lang_territory, translator_options(matches))?;
    println!("{}", localizer.tr_n(context, source, comment, count));
    Ok(true)
}

fn validate_files(matches: &ArgMatches) -> Result<bool, Box<dyn Error>> {
    let json = matches.get_flag("json");
    let mut failed = false;
    let mut reports = serde_json::Map::new();

    for file in files(matches) {
        let report = validate(&load_catalog_from_file(file)?);
        failed |= report.has_errors();
        if json {
            reports.insert(file.display().to_string(), serde_json::to_value(&report)?);
        } else {
            print!("{}", format_issues(&file.display().to_string(), &report));
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    }
    Ok(!failed)
}

fn stats(matches: &ArgMatches) -> Result<bool, Box<dyn Error>> {
    let json = matches.get_flag("json");
    let per_context = matches.get_flag("per-context");
    let mut all = serde_json::Map::new();

    for file in files(matches) {
        let stats = CatalogStats::of(&load_catalog_from_file(file)?);
        if json {
            all.insert(file.display().to_string(), serde_json::to_value(&stats)?);
        } else {
            print!("{}", format_stats(&file.display().to_string(), &stats, per_context));
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&all)?);
    }
    Ok(true)
}

fn format(matches: &ArgMatches) -> Result<bool, Box<dyn Error>> {
    let file = required::<PathBuf>(matches, "file")?;
    let catalog = load_catalog_from_file(file)?;

    match matches.get_one::<PathBuf>("output") {
        Some(output) => {
            save_catalog_to_file(&catalog, output)?;
            info!("Wrote {}", output.display());
        }
        None => print!("{}", write_catalog(&catalog)),
    }
    Ok(true)
}

fn dump(matches: &ArgMatches) -> Result<bool, Box<dyn Error>> {
    let file = required::<PathBuf>(matches, "file")?;
    let catalog = load_catalog_from_file(file)?;
    println!("{}", catalog.to_json()?);
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        cli().debug_assert();
    }

    #[test]
    fn test_parse_lookup() {
        let matches = cli()
            .try_get_matches_from([
                "tscat",
                "-v",
                "lookup",
                "bitcoin_zh_CN.ts",
                "BitcoinGUI",
                "%n active connection(s) to Bitcoin network",
                "--count",
                "3",
            ])
            .unwrap();
        assert_eq!(matches.get_count("verbose"), 1);
        let (name, sub) = matches.subcommand().unwrap();
        assert_eq!(name, "lookup");
        assert_eq!(sub.get_one::<usize>("count"), Some(&3));
        assert_eq!(sub.get_one::<String>("comment").map(String::as_str), Some(""));
        assert!(!sub.get_flag("include-unfinished"));
    }

    #[test]
    fn test_lookup_and_validate_run() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bitcoin_zh_CN.ts");
        std::fs::write(
            &path,
            r#"<TS version="2.1" language="zh_CN"><context><name>OverviewPage</name>
<message><source>Balances</source><translation>余额</translation></message>
<message><source>Total:</source><translation></translation></message>
</context></TS>"#,
        )
        .unwrap();
        let file = path.to_str().unwrap();

        let matches = cli()
            .try_get_matches_from(["tscat", "lookup", file, "OverviewPage", "Balances"])
            .unwrap();
        assert!(run(&matches).unwrap());

        let matches = cli()
            .try_get_matches_from(["tscat", "-q", "validate", file])
            .unwrap();
        assert!(!run(&matches).unwrap());

        let output = dir.path().join("formatted.ts");
        let matches = cli()
            .try_get_matches_from(["tscat", "format", file, "-o", output.to_str().unwrap()])
            .unwrap();
        assert!(run(&matches).unwrap());
        assert!(std::fs::read_to_string(&output).unwrap().starts_with("<?xml"));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let matches = cli()
            .try_get_matches_from(["tscat", "dump", "/nonexistent/bitcoin_de.ts"])
            .unwrap();
        assert!(run(&matches).is_err());
    }
}
