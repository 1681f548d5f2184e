// Command-line interface for isbdm
//
// This binary converts the ISBDM HTML site into Docusaurus MDX documents and maintains their
// sidebar front matter.
//
// Both halves read the same layered configuration: built-in defaults, then ./isbdm.toml when
// present, then the file given with --config, then command-line flags.
//
// Usage:
//  isbdm convert <source_dir> <dest_dir> [--recursive] [--log-file <path>] [--jobs <n>]
//  isbdm sidebar [--source-html-root <dir>] [--target-mdx-root <dir>] [--single-dir <dir>]
//                [--dry-run] [--dry-run-output <dir>] [--log-file <path>]
//  isbdm inspect-sidebar <section> [--json]
//
// Every run ends with a summary of processed and failed documents. Per-document failures are
// logged and counted, they never change the exit status.

use anyhow::{anyhow, Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use isbdm_babel::{build_section, DirectoryLoader, TranspileOptions};
use isbdm_cli::convert::ConvertRun;
use isbdm_cli::inspect;
use isbdm_cli::logging;
use isbdm_cli::sidebar::SidebarRun;
use isbdm_config::{IsbdmConfig, Loader, PROJECT_CONFIG_FILE};
use std::path::{Path, PathBuf};

fn build_cli() -> Command {
    Command::new("isbdm")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert the ISBDM HTML documentation into Docusaurus MDX")
        .long_about(
            "isbdm converts the ISBDM HTML site into Docusaurus MDX documents.\n\n\
            Commands:\n  \
            - convert:         Transpile HTML pages into MDX documents\n  \
            - sidebar:         Write sidebar front matter from the HTML sidebars\n  \
            - inspect-sidebar: Print one reconstructed sidebar section\n\n\
            Examples:\n  \
            isbdm convert ISBDM/docs docs --recursive      # Convert the whole site\n  \
            isbdm sidebar --dry-run                        # List the documents to update\n  \
            isbdm sidebar --single-dir attributes          # Update one directory\n  \
            isbdm inspect-sidebar relationships --json     # Dump one section",
        )
        .arg_required_else_help(true)
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to an isbdm.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .value_name("LEVEL")
                .help("Log filter (error, warn, info, debug or a filter directive)")
                .value_hint(ValueHint::Other)
                .global(true),
        )
        .subcommand(
            Command::new("convert")
                .about("Transpile HTML pages into MDX documents")
                .long_about(
                    "Convert every .html page under <source_dir> into an MDX document.\n\n\
                    Each page lands at <dest_dir>/<relative path>.mdx. The page's own sidebar\n\
                    row gives its position and level. Structural surprises are logged as\n\
                    warnings, unknown markup is kept verbatim.\n\n\
                    Examples:\n  \
                    isbdm convert ISBDM/docs/attributes docs/attributes\n  \
                    isbdm convert ISBDM/docs docs --recursive --jobs 8",
                )
                .arg(
                    Arg::new("source_dir")
                        .help("Directory holding the HTML pages")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::DirPath),
                )
                .arg(
                    Arg::new("dest_dir")
                        .help("Directory the MDX documents are written to")
                        .required(true)
                        .index(2)
                        .value_hint(ValueHint::DirPath),
                )
                .arg(
                    Arg::new("recursive")
                        .long("recursive")
                        .short('r')
                        .help("Descend into subdirectories")
                        .action(ArgAction::SetTrue),
                )
                .arg(log_file_arg())
                .arg(
                    Arg::new("jobs")
                        .long("jobs")
                        .short('j')
                        .value_name("N")
                        .help("Number of pages converted in parallel")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("1"),
                ),
        )
        .subcommand(
            Command::new("sidebar")
                .about("Write sidebar front matter from the HTML sidebars")
                .long_about(
                    "Rebuild every configured sidebar section from the source HTML and write\n\
                    sidebar_label, sidebar_level, sidebar_position, sidebar_class_name and\n\
                    customProps.sidebar_prefix into the matching MDX documents. Documents\n\
                    without a sidebar entry lose those keys.\n\n\
                    Examples:\n  \
                    isbdm sidebar\n  \
                    isbdm sidebar --single-dir ses --dry-run --dry-run-output preview",
                )
                .arg(source_root_arg())
                .arg(
                    Arg::new("target-mdx-root")
                        .long("target-mdx-root")
                        .value_name("DIR")
                        .help("Root of the target MDX documents")
                        .value_hint(ValueHint::DirPath),
                )
                .arg(
                    Arg::new("single-dir")
                        .long("single-dir")
                        .value_name("DIR")
                        .help("Only update documents under this directory of the target root")
                        .value_hint(ValueHint::DirPath),
                )
                .arg(
                    Arg::new("dry-run")
                        .long("dry-run")
                        .help("Do not modify any document")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("dry-run-output")
                        .long("dry-run-output")
                        .value_name("DIR")
                        .help("With --dry-run, write the updated documents here instead")
                        .requires("dry-run")
                        .value_hint(ValueHint::DirPath),
                )
                .arg(log_file_arg()),
        )
        .subcommand(
            Command::new("inspect-sidebar")
                .about("Print one reconstructed sidebar section")
                .arg(
                    Arg::new("section")
                        .help("Section key, as configured in [[sidebar.sections]]")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::Other),
                )
                .arg(source_root_arg())
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Print the entries as JSON")
                        .action(ArgAction::SetTrue),
                ),
        )
}

fn log_file_arg() -> Arg {
    Arg::new("log-file")
        .long("log-file")
        .value_name("PATH")
        .help("Log file, truncated at the start of the run")
        .value_hint(ValueHint::FilePath)
}

fn source_root_arg() -> Arg {
    Arg::new("source-html-root")
        .long("source-html-root")
        .value_name("DIR")
        .help("Root of the source HTML site")
        .value_hint(ValueHint::DirPath)
}

fn main() {
    let matches = build_cli().get_matches();
    if let Err(err) = run(&matches) {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

fn run(matches: &ArgMatches) -> Result<()> {
    let log_level = matches.get_one::<String>("log-level").map(String::as_str);
    let explicit_config = matches.get_one::<String>("config").map(String::as_str);

    match matches.subcommand() {
        Some(("convert", sub_matches)) => {
            let config = load_cli_config(explicit_config, &[])?;
            let log_file = log_file(sub_matches, &config.convert.log_file);
            logging::init(log_level, Some(&log_file))?;
            handle_convert_command(sub_matches, &config)
        }
        Some(("sidebar", sub_matches)) => {
            let config = load_cli_config(explicit_config, &path_overrides(sub_matches))?;
            let log_file = log_file(sub_matches, &config.sidebar.log_file);
            logging::init(log_level, Some(&log_file))?;
            handle_sidebar_command(sub_matches, &config)
        }
        Some(("inspect-sidebar", sub_matches)) => {
            let config = load_cli_config(explicit_config, &path_overrides(sub_matches))?;
            logging::init(log_level, None)?;
            handle_inspect_sidebar_command(sub_matches, &config)
        }
        _ => Err(anyhow!("Unknown subcommand. Use --help for usage information.")),
    }
}

/// Handle the convert command
fn handle_convert_command(sub_matches: &ArgMatches, config: &IsbdmConfig) -> Result<()> {
    let run = ConvertRun {
        source_root: required_path(sub_matches, "source_dir")?,
        dest_root: required_path(sub_matches, "dest_dir")?,
        recursive: sub_matches.get_flag("recursive"),
        jobs: sub_matches.get_one::<usize>("jobs").copied().unwrap_or(1),
        extension: config.convert.extension.clone(),
        options: TranspileOptions::from(&config.convert),
    };
    let summary = run.execute()?;
    tracing::info!("Conversion complete. {}", summary);
    println!("{summary}");
    Ok(())
}

/// Handle the sidebar command
fn handle_sidebar_command(sub_matches: &ArgMatches, config: &IsbdmConfig) -> Result<()> {
    let run = SidebarRun {
        source_html_root: PathBuf::from(&config.paths.source_html_root),
        target_mdx_root: PathBuf::from(&config.paths.target_mdx_root),
        single_dir: sub_matches.get_one::<String>("single-dir").cloned(),
        dry_run: sub_matches.get_flag("dry-run"),
        dry_run_output: sub_matches.get_one::<String>("dry-run-output").map(PathBuf::from),
        site_prefix: config.convert.site_prefix.clone(),
        category_class: config.sidebar.category_class.clone(),
        main_category_keys: config.sidebar.main_category_keys(),
        sections: config.sidebar.section_specs(),
    };
    let summary = run.execute()?;
    tracing::info!("Processing complete. {}", summary);
    println!("{summary}");
    Ok(())
}

/// Handle the inspect-sidebar command
fn handle_inspect_sidebar_command(sub_matches: &ArgMatches, config: &IsbdmConfig) -> Result<()> {
    let key = sub_matches
        .get_one::<String>("section")
        .ok_or_else(|| anyhow!("section is required"))?;
    let specs = config.sidebar.section_specs();
    let spec = specs.iter().find(|spec| &spec.key == key).ok_or_else(|| {
        let known: Vec<&str> = specs.iter().map(|spec| spec.key.as_str()).collect();
        anyhow!("Unknown section '{key}'. Configured sections: {}", known.join(", "))
    })?;

    let loader = DirectoryLoader::new(&config.paths.source_html_root);
    let entries = build_section(spec, &loader, &config.convert.site_prefix)
        .with_context(|| format!("Failed to reconstruct section '{key}'"))?;
    let view = if sub_matches.get_flag("json") {
        "json"
    } else {
        "tree"
    };
    let output = inspect::render_section(&entries, view).map_err(|e| anyhow!(e))?;
    print!("{output}");
    Ok(())
}

fn load_cli_config(explicit_path: Option<&str>, overrides: &[(&str, String)]) -> Result<IsbdmConfig> {
    let loader = Loader::new().with_optional_file(PROJECT_CONFIG_FILE);
    let mut loader = if let Some(path) = explicit_path {
        loader.with_file(path)
    } else {
        loader
    };
    for (key, value) in overrides {
        loader = loader.set_override(key, value.clone())?;
    }
    loader.build().context("Failed to load configuration")
}

fn path_overrides(sub_matches: &ArgMatches) -> Vec<(&'static str, String)> {
    let mut overrides = Vec::new();
    for (flag, key) in [
        ("source-html-root", "paths.source_html_root"),
        ("target-mdx-root", "paths.target_mdx_root"),
    ] {
        let known = sub_matches
            .try_get_one::<String>(flag)
            .ok()
            .flatten()
            .cloned();
        if let Some(value) = known {
            overrides.push((key, value));
        }
    }
    overrides
}

fn log_file(sub_matches: &ArgMatches, configured: &str) -> PathBuf {
    sub_matches
        .get_one::<String>("log-file")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(configured))
}

fn required_path(sub_matches: &ArgMatches, name: &str) -> Result<PathBuf> {
    sub_matches
        .get_one::<String>(name)
        .map(|value| Path::new(value).to_path_buf())
        .ok_or_else(|| anyhow!("{name} is required"))
}
