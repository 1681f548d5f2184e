use clap::{Arg, ArgAction, Command, ValueHint};
use clap_complete::{generate_to, shells::*};
use std::env;
use std::io::Error;

// Mirror of the command tree from src/main.rs
// We need to duplicate this here since build scripts can't access src/ modules
fn build_cli() -> Command {
    let log_file = Arg::new("log-file")
        .long("log-file")
        .value_hint(ValueHint::FilePath);
    let source_root = Arg::new("source-html-root")
        .long("source-html-root")
        .value_hint(ValueHint::DirPath);

    Command::new("isbdm")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert the ISBDM HTML documentation into Docusaurus MDX")
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .arg(Arg::new("log-level").long("log-level").global(true))
        .subcommand(
            Command::new("convert")
                .about("Transpile HTML pages into MDX documents")
                .arg(
                    Arg::new("source_dir")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::DirPath),
                )
                .arg(
                    Arg::new("dest_dir")
                        .required(true)
                        .index(2)
                        .value_hint(ValueHint::DirPath),
                )
                .arg(
                    Arg::new("recursive")
                        .long("recursive")
                        .short('r')
                        .action(ArgAction::SetTrue),
                )
                .arg(log_file.clone())
                .arg(Arg::new("jobs").long("jobs").short('j')),
        )
        .subcommand(
            Command::new("sidebar")
                .about("Write sidebar front matter from the HTML sidebars")
                .arg(source_root.clone())
                .arg(
                    Arg::new("target-mdx-root")
                        .long("target-mdx-root")
                        .value_hint(ValueHint::DirPath),
                )
                .arg(
                    Arg::new("single-dir")
                        .long("single-dir")
                        .value_hint(ValueHint::DirPath),
                )
                .arg(
                    Arg::new("dry-run")
                        .long("dry-run")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("dry-run-output")
                        .long("dry-run-output")
                        .value_hint(ValueHint::DirPath),
                )
                .arg(log_file),
        )
        .subcommand(
            Command::new("inspect-sidebar")
                .about("Print one reconstructed sidebar section")
                .arg(Arg::new("section").required(true).index(1))
                .arg(source_root)
                .arg(Arg::new("json").long("json").action(ArgAction::SetTrue)),
        )
}

fn main() -> Result<(), Error> {
    let outdir = match env::var_os("OUT_DIR") {
        None => return Ok(()),
        Some(outdir) => outdir,
    };

    let mut cmd = build_cli();

    // Generate completions for bash
    generate_to(Bash, &mut cmd, "isbdm", &outdir)?;

    // Generate completions for zsh
    generate_to(Zsh, &mut cmd, "isbdm", &outdir)?;

    // Generate completions for fish
    generate_to(Fish, &mut cmd, "isbdm", &outdir)?;

    println!("cargo:warning=Shell completions generated in {outdir:?}");

    Ok(())
}
