use clap::Parser;
use std::fs;
use std::path::PathBuf;

use autobind_generator::error::BindError;
use autobind_generator::{generate_units, parse_source, preview_first};

#[derive(Parser)]
#[command(name = "autobind")]
#[command(about = "Generate request-binding field maps from tagged struct declarations", long_about = None)]
struct Cli {
    /// Input source file containing struct declarations
    input: Option<PathBuf>,

    /// Print the first struct's generated bindings to stdout instead of
    /// writing files
    #[arg(short, long)]
    print: bool,

    /// Pretty-print the parsed declaration model as JSON and exit
    #[arg(short, long)]
    dump: bool,
}

fn main() -> Result<(), BindError> {
    let cli = Cli::parse();

    let Some(input) = cli.input else {
        println!("Usage: autobind <file> [--print]\nExample: autobind models.go");
        return Ok(());
    };

    let text = fs::read_to_string(&input).map_err(BindError::Io)?;

    if cli.dump {
        let unit = parse_source(&text)?;
        println!("{}", serde_json::to_string_pretty(&unit).unwrap());
        return Ok(());
    }

    if cli.print {
        if let Some(preview) = preview_first(&text)? {
            println!("{}", preview);
        }
        return Ok(());
    }

    for unit in generate_units(&text)? {
        fs::write(&unit.file_name, &unit.text).map_err(BindError::Io)?;
        println!("Generated {}", unit.file_name);
    }
    Ok(())
}
