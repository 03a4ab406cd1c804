use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use lvzj::{Config, RenderNode};

#[derive(Parser)]
#[command(name = "lvzj")]
#[command(about = "Render LvZJ markup as HTML, a JSON tree or plain text")]
struct Cli {
    /// Input markup file, `-` for stdin
    input: PathBuf,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Html)]
    format: Format,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Html,
    Json,
    Text,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match Config::try_load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        },
        None => Config::compiled_default(),
    };

    let markup = match read_input(&cli.input) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Error reading {}: {}", cli.input.display(), e);
            std::process::exit(1);
        }
    };

    let nodes = match lvzj::parse_with_config(&markup, &config) {
        Ok(nodes) => nodes,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let rendered = match cli.format {
        Format::Html => {
            let now = chrono::Local::now().naive_local();
            lvzj::render_html(&nodes, now, &config.html)
        }
        Format::Json => match serde_json::to_string_pretty(&nodes) {
            Ok(json) => json + "\n",
            Err(e) => {
                eprintln!("Error serializing tree: {}", e);
                std::process::exit(1);
            }
        },
        Format::Text => RenderNode::Fragment(nodes).plain_text(),
    };

    let written = match &cli.output {
        Some(path) => fs::write(path, rendered),
        None => io::stdout().write_all(rendered.as_bytes()),
    };
    if let Err(e) = written {
        eprintln!("Error writing output: {}", e);
        std::process::exit(1);
    }
}

fn read_input(path: &Path) -> io::Result<String> {
    if path.as_os_str() == "-" {
        let mut markup = String::new();
        io::stdin().read_to_string(&mut markup)?;
        Ok(markup)
    } else {
        fs::read_to_string(path)
    }
}
