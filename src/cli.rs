use std::env;
use std::path::PathBuf;

use gridmind::logging::LogTarget;

/// Subcommand selected on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Summary,
    Cascade(String),
    Inspect(String),
    Diagnose,
    MapSvg,
    ExportCsv,
    ImportCsv(PathBuf),
    NetworkIp,
    Routes,
    Qr,
    #[cfg(feature = "api")]
    Serve,
    #[cfg(feature = "tui")]
    Tui,
}

/// File receiving log events while the dashboard owns the terminal.
#[cfg(feature = "tui")]
const TUI_LOG_FILE: &str = "gridmind-tui.log";

impl Command {
    /// Where this command's log events are written.
    pub fn log_target(&self) -> LogTarget {
        match self {
            #[cfg(feature = "tui")]
            Self::Tui => LogTarget::File(env::temp_dir().join(TUI_LOG_FILE)),
            _ => LogTarget::Stderr,
        }
    }
}

pub struct CliOptions {
    pub command: Command,
    pub config: Option<PathBuf>,
    pub preset: Option<String>,
    pub seed: Option<u64>,
    pub out: Option<PathBuf>,
    pub port: Option<u16>,
    pub env_file: Option<PathBuf>,
    pub asset: Option<String>,
    pub file: Option<String>,
    pub path: Option<String>,
}

pub fn parse_args() -> Result<CliOptions, String> {
    let args: Vec<String> = env::args().skip(1).collect();
    parse_args_from(args)
}

fn parse_args_from(args: Vec<String>) -> Result<CliOptions, String> {
    if args.len() == 1 && (args[0] == "--help" || args[0] == "-h") {
        print_usage();
        std::process::exit(0);
    }
    parse_options(&args)
}

fn parse_options(args: &[String]) -> Result<CliOptions, String> {
    let mut i = 0usize;
    let mut positional: Vec<&str> = Vec::new();
    let mut opts = CliOptions {
        command: Command::Summary,
        config: None,
        preset: None,
        seed: None,
        out: None,
        port: None,
        env_file: None,
        asset: None,
        file: None,
        path: None,
    };

    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                i += 1;
                let path = args.next_or_err(i, "missing value for --config (expected a TOML file path)")?;
                if opts.config.replace(PathBuf::from(path)).is_some() {
                    return Err("--config provided more than once".to_string());
                }
            }
            "--preset" => {
                i += 1;
                let name = args.next_or_err(i, "missing value for --preset (expected a preset name)")?;
                if opts.preset.replace(name.to_string()).is_some() {
                    return Err("--preset provided more than once".to_string());
                }
            }
            "--seed" => {
                i += 1;
                let raw = args.next_or_err(i, "missing value for --seed (expected a u64)")?;
                let seed = raw
                    .parse::<u64>()
                    .map_err(|_| format!("--seed value \"{raw}\" is not a valid u64"))?;
                opts.seed = Some(seed);
            }
            "--port" => {
                i += 1;
                let raw = args.next_or_err(i, "missing value for --port (expected a u16)")?;
                let port = raw
                    .parse::<u16>()
                    .map_err(|_| format!("--port value \"{raw}\" is not a valid u16"))?;
                opts.port = Some(port);
            }
            "--out" => {
                i += 1;
                let path = args.next_or_err(i, "missing value for --out (expected a path)")?;
                opts.out = Some(PathBuf::from(path));
            }
            "--env-file" => {
                i += 1;
                let path = args.next_or_err(i, "missing value for --env-file (expected a path)")?;
                opts.env_file = Some(PathBuf::from(path));
            }
            "--asset" => {
                i += 1;
                opts.asset = Some(args.next_or_err(i, "missing value for --asset")?.to_string());
            }
            "--file" => {
                i += 1;
                opts.file = Some(args.next_or_err(i, "missing value for --file")?.to_string());
            }
            "--path" => {
                i += 1;
                opts.path = Some(args.next_or_err(i, "missing value for --path (expected a page path)")?.to_string());
            }
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            other if other.starts_with("--") => return Err(format!("unknown argument: {other}")),
            other => positional.push(other),
        }
        i += 1;
    }

    if opts.config.is_some() && opts.preset.is_some() {
        return Err(
            "arguments `--config` and `--preset` are mutually exclusive; choose one source"
                .to_string(),
        );
    }

    opts.command = parse_command(&positional)?;
    Ok(opts)
}

fn parse_command(positional: &[&str]) -> Result<Command, String> {
    let Some((&name, rest)) = positional.split_first() else {
        return Ok(Command::Summary);
    };
    let command = match name {
        "summary" => Command::Summary,
        "cascade" => {
            return match rest {
                [id] => Ok(Command::Cascade((*id).to_string())),
                [] => Err("cascade requires a node id".to_string()),
                _ => Err("cascade takes exactly one node id".to_string()),
            };
        }
        "inspect" => {
            return match rest {
                [id] => Ok(Command::Inspect((*id).to_string())),
                _ => Err("inspect requires exactly one node id".to_string()),
            };
        }
        "import-csv" => {
            return match rest {
                [path] => Ok(Command::ImportCsv(PathBuf::from(path))),
                _ => Err("import-csv requires exactly one CSV path".to_string()),
            };
        }
        "diagnose" => Command::Diagnose,
        "map-svg" => Command::MapSvg,
        "export-csv" => Command::ExportCsv,
        "network-ip" => Command::NetworkIp,
        "routes" => Command::Routes,
        "qr" => Command::Qr,
        #[cfg(feature = "api")]
        "serve" => Command::Serve,
        #[cfg(feature = "tui")]
        "tui" => Command::Tui,
        other => return Err(format!("unknown command: {other}")),
    };
    if let Some(extra) = rest.first() {
        return Err(format!("unexpected argument for {name}: {extra}"));
    }
    Ok(command)
}

trait SliceArgExt {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String>;
}

impl SliceArgExt for [String] {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String> {
        self.get(index)
            .map(String::as_str)
            .ok_or_else(|| err.to_string())
    }
}

pub fn print_usage() {
    eprintln!("gridmind — grid monitoring demo");
    eprintln!();
    eprintln!("Usage: gridmind [--config <path> | --preset <name>] [COMMAND] [OPTIONS]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  summary                  Print topology counts (default)");
    eprintln!("  cascade <id>             Simulate a cascade from a critical node");
    eprintln!("  inspect <id>             Show a node and queue it for diagnosis");
    eprintln!("  diagnose                 Run the simulated diagnostics pipeline");
    eprintln!("  map-svg                  Render the static map (--out <file>)");
    eprintln!("  export-csv               Write nodes and lines CSV (--out <dir>)");
    eprintln!("  import-csv <path>        Ingest node drafts from CSV");
    eprintln!("  network-ip               Detect the LAN address and update the env file");
    eprintln!("  routes                   List page routes");
    eprintln!("  qr                       Print a LAN link and QR image URL (--path <page>)");
    #[cfg(feature = "api")]
    eprintln!("  serve                    Start the REST API server (--port <u16>)");
    #[cfg(feature = "tui")]
    eprintln!("  tui                      Open the terminal grid dashboard");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --config <path>          Load configuration from a TOML file");
    eprintln!("  --preset <name>          Use a built-in preset (demo, field)");
    eprintln!("  --seed <u64>             Diagnostics seed");
    eprintln!("  --asset <id>             Diagnostics asset label");
    eprintln!("  --file <name>            Diagnostics uploaded file label");
    eprintln!("  --out <path>             Output file or directory");
    eprintln!("  --port <u16>             Server port");
    eprintln!("  --env-file <path>        Env file updated by network-ip");
    eprintln!("  --path <page>            Page path for qr");
}
