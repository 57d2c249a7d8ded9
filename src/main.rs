//! GridMind entry point: CLI wiring and config-driven command dispatch.

mod cli;

use std::collections::BTreeSet;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::process;
use std::thread;
use std::time::{Duration, Instant};

use rand::Rng;
use tracing::warn;

use cli::{CliOptions, Command};
use gridmind::config::AppConfig;
use gridmind::diagnostics::{
    DiagnosticRequest, DiagnosticsRun, request_diagnosis, standard_phases, take_target,
};
use gridmind::error::{GridError, Result};
use gridmind::grid::{GridTopology, TriggerOutcome};
use gridmind::handoff::Handoff;
use gridmind::io::{export, import};
use gridmind::map::projection::{GeoBounds, tile_for};
use gridmind::map::svg::{FailureOverlay, render_svg};
use gridmind::{ingest, logging, netinfo, qr, routes};

/// Poll interval while animating diagnostics progress.
const PROGRESS_POLL: Duration = Duration::from_millis(100);

/// Zoom used for the map-centre tile printed by `summary`.
const SUMMARY_ZOOM: u8 = 10;

/// Resolves `--config`, `--preset` or the demo default, then validates.
fn load_config(opts: &CliOptions) -> std::result::Result<AppConfig, Vec<String>> {
    let config = if let Some(ref path) = opts.config {
        AppConfig::from_toml_file(path)
    } else if let Some(ref name) = opts.preset {
        AppConfig::from_preset(name)
    } else {
        Ok(AppConfig::demo())
    };
    let config = config.map_err(|e| vec![e.to_string()])?;

    let errors = config.validate();
    if errors.is_empty() {
        Ok(config)
    } else {
        Err(errors.iter().map(ToString::to_string).collect())
    }
}

/// Loads the topology and folds in nodes left by previous ingestions.
fn load_grid(config: &AppConfig) -> Result<GridTopology> {
    let mut topology = config.load_topology()?;
    let mut handoff = Handoff::in_dir(&config.server.handoff_dir)?;
    for id in ingest::accept_pending(&mut topology, &mut handoff)? {
        eprintln!("Accepted ingested node {id}");
    }
    Ok(topology)
}

fn run_summary(config: &AppConfig) -> Result<()> {
    let topology = load_grid(config)?;
    let s = topology.summary();
    println!("Nodes: {}  Lines: {}", s.node_count, s.line_count);
    for (status, count) in &s.nodes_by_status {
        println!("  {status:<10} {count}");
    }
    for (kind, count) in &s.nodes_by_kind {
        println!("  {kind:<12} {count}");
    }
    for (status, count) in &s.lines_by_status {
        println!("  line {status:<8} {count}");
    }
    println!("Mean health: {:.1}", s.mean_health);
    let region = &config.grid.region;
    println!("In region {region}: {}", topology.nodes_in_region(region).count());
    if s.dangling_lines > 0 {
        println!("Dangling lines: {}", s.dangling_lines);
    }
    if let Some(bounds) = GeoBounds::enclosing(topology.nodes(), 0.0) {
        let center = bounds.center();
        let (x, y) = tile_for(center, SUMMARY_ZOOM);
        println!(
            "Map centre: {:.4}, {:.4}  tile: {}",
            center.lat,
            center.lng,
            config.tile_layer().tile_url(SUMMARY_ZOOM, x, y)
        );
        println!("  {}", config.tile_layer().attribution());
    }
    Ok(())
}

fn run_cascade(config: &AppConfig, id: &str) -> Result<()> {
    let topology = load_grid(config)?;
    let mut simulator = config.cascade_simulator();
    match simulator.trigger(&topology, id, Instant::now()) {
        TriggerOutcome::Started(report) => {
            println!("Cascade from {} (depth {})", report.origin, simulator.depth());
            println!("Failed nodes: {}", join(&report.failed_nodes));
            println!("Failed lines: {}", join(&report.failed_lines));
            Ok(())
        }
        TriggerOutcome::NotCritical(status) => {
            println!("{id} is {status}; only critical nodes start a cascade");
            Ok(())
        }
        TriggerOutcome::UnknownNode => Err(GridError::UnknownNode(id.to_string())),
        TriggerOutcome::Busy => {
            println!("Simulator busy; request dropped");
            Ok(())
        }
    }
}

fn run_inspect(config: &AppConfig, id: &str) -> Result<()> {
    let topology = load_grid(config)?;
    let n = topology
        .node(id)
        .ok_or_else(|| GridError::UnknownNode(id.to_string()))?;
    println!("{} — {} ({})", n.id, n.name, n.kind);
    println!(
        "  status={}  health={}  {:.0} kV  load={:.0}%  {:.1}°C  region={}",
        n.status, n.health, n.voltage_kv, n.load_pct, n.temperature_c, n.region
    );
    println!("  at {:.4}, {:.4}", n.position.lat, n.position.lng);
    println!("  connections: {}", join(&n.connections));
    let mut handoff = Handoff::in_dir(&config.server.handoff_dir)?;
    request_diagnosis(&topology, &mut handoff, id)?;
    println!("Queued {id} for the next `diagnose` run");
    Ok(())
}

fn join<'a>(ids: impl IntoIterator<Item = &'a String>) -> String {
    let list: Vec<&str> = ids.into_iter().map(String::as_str).collect();
    if list.is_empty() {
        "(none)".to_string()
    } else {
        list.join(", ")
    }
}

fn run_diagnose(config: &AppConfig, opts: &CliOptions) -> Result<()> {
    let seed = opts
        .seed
        .or(config.diagnostics.seed)
        .unwrap_or_else(|| rand::rng().random());
    let asset_id = match opts.asset {
        Some(ref asset) => asset.clone(),
        None => {
            let mut handoff = Handoff::in_dir(&config.server.handoff_dir)?;
            take_target(&mut handoff)?.unwrap_or_else(|| "unassigned".to_string())
        }
    };
    let request = DiagnosticRequest {
        asset_id,
        file_name: opts.file.clone().unwrap_or_else(|| "sensor_log.csv".to_string()),
    };
    let run = DiagnosticsRun::start(
        request,
        standard_phases(config.phase_duration()),
        seed,
        Instant::now(),
    );

    let mut shown = None;
    let verdict = loop {
        let now = Instant::now();
        let progress = run.progress(now);
        if shown != Some(progress.phase_index) {
            eprintln!("[{:>3.0}%] {}", progress.fraction * 100.0, progress.phase_label);
            shown = Some(progress.phase_index);
        }
        if let Some(v) = run.verdict(now) {
            break v;
        }
        thread::sleep(PROGRESS_POLL);
    };

    println!("Asset: {}  (seed {seed})", verdict.asset_id);
    println!(
        "Severity: {}  Health: {}/100  Confidence: {:.1}%",
        verdict.severity, verdict.health_score, verdict.confidence_pct
    );
    println!("Fault: {}", verdict.fault);
    println!("Remaining life: {:.1} years", verdict.remaining_life_years);
    for c in &verdict.correlations {
        println!("  {:<28} {:>3}%", c.factor, c.percent);
    }
    println!("\n{}\n", verdict.narrative);
    for (i, action) in verdict.actions.iter().enumerate() {
        println!("{}. {action}", i + 1);
    }
    Ok(())
}

fn run_map_svg(config: &AppConfig, opts: &CliOptions) -> Result<()> {
    let topology = load_grid(config)?;
    let svg = render_svg(
        &topology,
        &FailureOverlay::default(),
        config.map.width,
        config.map.height,
    );
    match opts.out {
        Some(ref path) => {
            fs::write(path, svg)?;
            eprintln!("Map written to {}", path.display());
        }
        None => io::stdout().write_all(svg.as_bytes())?,
    }
    Ok(())
}

fn run_export(config: &AppConfig, opts: &CliOptions) -> Result<()> {
    let topology = load_grid(config)?;
    let dir = opts.out.as_deref().unwrap_or(Path::new("."));
    fs::create_dir_all(dir)?;
    let none = BTreeSet::new();
    export::export_topology(&topology, &none, &none, dir, "grid")?;
    eprintln!("CSV written to {}", dir.display());
    Ok(())
}

fn run_import(config: &AppConfig, path: &Path) -> Result<()> {
    let mut topology = load_grid(config)?;
    let mut handoff = Handoff::in_dir(&config.server.handoff_dir)?;
    let drafts = import::read_node_drafts(fs::File::open(path)?)?;
    let mut accepted = 0usize;
    for draft in drafts {
        match ingest::submit(&mut topology, &mut handoff, draft, &config.grid.region) {
            Ok(node) => {
                println!("ingested {} ({}, {})", node.id, node.kind, node.status);
                accepted += 1;
            }
            Err(e) => eprintln!("skipped: {e}"),
        }
    }
    println!("{accepted} node(s) ingested; {} total", topology.nodes().len());
    Ok(())
}

fn run_network_ip(config: &AppConfig, opts: &CliOptions) {
    let ip = netinfo::detect_local_ip();
    let port = opts.port.unwrap_or(config.server.port);
    let env_file = opts.env_file.as_deref().unwrap_or(&config.server.env_file);
    println!("Local network IP: {ip}");
    match netinfo::write_env_file(env_file, ip, port) {
        Ok(url) => {
            println!("Updated {}", env_file.display());
            println!("Open on your phone: {url}");
        }
        Err(e) => warn!(error = %e, path = %env_file.display(), "could not update env file"),
    }
}

fn run_routes() {
    for r in routes::route_table() {
        println!("{:<16} {}", r.path, r.title);
    }
}

fn run_qr(config: &AppConfig, opts: &CliOptions) -> std::result::Result<(), String> {
    let page = opts.path.as_deref().unwrap_or("/ar-camera");
    let route = routes::Route::from_path(page).ok_or_else(|| format!("unknown page \"{page}\""))?;
    let ip = netinfo::detect_local_ip().to_string();
    let port = opts.port.unwrap_or(config.server.port);
    let url = format!("{}{}", qr::lan_base_url(&ip, port), route.path());
    println!("{url}");
    println!("{}", qr::qr_image_url(&url, 240));
    Ok(())
}

#[cfg(feature = "api")]
fn run_serve(config: AppConfig, opts: &CliOptions) -> Result<()> {
    use std::net::SocketAddr;
    use std::sync::Arc;

    use gridmind::api::{AppState, GridState, serve};

    let topology = load_grid(&config)?;
    let grid = GridState {
        topology,
        cascade: config.cascade_simulator(),
        handoff: Handoff::in_dir(&config.server.handoff_dir)?,
    };
    let port = opts.port.unwrap_or(config.server.port);
    let lan_ip = netinfo::detect_local_ip().to_string();
    let state = Arc::new(AppState::new(config, lan_ip, grid));
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(serve(state, addr))?;
    Ok(())
}

#[cfg(feature = "tui")]
fn run_tui(config: &AppConfig) -> Result<()> {
    let topology = load_grid(config)?;
    gridmind::tui::run(topology, config.cascade_simulator())?;
    Ok(())
}

fn exit_on_err<E: std::fmt::Display>(result: std::result::Result<(), E>) {
    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

fn main() {
    let opts = cli::parse_args().unwrap_or_else(|e| {
        eprintln!("error: {e}");
        cli::print_usage();
        process::exit(1);
    });
    logging::init_tracing(&opts.command.log_target());

    let config = match load_config(&opts) {
        Ok(config) => config,
        // network-ip never fails; it falls back to the demo defaults.
        Err(errors) if opts.command == Command::NetworkIp => {
            for e in &errors {
                warn!("{e}");
            }
            AppConfig::demo()
        }
        Err(errors) => {
            for e in &errors {
                eprintln!("{e}");
            }
            process::exit(1);
        }
    };

    match opts.command {
        Command::Summary => exit_on_err(run_summary(&config)),
        Command::Cascade(ref id) => exit_on_err(run_cascade(&config, id)),
        Command::Inspect(ref id) => exit_on_err(run_inspect(&config, id)),
        Command::Diagnose => exit_on_err(run_diagnose(&config, &opts)),
        Command::MapSvg => exit_on_err(run_map_svg(&config, &opts)),
        Command::ExportCsv => exit_on_err(run_export(&config, &opts)),
        Command::ImportCsv(ref path) => exit_on_err(run_import(&config, path)),
        Command::NetworkIp => run_network_ip(&config, &opts),
        Command::Routes => run_routes(),
        Command::Qr => exit_on_err(run_qr(&config, &opts)),
        #[cfg(feature = "api")]
        Command::Serve => exit_on_err(run_serve(config, &opts)),
        #[cfg(feature = "tui")]
        Command::Tui => exit_on_err(run_tui(&config)),
    }
}
