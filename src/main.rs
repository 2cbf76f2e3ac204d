use clap::{Parser, Subcommand};
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use env_logger::Env;
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

use netdesigner::events::{CoreEvent, EventBus};
use netdesigner::simulation::{self, Simulator, TransportMode};
use netdesigner::snapshot;
use netdesigner::topology::Topology;

/// Headless companion tool for NetDesigner snapshot files
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the devices and connections in a snapshot
    Info {
        /// Path to the snapshot JSON file
        snapshot: PathBuf,
    },
    /// Run a mock ping between two devices in a snapshot
    Ping {
        snapshot: PathBuf,
        /// Source device id, e.g. Computer_1
        from: String,
        /// Target device id
        to: String,
    },
    /// Animate a mock packet send between two devices in a snapshot
    Send {
        snapshot: PathBuf,
        from: String,
        to: String,
        /// Payload carried by the packet
        #[arg(long, default_value = simulation::DEFAULT_PAYLOAD)]
        data: String,
        /// Send TCP-style: wait for the acknowledgment pass
        #[arg(long)]
        tcp: bool,
    },
    /// Print mock per-device latency samples
    Latency { snapshot: PathBuf },
}

fn main() -> Result<()> {
    color_eyre::install()?;
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    match args.command {
        Command::Info { snapshot } => {
            let topology = load_topology(&snapshot)?;
            print_info(&topology);
        }
        Command::Ping { snapshot, from, to } => {
            let topology = load_topology(&snapshot)?;
            run_session(&topology, |simulator, topology| {
                simulator.ping(topology, &from, &to)
            })?;
        }
        Command::Send { snapshot, from, to, data, tcp } => {
            let topology = load_topology(&snapshot)?;
            let mode = if tcp { TransportMode::Tcp } else { TransportMode::Udp };
            run_session(&topology, |simulator, topology| {
                simulator.send_packet(topology, &from, &to, Some(&data), mode)
            })?;
        }
        Command::Latency { snapshot } => {
            let topology = load_topology(&snapshot)?;
            for (name, latency) in simulation::mock_latency_samples(&topology) {
                println!("{:<24} {:>3} ms", name, latency);
            }
        }
    }
    Ok(())
}

fn load_topology(path: &Path) -> Result<Topology> {
    info!("Loading snapshot {:?}", path);
    let text = fs::read_to_string(path)
        .wrap_err_with(|| format!("Failed to read snapshot file {:?}", path))?;
    let document = snapshot::from_json(&text)?;
    let topology = snapshot::deserialize(&document)?;
    info!(
        "Snapshot contains {} device(s) and {} connection(s)",
        topology.device_count(),
        topology.connection_count()
    );
    Ok(topology)
}

fn print_info(topology: &Topology) {
    let view = topology.graph_view();
    println!("Devices:");
    for node in &view.nodes {
        println!("  {:<16} {:<20} ip={:<16} mac={}", node.id, node.label, node.ip, node.mac);
    }
    println!("Connections:");
    for edge in &view.edges {
        println!("  {} <-> {} ({})", edge.a, edge.b, edge.link_type.label());
    }
}

/// Start one simulation session and stream its events to the console
fn run_session<F>(topology: &Topology, start: F) -> Result<()>
where
    F: FnOnce(
        &mut Simulator,
        &Topology,
    ) -> Result<netdesigner::simulation::SimulationHandle, netdesigner::error::CoreError>,
{
    let (bus, events) = EventBus::channel();
    let mut simulator = Simulator::new(bus);
    let handle = start(&mut simulator, topology)?;

    for event in &events {
        match event {
            CoreEvent::SimulationStep { position, .. } => {
                println!("  packet at ({:.1}, {:.1})", position.x, position.y);
            }
            CoreEvent::SimulationResult { result, .. } => {
                match result {
                    Ok(report) => println!("{}", report),
                    Err(error) => println!("{}", error),
                }
                break;
            }
            _ => {}
        }
    }
    handle.join();
    Ok(())
}
