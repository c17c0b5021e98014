use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tokio::runtime::Builder as TokioBuilder;
use workflow::config::WorkflowConfig;
use workflow::realtime::run_realtime;
use workflow::report::append_report;
use workflow::runner::Runner;

mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Headless echolocation sonar driver")]
struct Args {
    /// Load a workflow config from YAML
    #[arg(long)]
    workflow: Option<PathBuf>,
    #[arg(long, default_value_t = 0)]
    seed: u64,
    #[arg(long, default_value_t = 20_000)]
    duration_ms: u64,
    /// Time (ms) at which start/stop is pressed; repeat for several presses
    #[arg(long = "toggle")]
    toggles: Vec<u64>,
    #[arg(long, default_value_t = 500)]
    frame_interval_ms: u64,
    /// Drive the loop from the wall clock instead of virtual time
    #[arg(long, default_value_t = false)]
    realtime: bool,
    /// Append the run to this file as JSON lines
    #[arg(long)]
    report: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = if let Some(path) = args.workflow {
        WorkflowConfig::load(path)?
    } else {
        WorkflowConfig::from_args(
            args.seed,
            args.duration_ms,
            args.toggles,
            args.frame_interval_ms,
        )?
    };
    if args.report.is_some() {
        config.report = args.report;
    }

    let summary = if args.realtime {
        let runtime = TokioBuilder::new_current_thread()
            .enable_all()
            .build()
            .context("creating runtime for real-time run")?;
        runtime.block_on(run_realtime(&config))?
    } else {
        Runner::new(config.clone()).execute()?
    };

    let last = &summary.final_snapshot;
    println!(
        "Sonar run seed {} -> {} ms, pulses {}, objects spawned {} (evicted {}, expired {}), echoes {}",
        summary.seed,
        summary.elapsed_ms,
        summary.metrics.pulses_emitted,
        summary.metrics.objects_spawned,
        summary.metrics.objects_evicted,
        summary.metrics.objects_expired,
        summary.echoes
    );
    println!(
        "Final state: {} | PULSES {} | objects on scope {} (peak {}) | sweep {:.0} deg",
        last.status_label(),
        last.pulse_counter_label(),
        last.objects.len(),
        summary.max_objects_seen,
        last.sweep_angle
    );

    if let Some(path) = &config.report {
        append_report(path, &summary)?;
        println!("Report appended to {}", path.display());
    }

    Ok(())
}
