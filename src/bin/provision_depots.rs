// Provision the Depots table in the master database or in every tenant
// database listed in the master's Tenants table.
//
// Usage:
//   cargo run --bin provision_depots -- --db ./depots.db --target master
//   cargo run --bin provision_depots -- --db ./master.db --target tenants --no-seed

use anyhow::Context;
use clap::Parser;
use depot_management::schema::{DepotsTableBuilder, ProvisionTarget, SeedPolicy};
use depot_management::{config, logging};

#[derive(Debug, Parser)]
#[command(name = "provision_depots", about = "Converge the Depots table schema", long_about = None)]
struct Args {
    /// Master database path (defaults to the per-user data directory)
    #[arg(long, env = config::ENV_DB_PATH)]
    db: Option<String>,

    /// Which databases to provision: master or tenants
    #[arg(long, default_value = "master")]
    target: ProvisionTarget,

    /// Do not seed an empty Depots table
    #[arg(long)]
    no_seed: bool,

    /// Emit JSON logs
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    if args.json {
        logging::init_json();
    } else {
        logging::init();
    }

    let db_path = args.db.unwrap_or_else(config::default_db_path);
    let seed_policy = if args.no_seed {
        SeedPolicy::Skip
    } else {
        SeedPolicy::DefaultDepots
    };

    let summary = DepotsTableBuilder::new(db_path.as_str())
        .with_seed_policy(seed_policy)
        .run_target(args.target)
        .with_context(|| format!("provisioning {} from {}", args.target, db_path))?;

    for (db, report) in &summary.converged {
        println!(
            "{}: table_created={} columns_added=[{}] seeded_rows={}",
            db,
            report.table_created,
            report.columns_added.join(", "),
            report.seeded_rows
        );
    }
    for (db, error) in &summary.failed {
        eprintln!("{}: FAILED {}", db, error);
    }

    summary.into_result()?;
    Ok(())
}
