//! mrnorm command-line interface

use clap::Parser;
use log::{info, LevelFilter};

use mrnorm::cli::{Cli, Commands};
use mrnorm::prelude::*;

fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp(None)
        .init();

    let result = match cli.command {
        Commands::Normalize {
            counts,
            groups,
            reference,
            output,
            factors,
            drop_unassigned,
            threads,
        } => run_normalize(
            &counts,
            &groups,
            &reference,
            &output,
            factors.as_deref(),
            drop_unassigned,
            threads,
        ),
        Commands::Factors {
            counts,
            groups,
            reference,
            output,
            drop_unassigned,
        } => run_factors(&counts, &groups, &reference, &output, drop_unassigned),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn load_inputs(
    counts_path: &str,
    groups_path: &str,
) -> Result<(CountMatrix, GroupAssignment)> {
    info!("Loading count matrix from: {}", counts_path);
    let matrix = read_count_matrix(counts_path)?;
    info!("  {} samples, {} genes", matrix.n_samples(), matrix.n_genes());

    info!("Loading group assignment from: {}", groups_path);
    let assignment = read_grouping(groups_path)?;
    info!(
        "  {} samples across {} groups",
        assignment.n_samples(),
        assignment.groups().len()
    );

    Ok((matrix, assignment))
}

fn run_normalize(
    counts_path: &str,
    groups_path: &str,
    reference: &str,
    output_path: &str,
    factors_path: Option<&str>,
    drop_unassigned: bool,
    threads: usize,
) -> Result<()> {
    if threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .ok();
    }

    let (matrix, assignment) = load_inputs(counts_path, groups_path)?;

    let policy = if drop_unassigned {
        UnassignedPolicy::Drop
    } else {
        UnassignedPolicy::Error
    };

    info!("Normalizing against reference group '{}'...", reference);
    let result = normalize(&matrix, &assignment, reference, policy)?;

    for (group_id, tau) in result.group_ids.iter().zip(result.tau.iter()) {
        info!("  tau[{}] = {:.4}", group_id, tau);
    }

    info!("Writing normalized counts to: {}", output_path);
    write_count_matrix(output_path, &result.normalized)?;

    if let Some(path) = factors_path {
        info!("Writing factor summary to: {}", path);
        write_factors(path, &result, &assignment)?;
    }

    info!("Done!");
    Ok(())
}

fn run_factors(
    counts_path: &str,
    groups_path: &str,
    reference: &str,
    output_path: &str,
    drop_unassigned: bool,
) -> Result<()> {
    let (matrix, assignment) = load_inputs(counts_path, groups_path)?;

    let policy = if drop_unassigned {
        UnassignedPolicy::Drop
    } else {
        UnassignedPolicy::Error
    };

    info!("Estimating factors against reference group '{}'...", reference);
    let result = normalize(&matrix, &assignment, reference, policy)?;

    info!("Writing factor summary to: {}", output_path);
    write_factors(output_path, &result, &assignment)?;

    info!("Done!");
    Ok(())
}
