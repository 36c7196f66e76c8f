//! Command-line interface for mrnorm

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "mrnorm")]
#[command(author = "SunJu Kim")]
#[command(version)]
#[command(about = "Median ratio normalization of gene-expression count matrices")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Normalize a count matrix with MRN
    #[command(
        long_about = "Normalize a count matrix with median ratio normalization.\n\n\
            Scales each sample by its library size, builds per-group (clone) mean\n\
            profiles, estimates a median fold-change factor (tau) per group against\n\
            the reference group, combines tau with the raw library sizes into\n\
            geometric-mean-centered relative factors, and divides the raw counts\n\
            by them.",
        after_long_help = "\
Examples:
  mrnorm normalize -c counts.tsv -g groups.tsv -r cloneA -o normalized.tsv
  mrnorm normalize -c counts.tsv -g groups.tsv -r cloneA -o normalized.tsv \\
    --factors factors.json --drop-unassigned"
    )]
    Normalize {
        /// Path to count matrix TSV/CSV file
        #[arg(short, long,
            long_help = "Path to count matrix file.\n\
                Format: first column = gene IDs, remaining columns = raw counts per sample.\n\
                Supports both CSV (comma) and TSV (tab) delimiters (auto-detected).")]
        counts: String,

        /// Path to sample-to-group assignment TSV/CSV file
        #[arg(short, long,
            long_help = "Path to group assignment file.\n\
                Format: header row, then one row per sample with the sample ID in the\n\
                first column and its group (clone) ID in the second.")]
        groups: String,

        /// Reference group ID
        #[arg(short, long,
            long_help = "Group whose mean profile serves as the fold-change denominator.\n\
                Must be present in the group assignment; there is no default, since the\n\
                right reference is an experimental-design decision.")]
        reference: String,

        /// Output file path for the normalized matrix [default: mrn_normalized.tsv]
        #[arg(short, long, default_value = "mrn_normalized.tsv")]
        output: String,

        /// Also write a JSON factor summary to this path
        #[arg(long, value_name = "FILE",
            long_help = "Write library sizes, per-group tau, effective library sizes, and\n\
                relative normalization factors as JSON to the given path.")]
        factors: Option<String>,

        /// Drop matrix samples that lack a group assignment
        #[arg(long,
            long_help = "Drop matrix samples that lack a group assignment instead of\n\
                aborting. Dropped samples are excluded from the entire run and from\n\
                the output.")]
        drop_unassigned: bool,

        /// Number of threads (0 = auto) [default: 0]
        #[arg(short = 't', long, default_value = "0")]
        threads: usize,
    },

    /// Compute normalization factors only
    #[command(
        long_about = "Compute MRN scaling factors without rescaling the counts.\n\n\
            Writes library sizes, per-group tau, effective library sizes, and\n\
            relative normalization factors as JSON.",
        after_long_help = "\
Examples:
  mrnorm factors -c counts.tsv -g groups.tsv -r cloneA -o factors.json"
    )]
    Factors {
        /// Path to count matrix TSV/CSV file
        #[arg(short, long)]
        counts: String,

        /// Path to sample-to-group assignment TSV/CSV file
        #[arg(short, long)]
        groups: String,

        /// Reference group ID
        #[arg(short, long)]
        reference: String,

        /// Output file path [default: mrn_factors.json]
        #[arg(short, long, default_value = "mrn_factors.json")]
        output: String,

        /// Drop matrix samples that lack a group assignment
        #[arg(long)]
        drop_unassigned: bool,
    },
}
