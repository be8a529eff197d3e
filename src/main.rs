//! Plastanno: plastic-degrading enzyme hit annotation CLI
//!
//! Annotates aligner hits against a plastic-degrading enzyme database and
//! summarizes them by plastic type, backbone, degradability and feedstock.

mod cli;
mod pipeline;
mod report;
mod utils;

use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use log::{info, warn};

use cli::align::{run_align, run_makedb, AlignOptions};
use cli::{confirm_overwrite, Cli, Commands, RunConfig};
use pipeline::{join_and_expand, load_inputs, PipelineRun};
use report::{display_top_groups, write_outputs, RunSummary};
use utils::{
    create_spinner, finish_with_success, finish_with_warning, print_banner, print_completion,
    print_config, print_count, print_info, print_step_header, print_step_time, print_success,
    print_warning,
};

fn init_log(verbose: u8) {
    // Warnings are always shown; each -v adds a level
    let level = 1 + verbose as usize;
    if let Err(e) = stderrlog::new()
        .module(module_path!())
        .quiet(false)
        .verbosity(level)
        .timestamp(stderrlog::Timestamp::Off)
        .init()
    {
        eprintln!("Failed to initialize logging: {}", e);
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_log(cli.verbose);

    // Handle subcommands
    if let Some(command) = &cli.command {
        return match command {
            Commands::Align {
                query,
                db,
                out,
                threads,
                evalue,
                max_target_seqs,
                id,
                aligner,
            } => {
                let options = AlignOptions {
                    threads: *threads,
                    evalue: *evalue,
                    max_target_seqs: *max_target_seqs,
                    min_identity: *id,
                };
                let spinner = create_spinner("Aligning query sequences...");
                run_align(aligner, query, db, out, &options)?;
                finish_with_success(&spinner, &format!("Hit report written to {}", out.display()));
                Ok(())
            }
            Commands::Makedb { fasta, db, aligner } => {
                let spinner = create_spinner("Building aligner database...");
                run_makedb(aligner, fasta, db)?;
                finish_with_success(&spinner, &format!("Database written to {}", db.display()));
                Ok(())
            }
        };
    }

    // Main annotation pipeline
    let config = RunConfig::from_cli(&cli)?;

    print_banner(env!("CARGO_PKG_VERSION"));
    print_config(
        &config.inputs.hits,
        &config.inputs.gene_types,
        &config.inputs.plastic_classes,
        &config.outputs.dir,
    );

    let existing = config.outputs.existing(&config.write);
    if !existing.is_empty() && !config.no_confirm && !confirm_overwrite(&existing)? {
        println!("Cancelled by user.");
        return Ok(());
    }

    // Step 1: Load inputs
    print_step_header(1, "Load Inputs");

    let step_start = Instant::now();
    let spinner = create_spinner("Reading hit report and annotation tables...");
    let inputs = load_inputs(&config.inputs, &config.columns)?;
    finish_with_success(&spinner, "Inputs loaded");

    print_count("hit(s)", inputs.hits.len(), None);
    print_count("gene-type annotation(s)", inputs.gene_types.len(), None);
    print_count("plastic classification(s)", inputs.plastic_classes.len(), None);
    let load_elapsed = step_start.elapsed();
    print_step_time(load_elapsed);

    // Step 2: Join and expand
    print_step_header(2, "Join & Expand");

    let step_start = Instant::now();
    let spinner = create_spinner("Joining hits to gene types...");
    let joined = join_and_expand(&inputs.hits, &inputs.gene_types, &inputs.plastic_classes);

    if joined.retained_rows == 0 {
        finish_with_warning(&spinner, "No hit matched a gene-type label");
    } else {
        finish_with_success(&spinner, "Join complete");
        print_count(
            "annotated row(s)",
            joined.rows.len(),
            Some(&format!("(from {} joined row(s))", joined.retained_rows)),
        );
    }
    let join_elapsed = step_start.elapsed();
    print_step_time(join_elapsed);

    // Step 3: Aggregate
    print_step_header(3, "Aggregate");

    let step_start = Instant::now();
    let run = PipelineRun::from_joined(&inputs.hits, joined);
    let counts = run.aggregates.counts.clone();

    if let Some(warning) = counts.empty_join_warning() {
        warn!("{}", warning);
        print_warning(&warning.to_string());
    } else {
        print_success("Grouped rows by plastic type, backbone, degradability and feedstock");
    }
    if counts.unclassified_rows > 0 {
        print_info(&format!(
            "{} row(s) have a plastic type missing from the classification table",
            style(counts.unclassified_rows).yellow()
        ));
    }
    let aggregate_elapsed = step_start.elapsed();
    print_step_time(aggregate_elapsed);

    // Step 4: Save outputs
    print_step_header(4, "Save Results");

    let step_start = Instant::now();
    let spinner = create_spinner("Writing tables and charts...");
    let written = write_outputs(
        &config.outputs,
        &config.inputs,
        &run,
        &config.columns,
        &config.write,
    )
    .context("Failed to write outputs")?;
    finish_with_success(
        &spinner,
        &format!("Wrote {} file(s) to {}", written.len(), config.outputs.dir.display()),
    );
    info!("outputs: {:?}", written);
    let save_elapsed = step_start.elapsed();
    print_step_time(save_elapsed);

    // Display summary
    let mut summary = RunSummary::new(counts);
    summary.set_load_time(load_elapsed);
    summary.set_join_time(join_elapsed);
    summary.set_aggregate_time(aggregate_elapsed);
    summary.set_save_time(save_elapsed);
    summary.display();

    display_top_groups(&run.aggregates, pipeline::Dimension::PlasticType, config.write.top_n);

    print_completion(&config.outputs.dir);

    Ok(())
}
