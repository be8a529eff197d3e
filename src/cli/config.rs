//! Resolved run configuration

use anyhow::{Context, Result};

use crate::cli::Cli;
use crate::pipeline::{ColumnNames, InputPaths};
use crate::report::{OutputPaths, WriteOptions};

/// Everything a pipeline run needs, validated
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub inputs: InputPaths,
    pub columns: ColumnNames,
    pub outputs: OutputPaths,
    pub write: WriteOptions,
    pub no_confirm: bool,
}

impl RunConfig {
    /// Resolve and validate the main pipeline arguments
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let hits = cli
            .hits
            .clone()
            .context("Hit report is required. Use -i/--hits to specify a file.")?;
        let gene_types = cli
            .gene_types
            .clone()
            .context("Gene-type table is required. Use -g/--gene-types to specify a file.")?;
        let plastic_classes = cli.plastic_classes.clone().context(
            "Plastic classification table is required. Use -c/--plastic-classes to specify a file.",
        )?;

        for path in [&hits, &gene_types, &plastic_classes] {
            if !path.is_file() {
                anyhow::bail!("Input file not found: {}", path.display());
            }
        }

        let columns = ColumnNames {
            label: cli.label_column.clone(),
            plastic_type: cli.plastic_column.clone(),
            abbreviation: cli.abbreviation_column.clone(),
            name: cli.name_column.clone(),
            backbone: cli.backbone_column.clone(),
            degradability: cli.degradability_column.clone(),
            feedstock: cli.feedstock_column.clone(),
        };
        validate_columns(&columns)?;

        let dir = cli.output_dir().context("Could not derive an output directory")?;
        let prefix = cli
            .prefix()
            .filter(|p| !p.is_empty())
            .context("Could not derive an output prefix. Use --prefix to set one.")?;

        Ok(Self {
            inputs: InputPaths {
                hits,
                gene_types,
                plastic_classes,
            },
            columns,
            outputs: OutputPaths::new(dir, prefix),
            write: WriteOptions {
                charts: !cli.no_charts,
                top_n: cli.top_n,
                bundle: cli.bundle,
            },
            no_confirm: cli.no_confirm,
        })
    }
}

/// Column names must be non-empty and free of tabs
fn validate_columns(columns: &ColumnNames) -> Result<()> {
    let named = [
        ("label", &columns.label),
        ("plastic", &columns.plastic_type),
        ("abbreviation", &columns.abbreviation),
        ("name", &columns.name),
        ("backbone", &columns.backbone),
        ("degradability", &columns.degradability),
        ("feedstock", &columns.feedstock),
    ];
    for (flag, value) in named {
        if value.trim().is_empty() || value.contains('\t') {
            anyhow::bail!("--{}-column must be a non-empty name without tabs", flag);
        }
    }
    Ok(())
}
