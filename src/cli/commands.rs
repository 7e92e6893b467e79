use crate::cli::args::{Cli, Commands};
use crate::error::Result;
use crate::processors::{EquipmentFilter, UnifiedTableBuilder};
use crate::readers::{EquipmentReader, NoTemperatureSource, OpenMeteoClient, TemperatureSource};
use crate::settings::Settings;
use crate::utils::progress::ProgressReporter;
use crate::writers::{ConfigExportWriter, ParquetWriter};
use tracing::{info, warn};

pub async fn run(cli: Cli) -> Result<()> {
    let quiet = cli.quiet;

    match cli.command {
        Commands::Build {
            input_dir,
            output_file,
            log_dir,
            compression,
            no_weather,
        } => {
            let mut settings = Settings::load(Some(cli.config.as_path()))?;
            if let Some(dir) = input_dir {
                settings.input_dir = dir;
            }
            if let Some(file) = output_file {
                settings.output_file = file;
            }
            if let Some(dir) = log_dir {
                settings.log_dir = dir;
            }
            if let Some(compression) = compression {
                settings.compression = compression;
            }
            if no_weather {
                settings.weather.enabled = false;
            }

            if settings.weather.enabled {
                let client = OpenMeteoClient::new(&settings.weather)?;
                build(&settings, client, quiet).await
            } else {
                info!("Outside temperature fetch disabled");
                build(&settings, NoTemperatureSource, quiet).await
            }
        }

        Commands::ExportConfig {
            cad_points,
            techant,
            output_dir,
        } => {
            let reader = EquipmentReader::new();
            let egids = reader.read_egids(&cad_points)?;
            let records = reader.read_techant(&techant)?;
            info!(
                "Loaded {} CAD points and {} techant rows",
                egids.len(),
                records.len()
            );

            let exports = EquipmentFilter::default().build_exports(&egids, &records);
            if exports.is_empty() {
                warn!("No techant point matched the CAD points, nothing written");
                return Ok(());
            }

            let written = ConfigExportWriter::new().write_all(&exports, &output_dir)?;
            for path in written {
                println!("{}", path.display());
            }
            Ok(())
        }

        Commands::Info { file } => {
            println!("Analyzing Parquet file: {}", file.display());

            let writer = ParquetWriter::new();
            let file_info = writer.get_file_info(&file)?;

            println!("\nFile Details:");
            println!("{}", file_info.summary());
            Ok(())
        }
    }
}

async fn build<S: TemperatureSource>(settings: &Settings, source: S, quiet: bool) -> Result<()> {
    // Reject a bad codec before reading anything
    let writer = ParquetWriter::new().with_compression(&settings.compression)?;

    info!("Input directory: {}", settings.input_dir.display());
    info!("Output file: {}", settings.output_file.display());

    let progress = ProgressReporter::new_spinner("Reading raw exports...", quiet);
    let builder = UnifiedTableBuilder::new(source, &settings.log_dir);
    let (table, report) = builder
        .build_unified_table(&settings.input_dir, Some(&progress))
        .await?;

    let Some(table) = table else {
        progress.finish_with_message("No usable files, no output written");
        println!("\n{}", report.generate_summary());
        return Ok(());
    };

    progress.set_message("Writing Parquet file...");
    writer.write_table(&table, &settings.output_file)?;
    progress.finish_with_message(&format!(
        "Wrote {} rows to {}",
        table.len(),
        settings.output_file.display()
    ));

    if !quiet {
        println!("\n{}", report.generate_summary());
        println!("{}", table.summary());
    }
    Ok(())
}
