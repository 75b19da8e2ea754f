mod app;

use std::fs;

use anyhow::Context;
use clap::Parser;
use rayon::prelude::*;
use wrapgen::prelude::*;

use crate::app::Cli;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Show wrapgen info+ on stderr; --verbose enables debug; RUST_LOG overrides
    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_module("wrapgen", level)
        .parse_default_env()
        .target(env_logger::Target::Stderr)
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(false)
        .init();

    let config = GeneratorConfig {
        server_package: cli.server_package.clone(),
        output_package: cli.package.clone(),
        write_method: cli.write_method.clone(),
    };

    let classes = ClassSet::from_dir(&cli.classes, &config.root_class())
        .with_context(|| format!("loading classes from {}", cli.classes.display()))?;
    log::info!("loaded {} classes from {}", classes.len(), cli.classes.display());

    let docs = ProtocolDocs::from_file(&cli.docs)
        .with_context(|| format!("reading documentation page {}", cli.docs.display()))?;
    log::info!("documentation lists {} message tables", docs.len());

    let catalog = MessageCatalog::from_file(&cli.catalog)
        .with_context(|| format!("reading packet catalog {}", cli.catalog.display()))?;

    fs::create_dir_all(&cli.output)
        .with_context(|| format!("creating output directory {}", cli.output.display()))?;

    let generator = WrapperGenerator::new(&classes, &docs, &catalog, &config);
    let results: Vec<(MessageType, Result<GeneratedWrapper>)> = catalog
        .entries()
        .par_iter()
        .filter(|entry| {
            cli.filter
                .as_deref()
                .map_or(true, |needle| entry.ty.name.contains(needle))
        })
        .map(|entry| (entry.ty.clone(), generator.generate(&entry.ty)))
        .collect();

    let mut generated = 0usize;
    let mut failed = 0usize;
    let mut degraded_fields = 0usize;

    for (ty, result) in results {
        match result {
            Ok(wrapper) => {
                let path = cli.output.join(format!("{}.java", wrapper.class_name));
                fs::write(&path, &wrapper.source)
                    .with_context(|| format!("writing {}", path.display()))?;

                if wrapper.degraded > 0 {
                    log::warn!(
                        "{ty}: {} of {} field(s) degraded",
                        wrapper.degraded,
                        wrapper.field_count
                    );
                    degraded_fields += wrapper.degraded;
                }
                log::debug!("wrote {}", path.display());
                generated += 1;
            }
            Err(err) => {
                log::error!("{ty}: {err}");
                failed += 1;
            }
        }
    }

    println!(
        "Generated {generated} wrapper(s) into {}; {failed} failed, {degraded_fields} degraded field(s)",
        cli.output.display()
    );
    Ok(())
}
