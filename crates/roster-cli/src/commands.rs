use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use roster_cli::config::{ClientConfig, config_path, save_config};
use roster_cli::logging::redact_value;
use roster_core::{FlowError, UploadFlow};
use roster_gateway::HttpGateway;
use roster_map::{MappingPreset, SuggestionEngine};
use roster_model::{FileIntrospection, MultiUpload, UploadedFile};
use roster_report::{DEFAULT_TEMPLATE_NAME, report, write_template};
use tracing::{info, trace, warn};

use crate::cli::{ConfigArgs, MultiUploadArgs, TemplateArgs, UploadArgs};
use crate::progress::spinner;
use crate::summary::{
    PREVIEW_ROWS, print_fields, print_introspection, print_local_suggestions, print_mapping,
    print_merge_result, print_preset_application, print_readiness, print_report,
};
use crate::types::UploadOutcome;

pub async fn run_upload(args: &UploadArgs, config: &ClientConfig) -> Result<UploadOutcome> {
    let file = UploadedFile::from_path(&args.file)
        .with_context(|| format!("read {}", args.file.display()))?;
    let gateway = HttpGateway::new(config.gateway_config()).context("create API client")?;
    let mut flow = UploadFlow::new(gateway, config.session.clone());

    let progress = spinner("Uploading file...");
    let uploaded = flow.select_and_upload(file).await;
    progress.finish_and_clear();
    match uploaded {
        Ok(_) => {}
        Err(err @ FlowError::Rejected(_)) => {
            warn!(error = %err, "file rejected");
            return Ok(UploadOutcome::Rejected(err.user_message()));
        }
        Err(err) => return Ok(UploadOutcome::UploadFailed(err.user_message())),
    }

    let introspection = flow
        .machine()
        .introspection()
        .ok_or_else(|| anyhow!("upload finished without file details"))?;
    log_sample_values(introspection);
    print_introspection(introspection, flow.context());

    if args.local_suggestions {
        let added = flow.apply_local_suggestions(&SuggestionEngine::new())?;
        print_local_suggestions(&added);
    }
    if let Some(path) = &args.mapping_file {
        let preset = MappingPreset::load(path)?;
        let application = flow.apply_preset(&preset)?;
        print_preset_application(&application);
    }
    for (column, field) in &args.map {
        flow.edit(column, Some(*field))
            .with_context(|| format!("map '{column}' to {field}"))?;
    }
    for column in &args.unmap {
        flow.edit(column, None)
            .with_context(|| format!("unmap '{column}'"))?;
    }

    let (Some(introspection), Some(mapping), Some(readiness)) = (
        flow.machine().introspection(),
        flow.machine().mapping(),
        flow.machine().readiness(),
    ) else {
        return Err(anyhow!("mapping is not available"));
    };
    print_mapping(introspection, mapping);
    print_readiness(&readiness);

    if let Some(path) = &args.save_mapping {
        MappingPreset::new(mapping.clone())
            .with_description(format!("mapping for {}", introspection.filename))
            .save(path)?;
        println!("Mapping saved to {}", path.display());
    }

    if args.dry_run {
        info!(ready = readiness.is_ready(), "dry run, not submitting");
        return Ok(UploadOutcome::DryRun {
            ready: readiness.is_ready(),
        });
    }
    if readiness.is_blocked() {
        return Ok(UploadOutcome::Blocked(readiness));
    }

    let progress = spinner("Processing data...");
    let processed = flow.submit_and_process().await;
    progress.finish_and_clear();
    match processed {
        Ok(result) => {
            let report = report(&result);
            print_report(&report);
            Ok(UploadOutcome::Processed(report))
        }
        Err(err) => Ok(UploadOutcome::ProcessingFailed(err.user_message())),
    }
}

pub async fn run_multi_upload(
    args: &MultiUploadArgs,
    config: &ClientConfig,
) -> Result<UploadOutcome> {
    let mut upload = MultiUpload::new();
    for (kind, path) in args.sources() {
        let file = UploadedFile::from_path(path)
            .with_context(|| format!("read {kind} file {}", path.display()))?;
        upload.insert(kind, file);
    }
    let gateway = HttpGateway::new(config.gateway_config()).context("create API client")?;
    let flow = UploadFlow::new(gateway, config.session.clone());

    let progress = spinner("Uploading and merging files...");
    let merged = flow.multi_upload(&upload).await;
    progress.finish_and_clear();
    match merged {
        Ok(result) => {
            print_merge_result(&result);
            Ok(UploadOutcome::Merged(result))
        }
        Err(err @ FlowError::SourcesRejected(_)) => {
            warn!(error = %err, "source files rejected");
            Ok(UploadOutcome::Rejected(err.user_message()))
        }
        Err(err) => Ok(UploadOutcome::UploadFailed(err.user_message())),
    }
}

pub async fn run_template(args: &TemplateArgs, config: &ClientConfig) -> Result<PathBuf> {
    let gateway = HttpGateway::new(config.gateway_config()).context("create API client")?;
    let flow = UploadFlow::new(gateway, config.session.clone());

    let progress = spinner("Downloading sample format...");
    let format = flow.sample_format().await;
    progress.finish_and_clear();
    let format = format.map_err(|e| anyhow!(e.user_message()))?;

    let path = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_TEMPLATE_NAME));
    write_template(&format, &path)?;
    Ok(path)
}

pub fn run_fields() {
    print_fields();
}

pub fn run_config(args: &ConfigArgs, path: &Path, config: &ClientConfig) -> Result<()> {
    let shown = match &args.set_base_url {
        Some(url) => {
            let updated = config.clone().with_base_url(Some(url));
            save_config(&updated, path)?;
            println!("Saved base_url = {} to {}", updated.base_url, path.display());
            if !args.show {
                return Ok(());
            }
            updated
        }
        None => config.clone(),
    };
    println!("# {}", path.display());
    print!(
        "{}",
        toml::to_string_pretty(&shown).context("serialize configuration")?
    );
    Ok(())
}

/// Resolve the configuration file: `--config`, else the platform default.
pub fn resolve_config_path(explicit: Option<&Path>) -> Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path.to_path_buf()),
        None => config_path().context("could not determine the configuration directory"),
    }
}

fn log_sample_values(introspection: &FileIntrospection) {
    for (index, row) in introspection.preview(PREVIEW_ROWS).iter().enumerate() {
        for (column, value) in introspection.columns.iter().zip(row) {
            trace!(row = index + 1, column = %column, value = redact_value(value), "sample value");
        }
    }
}
