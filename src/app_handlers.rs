use std::path::Path;

use mlt_core::{MarkerStore, Pass};
use mlt_processor::{Document, PipelineOutcome, SuffixIdAllocator, extract_markers, run_pipeline};
use strum::IntoEnumIterator;

use crate::app_settings::AppSettings;
use crate::asset_binding::bind_assets;
use crate::cli::{BindArgs, Cli, Commands, DiffArgs, ExportArgs, MarkersArgs, SynthesizeArgs};
use crate::error::{AppError, AppResult};
use crate::io;
use crate::preview::render_preview;

const PREVIEW_CONTEXT: usize = 3;

pub fn run(cli: Cli, settings: &AppSettings) -> AppResult<()> {
    let source = cli.source.as_deref();
    match cli.command {
        Commands::Markers(args) => handle_markers(settings, source, &args),
        Commands::Bind(args) => handle_bind(settings, source, &args),
        Commands::Synthesize(args) => handle_synthesize(settings, source, &args),
        Commands::Diff(args) => handle_diff(&args),
        Commands::Export(args) => handle_export(settings, source, &args),
    }
}

fn load_source(settings: &AppSettings, source: Option<&Path>) -> AppResult<(String, Document)> {
    let path = settings.resolve_source(source)?;
    io::load_document(&path)
}

/// 从工程中提取标记，并把提取过程中的警告写入日志。
fn extract_logged(document: &Document) -> MarkerStore {
    let extraction = extract_markers(document);
    for warning in &extraction.warnings {
        tracing::warn!("{warning}");
    }
    extraction.store
}

fn handle_markers(
    settings: &AppSettings,
    source: Option<&Path>,
    args: &MarkersArgs,
) -> AppResult<()> {
    let (_, document) = load_source(settings, source)?;
    let markers = extract_logged(&document);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&markers)?);
        return Ok(());
    }

    for marker in &markers {
        println!(
            "#{:<3} {}  {}  {}  {}",
            marker.number,
            marker.start_time,
            marker.end_time.as_deref().unwrap_or("-"),
            marker.color,
            marker.name
        );
    }
    Ok(())
}

fn handle_bind(settings: &AppSettings, source: Option<&Path>, args: &BindArgs) -> AppResult<()> {
    let (_, document) = load_source(settings, source)?;
    let mut markers = extract_logged(&document);
    let report = bind_assets(&mut markers, &args.folder)?;
    for number in &report.unmatched {
        tracing::warn!("标记 #{number} 没有找到同名素材");
    }

    match &args.output {
        Some(path) => io::save_markers(path, &markers),
        None => {
            println!("{}", serde_json::to_string_pretty(&markers)?);
            Ok(())
        }
    }
}

/// 执行合成流水线。任何步骤失败都视为整个命令失败。
fn synthesize(
    settings: &AppSettings,
    source: Option<&Path>,
    markers_path: Option<&Path>,
    passes: &[Pass],
) -> AppResult<(String, PipelineOutcome)> {
    let (original_text, document) = load_source(settings, source)?;
    let markers = match markers_path {
        Some(path) => io::load_markers(path)?,
        None => extract_logged(&document),
    };

    let passes: Vec<Pass> = if passes.is_empty() {
        Pass::iter().collect()
    } else {
        passes.to_vec()
    };

    let allocator = SuffixIdAllocator::new(settings.synthesis.minimum_id);
    let mut outcome = run_pipeline(
        &document,
        &markers,
        &allocator,
        &settings.synthesis,
        &passes,
    );

    for warning in &outcome.warnings {
        tracing::warn!("{warning}");
    }
    if let Some((pass, error)) = outcome.failure.take() {
        return Err(AppError::Pass {
            pass,
            source: error.into(),
        });
    }

    tracing::info!("合成完成，新增元素: {}", outcome.created_ids.join(", "));
    Ok((original_text, outcome))
}

fn handle_synthesize(
    settings: &AppSettings,
    source: Option<&Path>,
    args: &SynthesizeArgs,
) -> AppResult<()> {
    let (original_text, outcome) =
        synthesize(settings, source, args.markers.as_deref(), &args.passes)?;
    let output_text = outcome.document.to_xml_string()?;

    match &args.output {
        Some(path) => {
            io::write_output(path, &output_text)?;
            if args.diff {
                print!("{}", render_preview(&original_text, &output_text, PREVIEW_CONTEXT));
            }
        }
        None => {
            print!("{output_text}");
            if args.diff {
                eprint!("{}", render_preview(&original_text, &output_text, PREVIEW_CONTEXT));
            }
        }
    }
    Ok(())
}

fn handle_diff(args: &DiffArgs) -> AppResult<()> {
    let original = std::fs::read_to_string(&args.original)?;
    let modified = std::fs::read_to_string(&args.modified)?;
    print!("{}", render_preview(&original, &modified, args.context));
    Ok(())
}

fn handle_export(settings: &AppSettings, source: Option<&Path>, args: &ExportArgs) -> AppResult<()> {
    let (_, outcome) = synthesize(settings, source, args.markers.as_deref(), &[])?;
    let output_text = outcome.document.to_xml_string()?;
    let target = io::export_document(settings, &output_text)?;
    println!("已导出到 {}", target.display());
    Ok(())
}
