//! The `view` command: load, normalise, apply operator actions, emit.

use std::io::Write;

use anyhow::{Context, Result};
use log::{debug, info, warn};

use crate::{
    action::{Session, parse_actions},
    cli::{OutputFormat, ViewArgs},
    data::format_number,
    dataset::Dataset,
    filter::MatchCase,
    io_utils, load_snapshot, normalize,
    profile::Profile,
    render::{self, RenderOptions},
    table,
};

pub fn execute(args: &ViewArgs) -> Result<()> {
    let actions = parse_actions(&args.actions).context("Parsing --action")?;
    debug!("Actions: {actions:?}");
    let (profile, dataset) = load_snapshot(&args.input)?;
    if dataset.is_empty() {
        warn!(
            "No data yet: {:?} is missing, empty, or unreadable",
            args.input.input
        );
        return Ok(());
    }
    info!(
        "Loaded {} row(s) across {} column(s)",
        dataset.row_count(),
        dataset.columns().len()
    );

    let dataset = normalize::normalize(dataset, &profile);
    let total = normalize::page_view_total(&dataset, &profile);
    if let Some(total) = total {
        info!("page_view total: {}", format_number(total));
    }

    let case = if args.case_insensitive {
        MatchCase::Insensitive
    } else {
        MatchCase::Sensitive
    };
    let mut session = Session::new(dataset, &profile).with_match_case(case);
    session.apply_all(&actions);
    let mut dataset = session.into_dataset();
    if let Some(limit) = args.limit {
        dataset = dataset.truncate(limit);
    }

    emit(&dataset, &profile, args, total)
}

fn emit(ds: &Dataset, profile: &Profile, args: &ViewArgs, total: Option<f64>) -> Result<()> {
    let output_path = args.output.as_deref();
    match args.format {
        OutputFormat::Csv => {
            let delimiter = io_utils::resolve_output_delimiter(output_path, args.output_delimiter);
            let mut writer = io_utils::open_csv_writer(output_path, delimiter)?;
            writer
                .write_record(ds.columns())
                .context("Writing output headers")?;
            for row in ds.rows() {
                writer
                    .write_record(row.iter().map(|value| value.as_display()))
                    .context("Writing output row")?;
            }
            writer.flush().context("Flushing output")?;
        }
        OutputFormat::Table => {
            let mut out = io_utils::open_output(output_path)?;
            if let Some(total) = total {
                writeln!(out, "page_view total: {}", format_number(total))?;
                writeln!(out)?;
            }
            out.write_all(table::render_dataset(ds, profile.cell_width).as_bytes())?;
            out.flush().context("Flushing output")?;
        }
        OutputFormat::Html => {
            let display = render::render(ds, &RenderOptions::from_profile(profile));
            let mut out = io_utils::open_output(output_path)?;
            out.write_all(render::to_html(&display).as_bytes())?;
            out.flush().context("Flushing output")?;
        }
        OutputFormat::Json => {
            let display = render::render(ds, &RenderOptions::from_profile(profile));
            let mut out = io_utils::open_output(output_path)?;
            serde_json::to_writer_pretty(&mut out, &display).context("Writing JSON output")?;
            writeln!(out)?;
            out.flush().context("Flushing output")?;
        }
    }
    info!("Emitted {} row(s)", ds.row_count());
    Ok(())
}
