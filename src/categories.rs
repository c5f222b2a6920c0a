//! The `categories` command: lists the selectable category values.

use anyhow::Result;
use log::{info, warn};

use crate::{
    cli::CategoriesArgs, dataset::Dataset, filter, load_snapshot, normalize, profile::Profile,
    table,
};

pub fn execute(args: &CategoriesArgs) -> Result<()> {
    let (profile, dataset) = load_snapshot(&args.input)?;
    if dataset.is_empty() {
        warn!("No data yet: {:?} is missing, empty, or unreadable", args.input.input);
        return Ok(());
    }
    let dataset = normalize::normalize(dataset, &profile);
    let options = category_options(&dataset, &profile);
    let rows = options.iter().map(|c| vec![c.clone()]).collect::<Vec<_>>();
    print!(
        "{}",
        table::render_table(&["category".to_string()], &rows, profile.cell_width)
    );
    info!("Listed {} category option(s)", options.len().saturating_sub(1));
    Ok(())
}

/// The "all" sentinel followed by every distinct category, sorted.
pub fn category_options(ds: &Dataset, profile: &Profile) -> Vec<String> {
    let all = profile
        .all_categories
        .last()
        .cloned()
        .unwrap_or_else(|| "all".to_string());
    std::iter::once(all)
        .chain(filter::unique_categories(ds, &profile.category_column))
        .collect()
}
