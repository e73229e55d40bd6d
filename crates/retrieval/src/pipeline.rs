//! End-to-end fetch: comids → positions → era → paths → dispatch → fold.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use nwm_common::{PublicationHour, StreamflowSource};
use tracing::info;

use crate::aggregate::FinalResults;
use crate::config::FetchOptions;
use crate::dispatcher::Dispatcher;
use crate::era;
use crate::error::Result;
use crate::index::IndexTable;
use crate::metadata::available_products;
use crate::plan::{FetchPlan, ProductRequest};

/// What to fetch.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub hour: PublicationHour,
    pub comids: Vec<i64>,
    pub product: ProductRequest,
}

/// Fetch against the wall clock.
pub async fn fetch<S>(
    source: Arc<S>,
    table: &IndexTable,
    request: &FetchRequest,
    options: &FetchOptions,
) -> Result<FinalResults>
where
    S: StreamflowSource + 'static,
{
    fetch_at(source, table, request, options, Utc::now()).await
}

/// Fetch as if the current time were `now`.
///
/// Every fatal check (configuration, comids, era) happens before any path is
/// generated or read.
pub async fn fetch_at<S>(
    source: Arc<S>,
    table: &IndexTable,
    request: &FetchRequest,
    options: &FetchOptions,
    now: DateTime<Utc>,
) -> Result<FinalResults>
where
    S: StreamflowSource + 'static,
{
    options.validate()?;

    let positions: Arc<[u64]> = table.resolve_all(&request.comids)?.into();

    let requested = request.hour.datetime();
    let era = era::resolve(requested, now)?;

    let plan = FetchPlan::build(requested, era, request.product, options);
    info!(
        hour = %request.hour,
        era = %plan.era,
        product = %request.product,
        files = plan.len(),
        workers = plan.workers,
        products = ?available_products(&plan.paths),
        "Fetch planned"
    );

    let dispatcher = Dispatcher::new(source, plan.workers)?;
    let outcomes = dispatcher.run(plan.paths, positions).await?;

    let results = if options.resolve_comids {
        FinalResults::fold_with_table(outcomes, table)
    } else {
        FinalResults::fold(outcomes)
    };
    Ok(results)
}
