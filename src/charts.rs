//! The five figures of an analysis run, styled after the published charts.

use peniko::Color;
use polars::prelude::*;

use crate::{
  Align, Plot, Plot3d, Trendline,
  correlation::Correlation,
  labels::Labels,
  table::Aggregate,
};

const ANNOTATION_COLOR: Color = Color::from_rgb8(0, 128, 0);

/// Columns the figures borrow from.
pub(crate) struct ChartData {
  mayors:      [Column; 2],
  councilors:  [Column; 2],
  correlation: [Column; 4],
  totals:      (u64, u64),
  max_mayors:  u64,
}

impl ChartData {
  pub(crate) fn new(
    mayors: &Aggregate,
    councilors: &Aggregate,
    correlation: &Correlation,
  ) -> PolarsResult<Self> {
    let split = |agg: &Aggregate| -> PolarsResult<[Column; 2]> {
      let frame = agg.count_frame("party", "count")?;
      Ok([frame.column("party")?.clone(), frame.column("count")?.clone()])
    };

    let rows = &correlation.rows;
    Ok(ChartData {
      mayors:      split(mayors)?,
      councilors:  split(councilors)?,
      correlation: [
        Column::new("party".into(), rows.iter().map(|r| r.party.as_str()).collect::<Vec<_>>()),
        Column::new("mayors".into(), rows.iter().map(|r| r.mayors).collect::<Vec<_>>()),
        Column::new("councilors".into(), rows.iter().map(|r| r.councilors).collect::<Vec<_>>()),
        Column::new("candidates".into(), rows.iter().map(|r| r.candidates).collect::<Vec<_>>()),
      ],
      totals:      (mayors.total, councilors.total),
      max_mayors:  mayors.max_count(),
    })
  }
}

pub(crate) fn mayors<'a>(data: &'a ChartData, labels: &Labels) -> Plot<'a> {
  let [party, count] = &data.mayors;
  let total = format!("{}: {}", labels.elected_total, data.totals.0);

  let mut plot = Plot::new();
  plot
    .title(labels.mayors_title)
    .title_align(Align::Start)
    .size(2000, 600)
    .annotate(&total, (0.99, 0.94), ANNOTATION_COLOR);
  plot.x.title(labels.parties_axis).rotate_ticks(90.0);
  plot.y.title(labels.mayors_axis).min(0.0).max(data.max_mayors.max(1) as f64 * 1.1);
  plot.bar_chart(party, count);
  plot
}

pub(crate) fn councilors<'a>(data: &'a ChartData, labels: &Labels) -> Plot<'a> {
  let [party, count] = &data.councilors;
  let total = format!("{}: {}", labels.elected_total, data.totals.1);

  let mut plot = Plot::new();
  plot
    .title(labels.councilors_title)
    .title_align(Align::Start)
    .size(1200, 1000)
    .annotate(&total, (0.99, 0.94), ANNOTATION_COLOR);
  plot.x.title(labels.councilors_axis);
  plot.y.title(labels.parties_axis);
  plot.lollipop(party, count).dot_radius(6.0);
  plot
}

pub(crate) fn correlation<'a>(data: &'a ChartData, labels: &Labels) -> Plot<'a> {
  let [party, mayors, councilors, _] = &data.correlation;

  let mut plot = Plot::new();
  plot.title(labels.correlation_title).size(1500, 900);
  plot.x.title(labels.mayors);
  plot.y.title(labels.councilors);
  plot
    .scatter(mayors, councilors)
    .size(5.0)
    .alpha(0.5)
    .labels(party)
    .trendline(Trendline::linear().confidence(0.95));
  plot
}

/// Black points seen from the side the published chart uses.
pub(crate) fn scatter_3d<'a>(data: &'a ChartData, labels: &Labels) -> Plot3d<'a> {
  let [_, mayors, councilors, candidates] = &data.correlation;

  let mut plot = Plot3d::new(mayors, councilors, candidates);
  plot
    .title(labels.scatter_3d_title)
    .axis_titles(labels.mayors, labels.councilors, labels.candidates)
    .view(30.0, 185.0)
    .size(1500, 800)
    .point_size(10.0);
  plot
}

/// Colored and marked by party, for the viewer.
pub(crate) fn interactive_3d<'a>(data: &'a ChartData, labels: &Labels) -> Plot3d<'a> {
  let mut plot = scatter_3d(data, labels);
  plot.view(30.0, -60.0).hue(&data.correlation[0], labels.party).alpha(0.7);
  plot
}
