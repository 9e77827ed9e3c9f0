mod bar_chart;
mod lollipop;
mod scatter;

pub use bar_chart::BarChartAxes;
pub use lollipop::LollipopAxes;
pub use scatter::{ScatterAxes, Trendline};

use kurbo::Affine;
use polars::prelude::*;

use crate::{Plot, bounds::DataBounds, render::Render};

pub(crate) enum Axes<'a> {
  BarChart(BarChartAxes<'a>),
  Lollipop(LollipopAxes<'a>),
  Scatter(ScatterAxes<'a>),
}

impl Axes<'_> {
  pub(crate) fn data_bounds(&self) -> DataBounds<'_> {
    match self {
      Axes::BarChart(ax) => ax.data_bounds(),
      Axes::Lollipop(ax) => ax.data_bounds(),
      Axes::Scatter(ax) => ax.data_bounds(),
    }
  }

  pub(crate) fn draw(&self, render: &mut Render, transform: Affine) {
    match self {
      Axes::BarChart(ax) => ax.draw(render, transform),
      Axes::Lollipop(ax) => ax.draw(render, transform),
      Axes::Scatter(ax) => ax.draw(render, transform),
    }
  }
}

impl<'a> Plot<'a> {
  /// Vertical bars, one per row of `labels`.
  pub fn bar_chart(&mut self, labels: &'a Column, values: &'a Column) -> &mut BarChartAxes<'a> {
    self.axes.push(Axes::BarChart(BarChartAxes::new(labels, values)));
    match self.axes.last_mut() {
      Some(Axes::BarChart(ax)) => ax,
      _ => unreachable!(),
    }
  }

  /// Horizontal stems ending in a dot, one per row of `labels`, first row at the bottom.
  pub fn lollipop(&mut self, labels: &'a Column, values: &'a Column) -> &mut LollipopAxes<'a> {
    self.axes.push(Axes::Lollipop(LollipopAxes::new(labels, values)));
    match self.axes.last_mut() {
      Some(Axes::Lollipop(ax)) => ax,
      _ => unreachable!(),
    }
  }

  pub fn scatter(&mut self, x: &'a Column, y: &'a Column) -> &mut ScatterAxes<'a> {
    self.axes.push(Axes::Scatter(ScatterAxes::new(x, y)));
    match self.axes.last_mut() {
      Some(Axes::Scatter(ax)) => ax,
      _ => unreachable!(),
    }
  }
}
