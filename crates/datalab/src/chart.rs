//! SVG charts for the salary report and the price bins.

use std::path::Path;

use itertools::Itertools;
use plotters::prelude::*;
use tracing::info;

use crate::binning::BinCount;
use crate::employees::{SalaryGroup, SalarySummary};
use crate::error::{Error, Result};

/// Share of each x slot covered by a group of bars.
const GROUP_WIDTH: f64 = 0.8;

type DrawResult<'a> = std::result::Result<(), Box<dyn std::error::Error + Send + Sync + 'a>>;

/// One bar of the grouped salary chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    /// Left edge on the x axis.
    pub x0: f64,
    /// Right edge on the x axis.
    pub x1: f64,
    /// Average salary.
    pub height: f64,
    /// Index of the position slot on the x axis.
    pub slot: usize,
    /// Index of the start year series.
    pub series: usize,
}

/// Bar geometry of the grouped salary chart.
///
/// Positions sit at integer x values; each start year gets a fixed slot
/// inside the position's group, so a missing year leaves a gap.
#[derive(Debug, Clone, PartialEq)]
pub struct SalaryLayout {
    /// Positions in x order.
    pub positions: Vec<String>,
    /// Start years in series order.
    pub years: Vec<i32>,
    /// One bar per salary group.
    pub bars: Vec<Bar>,
}

impl SalaryLayout {
    /// Lay out the bars of a salary summary.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn new(groups: &[SalaryGroup]) -> Self {
        let positions: Vec<String> = groups.iter().map(|g| g.position.clone()).dedup().collect();
        let years: Vec<i32> = groups.iter().map(|g| g.start_year).sorted().dedup().collect();
        let width = GROUP_WIDTH / years.len().max(1) as f64;

        let bars = groups
            .iter()
            .filter_map(|g| {
                let slot = positions.iter().position(|name| *name == g.position)?;
                let series = years.binary_search(&g.start_year).ok()?;
                let x0 = slot as f64 - GROUP_WIDTH / 2.0 + series as f64 * width;
                Some(Bar {
                    x0,
                    x1: x0 + width,
                    height: g.average_salary,
                    slot,
                    series,
                })
            })
            .collect();

        Self {
            positions,
            years,
            bars,
        }
    }

    /// The bar drawn for `group`, if any.
    #[must_use]
    pub fn bar_for(&self, group: &SalaryGroup) -> Option<&Bar> {
        let series = self.years.binary_search(&group.start_year).ok()?;
        let slot = self.positions.iter().position(|n| *n == group.position)?;
        self.bars
            .iter()
            .find(|b| b.slot == slot && b.series == series)
    }

    fn axis_label(&self, x: f64) -> String {
        let rounded = x.round();
        if (x - rounded).abs() > 1e-6 || rounded < 0.0 {
            return String::new();
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let idx = rounded as usize;
        self.positions.get(idx).cloned().unwrap_or_default()
    }
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }
    Ok(())
}

/// Render the grouped salary bar chart to an SVG file.
///
/// # Errors
///
/// Returns an error if the file cannot be created or drawing fails.
pub fn draw_salary_chart(summary: &SalarySummary, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    ensure_parent(path)?;
    draw_salary_bars(SVGBackend::new(path, (1400, 700)), summary)
        .map_err(|e| Error::chart(path, e.to_string()))?;
    info!("Wrote salary chart to {}", path.display());
    Ok(())
}

/// Render the bin counts as a bar chart to an SVG file.
///
/// # Errors
///
/// Returns an error if the file cannot be created or drawing fails.
pub fn draw_bin_counts(counts: &[BinCount], path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    ensure_parent(path)?;
    draw_bin_bars(SVGBackend::new(path, (800, 600)), counts)
        .map_err(|e| Error::chart(path, e.to_string()))?;
    info!("Wrote bin chart to {}", path.display());
    Ok(())
}

#[allow(clippy::cast_precision_loss)]
fn draw_salary_bars<'a, T>(backend: T, summary: &SalarySummary) -> DrawResult<'a>
where
    T: 'a + DrawingBackend,
{
    let layout = SalaryLayout::new(&summary.groups);
    let root = backend.into_drawing_area();
    root.fill(&WHITE)?;

    let top = summary.highest.average_salary * 1.2;
    let x_max = layout.positions.len() as f64 - 0.5;
    let mut chart = ChartBuilder::on(&root)
        .margin(15)
        .x_label_area_size(60)
        .y_label_area_size(90)
        .caption(
            "Average Salary by IT Position and Start Year",
            ("sans-serif", 24.0).into_font(),
        )
        .build_cartesian_2d(-0.5..x_max, 0.0..top)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(layout.positions.len().max(1))
        .x_label_formatter(&|x| layout.axis_label(*x))
        .y_label_formatter(&|y| format!("{y:.0}"))
        .x_desc("IT Position")
        .y_desc("Average Salary (USD)")
        .draw()?;

    for (series, year) in layout.years.iter().enumerate() {
        let color = Palette99::pick(series).to_rgba();
        chart
            .draw_series(
                layout
                    .bars
                    .iter()
                    .filter(|b| b.series == series)
                    .map(|b| Rectangle::new([(b.x0, 0.0), (b.x1, b.height)], color.filled())),
            )?
            .label(year.to_string())
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
    }

    for (prefix, group, color) in [
        ("Highest", &summary.highest, RED),
        ("Lowest", &summary.lowest, BLUE),
    ] {
        if let Some(bar) = layout.bar_for(group) {
            let text = format!(
                "{prefix}: ${:.2} ({}, {})",
                group.average_salary, group.position, group.start_year
            );
            chart.draw_series(std::iter::once(Text::new(
                text,
                (bar.x0, bar.height + top * 0.02),
                ("sans-serif", 13.0).into_font().color(&color),
            )))?;
        }
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

fn draw_bin_bars<'a, T>(backend: T, counts: &[BinCount]) -> DrawResult<'a>
where
    T: 'a + DrawingBackend,
{
    let root = backend.into_drawing_area();
    root.fill(&WHITE)?;

    let n = u32::try_from(counts.len())?;
    let max = counts.iter().map(|c| c.count).max().unwrap_or(0);
    let top = u32::try_from(max + max / 10 + 1)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .caption("Distribution of Price Categories", ("sans-serif", 24.0).into_font())
        .build_cartesian_2d((0u32..n).into_segmented(), 0u32..top)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_label_formatter(&|v| match v {
            SegmentValue::CenterOf(i) => counts
                .get(*i as usize)
                .map(|c| c.label.clone())
                .unwrap_or_default(),
            _ => String::new(),
        })
        .x_desc("Price Category")
        .y_desc("Count")
        .draw()?;

    let data = counts
        .iter()
        .enumerate()
        .map(|(i, c)| Ok((u32::try_from(i)?, u32::try_from(c.count)?)))
        .collect::<std::result::Result<Vec<_>, std::num::TryFromIntError>>()?;
    chart.draw_series(
        Histogram::vertical(&chart)
            .style(BLUE.mix(0.6).filled())
            .margin(30)
            .data(data),
    )?;

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(position: &str, start_year: i32, average_salary: f64) -> SalaryGroup {
        SalaryGroup {
            position: position.to_string(),
            start_year,
            average_salary,
            headcount: 1,
        }
    }

    #[test]
    fn test_layout_positions_and_years() {
        let groups = vec![
            group("Data Analyst", 2019, 90_000.0),
            group("Data Analyst", 2021, 95_000.0),
            group("SysAdmin", 2017, 70_000.0),
        ];
        let layout = SalaryLayout::new(&groups);
        assert_eq!(layout.positions, vec!["Data Analyst", "SysAdmin"]);
        assert_eq!(layout.years, vec![2017, 2019, 2021]);
        assert_eq!(layout.bars.len(), 3);
    }

    #[test]
    fn test_layout_bars_stay_inside_their_slot() {
        let groups = vec![
            group("A", 2016, 1.0),
            group("A", 2017, 2.0),
            group("B", 2016, 3.0),
            group("B", 2017, 4.0),
        ];
        let layout = SalaryLayout::new(&groups);
        for bar in &layout.bars {
            assert!(bar.x1 > bar.x0);
            let center = (bar.x0 + bar.x1) / 2.0;
            #[allow(clippy::cast_precision_loss)]
            let slot = bar.slot as f64;
            assert!((center - slot).abs() <= GROUP_WIDTH / 2.0);
        }
        // Same year lines up at the same offset in every group.
        let a_2016 = &layout.bars[0];
        let b_2016 = &layout.bars[2];
        assert!(((b_2016.x0 - a_2016.x0) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_bar_for_finds_group() {
        let groups = vec![group("A", 2016, 10.0), group("B", 2017, 20.0)];
        let layout = SalaryLayout::new(&groups);
        let bar = layout.bar_for(&groups[1]).unwrap();
        assert!((bar.height - 20.0).abs() < f64::EPSILON);
        assert!(layout.bar_for(&group("C", 2016, 1.0)).is_none());
    }

    #[test]
    fn test_draw_charts_to_svg() {
        use crate::binning::Bins;
        use crate::employees::{summarize_salaries, Employee};
        use chrono::NaiveDate;

        let dir = std::env::temp_dir().join(format!("datalab_chart_test_{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);

        let date = |y| NaiveDate::from_ymd_opt(y, 3, 1).unwrap();
        let employees = vec![
            Employee::new("Ada Byrne", "Data Analyst", date(2019), 90_000),
            Employee::new("Liam O'Brien", "SysAdmin", date(2019), 70_000),
            Employee::new("Mia Chen", "SysAdmin", date(2021), 75_000),
        ];
        let summary = summarize_salaries(&employees).unwrap();
        let salary_path = dir.join("salary.svg");
        draw_salary_chart(&summary, &salary_path).unwrap();
        let svg = std::fs::read_to_string(&salary_path).unwrap();
        assert!(svg.contains("Average Salary by IT Position and Start Year"));

        let bins = Bins::price_categories();
        let counts = bins.value_counts(&bins.cut(&[50.0, 250.0, 300.0, 500.0]));
        let bins_path = dir.join("nested").join("bins.svg");
        draw_bin_counts(&counts, &bins_path).unwrap();
        let svg = std::fs::read_to_string(&bins_path).unwrap();
        assert!(svg.contains("Distribution of Price Categories"));
        assert!(svg.contains("Medium"));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_axis_label() {
        let layout = SalaryLayout::new(&[group("A", 2016, 1.0), group("B", 2016, 1.0)]);
        assert_eq!(layout.axis_label(0.0), "A");
        assert_eq!(layout.axis_label(1.0), "B");
        assert_eq!(layout.axis_label(0.5), "");
        assert_eq!(layout.axis_label(2.0), "");
        assert_eq!(layout.axis_label(-1.0), "");
    }
}
