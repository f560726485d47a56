//! Renders comparison pairs as grouped/stacked SVG bar charts with per-bar
//! percentage annotations.

use crate::reconcile::{DemographicComparison, DistributionPair};
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::{Path, PathBuf};

// Pastel palette carried over from the original study notebook.
const CENSUS_FILL: RGBColor = RGBColor(0xB5, 0xEA, 0xD7);
const MODEL_FILL: RGBColor = RGBColor(0xFF, 0xDA, 0xC1);
const EAST_ASIAN_FILL: RGBColor = RGBColor(0xE2, 0xF0, 0xCB);
const SOUTH_ASIAN_FILL: RGBColor = RGBColor(0xF6, 0xEA, 0xC2);
const AMBIGUOUS_FILL: RGBColor = RGBColor(0xC7, 0xCE, 0xEA);

const BAR_WIDTH: f64 = 0.35;

#[derive(Debug)]
pub enum ChartError {
    Io(std::io::Error),
    Draw(DrawingAreaErrorKind<std::io::Error>),
}

impl std::fmt::Display for ChartError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChartError::Io(err) => write!(f, "failed to prepare chart output: {}", err),
            ChartError::Draw(err) => write!(f, "failed to draw chart: {}", err),
        }
    }
}

impl std::error::Error for ChartError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ChartError::Io(err) => Some(err),
            ChartError::Draw(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for ChartError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<DrawingAreaErrorKind<std::io::Error>> for ChartError {
    fn from(err: DrawingAreaErrorKind<std::io::Error>) -> Self {
        Self::Draw(err)
    }
}

/// Renders race.svg, gender.svg, and age.svg into `out_dir`, creating the
/// directory when absent. Returns the written paths in dimension order.
pub fn render_all(
    comparison: &DemographicComparison,
    out_dir: &Path,
) -> Result<Vec<PathBuf>, ChartError> {
    std::fs::create_dir_all(out_dir)?;

    let race_path = out_dir.join("race.svg");
    render_race_chart(&comparison.race, &race_path)?;

    let gender_path = out_dir.join("gender.svg");
    render_gender_chart(&comparison.gender, &gender_path)?;

    let age_path = out_dir.join("age.svg");
    render_age_chart(&comparison.age, &age_path)?;

    Ok(vec![race_path, gender_path, age_path])
}

/// Grouped bars per race slot; the model's Asian slot stacks East Asian under
/// South Asian so the pair reads against the census's single Asian bucket.
pub fn render_race_chart(pair: &DistributionPair, path: &Path) -> Result<(), ChartError> {
    let ticks = ["White", "Black", "Asian", "Hispanic", "Mixed/Other"];
    draw_chart(
        path,
        (1000, 600),
        "Census vs Model: Race Distribution",
        "Race Categories",
        &ticks,
        &race_bars(pair),
    )
}

/// Male and Female are grouped pairs; the model-only Ambiguous bucket gets an
/// unpaired third slot centered on its tick.
pub fn render_gender_chart(pair: &DistributionPair, path: &Path) -> Result<(), ChartError> {
    let ticks = ["Male", "Female", "Ambiguous"];
    draw_chart(
        path,
        (800, 600),
        "Census vs Model: Gender Distribution",
        "Gender Categories",
        &ticks,
        &gender_bars(pair),
    )
}

pub fn render_age_chart(pair: &DistributionPair, path: &Path) -> Result<(), ChartError> {
    let ticks = ["Child", "Teen", "Young Adult", "Middle-Aged", "Elderly"];
    draw_chart(
        path,
        (1000, 600),
        "Census vs Model: Age Category Distribution",
        "Age Categories",
        &ticks,
        &age_bars(pair),
    )
}

// Each census/model pair straddles its slot tick: the census bar ends on the
// tick, the model bar starts on it.
fn census_left(slot: usize) -> f64 {
    slot as f64 - BAR_WIDTH
}

fn model_left(slot: usize) -> f64 {
    slot as f64
}

fn centered_left(slot: usize) -> f64 {
    slot as f64 - BAR_WIDTH / 2.0
}

fn race_bars(pair: &DistributionPair) -> Vec<Bar> {
    let categories = ["White", "Black", "Asian", "Hispanic", "Mixed/Other"];
    let mut bars = Vec::new();

    for (i, category) in categories.iter().enumerate() {
        let legend = (i == 0).then_some("Census");
        bars.push(Bar::single(
            census_left(i),
            pair.census.share_or_zero(category),
            CENSUS_FILL,
            legend,
        ));
    }

    bars.push(Bar::single(
        model_left(0),
        pair.model.share_or_zero("White"),
        MODEL_FILL,
        Some("Model White"),
    ));
    bars.push(Bar::single(
        model_left(1),
        pair.model.share_or_zero("Black"),
        MODEL_FILL,
        Some("Model Black"),
    ));

    let east = pair.model.share_or_zero("East Asian");
    let south = pair.model.share_or_zero("South Asian");
    bars.push(Bar {
        left: model_left(2),
        segments: vec![
            BarSegment {
                base: 0.0,
                value: east,
                color: EAST_ASIAN_FILL,
                legend: Some("Model East Asian"),
            },
            BarSegment {
                base: east,
                value: south,
                color: SOUTH_ASIAN_FILL,
                legend: Some("Model South Asian"),
            },
        ],
    });

    bars.push(Bar::single(
        model_left(3),
        pair.model.share_or_zero("Hispanic"),
        MODEL_FILL,
        Some("Model Hispanic"),
    ));
    bars.push(Bar::single(
        model_left(4),
        pair.model.share_or_zero("Mixed/Other"),
        MODEL_FILL,
        Some("Model Mixed/Other"),
    ));

    bars
}

fn gender_bars(pair: &DistributionPair) -> Vec<Bar> {
    let mut bars = Vec::new();

    for (i, category) in ["Male", "Female"].iter().enumerate() {
        let legend = (i == 0).then_some("Census");
        bars.push(Bar::single(
            census_left(i),
            pair.census.share_or_zero(category),
            CENSUS_FILL,
            legend,
        ));
    }
    for (i, category) in ["Male", "Female"].iter().enumerate() {
        let legend = (i == 0).then_some("Model");
        bars.push(Bar::single(
            model_left(i),
            pair.model.share_or_zero(category),
            MODEL_FILL,
            legend,
        ));
    }
    bars.push(Bar::single(
        centered_left(2),
        pair.model.share_or_zero("Ambiguous"),
        AMBIGUOUS_FILL,
        Some("Model Ambiguous"),
    ));

    bars
}

fn age_bars(pair: &DistributionPair) -> Vec<Bar> {
    let categories = ["Child", "Teen", "Young Adult", "Middle-Aged", "Elderly"];
    let mut bars = Vec::new();

    for (i, category) in categories.iter().enumerate() {
        let legend = (i == 0).then_some("Census");
        bars.push(Bar::single(
            census_left(i),
            pair.census.share_or_zero(category),
            CENSUS_FILL,
            legend,
        ));
    }
    for (i, category) in categories.iter().enumerate() {
        let legend = (i == 0).then_some("Model");
        bars.push(Bar::single(
            model_left(i),
            pair.model.share_or_zero(category),
            MODEL_FILL,
            legend,
        ));
    }

    bars
}

struct BarSegment {
    base: f64,
    value: f64,
    color: RGBColor,
    legend: Option<&'static str>,
}

struct Bar {
    left: f64,
    segments: Vec<BarSegment>,
}

impl Bar {
    fn single(left: f64, value: f64, color: RGBColor, legend: Option<&'static str>) -> Self {
        Self {
            left,
            segments: vec![BarSegment {
                base: 0.0,
                value,
                color,
                legend,
            }],
        }
    }
}

fn draw_chart(
    path: &Path,
    size: (u32, u32),
    title: &str,
    x_desc: &str,
    tick_labels: &[&str],
    bars: &[Bar],
) -> Result<(), ChartError> {
    let root = SVGBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;

    let tallest = bars
        .iter()
        .flat_map(|bar| bar.segments.iter().map(|seg| seg.base + seg.value))
        .fold(0.0f64, f64::max);
    let y_max = (tallest * 1.15).max(10.0);
    let x_max = tick_labels.len() as f64 - 1.0 + 0.6;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 22))
        .margin(10)
        .x_label_area_size(45)
        .y_label_area_size(55)
        .build_cartesian_2d(-0.6f64..x_max, 0.0f64..y_max)?;

    let labels: Vec<String> = tick_labels.iter().map(|label| label.to_string()).collect();
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(tick_labels.len())
        .x_label_formatter(&move |x| {
            let nearest = x.round();
            if nearest < 0.0 || (x - nearest).abs() > 0.01 {
                return String::new();
            }
            labels
                .get(nearest as usize)
                .cloned()
                .unwrap_or_default()
        })
        .x_desc(x_desc)
        .y_desc("Percentage (%)")
        .draw()?;

    let annotation_style = ("sans-serif", 12)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Center));

    for bar in bars {
        for seg in &bar.segments {
            if seg.value <= 0.0 {
                continue;
            }

            let fill = seg.color;
            let series = chart.draw_series(std::iter::once(Rectangle::new(
                [(bar.left, seg.base), (bar.left + BAR_WIDTH, seg.base + seg.value)],
                fill.filled(),
            )))?;
            if let Some(legend) = seg.legend {
                series.label(legend).legend(move |(x, y)| {
                    Rectangle::new([(x, y - 5), (x + 12, y + 5)], fill.filled())
                });
            }

            chart.draw_series(std::iter::once(Rectangle::new(
                [(bar.left, seg.base), (bar.left + BAR_WIDTH, seg.base + seg.value)],
                BLACK.stroke_width(1),
            )))?;

            chart.draw_series(std::iter::once(Text::new(
                format!("{:.1}%", seg.value),
                (bar.left + BAR_WIDTH / 2.0, seg.base + seg.value / 2.0),
                annotation_style.clone(),
            )))?;
        }
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .border_style(&BLACK)
        .background_style(&WHITE.mix(0.8))
        .draw()?;

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::CategoryDistribution;

    fn sample_pair() -> DistributionPair {
        DistributionPair {
            census: CategoryDistribution::from_pairs([
                ("White", 60.0),
                ("Black", 13.0),
                ("Asian", 6.0),
                ("Hispanic", 18.0),
                ("Mixed/Other", 3.0),
            ]),
            model: CategoryDistribution::from_pairs([
                ("White", 50.0),
                ("Black", 20.0),
                ("East Asian", 10.0),
                ("South Asian", 10.0),
                ("Hispanic", 5.0),
                ("Mixed/Other", 5.0),
            ]),
        }
    }

    fn gender_pair() -> DistributionPair {
        DistributionPair {
            census: CategoryDistribution::from_pairs([("Male", 49.5), ("Female", 50.5)]),
            model: CategoryDistribution::from_pairs([
                ("Male", 40.0),
                ("Female", 35.0),
                ("Ambiguous", 25.0),
            ]),
        }
    }

    #[test]
    fn paired_bars_straddle_their_slot_tick() {
        let bars = gender_bars(&gender_pair());

        // Census Male ends on tick 0; model Male starts there.
        assert!((bars[0].left + BAR_WIDTH - 0.0).abs() < 1e-9);
        assert!((bars[2].left - 0.0).abs() < 1e-9);
        // Same for the Female pair at tick 1.
        assert!((bars[1].left + BAR_WIDTH - 1.0).abs() < 1e-9);
        assert!((bars[3].left - 1.0).abs() < 1e-9);
    }

    #[test]
    fn ambiguous_bar_is_centered_on_its_tick() {
        let bars = gender_bars(&gender_pair());
        let ambiguous = bars.last().expect("ambiguous bar present");

        let center = ambiguous.left + BAR_WIDTH / 2.0;
        assert!((center - 2.0).abs() < 1e-9);
        assert_eq!(ambiguous.segments[0].legend, Some("Model Ambiguous"));
    }

    #[test]
    fn race_model_asian_slot_stacks_south_on_east() {
        let bars = race_bars(&sample_pair());
        let asian = &bars[7];

        assert!((asian.left - 2.0).abs() < 1e-9);
        assert_eq!(asian.segments.len(), 2);
        assert_eq!(asian.segments[0].base, 0.0);
        assert_eq!(asian.segments[0].value, 10.0);
        assert_eq!(asian.segments[1].base, 10.0);
        assert_eq!(asian.segments[1].value, 10.0);
    }

    #[test]
    fn race_chart_writes_svg_with_stacked_asian_labels() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("race.svg");

        render_race_chart(&sample_pair(), &path).expect("chart renders");

        let svg = std::fs::read_to_string(&path).expect("svg written");
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Census vs Model: Race Distribution"));
        assert!(svg.contains("Model East Asian"));
        assert!(svg.contains("Model South Asian"));
        assert!(svg.contains("10.0%"));
    }

    #[test]
    fn zero_value_segments_are_omitted() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("gender.svg");
        let pair = DistributionPair {
            census: CategoryDistribution::from_pairs([("Male", 49.5), ("Female", 50.5)]),
            model: CategoryDistribution::from_pairs([
                ("Male", 40.0),
                ("Female", 60.0),
                ("Ambiguous", 0.0),
            ]),
        };

        render_gender_chart(&pair, &path).expect("chart renders");

        let svg = std::fs::read_to_string(&path).expect("svg written");
        assert!(!svg.contains("Model Ambiguous"));
        assert!(svg.contains("49.5%"));
    }
}
