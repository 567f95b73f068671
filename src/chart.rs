use crate::error::Result;
use crate::frequency::FrequencyTable;
use crate::report::write_atomic;
use std::fmt;
use std::path::Path;
use textplots::{Chart, Plot, Shape};

const CHART_WIDTH: u32 = 120;
const CHART_HEIGHT: u32 = 60;

/// A rendered bar chart of the most frequent entries of a table.
#[derive(Debug, Clone)]
pub struct BarChart {
    pub title: String,
    pub frame: String,
    /// Bar position (1-based) to entry, in the order drawn.
    pub legend: Vec<(String, usize)>,
}

impl BarChart {
    pub fn save(&self, path: &Path) -> Result<()> {
        write_atomic(path, self.to_string().as_bytes())
    }

    pub fn num_bars(&self) -> usize {
        self.legend.len()
    }
}

impl fmt::Display for BarChart {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f)?;
        writeln!(f, "{}", self.frame)?;
        for (i, (label, count)) in self.legend.iter().enumerate() {
            writeln!(f, "{:>3}  {} {}", i + 1, label, count)?;
        }
        Ok(())
    }
}

fn render(chart: &mut Chart) -> String {
    chart.axis();
    chart.figures();
    chart.to_string()
}

/// Plot the `num_bars` most frequent entries of `freq` by descending count.
/// Bar `k` spans `[k - 1, k]` on the x axis.
pub fn plot_label_distributions(freq: &FrequencyTable, title: &str, num_bars: usize) -> BarChart {
    let top = freq.top(num_bars);
    // textplots draws a bar between each pair of consecutive points, topped
    // by the second point, so the first bar needs a point at the origin.
    let points: Vec<(f32, f32)> = std::iter::once((0.0, 0.0))
        .chain(
            top.iter()
                .enumerate()
                .map(|(i, &(_, count))| ((i + 1) as f32, count as f32)),
        )
        .collect();
    let ymax = top.first().map_or(1, |&(_, count)| count.max(1)) as f32;
    let xmax = top.len().max(1) as f32;

    let shape = Shape::Bars(&points);
    let frame = render(
        Chart::new_with_y_range(CHART_WIDTH, CHART_HEIGHT, 0.0, xmax, 0.0, ymax).lineplot(&shape),
    );

    BarChart {
        title: title.to_string(),
        frame,
        legend: top
            .into_iter()
            .map(|(label, count)| (label.to_string(), count))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn freq() -> FrequencyTable {
        FrequencyTable::count(["s", "b", "s", "fh", "s", "b", "qy"])
    }

    #[test]
    fn test_keeps_top_entries() {
        let chart = plot_label_distributions(&freq(), "Basic", 2);
        assert_eq!(chart.num_bars(), 2);
        assert_eq!(
            chart.legend,
            vec![("s".to_string(), 3), ("b".to_string(), 2)]
        );
    }

    #[test]
    fn test_fewer_entries_than_bars() {
        let chart = plot_label_distributions(&freq(), "Basic", 15);
        assert_eq!(chart.num_bars(), 4);
    }

    #[test]
    fn test_rendered_text() {
        let chart = plot_label_distributions(&freq(), "MRDA Basic", 3);
        let text = chart.to_string();
        assert!(text.starts_with("MRDA Basic\n"));
        assert!(text.contains("  1  s 3"));
        assert!(text.contains("  3  fh 1"));
        assert!(!chart.frame.is_empty());
    }

    fn ink(frame: &str) -> u32 {
        frame
            .chars()
            .filter(|c| ('\u{2800}'..='\u{28FF}').contains(c))
            .map(|c| (c as u32 - 0x2800).count_ones())
            .sum()
    }

    #[test]
    fn test_single_entry_draws_a_bar() {
        let empty = plot_label_distributions(&FrequencyTable::new(), "Basic", 15);
        let single = plot_label_distributions(&FrequencyTable::count(["Z", "Z", "Z"]), "Basic", 15);
        assert_eq!(single.legend, vec![("Z".to_string(), 3)]);
        assert!(ink(&single.frame) > ink(&empty.frame));
    }

    #[test]
    fn test_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.txt");
        let chart = plot_label_distributions(&freq(), "Basic", 4);
        chart.save(&path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), chart.to_string());
    }
}
