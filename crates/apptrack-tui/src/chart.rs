// Status breakdown chart: a proportional bar plus a legend
use apptrack_core::summary::ChartSlice;
use apptrack_core::Status;
use ratatui::style::Color;

/// One coloured run of the bar
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub status: Status,
    pub width: u16,
    pub label: String,
}

pub fn status_color(status: Status) -> Color {
    match status {
        Status::Applied => Color::Blue,
        Status::Interview => Color::Yellow,
        Status::Offer => Color::Green,
        Status::Rejected => Color::Red,
    }
}

/// "Interview 33.3%"
pub fn slice_label(slice: &ChartSlice) -> String {
    format!("{} {:.1}%", slice.status, slice.percent)
}

/// Split `width` cells between the slices in proportion to their share.
///
/// Widths always add up to `width` (largest remainder), and any slice with a
/// nonzero count gets at least one cell while there is room for it.
pub fn segments(slices: &[ChartSlice], width: u16) -> Vec<Segment> {
    if slices.is_empty() || width == 0 {
        return Vec::new();
    }

    let total: usize = slices.iter().map(|s| s.count).sum();
    if total == 0 {
        return Vec::new();
    }

    let exact: Vec<f64> = slices
        .iter()
        .map(|s| s.count as f64 * width as f64 / total as f64)
        .collect();
    let mut widths: Vec<u16> = exact.iter().map(|w| w.floor() as u16).collect();

    let mut remaining = width.saturating_sub(widths.iter().sum());
    let mut order: Vec<usize> = (0..slices.len()).collect();
    order.sort_by(|&a, &b| {
        let ra = exact[a] - exact[a].floor();
        let rb = exact[b] - exact[b].floor();
        rb.partial_cmp(&ra).unwrap_or(std::cmp::Ordering::Equal)
    });
    for idx in order {
        if remaining == 0 {
            break;
        }
        widths[idx] += 1;
        remaining -= 1;
    }

    // Tiny slices borrow a cell from the widest one
    for i in 0..widths.len() {
        if widths[i] == 0 && slices[i].count > 0 {
            if let Some(widest) = (0..widths.len()).max_by_key(|&j| widths[j]) {
                if widths[widest] > 1 {
                    widths[widest] -= 1;
                    widths[i] = 1;
                }
            }
        }
    }

    slices
        .iter()
        .zip(widths)
        .map(|(slice, width)| Segment {
            status: slice.status,
            width,
            label: slice_label(slice),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slice(status: Status, count: usize, total: usize) -> ChartSlice {
        ChartSlice {
            status,
            count,
            percent: count as f64 * 100.0 / total as f64,
        }
    }

    #[test]
    fn test_widths_fill_the_bar() {
        let slices = vec![
            slice(Status::Applied, 1, 3),
            slice(Status::Interview, 1, 3),
            slice(Status::Offer, 1, 3),
        ];
        let segs = segments(&slices, 40);
        assert_eq!(segs.iter().map(|s| s.width).sum::<u16>(), 40);
        assert!(segs.iter().all(|s| s.width == 13 || s.width == 14));
    }

    #[test]
    fn test_small_slice_stays_visible() {
        let slices = vec![slice(Status::Applied, 99, 100), slice(Status::Offer, 1, 100)];
        let segs = segments(&slices, 10);
        assert_eq!(segs[1].width, 1);
        assert_eq!(segs.iter().map(|s| s.width).sum::<u16>(), 10);
    }

    #[test]
    fn test_labels_show_percentages() {
        let s = slice(Status::Interview, 1, 3);
        assert_eq!(slice_label(&s), "Interview 33.3%");
    }

    #[test]
    fn test_empty_summary_draws_nothing() {
        assert!(segments(&[], 20).is_empty());
        assert!(segments(&[slice(Status::Applied, 1, 1)], 0).is_empty());
    }
}
