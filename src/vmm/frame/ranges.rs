use crate::vmm::types::FrameIndex;

/// Renders a set of frame indices as maximal contiguous runs in ascending
/// order, e.g. `[1, 2, 3, 5, 6, 7, 10]` becomes `"1-3, 5-7, 10"`.
///
/// Single-frame runs print as a bare number. The input order does not
/// matter; duplicates are not expected.
pub fn merge_frame_ranges(frames: &[FrameIndex]) -> String {
    let mut sorted = frames.to_vec();
    sorted.sort_unstable();

    let mut runs: Vec<(FrameIndex, FrameIndex)> = Vec::new();
    for &frame in &sorted {
        match runs.last_mut() {
            Some((_, high)) if frame == *high + 1 => *high = frame,
            _ => runs.push((frame, frame)),
        }
    }

    let rendered: Vec<String> = runs
        .iter()
        .map(|&(low, high)| {
            if low == high {
                low.to_string()
            } else {
                format!("{}-{}", low, high)
            }
        })
        .collect();
    rendered.join(", ")
}
