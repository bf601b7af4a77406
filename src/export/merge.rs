//! Merge ranges of a header matrix
//!
//! Greedy left-to-right, top-to-bottom scan with a visited mask. At each unvisited label
//! the scan tries, in order: a 2×2 block, a horizontal run, a vertical run. The order
//! matters; it decides the shape of the written header.

use serde::Serialize;

/// Zero-based cell coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CellRef {
    pub row: usize,
    pub col: usize,
}

/// Inclusive merge rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MergeRange {
    pub start: CellRef,
    pub end: CellRef,
}

impl MergeRange {
    fn new(start_row: usize, start_col: usize, end_row: usize, end_col: usize) -> Self {
        Self {
            start: CellRef {
                row: start_row,
                col: start_col,
            },
            end: CellRef {
                row: end_row,
                col: end_col,
            },
        }
    }
}

/// Compute merge ranges for a header matrix where `None` continues a preceding label.
///
/// Rows shorter than the widest row are treated as padded with `None`.
pub fn compute_merges(grid: &[Vec<Option<String>>]) -> Vec<MergeRange> {
    let rows = grid.len();
    let cols = grid.iter().map(Vec::len).max().unwrap_or(0);
    if rows == 0 || cols == 0 {
        return Vec::new();
    }

    let empty = |r: usize, c: usize| grid[r].get(c).is_none_or(Option::is_none);
    let mut visited = vec![vec![false; cols]; rows];
    let mut merges = Vec::new();

    for i in 0..rows {
        for j in 0..cols {
            if visited[i][j] || empty(i, j) {
                continue;
            }

            // 2x2 block
            if i + 1 < rows
                && j + 1 < cols
                && !visited[i][j + 1]
                && !visited[i + 1][j]
                && !visited[i + 1][j + 1]
                && empty(i, j + 1)
                && empty(i + 1, j)
                && empty(i + 1, j + 1)
            {
                merges.push(MergeRange::new(i, j, i + 1, j + 1));
                visited[i][j] = true;
                visited[i][j + 1] = true;
                visited[i + 1][j] = true;
                visited[i + 1][j + 1] = true;
                continue;
            }

            let right = (j + 1..cols)
                .take_while(|&c| !visited[i][c] && empty(i, c))
                .count();
            if right > 0 {
                merges.push(MergeRange::new(i, j, i, j + right));
                for c in j..=j + right {
                    visited[i][c] = true;
                }
                continue;
            }

            let down = (i + 1..rows)
                .take_while(|&r| !visited[r][j] && empty(r, j))
                .count();
            if down > 0 {
                merges.push(MergeRange::new(i, j, i + down, j));
                for row in visited.iter_mut().skip(i).take(down + 1) {
                    row[j] = true;
                }
                continue;
            }

            visited[i][j] = true;
        }
    }

    merges
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[&str]]) -> Vec<Vec<Option<String>>> {
        rows.iter()
            .map(|row| {
                row.iter()
                    .map(|c| (!c.is_empty()).then(|| c.to_string()))
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_block_merge_wins() {
        let merges = compute_merges(&grid(&[&["A", ""], &["", ""]]));
        assert_eq!(merges, vec![MergeRange::new(0, 0, 1, 1)]);
    }

    #[test]
    fn test_horizontal_before_vertical() {
        let merges = compute_merges(&grid(&[&["G", "", "x"], &["a", "b", ""]]));
        assert_eq!(
            merges,
            vec![MergeRange::new(0, 0, 0, 1), MergeRange::new(0, 2, 1, 2)]
        );
    }

    #[test]
    fn test_vertical_runs_for_leaves_beside_groups() {
        let merges = compute_merges(&grid(&[
            &["x", "外", "", ""],
            &["", "a", "内", ""],
            &["", "", "b", "c"],
        ]));
        assert_eq!(
            merges,
            vec![
                MergeRange::new(0, 0, 2, 0),
                MergeRange::new(0, 1, 0, 3),
                MergeRange::new(1, 1, 2, 1),
                MergeRange::new(1, 2, 1, 3),
            ]
        );
    }

    #[test]
    fn test_single_cells_have_no_merge() {
        assert!(compute_merges(&grid(&[&["a", "b"]])).is_empty());
        assert!(compute_merges(&[]).is_empty());
        assert!(compute_merges(&[vec![]]).is_empty());
    }

    #[test]
    fn test_ragged_rows_are_padded() {
        let merges = compute_merges(&[vec![Some("A".to_string()), None], vec![]]);
        assert_eq!(merges, vec![MergeRange::new(0, 0, 1, 1)]);
    }
}
