//! Answer grid extraction and shape checks

use super::SolveError;
use crate::types::{Grid, Puzzle};

/// Extract a grid from model output.
///
/// Accepts a bare JSON array, or finds the first bracketed array inside
/// surrounding prose. Ragged rows are padded, see [`normalize_grid`].
pub fn parse_answer_grid(text: &str) -> Result<Grid, SolveError> {
    if let Ok(grid) = serde_json::from_str::<Grid>(text.trim()) {
        return normalize_grid(grid);
    }

    let start = text
        .find("[[")
        .or_else(|| text.find('['))
        .ok_or_else(|| SolveError::Failed("not valid json array".to_string()))?;
    let end = find_matching_bracket(text, start)
        .ok_or_else(|| SolveError::Failed("not valid json array".to_string()))?;

    let grid: Grid = serde_json::from_str(&text[start..=end])
        .map_err(|e| SolveError::Failed(format!("parse json array: {e}")))?;
    normalize_grid(grid)
}

/// Byte index of the `]` closing the `[` at `start`
pub fn find_matching_bracket(text: &str, start: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (offset, byte) in text.as_bytes().get(start..)?.iter().enumerate() {
        match byte {
            b'[' => depth += 1,
            b']' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(start + offset);
                }
            }
            _ => {}
        }
    }
    None
}

/// Right-pad short rows with zeros up to the widest row.
pub fn normalize_grid(mut grid: Grid) -> Result<Grid, SolveError> {
    if grid.is_empty() {
        return Err(SolveError::Failed("empty grid".to_string()));
    }
    let width = grid.iter().map(Vec::len).max().unwrap_or(0);
    if width == 0 {
        return Err(SolveError::Failed("empty rows".to_string()));
    }
    for row in &mut grid {
        row.resize(width, 0);
    }
    Ok(grid)
}

/// Compare a grid with the puzzle's size hint.
///
/// A hint with a zero dimension is treated as absent.
pub fn validate_answer_size(puzzle: &Puzzle, grid: &Grid) -> Result<(), String> {
    let size = puzzle.hints.answer_size;
    if size.width == 0 || size.height == 0 {
        return Ok(());
    }
    if grid.len() != size.height {
        return Err(format!(
            "row count mismatch: got {}, want {}",
            grid.len(),
            size.height
        ));
    }
    for (i, row) in grid.iter().enumerate() {
        if row.len() != size.width {
            return Err(format!(
                "row {} width mismatch: got {}, want {}",
                i,
                row.len(),
                size.width
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AnswerSize, PuzzleHints};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn test_parse_bare_array() {
        let grid = parse_answer_grid("[[1,2],[3,4]]").unwrap();
        assert_eq!(grid, vec![vec![1, 2], vec![3, 4]]);
    }

    #[test]
    fn test_parse_array_in_prose() {
        let text = "The answer is [[0, 1], [1]] based on the pattern [x].";
        let grid = parse_answer_grid(text).unwrap();
        assert_eq!(grid, vec![vec![0, 1], vec![1, 0]]);
    }

    #[rstest]
    #[case("no grid here")]
    #[case("[[1, 2]")]
    #[case("[]")]
    #[case("[[], []]")]
    fn test_parse_failures(#[case] text: &str) {
        assert!(matches!(
            parse_answer_grid(text),
            Err(SolveError::Failed(_))
        ));
    }

    #[rstest]
    #[case("[[1],[2]]", 0, Some(8))]
    #[case("x [a] y", 2, Some(4))]
    #[case("[[1]", 0, None)]
    #[case("abc", 10, None)]
    fn test_find_matching_bracket(
        #[case] text: &str,
        #[case] start: usize,
        #[case] expected: Option<usize>,
    ) {
        assert_eq!(find_matching_bracket(text, start), expected);
    }

    #[test]
    fn test_validate_answer_size() {
        let puzzle = Puzzle {
            hints: PuzzleHints {
                background_color: 0,
                answer_size: AnswerSize {
                    width: 2,
                    height: 2,
                },
            },
            ..Puzzle::default()
        };
        assert!(validate_answer_size(&puzzle, &vec![vec![1, 2], vec![3, 4]]).is_ok());
        assert!(validate_answer_size(&puzzle, &vec![vec![1, 2]]).is_err());
        assert!(validate_answer_size(&puzzle, &vec![vec![1, 2], vec![3]]).is_err());
        assert!(validate_answer_size(&Puzzle::default(), &vec![vec![1]]).is_ok());
    }
}
