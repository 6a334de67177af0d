//! Raster based ring simplification.
//!
//! Simplification happens in two stages:
//! 1. [`snap`] moves every point to the integer cell of a grid with the given `scale` (distance per cell) and
//!    merges consecutive points that land in the same cell.
//! 2. [`reduce`] removes every point that lies on a straight run between its neighbours. A path that folds back
//!    onto itself (a *slit*) is collinear as well, so spikes are removed together with the points they return to.
//!
//! All the tests in the second stage are done with exact integer arithmetic, so the result does not depend on
//! floating point rounding, and running [`reduce`] on its own output does not change it.

use crate::cartesian::{CartesianPoint2d, Cell, Orientation, Point2};

/// Snaps the points to a grid with cell size `scale` and merges consecutive points that fall into the same cell.
///
/// Cell coordinates are `floor(x / scale)` and `floor(y / scale)`.
///
/// # Panics
///
/// Panics if `scale` is not a positive finite number.
pub fn snap<'a, P>(points: impl IntoIterator<Item = &'a P>, scale: f64) -> Vec<Cell>
where
    P: CartesianPoint2d<Num = f64> + 'a,
{
    assert!(
        scale > 0.0 && scale.is_finite(),
        "raster scale must be a positive finite number, got {scale}"
    );

    let mut cells: Vec<Cell> = vec![];
    for p in points {
        let cell = Point2::new((p.x() / scale).floor() as i64, (p.y() / scale).floor() as i64);
        if cells.last() != Some(&cell) {
            cells.push(cell);
        }
    }

    cells
}

/// Removes duplicate, collinear and fold-back points from a sequence of raster cells.
///
/// For an open contour (`closed == false`) the first and the last cells are always kept. For a closed contour the
/// sequence is treated as a cycle: triplets across the seam are reduced too, and the output never repeats the first
/// cell at the end.
///
/// The output contains no two equal consecutive cells and no three consecutive collinear cells (except where an
/// open contour's end point is involved). Degenerate input produces an output of fewer than 3 cells, which must not
/// be treated as a polygon.
pub fn reduce(cells: impl IntoIterator<Item = Cell>, closed: bool) -> Vec<Cell> {
    let mut out: Vec<Cell> = vec![];

    for cell in cells {
        if out.last() == Some(&cell) {
            continue;
        }

        out.push(cell);
        while out.len() >= 3 {
            let n = out.len();
            if !is_collinear(&out[n - 3], &out[n - 2], &out[n - 1]) {
                break;
            }

            out.remove(n - 2);
            if out[n - 3] == out[n - 2] {
                // The path came back to the point before the removed one: retract the whole slit.
                out.pop();
            }
        }
    }

    if closed {
        close_seam(&mut out);
    }

    out
}

/// Snaps the points to the grid and reduces them. See [`snap`] and [`reduce`].
///
/// ```
/// use cartokit_types::cartesian::{simplify, Point2};
///
/// let ring = [[-10.0, -10.0], [-10.0, 10.0], [0.0, 15.0], [10.0, 10.0], [10.0, -10.0], [0.0, -5.0]]
///     .map(|[x, y]| Point2::new(x, y));
/// let simplified = simplify(&ring, 10.0, true);
/// assert_eq!(simplified, [[-1, -1], [-1, 1], [1, 1], [1, -1]].map(|[x, y]| Point2::new(x, y)));
/// ```
pub fn simplify<'a, P>(points: impl IntoIterator<Item = &'a P>, scale: f64, closed: bool) -> Vec<Cell>
where
    P: CartesianPoint2d<Num = f64> + 'a,
{
    reduce(snap(points, scale), closed)
}

fn close_seam(out: &mut Vec<Cell>) {
    loop {
        let n = out.len();
        if n >= 2 && out[0] == out[n - 1] {
            out.pop();
            continue;
        }

        if n < 3 {
            break;
        }

        if is_collinear(&out[n - 2], &out[n - 1], &out[0]) {
            out.pop();
            continue;
        }

        if is_collinear(&out[n - 1], &out[0], &out[1]) {
            out.remove(0);
            continue;
        }

        break;
    }
}

fn is_collinear(a: &Cell, b: &Cell, c: &Cell) -> bool {
    Orientation::triplet(&widen(a), &widen(b), &widen(c)) == Orientation::Collinear
}

fn widen(cell: &Cell) -> Point2<i128> {
    Point2::new(cell.x() as i128, cell.y() as i128)
}
