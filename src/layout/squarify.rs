/// A tile produced by the squarified partition, in canvas coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Tile {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl Tile {
    pub fn area(&self) -> f64 {
        (self.x1 - self.x0) * (self.y1 - self.y0)
    }
}

/// The golden ratio, target aspect ratio of squarified rows.
pub const PHI: f64 = 1.618_033_988_749_895;

/// Squarified treemap partition of `[x0, x1] × [y0, y1]`.
///
/// `values` are laid out in the given order (no sorting), so the output
/// tile `i` belongs to `values[i]`. Rows are grown greedily while the worst
/// aspect ratio in the row does not get worse; each finished row takes the
/// full short side of the remaining rectangle. Zero values get zero-area
/// tiles. A degenerate rectangle or zero total puts everything left into a
/// single row of zero-extent tiles.
pub fn squarify(values: &[f64], ratio: f64, x0: f64, y0: f64, x1: f64, y1: f64) -> Vec<Tile> {
    let n = values.len();
    let mut tiles = vec![Tile::default(); n];
    let ratio = ratio.max(1.0);

    let (mut x0, mut y0) = (x0, y0);
    let mut value: f64 = values.iter().sum();
    let mut i0 = 0;

    while i0 < n {
        let dx = x1 - x0;
        let dy = y1 - y0;
        let mut i1 = i0;

        let sum_value = if dx <= 0.0 || dy <= 0.0 || value <= 0.0 {
            i1 = n;
            values[i0..].iter().sum()
        } else {
            // Skip leading empty values so the row starts with a real weight.
            let mut sum_value;
            loop {
                sum_value = values[i1];
                i1 += 1;
                if sum_value != 0.0 || i1 >= n {
                    break;
                }
            }

            let alpha = (dy / dx).max(dx / dy) / (value * ratio);
            let mut min_value = sum_value;
            let mut max_value = sum_value;
            let mut min_ratio = worst_ratio(sum_value, min_value, max_value, alpha);

            while i1 < n {
                let node_value = values[i1];
                let next_sum = sum_value + node_value;
                let next_min = min_value.min(node_value);
                let next_max = max_value.max(node_value);
                let new_ratio = worst_ratio(next_sum, next_min, next_max, alpha);
                if new_ratio > min_ratio {
                    break;
                }
                sum_value = next_sum;
                min_value = next_min;
                max_value = next_max;
                min_ratio = new_ratio;
                i1 += 1;
            }
            sum_value
        };

        let row = i0..i1;
        let last_row = i1 == n && sum_value > 0.0;
        if dx < dy {
            // Row spans the width, grows downwards.
            let ny = if last_row || value <= 0.0 { y1 } else { y0 + dy * sum_value / value };
            dice(&values[row.clone()], sum_value, &mut tiles[row], x0, y0, x1, ny);
            y0 = ny;
        } else {
            // Column spans the height, grows rightwards.
            let nx = if last_row || value <= 0.0 { x1 } else { x0 + dx * sum_value / value };
            slice(&values[row.clone()], sum_value, &mut tiles[row], x0, y0, nx, y1);
            x0 = nx;
        }

        value -= sum_value;
        i0 = i1;
    }

    tiles
}

/// Worst aspect ratio of a row, relative to the target ratio folded into `alpha`.
fn worst_ratio(sum: f64, min: f64, max: f64, alpha: f64) -> f64 {
    let beta = sum * sum * alpha;
    if min <= 0.0 || beta <= 0.0 {
        return f64::INFINITY;
    }
    (max / beta).max(beta / min)
}

/// Lay a row out left to right across `[x0, x1]`.
fn dice(values: &[f64], total: f64, out: &mut [Tile], x0: f64, y0: f64, x1: f64, y1: f64) {
    let k = if total > 0.0 { (x1 - x0) / total } else { 0.0 };
    let mut x = x0;
    let last = values.len().saturating_sub(1);
    for (i, (tile, &v)) in out.iter_mut().zip(values).enumerate() {
        // Snap the row end so rounding never leaves a sliver uncovered.
        let next = if i == last && v > 0.0 { x1 } else { x + v * k };
        *tile = Tile { x0: x, y0, x1: next, y1 };
        x = next;
    }
}

/// Lay a column out top to bottom across `[y0, y1]`.
fn slice(values: &[f64], total: f64, out: &mut [Tile], x0: f64, y0: f64, x1: f64, y1: f64) {
    let k = if total > 0.0 { (y1 - y0) / total } else { 0.0 };
    let mut y = y0;
    let last = values.len().saturating_sub(1);
    for (i, (tile, &v)) in out.iter_mut().zip(values).enumerate() {
        let next = if i == last && v > 0.0 { y1 } else { y + v * k };
        *tile = Tile { x0, y0: y, x1, y1: next };
        y = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_item_fills_rect() {
        let tiles = squarify(&[7.0], PHI, 0.0, 0.0, 1920.0, 1080.0);
        assert_eq!(tiles, vec![Tile { x0: 0.0, y0: 0.0, x1: 1920.0, y1: 1080.0 }]);
    }

    #[test]
    fn layout_preserves_area_for_simple_case() {
        let values = [400.0, 300.0, 200.0, 100.0];
        let tiles = squarify(&values, PHI, 0.0, 0.0, 50.0, 20.0);
        let total_out: f64 = tiles.iter().map(Tile::area).sum();
        assert!((1000.0 - total_out).abs() < 1e-9);
        for (tile, v) in tiles.iter().zip(values) {
            assert!((tile.area() - v).abs() < 1e-9, "{tile:?} for {v}");
        }
    }

    #[test]
    fn keeps_input_order() {
        // Smallest first: tile 0 still belongs to value 0.
        let values = [1.0, 9.0];
        let tiles = squarify(&values, PHI, 0.0, 0.0, 100.0, 10.0);
        assert!((tiles[0].area() - 100.0).abs() < 1e-9);
        assert!((tiles[1].area() - 900.0).abs() < 1e-9);
        assert_eq!(tiles[0].x0, 0.0);
    }

    #[test]
    fn zero_values_get_zero_area() {
        let tiles = squarify(&[0.0, 5.0, 0.0, 5.0], PHI, 0.0, 0.0, 10.0, 10.0);
        assert_eq!(tiles[0].area(), 0.0);
        assert_eq!(tiles[2].area(), 0.0);
        assert!((tiles[1].area() - 50.0).abs() < 1e-9);
        assert!((tiles[3].area() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn all_zero_values_do_not_divide_by_zero() {
        let tiles = squarify(&[0.0, 0.0], PHI, 0.0, 0.0, 10.0, 10.0);
        assert!(tiles.iter().all(|t| t.area() == 0.0 && t.x0.is_finite() && t.y1.is_finite()));
    }

    #[test]
    fn degenerate_rect() {
        let tiles = squarify(&[1.0, 2.0], PHI, 5.0, 5.0, 5.0, 9.0);
        assert!(tiles.iter().all(|t| t.area() == 0.0));
    }

    #[test]
    fn empty_input() {
        assert!(squarify(&[], PHI, 0.0, 0.0, 10.0, 10.0).is_empty());
    }
}
