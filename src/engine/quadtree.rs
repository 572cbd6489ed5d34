//! Barnes–Hut quadtree over node positions.
//!
//! Every cell carries the total charge of the points below it and their
//! charge-weighted centre, so a distant cell can stand in for all of its
//! points in the many-body sum.

/// Subdivision stops here; anything still sharing a cell becomes one leaf.
const MAX_DEPTH: usize = 24;

#[derive(Clone, Debug)]
pub(crate) enum CellKind {
	Leaf(Vec<usize>),
	Branch([Option<usize>; 4]),
}

#[derive(Clone, Debug)]
pub(crate) struct Cell {
	/// Side length of the square cell.
	pub size: f64,
	/// Sum of the charges below this cell.
	pub charge: f64,
	/// Charge-weighted centre.
	pub cx: f64,
	pub cy: f64,
	pub kind: CellKind,
}

/// Whether a visitor wants to see the children of the cell it was given.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Visit {
	Descend,
	Skip,
}

#[derive(Clone, Debug, Default)]
pub(crate) struct QuadTree {
	cells: Vec<Cell>,
	root: Option<usize>,
	points: Vec<(f64, f64)>,
	charges: Vec<f64>,
}

impl QuadTree {
	/// Builds a tree over `points` with one charge per point.
	pub fn build(points: Vec<(f64, f64)>, charges: Vec<f64>) -> Self {
		debug_assert_eq!(points.len(), charges.len());
		let mut tree = Self {
			cells: Vec::with_capacity(points.len() * 2),
			root: None,
			points,
			charges,
		};
		if tree.points.is_empty() {
			return tree;
		}

		let (mut x0, mut y0) = (f64::INFINITY, f64::INFINITY);
		let (mut x1, mut y1) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
		for &(x, y) in &tree.points {
			x0 = x0.min(x);
			y0 = y0.min(y);
			x1 = x1.max(x);
			y1 = y1.max(y);
		}
		let size = (x1 - x0).max(y1 - y0).max(1.0);

		let all: Vec<usize> = (0..tree.points.len()).collect();
		tree.root = Some(tree.insert(all, x0, y0, size, 0));
		tree
	}

	pub fn point(&self, idx: usize) -> (f64, f64) {
		self.points[idx]
	}

	pub fn charge(&self, idx: usize) -> f64 {
		self.charges[idx]
	}

	/// Depth-first, pre-order walk. Children are visited only when the
	/// visitor returns [`Visit::Descend`].
	pub fn visit<F>(&self, mut visitor: F)
	where
		F: FnMut(&Cell) -> Visit,
	{
		let mut stack: Vec<usize> = self.root.into_iter().collect();
		while let Some(idx) = stack.pop() {
			let cell = &self.cells[idx];
			if visitor(cell) == Visit::Skip {
				continue;
			}
			if let CellKind::Branch(children) = &cell.kind {
				stack.extend(children.iter().flatten().copied());
			}
		}
	}

	fn insert(&mut self, indices: Vec<usize>, x0: f64, y0: f64, size: f64, depth: usize) -> usize {
		if indices.len() == 1 || depth >= MAX_DEPTH {
			let (charge, cx, cy) = self.weigh(indices.iter().map(|&i| {
				let (x, y) = self.points[i];
				(self.charges[i], x, y)
			}));
			return self.push(Cell {
				size,
				charge,
				cx,
				cy,
				kind: CellKind::Leaf(indices),
			});
		}

		let half = size / 2.0;
		let mut quadrants: [Vec<usize>; 4] = Default::default();
		for i in indices {
			let (x, y) = self.points[i];
			let q = usize::from(x >= x0 + half) + 2 * usize::from(y >= y0 + half);
			quadrants[q].push(i);
		}

		let mut children = [None; 4];
		for (q, members) in quadrants.into_iter().enumerate() {
			if members.is_empty() {
				continue;
			}
			let qx = x0 + if q & 1 == 1 { half } else { 0.0 };
			let qy = y0 + if q & 2 == 2 { half } else { 0.0 };
			children[q] = Some(self.insert(members, qx, qy, half, depth + 1));
		}

		let (charge, cx, cy) = self.weigh(children.iter().flatten().map(|&c| {
			let cell = &self.cells[c];
			(cell.charge, cell.cx, cell.cy)
		}));
		self.push(Cell {
			size,
			charge,
			cx,
			cy,
			kind: CellKind::Branch(children),
		})
	}

	/// Total charge and |charge|-weighted centre. Falls back to the plain
	/// mean when every charge is zero.
	fn weigh(&self, items: impl Iterator<Item = (f64, f64, f64)>) -> (f64, f64, f64) {
		let (mut charge, mut weight, mut wx, mut wy) = (0.0, 0.0, 0.0, 0.0);
		let (mut count, mut mx, mut my) = (0.0, 0.0, 0.0);
		for (c, x, y) in items {
			charge += c;
			weight += c.abs();
			wx += c.abs() * x;
			wy += c.abs() * y;
			count += 1.0;
			mx += x;
			my += y;
		}
		if weight > 0.0 {
			(charge, wx / weight, wy / weight)
		} else {
			(charge, mx / count, my / count)
		}
	}

	fn push(&mut self, cell: Cell) -> usize {
		self.cells.push(cell);
		self.cells.len() - 1
	}
}
