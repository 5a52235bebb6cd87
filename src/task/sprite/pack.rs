//! Growing binary-tree packer.
//!
//! Blocks are placed largest side first. The root starts at the size of the
//! first block and grows right or down whenever the next block does not fit,
//! preferring whichever direction keeps the sheet closer to square.
//!
//! Nodes live in an arena and reference each other by index.

/// Position of one packed block, in input order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Placement {
    pub const fn right(&self) -> u32 {
        self.x + self.width
    }

    pub const fn bottom(&self) -> u32 {
        self.y + self.height
    }

    /// True when the two rectangles share any area.
    #[cfg(test)]
    pub const fn overlaps(&self, other: &Self) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

/// Result of packing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Layout {
    pub placements: Vec<Placement>,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy)]
struct Node {
    x: u32,
    y: u32,
    w: u32,
    h: u32,
    used: bool,
    right: Option<usize>,
    down: Option<usize>,
}

impl Node {
    const fn free(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self {
            x,
            y,
            w,
            h,
            used: false,
            right: None,
            down: None,
        }
    }
}

struct Packer {
    nodes: Vec<Node>,
    root: usize,
}

impl Packer {
    fn new(w: u32, h: u32) -> Self {
        Self {
            nodes: vec![Node::free(0, 0, w, h)],
            root: 0,
        }
    }

    fn push(&mut self, node: Node) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    fn find(&self, at: usize, w: u32, h: u32) -> Option<usize> {
        let node = self.nodes[at];
        if node.used {
            node.right
                .and_then(|r| self.find(r, w, h))
                .or_else(|| node.down.and_then(|d| self.find(d, w, h)))
        } else if w <= node.w && h <= node.h {
            Some(at)
        } else {
            None
        }
    }

    fn split(&mut self, at: usize, w: u32, h: u32) -> (u32, u32) {
        let node = self.nodes[at];
        let down = self.push(Node::free(node.x, node.y + h, node.w, node.h - h));
        let right = self.push(Node::free(node.x + w, node.y, node.w - w, h));
        let node = &mut self.nodes[at];
        node.used = true;
        node.down = Some(down);
        node.right = Some(right);
        (node.x, node.y)
    }

    fn fit(&mut self, w: u32, h: u32) -> Option<(u32, u32)> {
        match self.find(self.root, w, h) {
            Some(at) => Some(self.split(at, w, h)),
            None => self.grow(w, h),
        }
    }

    fn grow(&mut self, w: u32, h: u32) -> Option<(u32, u32)> {
        let root = self.nodes[self.root];
        let can_grow_down = w <= root.w;
        let can_grow_right = h <= root.h;
        let should_grow_right = can_grow_right && root.h >= root.w + w;
        let should_grow_down = can_grow_down && root.w >= root.h + h;

        if should_grow_right {
            self.grow_right(w, h)
        } else if should_grow_down {
            self.grow_down(w, h)
        } else if can_grow_right {
            self.grow_right(w, h)
        } else if can_grow_down {
            self.grow_down(w, h)
        } else {
            None
        }
    }

    fn grow_right(&mut self, w: u32, h: u32) -> Option<(u32, u32)> {
        let old = self.nodes[self.root];
        let right = self.push(Node::free(old.w, 0, w, old.h));
        self.root = self.push(Node {
            x: 0,
            y: 0,
            w: old.w + w,
            h: old.h,
            used: true,
            right: Some(right),
            down: Some(self.root),
        });
        let at = self.find(self.root, w, h)?;
        Some(self.split(at, w, h))
    }

    fn grow_down(&mut self, w: u32, h: u32) -> Option<(u32, u32)> {
        let old = self.nodes[self.root];
        let down = self.push(Node::free(0, old.h, old.w, h));
        self.root = self.push(Node {
            x: 0,
            y: 0,
            w: old.w,
            h: old.h + h,
            used: true,
            right: Some(self.root),
            down: Some(down),
        });
        let at = self.find(self.root, w, h)?;
        Some(self.split(at, w, h))
    }
}

/// Pack blocks of the given `(width, height)` with `padding` pixels between
/// neighbours. The sheet carries no padding on its right and bottom edges.
pub fn pack(sizes: &[(u32, u32)], padding: u32) -> Layout {
    if sizes.is_empty() {
        return Layout::default();
    }

    // Largest side first; ties keep input order.
    let mut order: Vec<usize> = (0..sizes.len()).collect();
    order.sort_by_key(|&i| std::cmp::Reverse(sizes[i].0.max(sizes[i].1)));

    let padded = |i: usize| (sizes[i].0 + padding, sizes[i].1 + padding);
    let (w0, h0) = padded(order[0]);
    let mut packer = Packer::new(w0, h0);

    let mut placements = vec![
        Placement {
            x: 0,
            y: 0,
            width: 0,
            height: 0
        };
        sizes.len()
    ];

    for &i in &order {
        let (pw, ph) = padded(i);
        // Growth is always possible: the root is at least as large as the
        // first (largest) block in both directions.
        let (x, y) = packer.fit(pw, ph).unwrap_or((0, 0));
        placements[i] = Placement {
            x,
            y,
            width: sizes[i].0,
            height: sizes[i].1,
        };
    }

    let width = placements.iter().map(Placement::right).max().unwrap_or(0);
    let height = placements.iter().map(Placement::bottom).max().unwrap_or(0);

    Layout {
        placements,
        width,
        height,
    }
}
