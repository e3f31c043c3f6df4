//! Sweep-line constrained Delaunay triangulation.
//!
//! The sweep processes points bottom-up, maintaining an advancing front
//! of the partially triangulated region. Each swept point forms a new
//! front triangle that is legalized against the Delaunay criterion with
//! edge flips; constrained (polygon boundary) edges are restored by edge
//! events that flip crossing triangles out of the way. Finalization flood
//! fills the region enclosed by constrained edges to discard the scaffold
//! triangles touching the artificial sweep points.

use crate::decomposition::triangle::{
    in_scan_area, orient2d, smart_incircle, Orientation, PointId, SweepPoint, Tri, TriId, EPS,
};
use crate::error::PhysicsError;
use crate::math::Vector2;
use crate::Result;

/// How far the artificial sweep points sit outside the point cloud bounds
const ALPHA: f64 = 0.3;

const PI_DIV2: f64 = std::f64::consts::FRAC_PI_2;
const PI_3DIV4: f64 = 3.0 * std::f64::consts::FRAC_PI_4;

/// Index of a node in the advancing front arena
type NodeId = usize;

/// A constrained edge between two input points; `q` is the upper endpoint
/// in sweep order
#[derive(Debug, Clone, Copy)]
struct Edge {
    p: PointId,
    q: PointId,
}

/// A node of the advancing front.
///
/// Nodes removed from the front keep their links so that traversals
/// started from a stale node still reach the live front.
#[derive(Debug, Clone, Copy)]
struct Node {
    point: PointId,
    value: f64,
    triangle: Option<TriId>,
    prev: Option<NodeId>,
    next: Option<NodeId>,
}

/// State of the constrained-edge event currently being resolved
#[derive(Debug, Clone, Copy)]
struct EdgeEventState {
    constrained_edge: Edge,
    right: bool,
}

/// A basin of the advancing front to be filled
#[derive(Debug, Clone, Copy, Default)]
struct Basin {
    left: Option<NodeId>,
    bottom: Option<NodeId>,
    right: Option<NodeId>,
    width: f64,
    left_highest: bool,
}

/// Scratch state for one triangulation run. Everything here is discarded
/// when the run produces its triangle list.
pub(super) struct SweepContext {
    /// Input coordinates as given, for the output triangles
    input: Vec<Vector2>,

    /// Widened coordinates used by the predicates
    points: Vec<SweepPoint>,

    /// Constrained edges attached to their upper endpoint
    point_edges: Vec<Vec<Edge>>,

    /// Triangle arena
    tris: Vec<Tri>,

    /// Advancing front node arena
    nodes: Vec<Node>,

    /// Leftmost node of the advancing front
    front_head: NodeId,

    /// Hint node for front searches
    search: NodeId,

    basin: Basin,
    edge_event: EdgeEventState,
}

impl SweepContext {
    /// Builds the context from an outer ring and hole rings.
    ///
    /// Every ring contributes its points and its closing edges as
    /// constraints. Degenerate rings (too few points, repeated points,
    /// exactly collinear consecutive points) are rejected; the behavior
    /// for self-intersecting rings or holes outside the outer boundary is
    /// undefined.
    pub fn new(outer: &[Vector2], holes: &[Vec<Vector2>]) -> Result<Self> {
        let mut ctx = Self {
            input: Vec::new(),
            points: Vec::new(),
            point_edges: Vec::new(),
            tris: Vec::new(),
            nodes: Vec::new(),
            front_head: 0,
            search: 0,
            basin: Basin::default(),
            edge_event: EdgeEventState {
                constrained_edge: Edge { p: 0, q: 0 },
                right: false,
            },
        };

        ctx.add_ring(outer)?;
        for hole in holes {
            ctx.add_ring(hole)?;
        }

        Ok(ctx)
    }

    fn add_ring(&mut self, ring: &[Vector2]) -> Result<()> {
        if ring.len() < 3 {
            return Err(PhysicsError::DegenerateGeometry(format!(
                "A polygon ring needs at least 3 points, got {}",
                ring.len()
            )));
        }

        let base = self.points.len();
        for v in ring {
            self.input.push(*v);
            self.points.push(SweepPoint::new(v.x as f64, v.y as f64));
            self.point_edges.push(Vec::new());
        }

        let n = ring.len();
        for i in 0..n {
            let a = base + i;
            let b = base + (i + 1) % n;
            let c = base + (i + 2) % n;

            if self.points[a] == self.points[b] {
                return Err(PhysicsError::DegenerateGeometry(
                    "Repeated consecutive point in polygon ring".to_string(),
                ));
            }

            if orient2d(self.points[a], self.points[b], self.points[c]) == Orientation::Collinear
            {
                return Err(PhysicsError::DegenerateGeometry(
                    "Collinear consecutive points in polygon ring".to_string(),
                ));
            }

            self.add_edge(a, b);
        }

        Ok(())
    }

    /// Registers a constrained edge on its upper endpoint
    fn add_edge(&mut self, a: PointId, b: PointId) {
        let (p, q) = if point_less(self.points[a], self.points[b]) {
            (a, b)
        } else {
            (b, a)
        };

        self.point_edges[q].push(Edge { p, q });
    }

    /// Runs the sweep and returns the interior triangles
    pub fn triangulate(mut self) -> Result<Vec<[Vector2; 3]>> {
        let order = self.sorted_points()?;

        self.create_advancing_front(order[0]);

        for &point in order.iter().skip(1) {
            let node = self.point_event(point)?;

            let edges = std::mem::take(&mut self.point_edges[point]);
            for edge in &edges {
                self.edge_event(*edge, node)?;
            }
            self.point_edges[point] = edges;
        }

        self.finalize_polygon()?;

        Ok(self
            .tris
            .iter()
            .filter(|t| t.interior)
            .map(|t| [self.input[t.points[0]], self.input[t.points[1]], self.input[t.points[2]]])
            .collect())
    }

    /// Sorts the input points bottom-up for the sweep and rejects
    /// duplicate coordinates
    fn sorted_points(&self) -> Result<Vec<PointId>> {
        let mut order: Vec<PointId> = (0..self.points.len()).collect();
        order.sort_by(|&a, &b| {
            let pa = self.points[a];
            let pb = self.points[b];
            pa.y.partial_cmp(&pb.y)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(pa.x.partial_cmp(&pb.x).unwrap_or(std::cmp::Ordering::Equal))
        });

        for pair in order.windows(2) {
            if self.points[pair[0]] == self.points[pair[1]] {
                return Err(PhysicsError::DegenerateGeometry(
                    "Duplicate point in polygon input".to_string(),
                ));
            }
        }

        Ok(order)
    }

    /// Creates the initial triangle between the lowest point and the two
    /// artificial sweep points, and the three-node front over it
    fn create_advancing_front(&mut self, lowest: PointId) {
        let (mut xmin, mut xmax) = (f64::MAX, f64::MIN);
        let (mut ymin, mut ymax) = (f64::MAX, f64::MIN);
        for p in &self.points {
            xmin = xmin.min(p.x);
            xmax = xmax.max(p.x);
            ymin = ymin.min(p.y);
            ymax = ymax.max(p.y);
        }

        let dx = ALPHA * (xmax - xmin);
        let dy = ALPHA * (ymax - ymin);

        // Artificial points are not part of any ring and carry no edges
        let right_pt = self.push_point(SweepPoint::new(xmax + dx, ymin - dy));
        let left_pt = self.push_point(SweepPoint::new(xmin - dx, ymin - dy));

        let t0 = self.push_tri(Tri::new(lowest, left_pt, right_pt));

        let head = self.push_node(Node {
            point: left_pt,
            value: self.points[left_pt].x,
            triangle: Some(t0),
            prev: None,
            next: None,
        });
        let middle = self.push_node(Node {
            point: lowest,
            value: self.points[lowest].x,
            triangle: Some(t0),
            prev: None,
            next: None,
        });
        let tail = self.push_node(Node {
            point: right_pt,
            value: self.points[right_pt].x,
            triangle: None,
            prev: None,
            next: None,
        });

        self.nodes[head].next = Some(middle);
        self.nodes[middle].prev = Some(head);
        self.nodes[middle].next = Some(tail);
        self.nodes[tail].prev = Some(middle);

        self.front_head = head;
        self.search = middle;
    }

    fn push_point(&mut self, p: SweepPoint) -> PointId {
        self.points.push(p);
        self.input.push(Vector2::new(p.x as f32, p.y as f32));
        self.point_edges.push(Vec::new());
        self.points.len() - 1
    }

    fn push_tri(&mut self, t: Tri) -> TriId {
        self.tris.push(t);
        self.tris.len() - 1
    }

    fn push_node(&mut self, n: Node) -> NodeId {
        self.nodes.push(n);
        self.nodes.len() - 1
    }

    #[inline]
    fn pt(&self, node: NodeId) -> SweepPoint {
        self.points[self.nodes[node].point]
    }

    fn degenerate(message: &str) -> PhysicsError {
        PhysicsError::DegenerateGeometry(message.to_string())
    }

    // --- Point events -----------------------------------------------------

    /// Triangulates one swept point against the advancing front
    fn point_event(&mut self, point: PointId) -> Result<NodeId> {
        let node = self.locate_node(self.points[point].x)?;
        let new_node = self.new_front_triangle(point, node);

        // The new point can only coincide in x with the located node on
        // its left, never with the node after it
        if self.points[point].x <= self.pt(node).x + EPS {
            self.fill(node)?;
        }

        self.fill_advancing_front(new_node)?;
        Ok(new_node)
    }

    /// Finds the front node whose span contains the given x coordinate
    fn locate_node(&mut self, x: f64) -> Result<NodeId> {
        let mut node = self.search;

        if x < self.nodes[node].value {
            while let Some(prev) = self.nodes[node].prev {
                node = prev;
                if x >= self.nodes[node].value {
                    self.search = node;
                    return Ok(node);
                }
            }
        } else {
            let mut cur = node;
            while let Some(next) = self.nodes[cur].next {
                cur = next;
                if x < self.nodes[cur].value {
                    let found = self.nodes[cur].prev.ok_or_else(|| {
                        Self::degenerate("Advancing front lost its head node")
                    })?;
                    self.search = found;
                    return Ok(found);
                }
            }
        }

        Err(Self::degenerate("Point outside the advancing front span"))
    }

    /// Finds the live front node holding the given point
    fn locate_point_node(&mut self, point: PointId) -> Option<NodeId> {
        let px = self.points[point].x;
        let mut node = self.search;
        let nx = self.nodes[node].value;

        if self.nodes[node].point != point {
            if px < nx {
                loop {
                    node = self.nodes[node].prev?;
                    if self.nodes[node].point == point {
                        break;
                    }
                }
            } else if px > nx {
                loop {
                    node = self.nodes[node].next?;
                    if self.nodes[node].point == point {
                        break;
                    }
                }
            } else {
                // Same x value: the point must sit next to the search node
                if let Some(prev) = self.nodes[node].prev {
                    if self.nodes[prev].point == point {
                        self.search = prev;
                        return Some(prev);
                    }
                }
                let next = self.nodes[node].next?;
                if self.nodes[next].point != point {
                    return None;
                }
                node = next;
            }
        }

        self.search = node;
        Some(node)
    }

    /// Creates the triangle between a swept point and the front edge
    /// below it, and splices the point into the front
    fn new_front_triangle(&mut self, point: PointId, node: NodeId) -> NodeId {
        let next = self.nodes[node].next.expect("front node without successor");

        let t = self.push_tri(Tri::new(
            point,
            self.nodes[node].point,
            self.nodes[next].point,
        ));
        if let Some(nt) = self.nodes[node].triangle {
            self.mark_neighbor(t, nt);
        }

        let new_node = self.push_node(Node {
            point,
            value: self.points[point].x,
            triangle: None,
            prev: Some(node),
            next: Some(next),
        });
        self.nodes[node].next = Some(new_node);
        self.nodes[next].prev = Some(new_node);

        if !self.legalize(t) {
            self.map_triangle_to_nodes(t);
        }

        new_node
    }

    /// Creates a triangle over a front node and removes the node from the
    /// front
    fn fill(&mut self, node: NodeId) -> Result<()> {
        let prev = self
            .nodes[node]
            .prev
            .ok_or_else(|| Self::degenerate("Fill on the front head"))?;
        let next = self
            .nodes[node]
            .next
            .ok_or_else(|| Self::degenerate("Fill on the front tail"))?;

        let t = self.push_tri(Tri::new(
            self.nodes[prev].point,
            self.nodes[node].point,
            self.nodes[next].point,
        ));

        if let Some(nt) = self.nodes[prev].triangle {
            self.mark_neighbor(t, nt);
        }
        if let Some(nt) = self.nodes[node].triangle {
            self.mark_neighbor(t, nt);
        }

        // Unlink the node; it keeps its own links for stale traversals
        self.nodes[prev].next = Some(next);
        self.nodes[next].prev = Some(prev);
        if self.search == node {
            self.search = prev;
        }

        if !self.legalize(t) {
            self.map_triangle_to_nodes(t);
        }

        Ok(())
    }

    /// Fills front holes and basins exposed by a newly added node
    fn fill_advancing_front(&mut self, n: NodeId) -> Result<()> {
        // Fill right holes
        let mut node = self.nodes[n].next.expect("front node without successor");
        while self.nodes[node].next.is_some() {
            let angle = self.hole_angle(node);
            if angle > PI_DIV2 || angle < -PI_DIV2 {
                break;
            }
            self.fill(node)?;
            node = self.nodes[node].next.expect("filled node lost successor");
        }

        // Fill left holes
        let mut node = self.nodes[n].prev.expect("front node without predecessor");
        while self.nodes[node].prev.is_some() {
            let angle = self.hole_angle(node);
            if angle > PI_DIV2 || angle < -PI_DIV2 {
                break;
            }
            self.fill(node)?;
            node = self.nodes[node].prev.expect("filled node lost predecessor");
        }

        // Fill right basins
        if let Some(next) = self.nodes[n].next {
            if self.nodes[next].next.is_some() && self.basin_angle(n) < PI_3DIV4 {
                self.fill_basin(n)?;
            }
        }

        Ok(())
    }

    /// Angle of the front opening at a node
    fn hole_angle(&self, node: NodeId) -> f64 {
        let p = self.pt(node);
        let next = self.pt(self.nodes[node].next.expect("hole angle without successor"));
        let prev = self.pt(self.nodes[node].prev.expect("hole angle without predecessor"));

        let ax = next.x - p.x;
        let ay = next.y - p.y;
        let bx = prev.x - p.x;
        let by = prev.y - p.y;

        (ax * by - ay * bx).atan2(ax * bx + ay * by)
    }

    /// Slope angle from a node to the node two steps to its right
    fn basin_angle(&self, node: NodeId) -> f64 {
        let next = self.nodes[node].next.expect("basin angle without successor");
        let next_next = self.nodes[next].next.expect("basin angle without successor");

        let p = self.pt(node);
        let q = self.pt(next_next);

        (p.y - q.y).atan2(p.x - q.x)
    }

    /// Locates the extent of a basin to the right of the node and fills it
    fn fill_basin(&mut self, node: NodeId) -> Result<()> {
        let next = self.nodes[node].next.expect("basin without successor");
        let next_next = self.nodes[next].next.expect("basin without successor");

        let left = if orient2d(self.pt(node), self.pt(next), self.pt(next_next))
            == Orientation::Ccw
        {
            node
        } else {
            next
        };
        self.basin.left = Some(left);

        let mut bottom = left;
        while let Some(n) = self.nodes[bottom].next {
            if self.pt(bottom).y >= self.pt(n).y {
                bottom = n;
            } else {
                break;
            }
        }
        if bottom == left {
            return Ok(());
        }
        self.basin.bottom = Some(bottom);

        let mut right = bottom;
        while let Some(n) = self.nodes[right].next {
            if self.pt(right).y < self.pt(n).y {
                right = n;
            } else {
                break;
            }
        }
        if right == bottom {
            return Ok(());
        }
        self.basin.right = Some(right);

        self.basin.width = self.pt(right).x - self.pt(left).x;
        self.basin.left_highest = self.pt(left).y > self.pt(right).y;

        self.fill_basin_req(bottom)
    }

    /// Recursively fills the basin bottom-up until it becomes shallow
    fn fill_basin_req(&mut self, node: NodeId) -> Result<()> {
        if self.is_shallow(node) {
            return Ok(());
        }

        self.fill(node)?;

        let prev = self.nodes[node].prev.expect("basin node lost predecessor");
        let next = self.nodes[node].next.expect("basin node lost successor");

        let next_node;
        if Some(prev) == self.basin.left && Some(next) == self.basin.right {
            return Ok(());
        } else if Some(prev) == self.basin.left {
            let next_next = self.nodes[next].next.expect("basin edge lost successor");
            if orient2d(self.pt(node), self.pt(next), self.pt(next_next)) == Orientation::Cw {
                return Ok(());
            }
            next_node = next;
        } else if Some(next) == self.basin.right {
            let prev_prev = self.nodes[prev].prev.expect("basin edge lost predecessor");
            if orient2d(self.pt(node), self.pt(prev), self.pt(prev_prev)) == Orientation::Ccw {
                return Ok(());
            }
            next_node = prev;
        } else {
            next_node = if self.pt(prev).y < self.pt(next).y {
                prev
            } else {
                next
            };
        }

        self.fill_basin_req(next_node)
    }

    fn is_shallow(&self, node: NodeId) -> bool {
        let height = if self.basin.left_highest {
            self.pt(self.basin.left.expect("basin without left")).y - self.pt(node).y
        } else {
            self.pt(self.basin.right.expect("basin without right")).y - self.pt(node).y
        };

        self.basin.width > height
    }

    // --- Triangle bookkeeping --------------------------------------------

    /// Connects two triangles along their shared edge, if any
    fn mark_neighbor(&mut self, t: TriId, ot: TriId) {
        for i in 0..3 {
            let p1 = self.tris[t].points[(i + 1) % 3];
            let p2 = self.tris[t].points[(i + 2) % 3];
            if let Some(j) = self.tris[ot].edge_index(p1, p2) {
                self.tris[t].neighbors[i] = Some(ot);
                self.tris[ot].neighbors[j] = Some(t);
                return;
            }
        }
    }

    /// Re-points front nodes at a triangle that gained front edges
    fn map_triangle_to_nodes(&mut self, t: TriId) {
        for i in 0..3 {
            if self.tris[t].neighbors[i].is_none() {
                let point = self.tris[t].point_cw(self.tris[t].points[i]);
                if let Some(node) = self.locate_point_node(point) {
                    self.nodes[node].triangle = Some(t);
                }
            }
        }
    }

    /// Restores the Delaunay criterion around a triangle with recursive
    /// edge flips. Returns true when the triangle was changed.
    fn legalize(&mut self, t: TriId) -> bool {
        for i in 0..3 {
            if self.tris[t].delaunay[i] {
                continue;
            }

            let ot = match self.tris[t].neighbors[i] {
                Some(ot) => ot,
                None => continue,
            };

            let p = self.tris[t].points[i];
            let op = self.tris[ot].opposite_point(&self.tris[t], p);
            let oi = self.tris[ot].index_of(op);

            // Constrained and agreed-Delaunay edges are never flipped
            if self.tris[ot].constrained[oi] || self.tris[ot].delaunay[oi] {
                let constrained = self.tris[ot].constrained[oi];
                self.tris[t].constrained[i] = constrained;
                continue;
            }

            let inside = smart_incircle(
                self.points[p],
                self.points[self.tris[t].point_ccw(p)],
                self.points[self.tris[t].point_cw(p)],
                self.points[op],
            );

            if inside {
                self.tris[t].delaunay[i] = true;
                self.tris[ot].delaunay[oi] = true;

                self.rotate_triangle_pair(t, p, ot, op);

                if !self.legalize(t) {
                    self.map_triangle_to_nodes(t);
                }
                if !self.legalize(ot) {
                    self.map_triangle_to_nodes(ot);
                }

                self.tris[t].delaunay[i] = false;
                self.tris[ot].delaunay[oi] = false;

                return true;
            }
        }

        false
    }

    /// Flips the edge shared by two triangles around the quad (p, op)
    fn rotate_triangle_pair(&mut self, t: TriId, p: PointId, ot: TriId, op: PointId) {
        let n1 = self.tris[t].neighbor_ccw(p);
        let n2 = self.tris[t].neighbor_cw(p);
        let n3 = self.tris[ot].neighbor_ccw(op);
        let n4 = self.tris[ot].neighbor_cw(op);

        let ce1 = self.tris[t].constrained_ccw(p);
        let ce2 = self.tris[t].constrained_cw(p);
        let ce3 = self.tris[ot].constrained_ccw(op);
        let ce4 = self.tris[ot].constrained_cw(op);

        let de1 = self.tris[t].delaunay_ccw(p);
        let de2 = self.tris[t].delaunay_cw(p);
        let de3 = self.tris[ot].delaunay_ccw(op);
        let de4 = self.tris[ot].delaunay_cw(op);

        self.tris[t].rotate_cw_around(p, op);
        self.tris[ot].rotate_cw_around(op, p);

        self.tris[ot].set_delaunay_ccw(p, de1);
        self.tris[t].set_delaunay_cw(p, de2);
        self.tris[t].set_delaunay_ccw(op, de3);
        self.tris[ot].set_delaunay_cw(op, de4);

        self.tris[ot].set_constrained_ccw(p, ce1);
        self.tris[t].set_constrained_cw(p, ce2);
        self.tris[t].set_constrained_ccw(op, ce3);
        self.tris[ot].set_constrained_cw(op, ce4);

        self.tris[t].neighbors = [None; 3];
        self.tris[ot].neighbors = [None; 3];
        if let Some(n) = n1 {
            self.mark_neighbor(ot, n);
        }
        if let Some(n) = n2 {
            self.mark_neighbor(t, n);
        }
        if let Some(n) = n3 {
            self.mark_neighbor(t, n);
        }
        if let Some(n) = n4 {
            self.mark_neighbor(ot, n);
        }
        self.mark_neighbor(t, ot);
    }

    // --- Edge events ------------------------------------------------------

    /// Restores one constrained edge ending at the given front node's point
    fn edge_event(&mut self, edge: Edge, node: NodeId) -> Result<()> {
        self.edge_event.constrained_edge = edge;
        self.edge_event.right = self.points[edge.p].x > self.points[edge.q].x;

        let t = self.nodes[node]
            .triangle
            .ok_or_else(|| Self::degenerate("Edge event on a node without triangle"))?;
        if self.try_mark_edge_side(t, edge.p, edge.q) {
            return Ok(());
        }

        self.fill_edge_event(edge, node)?;

        let t = self.nodes[node]
            .triangle
            .ok_or_else(|| Self::degenerate("Edge event lost its triangle"))?;
        self.edge_event_by_points(edge.p, edge.q, t, edge.q)
    }

    /// Marks the edge as constrained when it already bounds the triangle
    fn try_mark_edge_side(&mut self, t: TriId, ep: PointId, eq: PointId) -> bool {
        if let Some(i) = self.tris[t].edge_index(ep, eq) {
            self.tris[t].constrained[i] = true;
            if let Some(n) = self.tris[t].neighbors[i] {
                if let Some(j) = self.tris[n].edge_index(ep, eq) {
                    self.tris[n].constrained[j] = true;
                }
            }
            return true;
        }
        false
    }

    /// Walks triangles along the constrained edge, flipping those that
    /// cross it
    fn edge_event_by_points(
        &mut self,
        ep: PointId,
        eq: PointId,
        t: TriId,
        point: PointId,
    ) -> Result<()> {
        if self.try_mark_edge_side(t, ep, eq) {
            return Ok(());
        }

        let p1 = self.tris[t].point_ccw(point);
        let o1 = orient2d(self.points[eq], self.points[p1], self.points[ep]);
        if o1 == Orientation::Collinear {
            return Err(Self::degenerate(
                "Constrained edge passes through an input point",
            ));
        }

        let p2 = self.tris[t].point_cw(point);
        let o2 = orient2d(self.points[eq], self.points[p2], self.points[ep]);
        if o2 == Orientation::Collinear {
            return Err(Self::degenerate(
                "Constrained edge passes through an input point",
            ));
        }

        if o1 == o2 {
            // The edge continues past this triangle; step toward it
            let next = if o1 == Orientation::Cw {
                self.tris[t].neighbor_ccw(point)
            } else {
                self.tris[t].neighbor_cw(point)
            }
            .ok_or_else(|| Self::degenerate("Constrained edge left the triangulation"))?;

            self.edge_event_by_points(ep, eq, next, point)
        } else {
            self.flip_edge_event(ep, eq, t, point)
        }
    }

    fn flip_edge_event(&mut self, ep: PointId, eq: PointId, t: TriId, p: PointId) -> Result<()> {
        let ot = self.tris[t]
            .neighbor_across(p)
            .ok_or_else(|| Self::degenerate("Edge flip without opposing triangle"))?;
        let op = self.tris[ot].opposite_point(&self.tris[t], p);

        if in_scan_area(
            self.points[p],
            self.points[self.tris[t].point_ccw(p)],
            self.points[self.tris[t].point_cw(p)],
            self.points[op],
        ) {
            self.rotate_triangle_pair(t, p, ot, op);
            self.map_triangle_to_nodes(t);
            self.map_triangle_to_nodes(ot);

            if p == eq && op == ep {
                if eq == self.edge_event.constrained_edge.q
                    && ep == self.edge_event.constrained_edge.p
                {
                    self.tris[t].mark_constrained_edge(ep, eq);
                    self.tris[ot].mark_constrained_edge(ep, eq);
                    self.legalize(t);
                    self.legalize(ot);
                }
            } else {
                let o = orient2d(self.points[eq], self.points[op], self.points[ep]);
                let next = self.next_flip_triangle(o, t, ot, p, op);
                self.flip_edge_event(ep, eq, next, p)?;
            }

            Ok(())
        } else {
            let new_p = self.next_flip_point(ep, eq, ot, op)?;
            self.flip_scan_edge_event(ep, eq, t, ot, new_p)?;
            self.edge_event_by_points(ep, eq, t, p)
        }
    }

    /// Picks which of the two flipped triangles still crosses the edge
    fn next_flip_triangle(
        &mut self,
        o: Orientation,
        t: TriId,
        ot: TriId,
        p: PointId,
        op: PointId,
    ) -> TriId {
        if o == Orientation::Ccw {
            let i = self.tris[ot].edge_index(p, op).expect("flip lost its edge");
            self.tris[ot].delaunay[i] = true;
            self.legalize(ot);
            self.tris[ot].delaunay = [false; 3];
            t
        } else {
            let i = self.tris[t].edge_index(p, op).expect("flip lost its edge");
            self.tris[t].delaunay[i] = true;
            self.legalize(t);
            self.tris[t].delaunay = [false; 3];
            ot
        }
    }

    /// Next point to scan past when the flip quad is not convex
    fn next_flip_point(
        &mut self,
        ep: PointId,
        eq: PointId,
        ot: TriId,
        op: PointId,
    ) -> Result<PointId> {
        match orient2d(self.points[eq], self.points[op], self.points[ep]) {
            Orientation::Cw => Ok(self.tris[ot].point_ccw(op)),
            Orientation::Ccw => Ok(self.tris[ot].point_cw(op)),
            Orientation::Collinear => Err(Self::degenerate(
                "Opposing point lies on the constrained edge",
            )),
        }
    }

    /// Scans across triangles whose flip quad was not convex until a
    /// flippable configuration appears
    fn flip_scan_edge_event(
        &mut self,
        ep: PointId,
        eq: PointId,
        flip_triangle: TriId,
        t: TriId,
        p: PointId,
    ) -> Result<()> {
        let ot = self.tris[t]
            .neighbor_across(p)
            .ok_or_else(|| Self::degenerate("Edge scan without opposing triangle"))?;
        let op = self.tris[ot].opposite_point(&self.tris[t], p);

        if in_scan_area(
            self.points[eq],
            self.points[self.tris[flip_triangle].point_ccw(eq)],
            self.points[self.tris[flip_triangle].point_cw(eq)],
            self.points[op],
        ) {
            self.flip_edge_event(eq, op, ot, op)
        } else {
            let new_p = self.next_flip_point(ep, eq, ot, op)?;
            self.flip_scan_edge_event(ep, eq, flip_triangle, ot, new_p)
        }
    }

    // --- Front fills ahead of an edge event -------------------------------

    /// Fills front concavities below the constrained edge so the edge
    /// walk only meets triangles
    fn fill_edge_event(&mut self, edge: Edge, node: NodeId) -> Result<()> {
        if self.edge_event.right {
            self.fill_right_above_edge_event(edge, node)
        } else {
            self.fill_left_above_edge_event(edge, node)
        }
    }

    fn fill_right_above_edge_event(&mut self, edge: Edge, mut node: NodeId) -> Result<()> {
        loop {
            let next = self.nodes[node].next.expect("front lost its tail");
            if self.pt(next).x >= self.points[edge.p].x {
                break;
            }

            // Check if next node is below the edge
            if orient2d(self.points[edge.q], self.pt(next), self.points[edge.p])
                == Orientation::Ccw
            {
                self.fill_right_below_edge_event(edge, node)?;
            } else {
                node = next;
            }
        }
        Ok(())
    }

    fn fill_right_below_edge_event(&mut self, edge: Edge, node: NodeId) -> Result<()> {
        if self.pt(node).x >= self.points[edge.p].x {
            return Ok(());
        }

        let next = self.nodes[node].next.expect("front lost its tail");
        let next_next = self.nodes[next].next.expect("front lost its tail");

        if orient2d(self.pt(node), self.pt(next), self.pt(next_next)) == Orientation::Ccw {
            // Concave
            self.fill_right_concave_edge_event(edge, node)
        } else {
            // Convex
            self.fill_right_convex_edge_event(edge, node)?;
            self.fill_right_below_edge_event(edge, node)
        }
    }

    fn fill_right_concave_edge_event(&mut self, edge: Edge, node: NodeId) -> Result<()> {
        let next = self.nodes[node].next.expect("front lost its tail");
        self.fill(next)?;

        let next = self.nodes[node].next.expect("front lost its tail");
        if self.nodes[next].point != edge.p {
            // Next above or below edge?
            if orient2d(self.points[edge.q], self.pt(next), self.points[edge.p])
                == Orientation::Ccw
            {
                let next_next = self.nodes[next].next.expect("front lost its tail");
                // Below
                if orient2d(self.pt(node), self.pt(next), self.pt(next_next)) == Orientation::Ccw
                {
                    self.fill_right_concave_edge_event(edge, node)?;
                }
            }
        }
        Ok(())
    }

    fn fill_right_convex_edge_event(&mut self, edge: Edge, node: NodeId) -> Result<()> {
        let next = self.nodes[node].next.expect("front lost its tail");
        let next_next = self.nodes[next].next.expect("front lost its tail");
        let next_next_next = self.nodes[next_next].next.expect("front lost its tail");

        // Next concave or convex?
        if orient2d(self.pt(next), self.pt(next_next), self.pt(next_next_next))
            == Orientation::Ccw
        {
            self.fill_right_concave_edge_event(edge, next)
        } else {
            // Convex. Next above or below edge?
            if orient2d(self.points[edge.q], self.pt(next_next), self.points[edge.p])
                == Orientation::Ccw
            {
                // Below
                self.fill_right_convex_edge_event(edge, next)
            } else {
                // Above
                Ok(())
            }
        }
    }

    fn fill_left_above_edge_event(&mut self, edge: Edge, mut node: NodeId) -> Result<()> {
        loop {
            let prev = self.nodes[node].prev.expect("front lost its head");
            if self.pt(prev).x <= self.points[edge.p].x {
                break;
            }

            if orient2d(self.points[edge.q], self.pt(prev), self.points[edge.p])
                == Orientation::Cw
            {
                self.fill_left_below_edge_event(edge, node)?;
            } else {
                node = prev;
            }
        }
        Ok(())
    }

    fn fill_left_below_edge_event(&mut self, edge: Edge, node: NodeId) -> Result<()> {
        if self.pt(node).x <= self.points[edge.p].x {
            return Ok(());
        }

        let prev = self.nodes[node].prev.expect("front lost its head");
        let prev_prev = self.nodes[prev].prev.expect("front lost its head");

        if orient2d(self.pt(node), self.pt(prev), self.pt(prev_prev)) == Orientation::Cw {
            self.fill_left_concave_edge_event(edge, node)
        } else {
            self.fill_left_convex_edge_event(edge, node)?;
            self.fill_left_below_edge_event(edge, node)
        }
    }

    fn fill_left_concave_edge_event(&mut self, edge: Edge, node: NodeId) -> Result<()> {
        let prev = self.nodes[node].prev.expect("front lost its head");
        self.fill(prev)?;

        let prev = self.nodes[node].prev.expect("front lost its head");
        if self.nodes[prev].point != edge.p {
            if orient2d(self.points[edge.q], self.pt(prev), self.points[edge.p])
                == Orientation::Cw
            {
                let prev_prev = self.nodes[prev].prev.expect("front lost its head");
                if orient2d(self.pt(node), self.pt(prev), self.pt(prev_prev)) == Orientation::Cw {
                    self.fill_left_concave_edge_event(edge, node)?;
                }
            }
        }
        Ok(())
    }

    fn fill_left_convex_edge_event(&mut self, edge: Edge, node: NodeId) -> Result<()> {
        let prev = self.nodes[node].prev.expect("front lost its head");
        let prev_prev = self.nodes[prev].prev.expect("front lost its head");
        let prev_prev_prev = self.nodes[prev_prev].prev.expect("front lost its head");

        if orient2d(self.pt(prev), self.pt(prev_prev), self.pt(prev_prev_prev))
            == Orientation::Cw
        {
            self.fill_left_concave_edge_event(edge, prev)
        } else {
            if orient2d(self.points[edge.q], self.pt(prev_prev), self.points[edge.p])
                == Orientation::Cw
            {
                self.fill_left_convex_edge_event(edge, prev)
            } else {
                Ok(())
            }
        }
    }

    // --- Finalization -----------------------------------------------------

    /// Marks the triangles enclosed by constrained edges as interior
    fn finalize_polygon(&mut self) -> Result<()> {
        let start_node = self.nodes[self.front_head]
            .next
            .ok_or_else(|| Self::degenerate("Advancing front collapsed"))?;
        let p = self.nodes[start_node].point;
        let mut t = self.nodes[start_node]
            .triangle
            .ok_or_else(|| Self::degenerate("Front node without triangle"))?;

        // Rotate around the front point until a constrained edge marks
        // the polygon interior
        let mut guard = self.tris.len() + 1;
        while !self.tris[t].constrained_cw(p) {
            t = self.tris[t]
                .neighbor_ccw(p)
                .ok_or_else(|| Self::degenerate("Interior search left the mesh"))?;
            guard -= 1;
            if guard == 0 {
                return Err(Self::degenerate("Interior search did not terminate"));
            }
        }

        // Flood fill the interior across non-constrained edges
        let mut stack = vec![t];
        while let Some(t) = stack.pop() {
            if self.tris[t].interior {
                continue;
            }
            self.tris[t].interior = true;

            for i in 0..3 {
                if !self.tris[t].constrained[i] {
                    if let Some(n) = self.tris[t].neighbors[i] {
                        stack.push(n);
                    }
                }
            }
        }

        Ok(())
    }
}

/// Sweep order: lower y first, ties broken by lower x
fn point_less(a: SweepPoint, b: SweepPoint) -> bool {
    if a.y < b.y {
        true
    } else if a.y == b.y {
        a.x < b.x
    } else {
        false
    }
}
