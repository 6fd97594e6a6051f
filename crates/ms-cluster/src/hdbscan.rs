//! Density-based leaf clustering (HDBSCAN with excess-of-mass selection).
//!
//! Algorithm:
//! 1. Core distance of each point: Euclidean distance to its
//!    `min_cluster_size`-th nearest other point
//! 2. Mutual reachability: `max(core(a), core(b), dist(a, b))`
//! 3. Minimum spanning tree over mutual reachability (Prim)
//! 4. Single-linkage hierarchy from the sorted MST edges (union-find)
//! 5. Condensed tree: splits where a side has fewer than `min_cluster_size`
//!    points are treated as points falling out of the parent cluster
//! 6. Excess-of-mass selection of the most stable clusters; the root is never
//!    selected, so a run may label every point as an outlier
//!
//! Points whose cluster has no selected ancestor are labeled [`OUTLIER`].

use ms_core::cluster::{ClusterId, OUTLIER};
use ms_core::vector::euclidean_distance;

/// Lambda used for zero-distance merges (identical points).
const MAX_LAMBDA: f64 = 1e12;

#[derive(Debug, Clone, Copy)]
pub struct Hdbscan {
    min_cluster_size: usize,
}

/// One single-linkage merge. Node `n + i` is created by the `i`-th merge.
#[derive(Debug, Clone, Copy)]
struct Merge {
    left: usize,
    right: usize,
    distance: f64,
    size: usize,
}

/// Edge of the condensed tree. `child < n` is a point, otherwise a cluster.
#[derive(Debug, Clone, Copy)]
struct CondensedEdge {
    parent: usize,
    child: usize,
    lambda: f64,
    size: usize,
}

impl Hdbscan {
    /// The neighbour count used for core distances equals `min_cluster_size`.
    #[must_use]
    pub const fn new(min_cluster_size: usize) -> Self {
        Self { min_cluster_size }
    }

    /// Label every point with a leaf cluster id or [`OUTLIER`].
    ///
    /// Ids are `0..k` in ascending order of the selected condensed-tree nodes.
    /// All points must share a dimensionality; callers validate this.
    #[must_use]
    pub fn fit(&self, points: &[Vec<f32>]) -> Vec<ClusterId> {
        let n = points.len();
        if n < self.min_cluster_size.max(2) {
            return vec![OUTLIER; n];
        }

        let distances = pairwise_distances(points);
        let core = self.core_distances(&distances);
        let mst = minimum_spanning_tree(&distances, &core);
        let hierarchy = single_linkage(&mst, n);
        let condensed = condense(&hierarchy, n, self.min_cluster_size);
        let selected = select_clusters(&condensed, n);
        label_points(&condensed, &selected, n)
    }

    fn core_distances(&self, distances: &[Vec<f64>]) -> Vec<f64> {
        let k = self.min_cluster_size.clamp(1, distances.len() - 1);
        distances
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let mut others: Vec<f64> = row
                    .iter()
                    .enumerate()
                    .filter(|&(j, _)| j != i)
                    .map(|(_, &d)| d)
                    .collect();
                others.sort_by(f64::total_cmp);
                others[k - 1]
            })
            .collect()
    }
}

fn pairwise_distances(points: &[Vec<f32>]) -> Vec<Vec<f64>> {
    let n = points.len();
    let mut distances = vec![vec![0.0; n]; n];
    for i in 0..n {
        for j in (i + 1)..n {
            let d = f64::from(euclidean_distance(&points[i], &points[j]));
            distances[i][j] = d;
            distances[j][i] = d;
        }
    }
    distances
}

/// Prim's algorithm over mutual reachability distances, edges sorted by weight.
fn minimum_spanning_tree(distances: &[Vec<f64>], core: &[f64]) -> Vec<(usize, usize, f64)> {
    let n = distances.len();
    let reach = |a: usize, b: usize| distances[a][b].max(core[a]).max(core[b]);

    let mut in_tree = vec![false; n];
    let mut best = vec![f64::INFINITY; n];
    let mut from = vec![0_usize; n];
    let mut edges = Vec::with_capacity(n - 1);

    in_tree[0] = true;
    for j in 1..n {
        best[j] = reach(0, j);
    }
    for _ in 1..n {
        let mut next = None;
        for j in 0..n {
            if !in_tree[j] && next.is_none_or(|m: usize| best[j] < best[m]) {
                next = Some(j);
            }
        }
        let Some(next) = next else { break };
        in_tree[next] = true;
        edges.push((from[next], next, best[next]));
        for j in 0..n {
            if !in_tree[j] {
                let d = reach(next, j);
                if d < best[j] {
                    best[j] = d;
                    from[j] = next;
                }
            }
        }
    }

    edges.sort_by(|a, b| a.2.total_cmp(&b.2));
    edges
}

fn single_linkage(mst: &[(usize, usize, f64)], n: usize) -> Vec<Merge> {
    fn find(parent: &mut [usize], mut i: usize) -> usize {
        while parent[i] != i {
            parent[i] = parent[parent[i]];
            i = parent[i];
        }
        i
    }

    let mut parent: Vec<usize> = (0..2 * n - 1).collect();
    let mut size = vec![1_usize; 2 * n - 1];

    let mut merges = Vec::with_capacity(n - 1);
    for (offset, &(a, b, distance)) in mst.iter().enumerate() {
        let node = n + offset;
        let left = find(&mut parent, a);
        let right = find(&mut parent, b);
        parent[left] = node;
        parent[right] = node;
        size[node] = size[left] + size[right];
        merges.push(Merge {
            left,
            right,
            distance,
            size: size[node],
        });
    }
    merges
}

/// Top-down breadth-first order of the hierarchy below `start`.
fn descendants(hierarchy: &[Merge], start: usize, n: usize) -> Vec<usize> {
    let mut order = vec![start];
    let mut cursor = 0;
    while cursor < order.len() {
        let node = order[cursor];
        if node >= n {
            let merge = hierarchy[node - n];
            order.push(merge.left);
            order.push(merge.right);
        }
        cursor += 1;
    }
    order
}

fn condense(hierarchy: &[Merge], n: usize, min_cluster_size: usize) -> Vec<CondensedEdge> {
    let root = 2 * n - 2;
    let node_size = |node: usize| if node < n { 1 } else { hierarchy[node - n].size };

    let mut relabel = vec![0_usize; 2 * n - 1];
    relabel[root] = n;
    let mut next_label = n + 1;
    let mut ignore = vec![false; 2 * n - 1];
    let mut edges = Vec::new();

    for node in descendants(hierarchy, root, n) {
        if node < n || ignore[node] {
            continue;
        }
        let merge = hierarchy[node - n];
        let lambda = if merge.distance > 0.0 {
            (1.0 / merge.distance).min(MAX_LAMBDA)
        } else {
            MAX_LAMBDA
        };
        let parent = relabel[node];
        let sides = [merge.left, merge.right];
        let big = sides.map(|side| node_size(side) >= min_cluster_size);

        if big[0] && big[1] {
            for side in sides {
                relabel[side] = next_label;
                next_label += 1;
                edges.push(CondensedEdge {
                    parent,
                    child: relabel[side],
                    lambda,
                    size: node_size(side),
                });
            }
            continue;
        }

        for (side, is_big) in sides.into_iter().zip(big) {
            if is_big {
                relabel[side] = parent;
                continue;
            }
            for sub in descendants(hierarchy, side, n) {
                if sub < n {
                    edges.push(CondensedEdge {
                        parent,
                        child: sub,
                        lambda,
                        size: 1,
                    });
                } else {
                    ignore[sub] = true;
                }
            }
        }
    }
    edges
}

/// Excess-of-mass selection. Returns condensed labels of selected clusters, ascending.
fn select_clusters(condensed: &[CondensedEdge], n: usize) -> Vec<usize> {
    let Some(max_label) = condensed.iter().map(|e| e.parent.max(e.child)).max() else {
        return Vec::new();
    };
    let count = max_label + 1 - n;

    let mut birth = vec![0.0_f64; count];
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); count];
    for edge in condensed.iter().filter(|e| e.child >= n) {
        birth[edge.child - n] = edge.lambda;
        children[edge.parent - n].push(edge.child);
    }

    let mut stability = vec![0.0_f64; count];
    for edge in condensed {
        let parent = edge.parent - n;
        #[allow(clippy::cast_precision_loss)]
        let size = edge.size as f64;
        stability[parent] += (edge.lambda - birth[parent]) * size;
    }

    let mut selected = vec![false; count];
    // Children always carry larger labels than their parents.
    for cluster in (1..count).rev() {
        let subtree: f64 = children[cluster].iter().map(|&c| stability[c - n]).sum();
        if subtree > stability[cluster] {
            stability[cluster] = subtree;
        } else {
            selected[cluster] = true;
            let mut stack = children[cluster].clone();
            while let Some(child) = stack.pop() {
                selected[child - n] = false;
                stack.extend(children[child - n].iter().copied());
            }
        }
    }

    (1..count)
        .filter(|&c| selected[c])
        .map(|c| c + n)
        .collect()
}

fn label_points(condensed: &[CondensedEdge], selected: &[usize], n: usize) -> Vec<ClusterId> {
    let mut cluster_parent = std::collections::HashMap::new();
    let mut point_parent = vec![n; n];
    for edge in condensed {
        if edge.child < n {
            point_parent[edge.child] = edge.parent;
        } else {
            cluster_parent.insert(edge.child, edge.parent);
        }
    }

    point_parent
        .into_iter()
        .map(|mut cluster| loop {
            if let Ok(position) = selected.binary_search(&cluster) {
                return ClusterId::try_from(position).unwrap_or(OUTLIER);
            }
            match cluster_parent.get(&cluster) {
                Some(&parent) => cluster = parent,
                None => return OUTLIER,
            }
        })
        .collect()
}
