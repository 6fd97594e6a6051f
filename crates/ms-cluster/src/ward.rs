//! Ward-linkage agglomeration of leaf-cluster centroids into meta-groups.

use ms_core::vector::euclidean_distance;

/// Number of meta-groups for `clusters` leaf clusters: `max(2, round(sqrt(k)))`.
#[must_use]
pub fn meta_group_count(clusters: usize) -> usize {
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    let groups = (clusters as f64).sqrt().round() as usize;
    groups.max(2)
}

/// Group `centroids` into meta-groups.
///
/// With two or fewer centroids every one lands in group 0. Otherwise Ward
/// agglomeration runs until [`meta_group_count`] groups remain. Group ids
/// are numbered by first appearance in `centroids` order.
#[must_use]
pub fn meta_cluster(centroids: &[Vec<f32>]) -> Vec<usize> {
    let k = centroids.len();
    if k <= 2 {
        return vec![0; k];
    }
    let target = meta_group_count(k).min(k);

    let mut distance: Vec<Vec<f64>> = (0..k)
        .map(|i| {
            (0..k)
                .map(|j| f64::from(euclidean_distance(&centroids[i], &centroids[j])))
                .collect()
        })
        .collect();
    let mut size = vec![1_usize; k];
    let mut active: Vec<bool> = vec![true; k];
    // Group representative of each centroid.
    let mut owner: Vec<usize> = (0..k).collect();

    for _ in 0..(k - target) {
        let Some((a, b)) = closest_pair(&distance, &active) else {
            break;
        };
        for c in (0..k).filter(|&c| active[c] && c != a && c != b) {
            let merged = lance_williams_ward(
                distance[c][a],
                distance[c][b],
                distance[a][b],
                size[a],
                size[b],
                size[c],
            );
            distance[a][c] = merged;
            distance[c][a] = merged;
        }
        size[a] += size[b];
        active[b] = false;
        for o in &mut owner {
            if *o == b {
                *o = a;
            }
        }
    }

    let mut order: Vec<usize> = Vec::new();
    owner
        .into_iter()
        .map(|rep| match order.iter().position(|&r| r == rep) {
            Some(id) => id,
            None => {
                order.push(rep);
                order.len() - 1
            }
        })
        .collect()
}

/// Lowest-distance active pair, first in index order on ties.
fn closest_pair(distance: &[Vec<f64>], active: &[bool]) -> Option<(usize, usize)> {
    let mut best: Option<(usize, usize, f64)> = None;
    for a in (0..distance.len()).filter(|&i| active[i]) {
        for b in ((a + 1)..distance.len()).filter(|&j| active[j]) {
            if best.is_none_or(|(_, _, d)| distance[a][b] < d) {
                best = Some((a, b, distance[a][b]));
            }
        }
    }
    best.map(|(a, b, _)| (a, b))
}

/// Ward distance from `c` to the union of `a` and `b`.
#[allow(clippy::cast_precision_loss)]
fn lance_williams_ward(ca: f64, cb: f64, ab: f64, na: usize, nb: usize, nc: usize) -> f64 {
    let (na, nb, nc) = (na as f64, nb as f64, nc as f64);
    let total = na + nb + nc;
    let squared = (nc + na).mul_add(ca * ca, (nc + nb) * cb * cb) - nc * ab * ab;
    (squared / total).max(0.0).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(3, 2)]
    #[case(4, 2)]
    #[case(7, 3)]
    #[case(9, 3)]
    #[case(16, 4)]
    fn group_count_follows_sqrt(#[case] clusters: usize, #[case] expected: usize) {
        assert_eq!(meta_group_count(clusters), expected);
    }

    #[test]
    fn two_or_fewer_share_group_zero() {
        assert_eq!(meta_cluster(&[vec![0.0, 1.0], vec![5.0, 5.0]]), vec![0, 0]);
        assert_eq!(meta_cluster(&[vec![1.0]]), vec![0]);
        assert!(meta_cluster(&[]).is_empty());
    }

    #[test]
    fn nearby_centroids_share_a_group() {
        let centroids = vec![
            vec![0.0, 0.0],
            vec![10.0, 10.0],
            vec![0.1, 0.0],
            vec![10.0, 10.1],
        ];
        assert_eq!(meta_cluster(&centroids), vec![0, 1, 0, 1]);
    }

    #[test]
    fn three_centroids_form_two_groups() {
        let centroids = vec![vec![0.0], vec![1.0], vec![20.0]];
        assert_eq!(meta_cluster(&centroids), vec![0, 0, 1]);
    }
}
