use ahash::{AHashMap, AHashSet};
use geo::{Coord, LineString, MultiLineString};
use smallvec::SmallVec;

use crate::error::ComputationError;

/// Exact coordinate key; shared endpoints must match bit-for-bit.
type NodeKey = (u64, u64);

#[inline]
fn node_key(c: Coord<f64>) -> NodeKey { (c.x.to_bits(), c.y.to_bits()) }

/// Drop repeated consecutive coordinates. Returns None for a line that
/// collapses to a single position.
fn normalize(line: &LineString<f64>) -> Option<LineString<f64>> {
    let mut coords = line.0.clone();
    coords.dedup();
    (coords.len() >= 2).then(|| LineString::new(coords))
}

/// Orientation-independent key used to drop duplicate members.
fn line_key(line: &LineString<f64>) -> Vec<NodeKey> {
    let forward = line.0.iter().map(|&c| node_key(c)).collect::<Vec<_>>();
    let mut backward = forward.clone();
    backward.reverse();
    forward.min(backward)
}

/// Dissolve a set of LineStrings into maximal chains.
///
/// Identical members are kept once. Lines are joined end to end only through
/// nodes where exactly two line ends meet, so junctions and disjoint parts
/// survive as separate parts of the MultiLineString. Part order follows the
/// first member of each chain.
pub(crate) fn dissolve_lines(members: &[&LineString<f64>]) -> Result<MultiLineString<f64>, ComputationError> {
    let mut seen = AHashSet::with_capacity(members.len());
    let lines = members.iter()
        .filter_map(|line| normalize(line))
        .filter(|line| seen.insert(line_key(line)))
        .collect::<Vec<_>>();

    if lines.is_empty() { return Err(ComputationError::EmptyMerge) }

    // Node -> list of (line, touches at line start).
    let mut ends: AHashMap<NodeKey, SmallVec<[(usize, bool); 2]>> = AHashMap::with_capacity(lines.len() * 2);
    for (i, line) in lines.iter().enumerate() {
        ends.entry(node_key(line.0[0])).or_default().push((i, true));
        ends.entry(node_key(line.0[line.0.len() - 1])).or_default().push((i, false));
    }

    let mut used = vec![false; lines.len()];

    // The unused line continuing through `node`, if the node is a simple pass-through.
    let continuation = |node: Coord<f64>, used: &[bool]| -> Option<(usize, bool)> {
        let here = ends.get(&node_key(node))?;
        if here.len() != 2 { return None }
        here.iter().copied().find(|&(j, _)| !used[j])
    };

    let mut parts = Vec::new();
    for start in 0..lines.len() {
        if used[start] { continue }
        used[start] = true;
        let mut chain = lines[start].0.clone();

        // Extend forward from the tail.
        while let Some((j, at_start)) = continuation(chain[chain.len() - 1], &used) {
            used[j] = true;
            let coords = &lines[j].0;
            if at_start {
                chain.extend(coords.iter().skip(1));
            } else {
                chain.extend(coords.iter().rev().skip(1));
            }
        }

        // Extend backward from the head.
        while let Some((j, at_start)) = continuation(chain[0], &used) {
            used[j] = true;
            let coords = &lines[j].0;
            let mut head = if at_start {
                coords.iter().rev().copied().collect::<Vec<_>>()
            } else {
                coords.clone()
            };
            head.pop();
            head.extend(chain);
            chain = head;
        }

        parts.push(LineString::new(chain));
    }

    Ok(MultiLineString::new(parts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::line_string;

    #[test]
    fn lines_sharing_an_endpoint_become_one_part() {
        let a = line_string![(x: 0.0, y: 0.0), (x: 100.0, y: 0.0)];
        let b = line_string![(x: 100.0, y: 0.0), (x: 100.0, y: 150.0)];
        let merged = dissolve_lines(&[&a, &b]).unwrap();

        assert_eq!(merged.0.len(), 1);
        assert_eq!(merged.0[0], line_string![(x: 0.0, y: 0.0), (x: 100.0, y: 0.0), (x: 100.0, y: 150.0)]);
    }

    #[test]
    fn reversed_members_are_oriented_into_the_chain() {
        let a = line_string![(x: 0.0, y: 0.0), (x: 10.0, y: 0.0)];
        let b = line_string![(x: 20.0, y: 0.0), (x: 10.0, y: 0.0)];
        let c = line_string![(x: -10.0, y: 0.0), (x: 0.0, y: 0.0)];
        let merged = dissolve_lines(&[&a, &b, &c]).unwrap();

        assert_eq!(merged.0.len(), 1);
        assert_eq!(
            merged.0[0],
            line_string![(x: -10.0, y: 0.0), (x: 0.0, y: 0.0), (x: 10.0, y: 0.0), (x: 20.0, y: 0.0)]
        );
    }

    #[test]
    fn disjoint_lines_stay_separate_parts() {
        let a = line_string![(x: 0.0, y: 0.0), (x: 100.0, y: 0.0)];
        let b = line_string![(x: 108.0, y: 0.0), (x: 200.0, y: 0.0)];
        let merged = dissolve_lines(&[&a, &b]).unwrap();
        assert_eq!(merged.0.len(), 2);
    }

    #[test]
    fn junctions_are_not_chained_through() {
        let a = line_string![(x: 0.0, y: 0.0), (x: 10.0, y: 0.0)];
        let b = line_string![(x: 10.0, y: 0.0), (x: 20.0, y: 0.0)];
        let c = line_string![(x: 10.0, y: 0.0), (x: 10.0, y: 10.0)];
        let merged = dissolve_lines(&[&a, &b, &c]).unwrap();
        assert_eq!(merged.0.len(), 3);
    }

    #[test]
    fn duplicate_members_are_kept_once() {
        let a = line_string![(x: 0.0, y: 0.0), (x: 10.0, y: 0.0)];
        let b = line_string![(x: 10.0, y: 0.0), (x: 0.0, y: 0.0)];
        let merged = dissolve_lines(&[&a, &b]).unwrap();
        assert_eq!(merged.0.len(), 1);
        assert_eq!(merged.0[0].0.len(), 2);
    }

    #[test]
    fn closed_ring_terminates() {
        let a = line_string![(x: 0.0, y: 0.0), (x: 10.0, y: 0.0)];
        let b = line_string![(x: 10.0, y: 0.0), (x: 10.0, y: 10.0)];
        let c = line_string![(x: 10.0, y: 10.0), (x: 0.0, y: 0.0)];
        let merged = dissolve_lines(&[&a, &b, &c]).unwrap();
        assert_eq!(merged.0.len(), 1);
        assert_eq!(merged.0[0].0.len(), 4);
    }

    #[test]
    fn degenerate_members_fail_to_merge() {
        let a = line_string![(x: 5.0, y: 5.0), (x: 5.0, y: 5.0)];
        assert_eq!(dissolve_lines(&[&a]), Err(ComputationError::EmptyMerge));
    }
}
