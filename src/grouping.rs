use crate::*;

/// Resolves the neighbor relation into disjoint placement groups.
///
/// Each group is a connected chain of abutment requests and must be placed
/// together by the initial strategies. Chains are walked backward to their
/// root first (stopping at a dangling reference or a cycle), then collected
/// forward breadth-first, so every block lands in exactly one group. Groups
/// come back sorted by total area, largest first.
pub fn group_neighbors(blocks: Vec<Block>) -> Vec<Vec<Block>> {
    let index_of: Dict<&str, usize> = blocks
        .iter()
        .enumerate()
        .map(|(i, b)| (b.name.as_str(), i))
        .collect();
    // Forward edge per block; a dangling neighbor name is simply absent.
    let requests: Vec<Option<usize>> = blocks
        .iter()
        .map(|b| {
            b.neighbor
                .as_deref()
                .and_then(|n| index_of.get(n).copied())
        })
        .collect();
    let mut requested_by: Vec<Vec<usize>> = vec![Vec::new(); blocks.len()];
    for (i, &target) in requests.iter().enumerate() {
        if let Some(t) = target {
            requested_by[t].push(i);
        }
    }

    let mut used = vec![false; blocks.len()];
    let mut groups: Vec<Vec<usize>> = Vec::new();
    for start in 0..blocks.len() {
        if used[start] {
            continue;
        }
        // Walk backward to the chain root; the visited set only guards this walk.
        let mut root = start;
        let mut walked: Set<usize> = Set::default();
        walked.insert(root);
        while let Some(next) = requests[root] {
            if walked.contains(&next) {
                break; // circular chain
            }
            walked.insert(next);
            root = next;
        }
        // Collect the full chain forward from the root.
        let mut group = Vec::new();
        let mut queue = std::collections::VecDeque::from([root]);
        while let Some(current) = queue.pop_front() {
            if used[current] {
                continue;
            }
            used[current] = true;
            group.push(current);
            queue.extend(&requested_by[current]);
        }
        if !group.is_empty() {
            groups.push(group);
        }
    }

    let mut slots: Vec<Option<Block>> = blocks.into_iter().map(Some).collect();
    let mut result: Vec<Vec<Block>> = groups
        .into_iter()
        .map(|g| {
            g.into_iter()
                .map(|i| slots[i].take().unwrap())
                .collect_vec()
        })
        .collect();
    result.sort_by_key(|g| {
        std::cmp::Reverse(OrderedFloat(g.iter().map(Block::area).sum::<float>()))
    });
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn block(name: &str, w: float, h: float, neighbor: Option<&str>) -> Block {
        Block::builder()
            .name(name)
            .width(w)
            .height(h)
            .maybe_neighbor(neighbor)
            .build()
    }

    fn names(group: &[Block]) -> Vec<&str> {
        group.iter().map(|b| b.name.as_str()).collect()
    }

    #[test]
    fn test_chain_collapses_into_one_group() {
        let groups = group_neighbors(vec![
            block("A", 10.0, 10.0, None),
            block("B", 5.0, 5.0, Some("A")),
            block("C", 5.0, 5.0, Some("B")),
            block("D", 3.0, 3.0, None),
        ]);
        assert_eq!(groups.len(), 2);
        // Root-first order inside the chain group.
        assert_eq!(names(&groups[0]), vec!["A", "B", "C"]);
        assert_eq!(names(&groups[1]), vec!["D"]);
    }

    #[test]
    fn test_cycle_is_one_group() {
        let groups = group_neighbors(vec![
            block("A", 4.0, 4.0, Some("B")),
            block("B", 4.0, 4.0, Some("A")),
        ]);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].len(), 2);
    }

    #[test]
    fn test_dangling_reference_stays_alone() {
        let groups = group_neighbors(vec![
            block("A", 4.0, 4.0, Some("GHOST")),
            block("B", 2.0, 2.0, None),
        ]);
        assert_eq!(groups.len(), 2);
        assert_eq!(names(&groups[0]), vec!["A"]);
    }

    #[test]
    fn test_groups_sorted_by_total_area_descending() {
        let groups = group_neighbors(vec![
            block("small", 2.0, 2.0, None),
            block("big", 20.0, 20.0, None),
            block("mid", 6.0, 6.0, None),
        ]);
        assert_eq!(
            groups.iter().map(|g| g[0].name.as_str()).collect_vec(),
            vec!["big", "mid", "small"]
        );
    }

    #[test]
    fn test_every_block_in_exactly_one_group() {
        let blocks = vec![
            block("A", 3.0, 3.0, Some("B")),
            block("B", 3.0, 3.0, Some("C")),
            block("C", 3.0, 3.0, None),
            block("D", 3.0, 3.0, Some("C")),
            block("E", 1.0, 1.0, None),
        ];
        let total = blocks.len();
        let groups = group_neighbors(blocks);
        let mut seen: Set<String> = Set::default();
        for g in &groups {
            for b in g {
                assert!(seen.insert(b.name.clone()), "{} appears twice", b.name);
            }
        }
        assert_eq!(seen.len(), total);
    }
}
