//! Huffman trees built the way a solver builds them by hand.
//!
//! The tree is not a canonical Huffman code. The solver is shown one weight
//! per letter and repeats a fixed procedure: scan the working list once,
//! pick the lowest-weight node and the second lowest, join them under a new
//! branch (lowest on the left), remove both and append the branch to the end
//! of the list. Ties are resolved by the scan itself, so the selection must
//! follow it exactly or the solver's tree and ours diverge:
//!
//! - a node strictly lower than the current lowest displaces it, and the
//!   displaced node becomes the second lowest;
//! - otherwise a node strictly lower than the current second lowest
//!   replaces it.
//!
//! Nodes live in an arena (`Vec<Node>`) and refer to children by `NodeId`.

use std::fmt;

use crate::error::{MalformedInput, Result};

/// Index of a node in the tree arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// Leaf or branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Leaf { letter: char, weight: u32 },
    Branch { left: NodeId, right: NodeId, weight: u32 },
}

impl Node {
    pub fn weight(&self) -> u32 {
        match self {
            Node::Leaf { weight, .. } | Node::Branch { weight, .. } => *weight,
        }
    }
}

/// One merge of the construction, for the solver walkthrough.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombineStep {
    /// 1-based positions in the working list before the merge
    pub lowest_position: usize,
    pub second_position: usize,
    pub lowest_weight: u32,
    pub second_weight: u32,
}

impl fmt::Display for CombineStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "combine #{} ({}) with #{} ({})",
            self.lowest_position, self.lowest_weight, self.second_position, self.second_weight
        )
    }
}

/// Arena-backed binary tree with letters at the leaves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl HuffmanTree {
    /// Build a tree from per-letter weights; leaf `i` gets letter `'A' + i`.
    ///
    /// Returns the tree and the merge steps in order.
    ///
    /// # Errors
    /// `MalformedInput::InvalidWeights` for an empty list or more than 26 weights.
    pub fn build(weights: &[u32]) -> Result<(Self, Vec<CombineStep>)> {
        if weights.is_empty() || weights.len() > 26 {
            return Err(MalformedInput::InvalidWeights(format!(
                "need 1..=26 leaf weights, got {}",
                weights.len()
            ))
            .into());
        }

        let mut nodes: Vec<Node> = weights
            .iter()
            .zip('A'..='Z')
            .map(|(&weight, letter)| Node::Leaf { letter, weight })
            .collect();
        let mut working: Vec<NodeId> = (0..nodes.len()).map(NodeId).collect();
        let mut steps = Vec::with_capacity(weights.len() - 1);

        while working.len() > 1 {
            let (lowest, second) = select_two_lowest(&nodes, &working);
            let (lo, hi) = (working[lowest], working[second]);
            let (lowest_weight, second_weight) = (nodes[lo.0].weight(), nodes[hi.0].weight());
            steps.push(CombineStep {
                lowest_position: lowest + 1,
                second_position: second + 1,
                lowest_weight,
                second_weight,
            });

            nodes.push(Node::Branch {
                left: lo,
                right: hi,
                weight: lowest_weight + second_weight,
            });
            working.remove(lowest.max(second));
            working.remove(lowest.min(second));
            working.push(NodeId(nodes.len() - 1));
        }

        let root = working[0];
        Ok((Self { nodes, root }, steps))
    }

    /// Rebuild a tree shape from pre-order structure bits (`1` branch, `0`
    /// leaf) and label its leaves with `letters`, as a solver would.
    ///
    /// Returns the tree and the number of structure bits consumed.
    pub fn from_structure(bits: &[bool], letters: &str) -> Result<(Self, usize)> {
        let mut nodes = Vec::new();
        let mut pos = 0;
        let root = parse_structure(bits, &mut pos, &mut nodes, 0)?;
        let mut tree = Self { nodes, root };
        tree.populate(letters)?;
        Ok((tree, pos))
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Total weight at the root.
    pub fn weight(&self) -> u32 {
        self.node(self.root).weight()
    }

    /// Leaves in pre-order.
    pub fn leaves(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_leaves(self.root, &mut out);
        out
    }

    fn collect_leaves(&self, id: NodeId, out: &mut Vec<NodeId>) {
        match self.node(id) {
            Node::Leaf { .. } => out.push(id),
            Node::Branch { left, right, .. } => {
                self.collect_leaves(*left, out);
                self.collect_leaves(*right, out);
            }
        }
    }

    /// Leaf letters in pre-order.
    pub fn leaf_letters(&self) -> String {
        self.leaves()
            .into_iter()
            .filter_map(|id| match self.node(id) {
                Node::Leaf { letter, .. } => Some(*letter),
                Node::Branch { .. } => None,
            })
            .collect()
    }

    /// Path to the leaf holding `letter`: `0` per left step, `1` per right
    /// step. `None` if no leaf carries the letter.
    pub fn encode_bits(&self, letter: char) -> Option<Vec<bool>> {
        let mut path = Vec::new();
        self.find_path(self.root, letter, &mut path).then_some(path)
    }

    fn find_path(&self, id: NodeId, letter: char, path: &mut Vec<bool>) -> bool {
        match self.node(id) {
            Node::Leaf { letter: l, .. } => *l == letter,
            Node::Branch { left, right, .. } => {
                path.push(false);
                if self.find_path(*left, letter, path) {
                    return true;
                }
                path.pop();
                path.push(true);
                if self.find_path(*right, letter, path) {
                    return true;
                }
                path.pop();
                false
            }
        }
    }

    /// Pre-order shape: `1` at each branch before its children, `0` at each leaf.
    pub fn encode_tree_structure(&self) -> Vec<bool> {
        let mut out = Vec::with_capacity(self.nodes.len());
        self.write_structure(self.root, &mut out);
        out
    }

    fn write_structure(&self, id: NodeId, out: &mut Vec<bool>) {
        match self.node(id) {
            Node::Leaf { .. } => out.push(false),
            Node::Branch { left, right, .. } => {
                out.push(true);
                self.write_structure(*left, out);
                self.write_structure(*right, out);
            }
        }
    }

    /// Relabel leaves in pre-order with the characters of `letters`.
    ///
    /// # Errors
    /// `MalformedInput::AlphabetLengthMismatch` unless there is exactly one
    /// letter per leaf; the tree is left unchanged in that case.
    pub fn populate(&mut self, letters: &str) -> Result<()> {
        let leaves = self.leaves();
        let count = letters.chars().count();
        if count != leaves.len() {
            return Err(MalformedInput::AlphabetLengthMismatch {
                leaves: leaves.len(),
                letters: count,
            }
            .into());
        }
        for (id, ch) in leaves.into_iter().zip(letters.chars()) {
            if let Node::Leaf { letter, .. } = &mut self.nodes[id.0] {
                *letter = ch;
            }
        }
        Ok(())
    }

    /// Walk the tree from the root for each codeword in turn.
    ///
    /// Returns `None` if the bits end partway down the tree.
    pub fn decode(&self, bits: &[bool]) -> Option<String> {
        let mut out = String::new();
        let mut id = self.root;
        if matches!(self.node(id), Node::Leaf { .. }) {
            return None;
        }
        for &bit in bits {
            if let Node::Branch { left, right, .. } = self.node(id) {
                id = if bit { *right } else { *left };
            }
            if let Node::Leaf { letter, .. } = self.node(id) {
                out.push(*letter);
                id = self.root;
            }
        }
        (id == self.root).then_some(out)
    }

    fn write_brackets(&self, id: NodeId, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.node(id) {
            Node::Leaf { letter, .. } => write!(f, "{letter}"),
            Node::Branch { left, right, .. } => {
                f.write_str("[")?;
                self.write_brackets(*left, f)?;
                self.write_brackets(*right, f)?;
                f.write_str("]")
            }
        }
    }
}

/// Bracket notation: `[[AB]C]`.
impl fmt::Display for HuffmanTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_brackets(self.root, f)
    }
}

/// Single forward scan for the lowest and second-lowest nodes.
///
/// Returns positions in `working`.
fn select_two_lowest(nodes: &[Node], working: &[NodeId]) -> (usize, usize) {
    let mut lowest: Option<usize> = None;
    let mut second: Option<usize> = None;
    for (i, id) in working.iter().enumerate() {
        let weight = nodes[id.0].weight();
        if lowest.map_or(true, |l| weight < nodes[working[l].0].weight()) {
            second = lowest;
            lowest = Some(i);
        } else if second.map_or(true, |s| weight < nodes[working[s].0].weight()) {
            second = Some(i);
        }
    }
    // working.len() > 1 guarantees both are set
    (lowest.unwrap_or(0), second.unwrap_or(1))
}

fn parse_structure(bits: &[bool], pos: &mut usize, nodes: &mut Vec<Node>, depth: usize) -> Result<NodeId> {
    // 26 leaves can never need more depth than this
    if depth > 26 {
        return Err(MalformedInput::Undecodable("tree structure too deep".into()).into());
    }
    let bit = *bits
        .get(*pos)
        .ok_or_else(|| MalformedInput::Undecodable("tree structure ends early".into()))?;
    *pos += 1;
    if bit {
        let left = parse_structure(bits, pos, nodes, depth + 1)?;
        let right = parse_structure(bits, pos, nodes, depth + 1)?;
        nodes.push(Node::Branch { left, right, weight: 0 });
    } else {
        nodes.push(Node::Leaf { letter: '?', weight: 0 });
    }
    Ok(NodeId(nodes.len() - 1))
}

/// Where the keyword goes in a keyed alphabet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPlacement {
    /// Keyword letters first, then the rest of the alphabet
    Front,
    /// Rest of the alphabet first, then the keyword letters
    Back,
}

/// Distinct letters of `keyword` joined with the unused letters of A-Z.
pub fn keyed_alphabet(keyword: &str, placement: KeyPlacement) -> String {
    let mut key = String::new();
    for ch in keyword.chars() {
        if !key.contains(ch) {
            key.push(ch);
        }
    }
    let rest: String = ('A'..='Z').filter(|ch| !key.contains(*ch)).collect();
    match placement {
        KeyPlacement::Front => key + &rest,
        KeyPlacement::Back => rest + &key,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitio::{format_bits, parse_bits};
    use proptest::prelude::*;

    #[test]
    fn test_three_leaves() {
        // A=5 B=1 C=2: merge B+C (positions 2, 3), then A with [BC]
        let (tree, steps) = HuffmanTree::build(&[5, 1, 2]).unwrap();
        assert_eq!(tree.to_string(), "[[BC]A]");
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].lowest_position, 2);
        assert_eq!(steps[0].second_position, 3);
        // Working list is now [A, [BC]] with weights 5, 3
        assert_eq!(steps[1].lowest_position, 2);
        assert_eq!(steps[1].second_position, 1);
        assert_eq!(tree.weight(), 8);

        assert_eq!(format_bits(&tree.encode_bits('A').unwrap()), "1");
        assert_eq!(format_bits(&tree.encode_bits('B').unwrap()), "00");
        assert_eq!(format_bits(&tree.encode_bits('C').unwrap()), "01");
        assert_eq!(tree.encode_bits('D'), None);
    }

    #[test]
    fn test_tie_break_follows_scan() {
        // Weights 2, 1, 1: the scan sees A as lowest, then B displaces A
        // (A becomes second), then C is not below B but is below A.
        let (_, steps) = HuffmanTree::build(&[2, 1, 1]).unwrap();
        assert_eq!((steps[0].lowest_position, steps[0].second_position), (2, 3));

        // Equal weights everywhere: first two in list order
        let (tree, steps) = HuffmanTree::build(&[1, 1, 1, 1]).unwrap();
        assert_eq!((steps[0].lowest_position, steps[0].second_position), (1, 2));
        // [CD] is merged second, then [AB] with [CD]
        assert_eq!(tree.to_string(), "[[AB][CD]]");
    }

    #[test]
    fn test_displaced_lowest_becomes_second() {
        // A=3 B=2 C=1: B displaces A, C displaces B, so second is B not A
        let (tree, steps) = HuffmanTree::build(&[3, 2, 1]).unwrap();
        assert_eq!((steps[0].lowest_position, steps[0].second_position), (3, 2));
        assert_eq!(tree.to_string(), "[A[CB]]");
    }

    #[test]
    fn test_structure_and_populate() {
        let (mut tree, _) = HuffmanTree::build(&[5, 1, 2]).unwrap();
        assert_eq!(format_bits(&tree.encode_tree_structure()), "11000");
        tree.populate("XYZ").unwrap();
        assert_eq!(tree.to_string(), "[[XY]Z]");
        assert_eq!(tree.leaf_letters(), "XYZ");
        assert!(tree.populate("XY").is_err());
        assert!(tree.populate("WXYZ").is_err());
        assert_eq!(tree.leaf_letters(), "XYZ");
    }

    #[test]
    fn test_from_structure() {
        let bits = parse_bits("1100011").unwrap();
        let (tree, used) = HuffmanTree::from_structure(&bits, "PQR").unwrap();
        assert_eq!(used, 5);
        assert_eq!(tree.to_string(), "[[PQ]R]");
        assert!(HuffmanTree::from_structure(&parse_bits("110").unwrap(), "PQR").is_err());
    }

    #[test]
    fn test_decode() {
        let (tree, _) = HuffmanTree::build(&[5, 1, 2]).unwrap();
        assert_eq!(tree.decode(&parse_bits("10001").unwrap()).as_deref(), Some("ABC"));
        assert_eq!(tree.decode(&parse_bits("10").unwrap()), None);
    }

    #[test]
    fn test_build_rejects_bad_weights() {
        assert!(HuffmanTree::build(&[]).is_err());
        assert!(HuffmanTree::build(&[1; 27]).is_err());
    }

    #[test]
    fn test_keyed_alphabet() {
        assert_eq!(
            keyed_alphabet("HUFFMAN", KeyPlacement::Front),
            "HUFMANBCDEGIJKLOPQRSTVWXYZ"
        );
        assert_eq!(
            keyed_alphabet("HUFFMAN", KeyPlacement::Back),
            "BCDEGIJKLOPQRSTVWXYZHUFMAN"
        );
    }

    fn weights() -> impl Strategy<Value = Vec<u32>> {
        prop::collection::vec(1u32..=26, 26)
    }

    proptest! {
        #[test]
        fn every_letter_decodes_to_itself(weights in weights()) {
            let (tree, steps) = HuffmanTree::build(&weights).unwrap();
            prop_assert_eq!(steps.len(), 25);
            prop_assert_eq!(tree.weight(), weights.iter().sum::<u32>());
            for letter in 'A'..='Z' {
                let bits = tree.encode_bits(letter).unwrap();
                prop_assert_eq!(tree.decode(&bits), Some(letter.to_string()));
            }
        }

        #[test]
        fn structure_roundtrip_keeps_codes(weights in weights(), keyword in "[A-Z]{7,8}") {
            let key = keyed_alphabet(&keyword, KeyPlacement::Front);
            let (mut tree, _) = HuffmanTree::build(&weights).unwrap();
            tree.populate(&key).unwrap();

            let structure = tree.encode_tree_structure();
            prop_assert_eq!(structure.len(), 51);
            let (rebuilt, used) = HuffmanTree::from_structure(&structure, &key).unwrap();
            prop_assert_eq!(used, structure.len());
            for letter in key.chars() {
                prop_assert_eq!(rebuilt.encode_bits(letter), tree.encode_bits(letter));
            }
        }
    }
}
