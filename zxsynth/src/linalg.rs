// QuiZX - Rust library for quantum circuit rewriting and optimisation
//         using the ZX-calculus
// Copyright (C) 2021 - Aleks Kissinger
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//    http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Matrices and linear algebra over F2
//!
//! Besides the usual block-wise Gaussian elimination this module holds the
//! combinatorial helpers used to turn a biadjacency matrix into as few CNOTs
//! as possible: a search for a minimal set of rows summing to a unit vector,
//! a greedy reduction built on it, a pass that cancels redundant row
//! operations, and a column reordering that puts likely pivots on the
//! diagonal.

use std::cmp::min;
use std::collections::VecDeque;
use std::fmt;

use derive_more::{Display, From};
use log::debug;
use rustc_hash::FxHashMap;

use crate::cancel::{CancelToken, Outcome};

/// A type for matrices over F2
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct Mat2 {
    d: Vec<Vec<u8>>,
}

pub trait RowOps {
    /// Add r0 to r1
    fn row_add(&mut self, r0: usize, r1: usize);
    /// Swap r0 and r1
    fn row_swap(&mut self, r0: usize, r1: usize);
}

pub trait ColOps {
    /// Add c0 to c1
    fn col_add(&mut self, c0: usize, c1: usize);
    /// Swap c0 and c1
    fn col_swap(&mut self, c0: usize, c1: usize);
}

/// Make unit implement RowOps to allow optional args
impl RowOps for () {
    fn row_add(&mut self, _: usize, _: usize) {}
    fn row_swap(&mut self, _: usize, _: usize) {}
}

/// A recorded row addition: row `dst` becomes `dst + src`.
#[derive(Display, Debug, Clone, Copy, PartialEq, Eq, Hash, From)]
#[display("{}->{}", src, dst)]
pub struct RowOp {
    pub src: usize,
    pub dst: usize,
}

impl RowOp {
    pub fn new(src: usize, dst: usize) -> Self {
        RowOp { src, dst }
    }
}

/// Recording row operations as a list. A swap is stored as three additions.
impl RowOps for Vec<RowOp> {
    fn row_add(&mut self, r0: usize, r1: usize) {
        self.push(RowOp::new(r0, r1));
    }

    fn row_swap(&mut self, r0: usize, r1: usize) {
        self.push(RowOp::new(r0, r1));
        self.push(RowOp::new(r1, r0));
        self.push(RowOp::new(r0, r1));
    }
}

fn xor_rows(a: &[u8], b: &[u8]) -> Vec<u8> {
    a.iter().zip(b).map(|(x, y)| x ^ y).collect()
}

fn weight(r: &[u8]) -> usize {
    r.iter().filter(|&&x| x != 0).count()
}

impl Mat2 {
    pub fn new(d: Vec<Vec<u8>>) -> Mat2 {
        Mat2 { d }
    }

    /// Build a matrix with the given number of rows and columns. Place a 1
    /// wherever f(i,j) is true.
    pub fn build<F>(rows: usize, cols: usize, f: F) -> Mat2
    where
        F: Fn(usize, usize) -> bool,
    {
        Mat2 {
            d: (0..rows)
                .map(|x| (0..cols).map(|y| u8::from(f(x, y))).collect())
                .collect(),
        }
    }

    pub fn zeros(rows: usize, cols: usize) -> Mat2 {
        Mat2::build(rows, cols, |_, _| false)
    }

    /// The identity matrix of a given size
    pub fn id(dim: usize) -> Mat2 {
        Mat2::build(dim, dim, |x, y| x == y)
    }

    pub fn num_rows(&self) -> usize {
        self.d.len()
    }

    pub fn num_cols(&self) -> usize {
        self.d.first().map_or(0, |r| r.len())
    }

    /// Return the transpose as a copy
    pub fn transpose(&self) -> Mat2 {
        Mat2::build(self.num_cols(), self.num_rows(), |i, j| self.d[j][i] == 1)
    }

    /// Return a copy whose column `p` is column `order[p]` of this one
    pub fn permute_columns(&self, order: &[usize]) -> Mat2 {
        Mat2::build(self.num_rows(), order.len(), |i, p| self.d[i][order[p]] == 1)
    }

    /// Main function for computing the echelon form.
    ///
    /// Returns the number of non-zero rows in the result, i.e.
    /// the rank of the matrix.
    ///
    /// The parameter 'full_reduce' determines whether to compute the full row-reduced form,
    /// useful e.g. for matrix inversion and CNOT circuit synthesis.
    ///
    /// The parameter 'blocksize' gives the size of the blocks in a block matrix for
    /// performing Patel/Markov/Hayes optimization, see:
    ///
    /// K. Patel, I. Markov, J. Hayes. Optimal Synthesis of Linear Reversible
    /// Circuits. QIC 2008
    ///
    /// If blocksize is given as self.cols(), then
    /// this is equivalent to just eliminating duplicate rows before doing normal
    /// Gaussian elimination.
    ///
    /// Every row operation is replayed on `x`, which can be any type that
    /// implements RowOps: a matrix, a circuit or a list of [`RowOp`]s.
    fn gauss_helper<T: RowOps>(&mut self, full_reduce: bool, blocksize: usize, x: &mut T) -> usize {
        let rows = self.num_rows();
        let cols = self.num_cols();
        let blocksize = blocksize.max(1);
        let num_blocks = cols.div_ceil(blocksize);
        let mut pivot_row = 0;
        let mut pivot_cols = vec![];

        for sec in 0..num_blocks {
            let i0 = sec * blocksize;
            let i1 = min(cols, (sec + 1) * blocksize);

            let mut chunks: FxHashMap<Vec<u8>, usize> = FxHashMap::default();
            for r in pivot_row..rows {
                let ch = self.d[r][i0..i1].to_vec();
                if ch.iter().all(|&b| b == 0) {
                    continue;
                }
                if let Some(&r1) = chunks.get(&ch) {
                    self.row_add(r1, r);
                    x.row_add(r1, r);
                } else {
                    chunks.insert(ch, r);
                }
            }

            for p in i0..i1 {
                let Some(r0) = (pivot_row..rows).find(|&r0| self.d[r0][p] != 0) else {
                    continue;
                };
                if r0 != pivot_row {
                    self.row_add(r0, pivot_row);
                    x.row_add(r0, pivot_row);
                }
                for r1 in pivot_row + 1..rows {
                    if self.d[r1][p] != 0 {
                        self.row_add(pivot_row, r1);
                        x.row_add(pivot_row, r1);
                    }
                }
                pivot_cols.push(p);
                pivot_row += 1;
            }
        }

        let rank = pivot_row;

        if full_reduce && rank != 0 {
            pivot_row -= 1;

            let mut sec = num_blocks;
            while sec != 0 {
                sec -= 1;
                let i0 = sec * blocksize;
                let i1 = min(cols, (sec + 1) * blocksize);

                let mut chunks: FxHashMap<Vec<u8>, usize> = FxHashMap::default();
                let mut r = pivot_row + 1;
                while r != 0 {
                    r -= 1;
                    let ch = self.d[r][i0..i1].to_vec();
                    if ch.iter().all(|&b| b == 0) {
                        continue;
                    }
                    if let Some(&r1) = chunks.get(&ch) {
                        self.row_add(r1, r);
                        x.row_add(r1, r);
                    } else {
                        chunks.insert(ch, r);
                    }
                }

                while let Some(&pcol) = pivot_cols.last() {
                    if i0 > pcol || pcol >= i1 {
                        break;
                    }
                    pivot_cols.pop();
                    for r in 0..pivot_row {
                        if self.d[r][pcol] != 0 {
                            self.row_add(pivot_row, r);
                            x.row_add(pivot_row, r);
                        }
                    }
                    pivot_row = pivot_row.saturating_sub(1);
                }
            }
        }
        rank
    }

    pub fn gauss(&mut self, full_reduce: bool) -> usize {
        self.gauss_helper(full_reduce, 3, &mut ())
    }

    pub fn gauss_x(&mut self, full_reduce: bool, blocksize: usize, x: &mut impl RowOps) -> usize {
        self.gauss_helper(full_reduce, blocksize, x)
    }

    /// Gaussian elimination without row swaps.
    ///
    /// For each column, the first row with a 1 that has not been used as a
    /// pivot yet becomes the pivot, and is added to every other row with a
    /// 1 there. The result is in reduced echelon form up to a permutation of
    /// the rows, and takes at most `rank * (rows - 1)` additions.
    pub fn gaussian_eliminate(&mut self) -> Vec<RowOp> {
        let rows = self.num_rows();
        let mut ops = vec![];
        let mut used = vec![false; rows];
        for c in 0..self.num_cols() {
            let Some(p) = (0..rows).find(|&r| !used[r] && self.d[r][c] == 1) else {
                continue;
            };
            used[p] = true;
            for r in 0..rows {
                if r != p && self.d[r][c] == 1 {
                    self.row_add(p, r);
                    ops.push(RowOp::new(p, r));
                }
            }
        }
        ops
    }

    pub fn apply_row_ops(&mut self, ops: &[RowOp]) {
        for op in ops {
            self.row_add(op.src, op.dst);
        }
    }

    pub fn rank(&self) -> usize {
        let mut m = self.clone();
        m.gauss(false)
    }

    pub fn inverse(&self) -> Option<Mat2> {
        if self.num_rows() != self.num_cols() {
            return None;
        }

        let mut m = self.clone();
        let mut inv = Mat2::id(self.num_rows());
        let rank = m.gauss_helper(true, 3, &mut inv);

        if rank < self.num_rows() {
            None
        } else {
            Some(inv)
        }
    }

    /// Return the hamming weight of the given row
    pub fn row_weight(&self, i: usize) -> usize {
        weight(&self.d[i])
    }

    pub fn is_one_hot(&self, i: usize) -> bool {
        self.row_weight(i) == 1
    }

    /// Return a list of rows which have a single 1
    pub fn unit_rows(&self) -> Vec<usize> {
        (0..self.num_rows()).filter(|&i| self.is_one_hot(i)).collect()
    }

    /// Breadth-first search for a smallest set of rows summing to a unit
    /// vector.
    ///
    /// Sets are grown one row at a time in increasing index order, so each
    /// subset is visited once. After `limit` expansions, or when no subset
    /// works, the result is empty.
    pub fn find_minimal_one_hot_combination(
        &self,
        limit: usize,
        cancel: &CancelToken,
    ) -> Outcome<Vec<usize>> {
        let rows = self.num_rows();
        if let Some(i) = (0..rows).find(|&i| self.is_one_hot(i)) {
            return Outcome::Done(vec![i]);
        }

        let mut queue: VecDeque<(Vec<usize>, Vec<u8>)> =
            (0..rows).map(|i| (vec![i], self.d[i].clone())).collect();
        let mut expansions = 0;

        while let Some((idx, sum)) = queue.pop_front() {
            if cancel.is_cancelled() {
                return Outcome::Cancelled(vec![]);
            }
            let last = idx.last().copied().unwrap_or(0);
            for j in last + 1..rows {
                let next = xor_rows(&sum, &self.d[j]);
                let mut next_idx = idx.clone();
                next_idx.push(j);
                if weight(&next) == 1 {
                    return Outcome::Done(next_idx);
                }
                queue.push_back((next_idx, next));
                expansions += 1;
                if expansions >= limit {
                    debug!("one-hot search gave up after {expansions} expansions");
                    return Outcome::Done(vec![]);
                }
            }
        }

        Outcome::Done(vec![])
    }

    /// Row additions that make one row a unit vector, chosen greedily.
    ///
    /// Starting from the rows found by
    /// [`find_minimal_one_hot_combination`](Mat2::find_minimal_one_hot_combination),
    /// repeatedly add the pair that most reduces the weight of the
    /// destination row and drop the source, until a single row is left. An
    /// empty result means no combination was found and the caller should
    /// fall back to Gaussian elimination.
    pub fn greedy_reduce(&self, limit: usize, cancel: &CancelToken) -> Outcome<Vec<RowOp>> {
        let mut indices = match self.find_minimal_one_hot_combination(limit, cancel) {
            Outcome::Done(idx) => idx,
            Outcome::Cancelled(_) => return Outcome::Cancelled(vec![]),
        };

        let mut m = self.clone();
        let mut ops = vec![];
        while indices.len() > 1 {
            let mut best: Option<(isize, usize, usize)> = None;
            for (pos, &src) in indices.iter().enumerate() {
                for &dst in &indices {
                    if src == dst {
                        continue;
                    }
                    let gain = m.row_weight(dst) as isize
                        - weight(&xor_rows(&m.d[src], &m.d[dst])) as isize;
                    if best.map_or(true, |(g, _, _)| gain > g) {
                        best = Some((gain, pos, dst));
                    }
                }
            }
            let Some((_, pos, dst)) = best else { break };
            let src = indices.remove(pos);
            m.row_add(src, dst);
            ops.push(RowOp::new(src, dst));
        }

        Outcome::Done(ops)
    }

    /// Try to give row `i` a column, re-seating rows already holding one
    /// along an augmenting path. `owner[j]` is the row holding column `j`.
    fn augment(&self, i: usize, owner: &mut [Option<usize>], seen: &mut [bool]) -> bool {
        for j in 0..self.num_cols() {
            if self.d[i][j] == 0 || seen[j] {
                continue;
            }
            seen[j] = true;
            let free = match owner[j] {
                None => true,
                Some(r) => self.augment(r, owner, seen),
            };
            if free {
                owner[j] = Some(i);
                return true;
            }
        }
        false
    }

    /// Assignment of a distinct column to every row, found as a maximum
    /// bipartite matching between rows and the columns they have a 1 in.
    /// The result maps rows to columns; `None` means no complete assignment
    /// exists.
    fn find_column_swap(&self) -> Option<Vec<usize>> {
        let rows = self.num_rows();
        let cols = self.num_cols();
        if rows > cols {
            return None;
        }

        let mut owner = vec![None; cols];
        for i in 0..rows {
            let mut seen = vec![false; cols];
            if !self.augment(i, &mut owner, &mut seen) {
                return None;
            }
        }

        let mut res = vec![0; rows];
        for (j, r) in owner.into_iter().enumerate() {
            if let Some(r) = r {
                res[r] = j;
            }
        }
        Some(res)
    }

    /// A column order that places a 1 on the diagonal for as many rows as
    /// possible.
    ///
    /// Returns `order` such that `self.permute_columns(&order)` is the
    /// reordered matrix. Falls back to the identity order when no
    /// assignment exists.
    pub fn column_optimal_swap(&self) -> Vec<usize> {
        let cols = self.num_cols();
        let Some(assigned) = self.find_column_swap() else {
            return (0..cols).collect();
        };

        let mut taken = vec![false; cols];
        for &c in &assigned {
            taken[c] = true;
        }
        let spare = (0..cols).filter(|&c| !taken[c]);
        assigned.into_iter().chain(spare).collect()
    }

    /// For each row, a distinct column holding a 1 in that row, if such a
    /// perfect assignment exists.
    pub fn column_assignment(&self) -> Option<Vec<usize>> {
        self.find_column_swap()
    }
}

/// Cancel pairs of identical row operations that nothing between them
/// touches, repeating until none are left.
///
/// Returns the number of operations removed. The product of the remaining
/// operations is unchanged.
pub fn filter_duplicate_ops(ops: &mut Vec<RowOp>) -> usize {
    let mut removed_total = 0;
    loop {
        let mut removed = vec![false; ops.len()];
        let mut last_used: FxHashMap<usize, usize> = FxHashMap::default();
        for (i, op) in ops.iter().enumerate() {
            if let (Some(&j), Some(&k)) = (last_used.get(&op.src), last_used.get(&op.dst)) {
                if j == k && ops[j] == *op && !removed[j] {
                    removed[j] = true;
                    removed[i] = true;
                    last_used.remove(&op.src);
                    last_used.remove(&op.dst);
                    continue;
                }
            }
            last_used.insert(op.src, i);
            last_used.insert(op.dst, i);
        }

        let n = removed.iter().filter(|&&r| r).count();
        if n == 0 {
            return removed_total;
        }
        removed_total += n;
        let mut it = removed.iter();
        ops.retain(|_| !it.next().copied().unwrap_or(false));
    }
}

impl RowOps for Mat2 {
    fn row_add(&mut self, r0: usize, r1: usize) {
        for i in 0..self.num_cols() {
            self.d[r1][i] ^= self.d[r0][i];
        }
    }

    fn row_swap(&mut self, r0: usize, r1: usize) {
        self.d.swap(r0, r1);
    }
}

impl ColOps for Mat2 {
    fn col_add(&mut self, c0: usize, c1: usize) {
        for row in &mut self.d {
            row[c1] ^= row[c0];
        }
    }

    fn col_swap(&mut self, c0: usize, c1: usize) {
        for row in &mut self.d {
            row.swap(c0, c1);
        }
    }
}

impl fmt::Display for Mat2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.d {
            write!(f, "[ ")?;
            for x in row {
                write!(f, "{x} ")?;
            }
            writeln!(f, "]")?;
        }
        Ok(())
    }
}

impl std::ops::Index<(usize, usize)> for Mat2 {
    type Output = u8;
    fn index(&self, idx: (usize, usize)) -> &Self::Output {
        &self.d[idx.0][idx.1]
    }
}

impl std::ops::IndexMut<(usize, usize)> for Mat2 {
    fn index_mut(&mut self, idx: (usize, usize)) -> &mut Self::Output {
        &mut self.d[idx.0][idx.1]
    }
}

impl std::ops::Index<usize> for Mat2 {
    type Output = Vec<u8>;
    fn index(&self, idx: usize) -> &Self::Output {
        &self.d[idx]
    }
}

impl std::ops::Mul<&Mat2> for &Mat2 {
    type Output = Mat2;

    fn mul(self, rhs: &Mat2) -> Self::Output {
        assert_eq!(
            self.num_cols(),
            rhs.num_rows(),
            "Cannot multiply matrices with mismatched dimensions."
        );
        let k = self.num_cols();
        Mat2::build(self.num_rows(), rhs.num_cols(), |x, y| {
            (0..k).fold(0, |b, i| b ^ (self.d[x][i] & rhs.d[i][y])) == 1
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use std::collections::BTreeSet;
    use std::time::{Duration, Instant};
    use rand::{Rng, SeedableRng};
    use rstest::rstest;

    fn random_mat(rows: usize, cols: usize, seed: u64) -> Mat2 {
        let mut rng = SmallRng::seed_from_u64(seed);
        let d = (0..rows)
            .map(|_| (0..cols).map(|_| u8::from(rng.random_bool(0.5))).collect())
            .collect();
        Mat2::new(d)
    }

    /// Pivot columns are unique and every non-pivot row is zero
    fn is_reduced_up_to_row_order(m: &Mat2) -> bool {
        let mut pivots = BTreeSet::new();
        for i in 0..m.num_rows() {
            let Some(p) = (0..m.num_cols()).find(|&j| m[(i, j)] == 1) else {
                continue;
            };
            if !pivots.insert(p) {
                return false;
            }
            if (0..m.num_rows()).any(|r| r != i && m[(r, p)] == 1) {
                return false;
            }
        }
        pivots.len() == m.rank()
    }

    #[test]
    fn mat_mul() {
        let v = Mat2::new(vec![vec![1, 0, 1, 0], vec![1, 1, 1, 1], vec![0, 0, 1, 1]]);
        let w = Mat2::new(vec![vec![1, 1], vec![1, 0], vec![0, 0], vec![0, 1]]);
        let u = Mat2::new(vec![vec![1, 1], vec![0, 0], vec![0, 1]]);
        assert_eq!(&v * &w, u);
        assert_eq!(v.transpose().transpose(), v);
    }

    #[test]
    fn row_and_col_ops() {
        let mut v = Mat2::new(vec![vec![1, 0, 1, 0], vec![1, 1, 1, 1], vec![0, 0, 1, 1]]);
        v.row_add(1, 2);
        assert_eq!(v[2], vec![1, 1, 0, 0]);
        v.col_swap(0, 3);
        assert_eq!(v[0], vec![0, 0, 1, 1]);
        v.col_add(3, 2);
        assert_eq!(v[0], vec![0, 0, 0, 1]);
    }

    #[test]
    fn ranks_and_inverse() {
        let v = Mat2::new(vec![vec![1, 0, 1, 0], vec![1, 1, 1, 1], vec![0, 1, 0, 1]]);
        assert_eq!(v.rank(), 2);

        let v = Mat2::new(vec![vec![1, 1, 1], vec![0, 1, 1], vec![0, 0, 1]]);
        let vi = v.inverse().expect("v should be invertible");
        assert_eq!(&v * &vi, Mat2::id(3));
        assert_eq!(vi, Mat2::new(vec![vec![1, 1, 0], vec![0, 1, 1], vec![0, 0, 1]]));
    }

    #[rstest]
    #[case(4, 4, 1)]
    #[case(5, 7, 2)]
    #[case(7, 5, 3)]
    #[case(6, 6, 4)]
    #[case(1, 3, 5)]
    fn elimination_replays(#[case] rows: usize, #[case] cols: usize, #[case] seed: u64) {
        let orig = random_mat(rows, cols, seed);
        let mut m = orig.clone();
        let ops = m.gaussian_eliminate();
        assert!(ops.len() <= rows * (rows - 1));
        assert!(is_reduced_up_to_row_order(&m));

        let mut replay = orig.clone();
        replay.apply_row_ops(&ops);
        assert_eq!(replay, m);
    }

    #[test]
    fn invertible_elimination_gives_a_permutation() {
        let orig = Mat2::new(vec![vec![0, 1, 1], vec![1, 1, 0], vec![1, 1, 1]]);
        let mut m = orig.clone();
        m.gaussian_eliminate();
        assert_eq!(m.unit_rows().len(), 3);
        assert!(m.column_assignment().is_some());
    }

    #[rstest]
    #[case(1)]
    #[case(2)]
    #[case(3)]
    #[case(8)]
    fn blocked_gauss_records_ops(#[case] blocksize: usize) {
        let orig = random_mat(6, 8, 42);
        let mut m = orig.clone();
        let mut ops: Vec<RowOp> = vec![];
        let rank = m.gauss_x(true, blocksize, &mut ops);
        assert_eq!(rank, orig.rank());
        assert!(is_reduced_up_to_row_order(&m));
        let mut replay = orig.clone();
        replay.apply_row_ops(&ops);
        assert_eq!(replay, m);
    }

    #[test]
    fn swaps_are_recorded_as_additions() {
        let orig = Mat2::new(vec![vec![1, 0], vec![1, 1]]);
        let mut ops: Vec<RowOp> = vec![];
        ops.row_swap(0, 1);
        let mut m = orig.clone();
        m.apply_row_ops(&ops);
        let mut swapped = orig.clone();
        swapped.row_swap(0, 1);
        assert_eq!(m, swapped);
    }

    fn three_row_combination() -> Mat2 {
        Mat2::new(vec![vec![1, 1, 0, 0], vec![0, 1, 1, 0], vec![1, 0, 1, 1]])
    }

    #[test]
    fn minimal_combination() {
        let idx = three_row_combination()
            .find_minimal_one_hot_combination(100, &CancelToken::new())
            .into_inner();
        assert_eq!(idx, vec![0, 1, 2]);

        let m = Mat2::new(vec![vec![1, 1, 0, 0], vec![0, 1, 1, 0], vec![0, 0, 1, 1], vec![1, 0, 1, 1]]);
        let idx = m
            .find_minimal_one_hot_combination(100, &CancelToken::new())
            .into_inner();
        assert_eq!(idx, vec![2, 3]);
    }

    #[rstest]
    #[case(3)]
    #[case(9)]
    #[case(27)]
    fn minimal_combination_is_sound(#[case] seed: u64) {
        let m = random_mat(6, 6, seed);
        let idx = m
            .find_minimal_one_hot_combination(100_000, &CancelToken::new())
            .into_inner();
        if !idx.is_empty() {
            let sum = idx
                .iter()
                .fold(vec![0; 6], |acc, &i| xor_rows(&acc, &m[i]));
            assert_eq!(weight(&sum), 1);
        }
    }

    #[test]
    fn minimal_combination_limits() {
        let m = Mat2::new(vec![vec![1, 1, 0], vec![0, 1, 1], vec![1, 0, 1]]);
        // rank 2, and no subset sums to a unit vector
        let idx = m
            .find_minimal_one_hot_combination(100_000, &CancelToken::new())
            .into_inner();
        assert!(idx.is_empty());

        let m = Mat2::new(vec![vec![1, 1, 0], vec![0, 1, 1], vec![0, 1, 0]]);
        assert_eq!(
            m.find_minimal_one_hot_combination(1, &CancelToken::new()),
            Outcome::Done(vec![2])
        );
        let m = three_row_combination();
        assert_eq!(
            m.find_minimal_one_hot_combination(1, &CancelToken::new()),
            Outcome::Done(vec![])
        );

        let token = CancelToken::new();
        token.cancel();
        assert!(m.find_minimal_one_hot_combination(100, &token).is_cancelled());
    }

    #[test]
    fn greedy_reduce_frees_a_row() {
        let orig = three_row_combination();
        let ops = orig.greedy_reduce(100, &CancelToken::new()).into_inner();
        assert_eq!(ops, vec![RowOp::new(0, 1), RowOp::new(1, 2)]);
        let mut m = orig.clone();
        m.apply_row_ops(&ops);
        assert!(m.is_one_hot(2));

        let stuck = Mat2::new(vec![vec![1, 1, 0], vec![0, 1, 1], vec![1, 0, 1]]);
        assert!(stuck.greedy_reduce(100, &CancelToken::new()).into_inner().is_empty());
    }

    #[test]
    fn duplicate_ops() {
        let mut ops = vec![RowOp::new(0, 1), RowOp::new(0, 1)];
        assert_eq!(filter_duplicate_ops(&mut ops), 2);
        assert!(ops.is_empty());

        let mut ops = vec![RowOp::new(0, 1), RowOp::new(2, 1), RowOp::new(0, 1)];
        assert_eq!(filter_duplicate_ops(&mut ops), 0);
        assert_eq!(ops.len(), 3);

        let mut ops = vec![
            RowOp::new(0, 1),
            RowOp::new(2, 3),
            RowOp::new(3, 4),
            RowOp::new(2, 3),
            RowOp::new(0, 1),
        ];
        assert_eq!(filter_duplicate_ops(&mut ops), 2);
        assert_eq!(ops, vec![RowOp::new(2, 3), RowOp::new(3, 4), RowOp::new(2, 3)]);
    }

    #[test]
    fn filtering_keeps_the_product() {
        let orig = random_mat(5, 5, 11);
        let mut ops = vec![
            RowOp::new(1, 2),
            RowOp::new(3, 4),
            RowOp::new(1, 2),
            RowOp::new(0, 4),
            RowOp::new(0, 4),
            RowOp::new(2, 0),
        ];
        let mut expected = orig.clone();
        expected.apply_row_ops(&ops);
        filter_duplicate_ops(&mut ops);
        assert_eq!(ops, vec![RowOp::new(3, 4), RowOp::new(2, 0)]);
        let mut m = orig.clone();
        m.apply_row_ops(&ops);
        assert_eq!(m, expected);
    }

    #[test]
    fn column_swap_puts_ones_on_the_diagonal() {
        let m = Mat2::new(vec![vec![0, 0, 1], vec![1, 0, 0], vec![0, 1, 0]]);
        let order = m.column_optimal_swap();
        assert_eq!(order, vec![2, 0, 1]);
        assert_eq!(m.permute_columns(&order), Mat2::id(3));
        assert_eq!(m.column_assignment(), Some(vec![2, 0, 1]));
    }

    #[test]
    fn column_swap_with_spare_columns() {
        let m = Mat2::new(vec![vec![0, 1, 1, 0], vec![0, 0, 1, 1]]);
        let order = m.column_optimal_swap();
        let mut sorted = order.clone();
        sorted.sort();
        assert_eq!(sorted, vec![0, 1, 2, 3]);
        let p = m.permute_columns(&order);
        assert_eq!((p[(0, 0)], p[(1, 1)]), (1, 1));
    }

    #[test]
    fn column_swap_gives_up_on_zero_rows() {
        let m = Mat2::new(vec![vec![0, 0], vec![1, 1]]);
        assert_eq!(m.column_optimal_swap(), vec![0, 1]);
        assert_eq!(m.column_assignment(), None);
    }

    #[test]
    fn column_swap_reseats_earlier_rows() {
        // row 0 first takes column 0, which row 1 needs
        let m = Mat2::new(vec![vec![1, 1, 0], vec![1, 0, 0], vec![0, 1, 1]]);
        assert_eq!(m.column_assignment(), Some(vec![1, 0, 2]));
        assert_eq!(m.column_optimal_swap(), vec![1, 0, 2]);
    }

    #[rstest]
    #[case(11, 10)]
    #[case(11, 11)]
    #[case(40, 40)]
    fn column_swap_on_dense_unassignable(#[case] rows: usize, #[case] cols: usize) {
        // every row is full except for the last column
        let m = Mat2::build(rows, cols, |_, j| j + 1 < cols);
        let time = Instant::now();
        assert_eq!(m.column_assignment(), None);
        assert_eq!(m.column_optimal_swap(), (0..cols).collect::<Vec<_>>());
        assert!(time.elapsed() < Duration::from_secs(5));
    }

    #[rstest]
    #[case(12, 1)]
    #[case(12, 2)]
    #[case(20, 3)]
    fn column_swap_on_dense_square(#[case] n: usize, #[case] seed: u64) {
        // a dense square matrix with a 1 missing from every row but one
        let mut m = Mat2::build(n, n, |_, _| true);
        for i in 1..n {
            m[(i, (i + seed as usize) % n)] = 0;
        }
        let order = m.column_optimal_swap();
        let p = m.permute_columns(&order);
        assert!((0..n).all(|i| p[(i, i)] == 1));
    }

    #[test]
    fn row_op_display() {
        let op: RowOp = (2, 0).into();
        assert_eq!(op, RowOp::new(2, 0));
        assert_eq!(op.to_string(), "2->0");
    }
}
