//! Dense matrices over [`Expr`].
//!
//! All elimination routines pivot on the first entry that is nonzero as a
//! rational function. With symbolic entries this is the generic rank; once
//! concrete numbers are substituted it is the exact rank.

use crate::errors::{BraceError, BraceResult};

use super::expr::Expr;

/// Row-major matrix of exact expressions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<Expr>,
}

impl Matrix {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Matrix {
            rows,
            cols,
            data: vec![Expr::zero(); rows * cols],
        }
    }

    /// Builds a matrix from rows. Ragged input is rejected.
    pub fn from_rows(rows: Vec<Vec<Expr>>) -> BraceResult<Self> {
        let n_rows = rows.len();
        let n_cols = rows.first().map_or(0, Vec::len);
        if let Some(bad) = rows.iter().position(|r| r.len() != n_cols) {
            return Err(BraceError::invalid_input(
                "rows",
                format!("row {} has {} entries", bad, rows[bad].len()),
                format!("every row must have {} entries", n_cols),
            ));
        }
        Ok(Matrix {
            rows: n_rows,
            cols: n_cols,
            data: rows.into_iter().flatten().collect(),
        })
    }

    pub fn nrows(&self) -> usize {
        self.rows
    }

    pub fn ncols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, i: usize, j: usize) -> &Expr {
        &self.data[i * self.cols + j]
    }

    pub fn set(&mut self, i: usize, j: usize, value: Expr) {
        self.data[i * self.cols + j] = value;
    }

    pub fn row(&self, i: usize) -> &[Expr] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    fn swap_rows(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        for j in 0..self.cols {
            self.data.swap(a * self.cols + j, b * self.cols + j);
        }
    }

    pub fn mul_vec(&self, v: &[Expr]) -> BraceResult<Vec<Expr>> {
        if v.len() != self.cols {
            return Err(BraceError::invalid_input(
                "vector",
                format!("length {}", v.len()),
                format!("matrix has {} columns", self.cols),
            ));
        }
        Ok((0..self.rows)
            .map(|i| self.row(i).iter().zip(v).map(|(a, b)| a * b).sum())
            .collect())
    }

    /// Determinant by fraction elimination. `None` for non-square matrices.
    pub fn determinant(&self) -> Option<Expr> {
        if self.rows != self.cols {
            return None;
        }
        let n = self.rows;
        let mut m = self.clone();
        let mut det = Expr::one();
        for c in 0..n {
            let Some(p) = (c..n).find(|&i| !m.get(i, c).is_zero()) else {
                return Some(Expr::zero());
            };
            if p != c {
                m.swap_rows(p, c);
                det = -det;
            }
            let pivot = m.get(c, c).clone();
            det = &det * &pivot;
            let inv = pivot.inv()?;
            for i in (c + 1)..n {
                let factor = m.get(i, c) * &inv;
                if factor.is_zero() {
                    continue;
                }
                for j in c..n {
                    let v = m.get(i, j) - &(&factor * m.get(c, j));
                    m.set(i, j, v);
                }
            }
        }
        Some(det)
    }

    /// Reduced row echelon form together with the pivot column of each nonzero row.
    pub fn rref(&self) -> (Matrix, Vec<usize>) {
        let mut m = self.clone();
        let mut pivots = Vec::new();
        let mut r = 0;
        for c in 0..self.cols {
            if r == self.rows {
                break;
            }
            let Some(p) = (r..self.rows).find(|&i| !m.get(i, c).is_zero()) else {
                continue;
            };
            m.swap_rows(p, r);
            let Some(inv) = m.get(r, c).inv() else {
                continue;
            };
            for j in c..self.cols {
                let v = m.get(r, j) * &inv;
                m.set(r, j, v);
            }
            for i in 0..self.rows {
                if i == r {
                    continue;
                }
                let factor = m.get(i, c).clone();
                if factor.is_zero() {
                    continue;
                }
                for j in c..self.cols {
                    let v = m.get(i, j) - &(&factor * m.get(r, j));
                    m.set(i, j, v);
                }
            }
            pivots.push(c);
            r += 1;
        }
        (m, pivots)
    }

    pub fn rank(&self) -> usize {
        self.rref().1.len()
    }

    /// Basis of the right null space: one vector per free column, with a 1
    /// in that column.
    pub fn nullspace(&self) -> Vec<Vec<Expr>> {
        let (reduced, pivots) = self.rref();
        (0..self.cols)
            .filter(|c| !pivots.contains(c))
            .map(|free| {
                let mut v = vec![Expr::zero(); self.cols];
                v[free] = Expr::one();
                for (row, &pc) in pivots.iter().enumerate() {
                    v[pc] = -reduced.get(row, free);
                }
                v
            })
            .collect()
    }

    /// Inverse by Gauss–Jordan elimination. `None` if singular or non-square.
    pub fn inverse(&self) -> Option<Matrix> {
        if self.rows != self.cols {
            return None;
        }
        let n = self.rows;
        let mut augmented = Matrix::zeros(n, 2 * n);
        for i in 0..n {
            for j in 0..n {
                augmented.set(i, j, self.get(i, j).clone());
            }
            augmented.set(i, n + i, Expr::one());
        }
        let (reduced, pivots) = augmented.rref();
        if pivots != (0..n).collect::<Vec<_>>() {
            return None;
        }
        let mut inv = Matrix::zeros(n, n);
        for i in 0..n {
            for j in 0..n {
                inv.set(i, j, reduced.get(i, n + j).clone());
            }
        }
        Some(inv)
    }

    /// Unique solution of the square system `self · x = b`, `None` if singular.
    pub fn solve(&self, b: &[Expr]) -> Option<Vec<Expr>> {
        if self.rows != self.cols || b.len() != self.rows {
            return None;
        }
        let n = self.rows;
        let mut augmented = Matrix::zeros(n, n + 1);
        for i in 0..n {
            for j in 0..n {
                augmented.set(i, j, self.get(i, j).clone());
            }
            augmented.set(i, n, b[i].clone());
        }
        let (reduced, pivots) = augmented.rref();
        if pivots != (0..n).collect::<Vec<_>>() {
            return None;
        }
        Some((0..n).map(|i| reduced.get(i, n).clone()).collect())
    }
}
