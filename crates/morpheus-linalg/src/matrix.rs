// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Morpheus Dense Matrix
// ─────────────────────────────────────────────────────────────────────
//! Row-major dense matrix with shape-checked algebra.
//!
//! Shape is fixed at construction; elements stay mutable. All operations
//! that combine two matrices check their shapes and return
//! [`MorpheusError::ShapeMismatch`] instead of truncating.

use morpheus_types::{MorpheusError, MorpheusResult};

/// Element type of a [`Matrix`].
pub trait Float:
    num_traits::Float + std::iter::Sum + std::fmt::Debug + Default + Send + Sync + 'static
{
    /// Convert an `f64` constant into this type.
    fn of(value: f64) -> Self;
}

impl Float for f32 {
    #[inline]
    fn of(value: f64) -> Self {
        value as f32
    }
}

impl Float for f64 {
    #[inline]
    fn of(value: f64) -> Self {
        value
    }
}

/// Dot product of two equally long slices.
#[inline]
pub fn dot<F: Float>(a: &[F], b: &[F]) -> F {
    a.iter().zip(b.iter()).map(|(&x, &y)| x * y).sum()
}

/// Dense `rows × cols` matrix stored row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix<F = f64> {
    rows: usize,
    cols: usize,
    data: Vec<F>,
}

impl<F: Float> Matrix<F> {
    /// Wrap row-major `data`; its length must equal `rows * cols`.
    pub fn new(rows: usize, cols: usize, data: Vec<F>) -> MorpheusResult<Self> {
        if data.len() != rows * cols {
            return Err(MorpheusError::DataLength {
                rows,
                cols,
                len: data.len(),
            });
        }
        Ok(Self { rows, cols, data })
    }

    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![F::zero(); rows * cols],
        }
    }

    pub fn identity(n: usize) -> Self {
        let mut m = Self::zeros(n, n);
        for i in 0..n {
            m.data[i * n + i] = F::one();
        }
        m
    }

    /// Build from equally long rows.
    pub fn from_rows(rows: &[Vec<F>]) -> MorpheusResult<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(rows.len() * cols);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != cols {
                return Err(MorpheusError::Validation(format!(
                    "row {i} has {} columns, expected {cols}",
                    row.len()
                )));
            }
            data.extend_from_slice(row);
        }
        Self::new(rows.len(), cols, data)
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn data(&self) -> &[F] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [F] {
        &mut self.data
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> F {
        self.data[row * self.cols + col]
    }

    #[inline]
    pub fn row(&self, row: usize) -> &[F] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    #[inline]
    pub fn row_mut(&mut self, row: usize) -> &mut [F] {
        &mut self.data[row * self.cols..(row + 1) * self.cols]
    }

    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|v| v.is_finite())
    }

    /// `C = A·Bᵗ`, i.e. `C[i,j] = dot(row_i(A), row_j(B))`.
    ///
    /// Requires `A.cols == B.cols`; the result is `A.rows × B.rows`.
    pub fn multiply_by_transpose(&self, other: &Matrix<F>) -> MorpheusResult<Matrix<F>> {
        if self.cols != other.cols {
            return Err(MorpheusError::shape(
                "multiply_by_transpose",
                self.shape(),
                other.shape(),
            ));
        }
        let mut out = Matrix::zeros(self.rows, other.rows);
        for i in 0..self.rows {
            let a = self.row(i);
            for j in 0..other.rows {
                out.data[i * other.rows + j] = dot(a, other.row(j));
            }
        }
        Ok(out)
    }

    /// Standard product `A·B`; requires `A.cols == B.rows`.
    pub fn matmul(&self, other: &Matrix<F>) -> MorpheusResult<Matrix<F>> {
        if self.cols != other.rows {
            return Err(MorpheusError::shape("matmul", self.shape(), other.shape()));
        }
        let mut out = Matrix::zeros(self.rows, other.cols);
        for i in 0..self.rows {
            for k in 0..self.cols {
                let a = self.data[i * self.cols + k];
                if a == F::zero() {
                    continue;
                }
                let b = other.row(k);
                let o = &mut out.data[i * other.cols..(i + 1) * other.cols];
                for (o, &b) in o.iter_mut().zip(b) {
                    *o = *o + a * b;
                }
            }
        }
        Ok(out)
    }

    pub fn transpose(&self) -> Matrix<F> {
        let mut out = Matrix::zeros(self.cols, self.rows);
        for i in 0..self.rows {
            for j in 0..self.cols {
                out.data[j * self.rows + i] = self.data[i * self.cols + j];
            }
        }
        out
    }

    /// Scale every row to unit L2 norm. Zero rows stay zero.
    pub fn unit_normalize(&self) -> Matrix<F> {
        let mut out = self.clone();
        for i in 0..out.rows {
            let row = out.row_mut(i);
            let norm = dot(row, row).sqrt();
            if norm == F::zero() {
                continue;
            }
            for v in row.iter_mut() {
                *v = *v / norm;
            }
        }
        out
    }

    /// Row-wise softmax, shifted by the row maximum before exponentiating.
    pub fn softmax_normalize(&self) -> Matrix<F> {
        let mut out = self.clone();
        for i in 0..out.rows {
            let row = out.row_mut(i);
            let max = row.iter().copied().fold(F::neg_infinity(), F::max);
            let mut sum = F::zero();
            for v in row.iter_mut() {
                *v = (*v - max).exp();
                sum = sum + *v;
            }
            // The max element contributes exp(0) = 1, so sum >= 1.
            for v in row.iter_mut() {
                *v = *v / sum;
            }
        }
        out
    }

    /// Orthonormalize rows in index order (modified Gram-Schmidt).
    ///
    /// A row whose residual after removing the earlier directions is
    /// (near-)zero relative to its own norm is linearly dependent and
    /// yields [`MorpheusError::Degenerate`].
    pub fn gram_schmidt(&self) -> MorpheusResult<Matrix<F>> {
        if self.rows > self.cols {
            return Err(MorpheusError::Degenerate(format!(
                "gram_schmidt: {} rows cannot be independent in {} dimensions",
                self.rows, self.cols
            )));
        }
        let tol = F::epsilon().sqrt();
        let cols = self.cols;
        let mut out = self.clone();
        for i in 0..out.rows {
            let original = {
                let row = out.row(i);
                dot(row, row).sqrt()
            };
            for j in 0..i {
                let (done, rest) = out.data.split_at_mut(i * cols);
                let q = &done[j * cols..(j + 1) * cols];
                let v = &mut rest[..cols];
                let proj = dot(v, q);
                for (v, &q) in v.iter_mut().zip(q) {
                    *v = *v - proj * q;
                }
            }
            let row = out.row_mut(i);
            let norm = dot(row, row).sqrt();
            if original == F::zero() || !norm.is_finite() || norm <= tol * original {
                return Err(MorpheusError::Degenerate(format!(
                    "gram_schmidt: row {i} is linearly dependent on earlier rows"
                )));
            }
            for v in row.iter_mut() {
                *v = *v / norm;
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(rows: &[&[f64]]) -> Matrix<f64> {
        Matrix::from_rows(&rows.iter().map(|r| r.to_vec()).collect::<Vec<_>>()).unwrap()
    }

    #[test]
    fn test_new_checks_length() {
        assert!(Matrix::<f64>::new(2, 2, vec![0.0; 3]).is_err());
        assert!(Matrix::<f64>::new(2, 2, vec![0.0; 4]).is_ok());
    }

    #[test]
    fn test_identity_times_transpose() {
        let id = Matrix::<f64>::identity(2);
        let out = id.multiply_by_transpose(&id).unwrap();
        assert_eq!(out, Matrix::identity(2));
    }

    #[test]
    fn test_multiply_by_transpose_values() {
        let a = m(&[&[1.0, 2.0], &[3.0, 4.0], &[5.0, 6.0]]);
        let b = m(&[&[1.0, 0.0], &[1.0, 1.0]]);
        let c = a.multiply_by_transpose(&b).unwrap();
        assert_eq!(c.shape(), (3, 2));
        assert_eq!(c.data(), &[1.0, 3.0, 3.0, 7.0, 5.0, 11.0]);
    }

    #[test]
    fn test_multiply_by_transpose_shape_mismatch() {
        let a = Matrix::<f64>::zeros(2, 3);
        let b = Matrix::<f64>::zeros(2, 4);
        let err = a.multiply_by_transpose(&b).unwrap_err();
        assert!(matches!(err, MorpheusError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_matmul_matches_transpose_product() {
        let a = m(&[&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]]);
        let b = m(&[&[0.5, -1.0, 2.0], &[1.0, 1.0, 1.0]]);
        let via_t = a.multiply_by_transpose(&b).unwrap();
        let via_mm = a.matmul(&b.transpose()).unwrap();
        assert_eq!(via_t, via_mm);
        assert!(a.matmul(&b).is_err());
    }

    #[test]
    fn test_transpose() {
        let a = m(&[&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]]);
        let t = a.transpose();
        assert_eq!(t.shape(), (3, 2));
        assert_eq!(t.data(), &[1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
        assert_eq!(t.transpose(), a);
    }

    #[test]
    fn test_unit_normalize() {
        let a = m(&[&[3.0, 4.0], &[0.0, 0.0], &[-1.0, 1.0]]);
        let u = a.unit_normalize();
        for i in [0, 2] {
            let row = u.row(i);
            assert!((dot(row, row).sqrt() - 1.0).abs() < 1e-12);
        }
        assert_eq!(u.row(1), &[0.0, 0.0]);
        assert!((u.get(0, 0) - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_softmax_uniform() {
        let s = m(&[&[0.0, 0.0, 0.0]]).softmax_normalize();
        for &v in s.data() {
            assert!((v - 1.0 / 3.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_softmax_rows_sum_to_one() {
        let s = m(&[&[1000.0, 999.0, -5.0], &[-3.0, 0.5, 2.0]]).softmax_normalize();
        assert!(s.is_finite());
        for i in 0..s.rows() {
            let row = s.row(i);
            let sum: f64 = row.iter().sum();
            assert!((sum - 1.0).abs() < 1e-12);
            assert!(row.iter().all(|&v| v > 0.0 && v < 1.0));
        }
    }

    #[test]
    fn test_gram_schmidt_orthonormal() {
        let a = m(&[
            &[2.0, 1.0, 0.0, 1.0],
            &[1.0, 3.0, 1.0, 0.0],
            &[0.0, 1.0, 4.0, 1.0],
        ]);
        let q = a.gram_schmidt().unwrap();
        for i in 0..q.rows() {
            for j in 0..q.rows() {
                let d = dot(q.row(i), q.row(j));
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!((d - expected).abs() < 1e-10, "q[{i}]·q[{j}] = {d}");
            }
        }
    }

    #[test]
    fn test_gram_schmidt_rank_deficient() {
        let a = m(&[&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]]);
        assert!(matches!(a.gram_schmidt(), Err(MorpheusError::Degenerate(_))));
    }

    #[test]
    fn test_gram_schmidt_zero_row() {
        let a = m(&[&[1.0, 0.0], &[0.0, 0.0]]);
        assert!(matches!(a.gram_schmidt(), Err(MorpheusError::Degenerate(_))));
    }

    #[test]
    fn test_gram_schmidt_too_many_rows() {
        let a = m(&[&[1.0, 0.0], &[0.0, 1.0], &[1.0, 1.0]]);
        assert!(matches!(a.gram_schmidt(), Err(MorpheusError::Degenerate(_))));
    }

    #[test]
    fn test_f32_softmax() {
        let a = Matrix::<f32>::new(1, 4, vec![0.0, 1.0, 2.0, 3.0]).unwrap();
        let s = a.softmax_normalize();
        let sum: f32 = s.data().iter().sum();
        assert!((sum - 1.0).abs() < 1e-6);
    }
}
