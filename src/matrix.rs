//! Square row-major `f64` matrices and the per-trial input generator.

use std::ops::Index;

use nanorand::{Rng, WyRand};

use crate::error::{Error, Result};

/// Largest accepted side length; keeps N² within a 32-bit unsigned counter.
pub const MAX_DIMENSION: usize = 65536;

/// An owned N×N matrix stored as one contiguous row-major buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    dim: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// Allocates an N×N matrix filled with zeros.
    ///
    /// Allocation is fallible so that an oversized request surfaces as
    /// [`Error::Allocation`] instead of aborting the process.
    pub fn zeroed(dim: usize) -> Result<Self> {
        let elements = element_count(dim)?;
        let mut data = Vec::new();
        data.try_reserve_exact(elements)
            .map_err(|source| Error::Allocation { elements, source })?;
        data.resize(elements, 0.0);
        Ok(Matrix { dim, data })
    }

    /// Allocates an N×N matrix filled from `rng`.
    pub fn random(dim: usize, rng: &mut WyRand) -> Result<Self> {
        let mut m = Matrix::zeroed(dim)?;
        rng.fill(&mut m.data);
        Ok(m)
    }

    /// Wraps a row-major buffer; `None` unless it holds exactly `dim * dim` values.
    pub fn from_vec(dim: usize, data: Vec<f64>) -> Option<Self> {
        if dim == 0 || dim.checked_mul(dim)? != data.len() {
            return None;
        }
        Some(Matrix { dim, data })
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.dim || col >= self.dim {
            return None;
        }
        self.data.get(row * self.dim + col).copied()
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    fn index(&self, (row, col): (usize, usize)) -> &f64 {
        assert!(row < self.dim && col < self.dim, "index ({row}, {col}) out of bounds");
        &self.data[row * self.dim + col]
    }
}

fn element_count(dim: usize) -> Result<usize> {
    if dim == 0 || dim > MAX_DIMENSION {
        return Err(Error::InvalidDimension(dim as u64));
    }
    dim.checked_mul(dim).ok_or(Error::InvalidDimension(dim as u64))
}

/// The three buffers owned by one trial: inputs `a`, `b` and the zeroed output `c`.
#[derive(Debug)]
pub struct TrialMatrices {
    pub a: Matrix,
    pub b: Matrix,
    pub c: Matrix,
}

/// Produces fresh pseudo-random inputs for every trial.
pub struct MatrixGenerator {
    rng: WyRand,
}

impl MatrixGenerator {
    /// Seeds from `seed` when given, otherwise from the environment.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => WyRand::new_seed(seed),
            None => WyRand::new(),
        };
        MatrixGenerator { rng }
    }

    pub fn generate(&mut self, dim: usize) -> Result<TrialMatrices> {
        let a = Matrix::random(dim, &mut self.rng)?;
        let b = Matrix::random(dim, &mut self.rng)?;
        let c = Matrix::zeroed(dim)?;
        log::trace!("generated {dim}x{dim} inputs");
        Ok(TrialMatrices { a, b, c })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zeroed_has_n_squared_zeros() {
        let m = Matrix::zeroed(5).unwrap();
        assert_eq!(m.dim(), 5);
        assert_eq!(m.as_slice().len(), 25);
        assert!(m.as_slice().iter().all(|&x| x == 0.0));
    }

    #[test]
    fn zero_dimension_is_rejected() {
        assert!(matches!(Matrix::zeroed(0), Err(Error::InvalidDimension(0))));
    }

    #[test]
    fn oversized_dimension_is_rejected() {
        assert!(matches!(
            Matrix::zeroed(MAX_DIMENSION + 1),
            Err(Error::InvalidDimension(65537))
        ));
    }

    #[test]
    fn generator_fills_inputs_and_zeroes_output() {
        let mut generator = MatrixGenerator::new(Some(7));
        let m = generator.generate(8).unwrap();
        assert_eq!(m.a.as_slice().len(), 64);
        assert_eq!(m.b.as_slice().len(), 64);
        assert!(m.a.as_slice().iter().any(|&x| x != 0.0));
        assert!(m.b.as_slice().iter().any(|&x| x != 0.0));
        assert!(m.c.as_slice().iter().all(|&x| x == 0.0));
        assert_ne!(m.a, m.b);
    }

    #[test]
    fn seeded_generators_agree() {
        let x = MatrixGenerator::new(Some(42)).generate(4).unwrap();
        let y = MatrixGenerator::new(Some(42)).generate(4).unwrap();
        assert_eq!(x.a, y.a);
        assert_eq!(x.b, y.b);
    }

    #[test]
    fn from_vec_checks_length() {
        assert!(Matrix::from_vec(2, vec![1.0, 2.0, 3.0]).is_none());
        let m = Matrix::from_vec(2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(m[(1, 0)], 3.0);
        assert_eq!(m.get(0, 1), Some(2.0));
        assert_eq!(m.get(2, 0), None);
    }
}
