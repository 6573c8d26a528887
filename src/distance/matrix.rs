//! Dense distance matrix.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A dense n×n distance matrix stored in row-major order.
///
/// Entries are finite and non-negative, the diagonal is zero, and the matrix
/// need not be symmetric.
///
/// # Examples
///
/// ```
/// use u_cvrp::distance::DistanceMatrix;
///
/// let dm = DistanceMatrix::from_rows(vec![
///     vec![0.0, 5.0, 8.0],
///     vec![5.0, 0.0, 3.0],
///     vec![8.0, 4.0, 0.0],
/// ])
/// .unwrap();
/// assert_eq!(dm.size(), 3);
/// assert_eq!(dm.get(2, 1), 4.0);
/// assert!(!dm.is_symmetric(1e-10));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistanceMatrix {
    data: Vec<f64>,
    size: usize,
}

impl DistanceMatrix {
    /// Creates a distance matrix of the given size, initialized to zero.
    pub fn new(size: usize) -> Self {
        Self {
            data: vec![0.0; size * size],
            size,
        }
    }

    /// Creates a distance matrix from explicit rows.
    ///
    /// Fails if the rows are empty or ragged, if any entry is negative or
    /// non-finite, or if a diagonal entry is not zero.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, ValidationError> {
        let size = rows.len();
        if size == 0 {
            return Err(ValidationError::EmptyMatrix);
        }

        let mut data = Vec::with_capacity(size * size);
        for (from, row) in rows.into_iter().enumerate() {
            if row.len() != size {
                return Err(ValidationError::RaggedMatrix {
                    row: from,
                    expected: size,
                    found: row.len(),
                });
            }
            data.extend(row);
        }

        let matrix = Self { data, size };
        matrix.validate()?;
        Ok(matrix)
    }

    /// Checks the entries of a matrix built with [`new`](Self::new) and
    /// [`set`](Self::set) or deserialized.
    ///
    /// Fails if the matrix is empty or its storage does not hold `size²`
    /// entries, if any entry is negative or non-finite, or if a diagonal
    /// entry is not zero. [`Problem`](crate::models::Problem) runs this on
    /// every matrix it is given.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_cvrp::distance::DistanceMatrix;
    /// use u_cvrp::error::ValidationError;
    ///
    /// let mut dm = DistanceMatrix::new(2);
    /// dm.set(0, 1, 3.0);
    /// assert!(dm.validate().is_ok());
    ///
    /// dm.set(1, 0, -1.0);
    /// assert!(matches!(
    ///     dm.validate(),
    ///     Err(ValidationError::InvalidDistance { from: 1, to: 0, .. })
    /// ));
    /// ```
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.size == 0 {
            return Err(ValidationError::EmptyMatrix);
        }
        if self.data.len() != self.size * self.size {
            return Err(ValidationError::MatrixSize {
                size: self.size,
                found: self.data.len(),
            });
        }
        for (index, &value) in self.data.iter().enumerate() {
            let (from, to) = (index / self.size, index % self.size);
            if !value.is_finite() || value < 0.0 {
                return Err(ValidationError::InvalidDistance { from, to, value });
            }
            if from == to && value != 0.0 {
                return Err(ValidationError::NonZeroDiagonal { node: from, value });
            }
        }
        Ok(())
    }

    /// Returns the distance from location `from` to location `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    #[inline]
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.data[from * self.size + to]
    }

    /// Sets the distance from location `from` to location `to`.
    ///
    /// Entries are not checked here; see [`validate`](Self::validate).
    pub fn set(&mut self, from: usize, to: usize, distance: f64) {
        self.data[from * self.size + to] = distance;
    }

    /// Number of locations in this matrix.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns `true` if the matrix is symmetric within the given tolerance.
    pub fn is_symmetric(&self, tol: f64) -> bool {
        for i in 0..self.size {
            for j in (i + 1)..self.size {
                if (self.get(i, j) - self.get(j, i)).abs() > tol {
                    return false;
                }
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_rows() -> Vec<Vec<f64>> {
        vec![
            vec![0.0, 5.0, 8.0],
            vec![5.0, 0.0, 3.0],
            vec![8.0, 3.0, 0.0],
        ]
    }

    #[test]
    fn test_from_rows() {
        let dm = DistanceMatrix::from_rows(sample_rows()).expect("valid");
        assert_eq!(dm.size(), 3);
        assert_eq!(dm.get(0, 1), 5.0);
        assert_eq!(dm.get(2, 0), 8.0);
        assert!(dm.is_symmetric(1e-10));
    }

    #[test]
    fn test_from_rows_empty() {
        assert_eq!(
            DistanceMatrix::from_rows(vec![]),
            Err(ValidationError::EmptyMatrix)
        );
    }

    #[test]
    fn test_from_rows_ragged() {
        let mut rows = sample_rows();
        rows[1].pop();
        assert_eq!(
            DistanceMatrix::from_rows(rows),
            Err(ValidationError::RaggedMatrix {
                row: 1,
                expected: 3,
                found: 2
            })
        );
    }

    #[test]
    fn test_from_rows_negative() {
        let mut rows = sample_rows();
        rows[0][2] = -1.0;
        assert!(matches!(
            DistanceMatrix::from_rows(rows),
            Err(ValidationError::InvalidDistance { from: 0, to: 2, .. })
        ));
    }

    #[test]
    fn test_from_rows_nan() {
        let mut rows = sample_rows();
        rows[2][1] = f64::NAN;
        assert!(matches!(
            DistanceMatrix::from_rows(rows),
            Err(ValidationError::InvalidDistance { from: 2, to: 1, .. })
        ));
    }

    #[test]
    fn test_from_rows_diagonal() {
        let mut rows = sample_rows();
        rows[1][1] = 2.0;
        assert_eq!(
            DistanceMatrix::from_rows(rows),
            Err(ValidationError::NonZeroDiagonal {
                node: 1,
                value: 2.0
            })
        );
    }

    #[test]
    fn test_set_get() {
        let mut dm = DistanceMatrix::new(3);
        dm.set(0, 1, 42.0);
        assert_eq!(dm.get(0, 1), 42.0);
        assert_eq!(dm.get(1, 0), 0.0);
    }

    #[test]
    fn test_validate_set_entries() {
        let mut dm = DistanceMatrix::new(3);
        dm.set(0, 1, 4.0);
        assert_eq!(dm.validate(), Ok(()));

        dm.set(2, 2, 7.0);
        assert_eq!(
            dm.validate(),
            Err(ValidationError::NonZeroDiagonal {
                node: 2,
                value: 7.0
            })
        );

        dm.set(2, 2, 0.0);
        dm.set(1, 2, f64::NAN);
        assert!(matches!(
            dm.validate(),
            Err(ValidationError::InvalidDistance { from: 1, to: 2, .. })
        ));
    }

    #[test]
    fn test_validate_deserialized_storage() {
        let dm: DistanceMatrix =
            serde_json::from_str(r#"{ "data": [0.0, 1.0, 1.0], "size": 2 }"#).expect("json");
        assert_eq!(
            dm.validate(),
            Err(ValidationError::MatrixSize { size: 2, found: 3 })
        );
        assert_eq!(
            DistanceMatrix::new(0).validate(),
            Err(ValidationError::EmptyMatrix)
        );
    }

    #[test]
    fn test_asymmetric_matrix() {
        let mut dm = DistanceMatrix::new(2);
        dm.set(0, 1, 10.0);
        dm.set(1, 0, 15.0);
        assert!(!dm.is_symmetric(1e-10));
    }
}
