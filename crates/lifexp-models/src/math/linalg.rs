use ndarray::{Array1, Array2};

/// Eigenvalues whose ratio to the largest one falls below this are treated as zero.
const EIGEN_RCOND: f64 = 1e-12;
const MAX_SWEEPS: usize = 100;

/// Eigendecomposition of a symmetric matrix by cyclic Jacobi rotations.
///
/// Returns `(eigenvalues, eigenvectors)` with eigenvectors stored as columns.
/// Only the upper triangle's symmetry is assumed, not checked.
pub fn symmetric_eigen(a: &Array2<f64>) -> (Array1<f64>, Array2<f64>) {
    let n = a.nrows();
    let mut m = a.clone();
    let mut v = Array2::<f64>::eye(n);

    for _ in 0..MAX_SWEEPS {
        let off: f64 = (0..n)
            .flat_map(|p| (p + 1..n).map(move |q| (p, q)))
            .map(|(p, q)| m[(p, q)] * m[(p, q)])
            .sum();
        let scale: f64 = m.iter().map(|x| x * x).sum();
        if off <= f64::EPSILON * f64::EPSILON * scale || off == 0.0 {
            break;
        }

        for p in 0..n {
            for q in p + 1..n {
                let apq = m[(p, q)];
                if apq == 0.0 {
                    continue;
                }
                let theta = (m[(q, q)] - m[(p, p)]) / (2.0 * apq);
                let t = theta.signum() / (theta.abs() + (theta * theta + 1.0).sqrt());
                let c = 1.0 / (t * t + 1.0).sqrt();
                let s = t * c;

                for k in 0..n {
                    let mkp = m[(k, p)];
                    let mkq = m[(k, q)];
                    m[(k, p)] = c * mkp - s * mkq;
                    m[(k, q)] = s * mkp + c * mkq;
                }
                for k in 0..n {
                    let mpk = m[(p, k)];
                    let mqk = m[(q, k)];
                    m[(p, k)] = c * mpk - s * mqk;
                    m[(q, k)] = s * mpk + c * mqk;
                }
                for k in 0..n {
                    let vkp = v[(k, p)];
                    let vkq = v[(k, q)];
                    v[(k, p)] = c * vkp - s * vkq;
                    v[(k, q)] = s * vkp + c * vkq;
                }
            }
        }
    }

    (m.diag().to_owned(), v)
}

/// Minimum-norm solution of `a x = b` for symmetric positive semi-definite `a`.
///
/// Uses the Moore-Penrose pseudo-inverse, so rank-deficient systems
/// (e.g. a Gram matrix from fewer samples than features) still resolve.
pub fn pinv_solve_symmetric(a: &Array2<f64>, b: &Array1<f64>) -> Array1<f64> {
    let (eigenvalues, eigenvectors) = symmetric_eigen(a);
    let max_eig = eigenvalues.iter().fold(0.0f64, |acc, &x| acc.max(x.abs()));
    let cutoff = max_eig * EIGEN_RCOND;

    let mut x = Array1::<f64>::zeros(b.len());
    for (k, &lambda) in eigenvalues.iter().enumerate() {
        if lambda.abs() <= cutoff || lambda == 0.0 {
            continue;
        }
        let vk = eigenvectors.column(k);
        let coeff = vk.dot(b) / lambda;
        x.scaled_add(coeff, &vk);
    }
    x
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn eigen_reconstructs_matrix() {
        let a = array![[4.0, 1.0, 0.5], [1.0, 3.0, 0.2], [0.5, 0.2, 2.0]];
        let (w, v) = symmetric_eigen(&a);
        let rebuilt = v.dot(&Array2::from_diag(&w)).dot(&v.t());
        for (x, y) in rebuilt.iter().zip(a.iter()) {
            assert!((x - y).abs() < 1e-10);
        }
    }

    #[test]
    fn solves_full_rank_system() {
        let a = array![[2.0, 1.0], [1.0, 3.0]];
        let b = array![3.0, 5.0];
        let x = pinv_solve_symmetric(&a, &b);
        assert!((x[0] - 0.8).abs() < 1e-12);
        assert!((x[1] - 1.4).abs() < 1e-12);
    }

    #[test]
    fn rank_deficient_system_gives_minimum_norm_solution() {
        // a = d d^T with d = (1, 2); b = d * 5
        let a = array![[1.0, 2.0], [2.0, 4.0]];
        let b = array![5.0, 10.0];
        let x = pinv_solve_symmetric(&a, &b);
        // minimum-norm x is parallel to d with d.x = 5
        assert!((x[0] - 1.0).abs() < 1e-10);
        assert!((x[1] - 2.0).abs() < 1e-10);
    }
}
