use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const EPSILON: f64 = 1e-12;

/// Disjoint-arm LinUCB. Each arm keeps the inverse of its regularized design
/// matrix (maintained directly via Sherman-Morrison, so no matrix inversion
/// ever happens) and the reward-weighted context sum `b`.
pub struct LinUcb {
    dim: usize,
    alpha: f64,
    a_inv: Vec<Vec<Vec<f64>>>,
    b: Vec<Vec<f64>>,
    rng: StdRng,
}

impl LinUcb {
    pub fn new(n_arms: usize, dim: usize, alpha: f64, seed: u64) -> Self {
        LinUcb {
            dim,
            alpha,
            a_inv: (0..n_arms).map(|_| identity(dim)).collect(),
            b: vec![vec![0.0; dim]; n_arms],
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn n_arms(&self) -> usize {
        self.a_inv.len()
    }

    /// UCB scores: theta_a . x + alpha * sqrt(x^T A_inv_a x). Ties (strict
    /// float equality) are broken uniformly at random.
    pub fn select(&mut self, x: &[f64]) -> usize {
        debug_assert_eq!(x.len(), self.dim);
        let scores: Vec<f64> = (0..self.n_arms())
            .map(|arm| {
                let theta = mat_vec(&self.a_inv[arm], &self.b[arm]);
                let exploit = dot(&theta, x);
                let explore = self.alpha * quad(&self.a_inv[arm], x).max(EPSILON).sqrt();
                exploit + explore
            })
            .collect();
        let max_score = scores.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let best: Vec<usize> = scores
            .iter()
            .enumerate()
            .filter(|(_, score)| **score == max_score)
            .map(|(arm, _)| arm)
            .collect();
        best[self.rng.gen_range(0..best.len())]
    }

    pub fn update(&mut self, arm: usize, x: &[f64], reward: f64) {
        debug_assert_eq!(x.len(), self.dim);
        let a_inv = &mut self.a_inv[arm];
        // Sherman-Morrison: A_inv -= (A_inv x)(A_inv x)^T / (1 + x^T A_inv x)
        let a_inv_x = mat_vec(a_inv, x);
        let denom = (1.0 + dot(x, &a_inv_x)).max(EPSILON);
        for i in 0..self.dim {
            for j in 0..self.dim {
                a_inv[i][j] -= (a_inv_x[i] * a_inv_x[j]) / denom;
            }
        }
        for i in 0..self.dim {
            self.b[arm][i] += reward * x[i];
        }
    }

    #[cfg(test)]
    fn a_inv(&self, arm: usize) -> &Vec<Vec<f64>> {
        &self.a_inv[arm]
    }
}

fn identity(n: usize) -> Vec<Vec<f64>> {
    (0..n)
        .map(|i| (0..n).map(|j| if i == j { 1.0 } else { 0.0 }).collect())
        .collect()
}

fn mat_vec(matrix: &[Vec<f64>], v: &[f64]) -> Vec<f64> {
    matrix.iter().map(|row| dot(row, v)).collect()
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

fn quad(matrix: &[Vec<f64>], x: &[f64]) -> f64 {
    dot(x, &mat_vec(matrix, x))
}
