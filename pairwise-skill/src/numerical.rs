/// Hard cap on root-finder iterations. Well-conditioned Glicko-2 brackets converge in
/// a few dozen steps; anything past this means the objective is producing NaNs.
const MAX_ITERATIONS: usize = 10_000;

pub fn logistic(z: f64) -> f64 {
    (1. + (-z).exp()).recip()
}

/// Illinois variant of regula falsi, in the form Glickman gives for the Glicko-2
/// volatility step. `a` and `b` must bracket the root, i.e. `f(a) * f(b) <= 0`.
/// The endpoint `a` is always the one retained, and is returned once `|b - a| <= epsilon`.
pub fn solve_illinois((mut a, mut b): (f64, f64), epsilon: f64, f: impl Fn(f64) -> f64) -> f64 {
    let (mut fa, mut fb) = (f(a), f(b));
    for _ in 0..MAX_ITERATIONS {
        if (b - a).abs() <= epsilon {
            return a;
        }
        let c = a + (a - b) * fa / (fb - fa);
        let fc = f(c);
        // An exact zero at c must collapse the bracket, hence <= rather than <
        if fc * fb <= 0. {
            a = b;
            fa = fb;
        } else {
            fa *= 0.5;
        }
        b = c;
        fb = fc;
    }
    tracing::warn!(
        "Possible failure to converge @ {}: f(a)={}, bracket width={}",
        a,
        fa,
        (b - a).abs()
    );
    a
}

/// Walks down from `start` in steps of `step` until `f` becomes non-negative,
/// returning the first such point. Used to find the lower end of a bracket when
/// no closed form is available.
pub fn search_downward(start: f64, step: f64, f: impl Fn(f64) -> f64) -> f64 {
    let mut k = 1.;
    for _ in 0..MAX_ITERATIONS {
        let x = start - k * step;
        if f(x) >= 0. {
            return x;
        }
        k += 1.;
    }
    tracing::warn!("Downward bracket search from {} did not terminate", start);
    start - k * step
}
