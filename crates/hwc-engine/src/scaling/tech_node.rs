//! Technology-node scaling.
//!
//! Reference data: A. Stillmaker, B. Baas, "Scaling equations for the
//! accurate prediction of CMOS device performance from 180nm to 7nm",
//! Integration 58 (2017) 74-81. Nodes are in meters.

/// Reference nodes, largest first.
pub const TECH_NODES: [f64; 10] = [
    130e-9, 90e-9, 65e-9, 45e-9, 32e-9, 20e-9, 16e-9, 14e-9, 10e-9, 7e-9,
];

/// `AREA_SCALING[x][y]` multiplies area when moving from node `x` to node `y`.
pub const AREA_SCALING: [[f64; 10]; 10] = [
    [1.0, 0.44, 0.23, 0.16, 0.072, 0.033, 0.03, 0.027, 0.016, 0.0092],
    [2.3, 1.0, 0.53, 0.35, 0.16, 0.075, 0.067, 0.061, 0.036, 0.021],
    [4.3, 1.9, 1.0, 0.66, 0.31, 0.14, 0.13, 0.12, 0.068, 0.039],
    [6.4, 2.8, 1.5, 1.0, 0.46, 0.21, 0.19, 0.17, 0.1, 0.059],
    [14.0, 6.1, 3.3, 2.2, 1.0, 0.46, 0.41, 0.38, 0.22, 0.13],
    [30.0, 13.0, 7.1, 4.7, 2.2, 1.0, 0.89, 0.82, 0.48, 0.28],
    [34.0, 15.0, 7.9, 5.3, 2.4, 1.1, 1.0, 0.91, 0.54, 0.31],
    [37.0, 16.0, 8.7, 5.8, 2.7, 1.2, 1.1, 1.0, 0.59, 0.34],
    [63.0, 28.0, 15.0, 9.8, 4.5, 2.1, 1.9, 1.7, 1.0, 0.58],
    [110.0, 48.0, 25.0, 17.0, 7.8, 3.6, 3.2, 2.9, 1.7, 1.0],
];

/// Per-node `(a, b, c)` of the energy polynomial `a*Vdd^2 + b*Vdd + c`.
pub const ENERGY_SCALING: [[f64; 3]; 10] = [
    [7.171, -6.709, 2.904],
    [4.762, -4.781, 2.092],
    [3.755, -4.398, 1.975],
    [1.103, -0.362, 0.2767],
    [0.9559, -0.7823, 0.471],
    [0.373, -0.1582, 0.04104],
    [0.2958, -0.1241, 0.03024],
    [0.2363, -0.09675, 0.02239],
    [0.2068, -0.09311, 0.02375],
    [0.1776, -0.09097, 0.02447],
];

/// Supply voltage assumed when none is given.
pub const DEFAULT_VDD: f64 = 0.8;

/// Energy stops scaling below this node.
const ENERGY_FLOOR_NODE: f64 = 1e-9;

fn largest() -> f64 {
    TECH_NODES[0]
}

fn smallest() -> f64 {
    TECH_NODES[TECH_NODES.len() - 1]
}

/// Clamp `node` into the reference range. The second value is the leftover
/// ratio `node / clamped` (1.0 when no clamping happened).
pub fn constrain(node: f64) -> (f64, f64) {
    if node < smallest() {
        (smallest(), node / smallest())
    } else if node > largest() {
        (largest(), node / largest())
    } else {
        (node, 1.0)
    }
}

/// Fractional index of `node` in [`TECH_NODES`], linearly interpolated
/// between neighbours. `node` must already be constrained.
pub fn node_index(node: f64) -> f64 {
    let mut larger = 0;
    for (i, &t) in TECH_NODES.iter().enumerate() {
        if node <= t {
            larger = i;
        }
        if node >= t {
            if larger == i {
                return i as f64;
            }
            let frac = (TECH_NODES[larger] - node) / (TECH_NODES[larger] - t);
            return larger as f64 + (i - larger) as f64 * frac;
        }
    }
    (TECH_NODES.len() - 1) as f64
}

fn split(index: f64) -> (usize, usize, f64) {
    let lo = index.floor() as usize;
    let hi = index.ceil() as usize;
    (lo, hi, index - index.floor())
}

fn area_table(from_index: f64, to_index: f64) -> f64 {
    let (x0, x1, xf) = split(from_index);
    let (y0, y1, yf) = split(to_index);
    AREA_SCALING[x0][y0] * (1.0 - xf) * (1.0 - yf)
        + AREA_SCALING[x0][y1] * (1.0 - xf) * yf
        + AREA_SCALING[x1][y0] * xf * (1.0 - yf)
        + AREA_SCALING[x1][y1] * xf * yf
}

/// Area multiplier from `from_node` to `to_node`. Clamped remainders scale
/// linearly with the node ratio.
///
/// The bilinear table lookup is normalized by the `from -> from` lookup so
/// that `area(n, n) == 1` between reference nodes too. At reference nodes
/// the normalizer is exactly 1.
pub fn area(to_node: f64, from_node: f64) -> f64 {
    let (from_node, x_rest) = constrain(from_node);
    let (to_node, y_rest) = constrain(to_node);
    let rest = y_rest / x_rest;

    let from_index = node_index(from_node);
    let to_index = node_index(to_node);
    rest * area_table(from_index, to_index) / area_table(from_index, from_index)
}

fn energy_factor(index: f64, vdd: f64) -> f64 {
    let poly = |row: &[f64; 3]| row[0] * vdd * vdd + row[1] * vdd + row[2];
    let (lo, hi, frac) = split(index);
    poly(&ENERGY_SCALING[lo]) * (1.0 - frac) + poly(&ENERGY_SCALING[hi]) * frac
}

/// Energy multiplier from `from_node` to `to_node` at supply voltage `vdd`.
/// Clamped remainders scale with the square root of the node ratio.
pub fn energy(to_node: f64, from_node: f64, vdd: Option<f64>) -> f64 {
    let vdd = vdd.unwrap_or(DEFAULT_VDD);
    let (from_node, x_rest) = constrain(from_node.max(ENERGY_FLOOR_NODE));
    let (to_node, y_rest) = constrain(to_node.max(ENERGY_FLOOR_NODE));
    let rest = (y_rest / x_rest).sqrt();

    let x = energy_factor(node_index(from_node), vdd);
    let y = energy_factor(node_index(to_node), vdd);
    y / x * rest
}

/// Latency multiplier: linear in the node ratio.
pub fn latency(to_node: f64, from_node: f64) -> f64 {
    to_node / from_node
}

/// Leakage follows energy.
pub fn leak(to_node: f64, from_node: f64, vdd: Option<f64>) -> f64 {
    energy(to_node, from_node, vdd)
}
