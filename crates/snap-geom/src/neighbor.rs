//! Directional neighbor-screen search.
//!
//! Rays are cast from the centre of the current screen at every integer
//! degree (0 is east, angles grow counter-clockwise in desktop space). Each
//! ray is credited to the nearest other screen it enters, which yields an
//! angular range per neighbor. A requested arc then selects the neighbor whose
//! range overlaps it most.
//!
//! Ties on the nearest hit go to the screen with the closer centre, then to
//! the earlier screen in provider order. Screens with identical centres are
//! therefore resolved by provider order.

use std::collections::HashMap;

use tracing::trace;

use crate::{
    geom::Rect,
    screen::{Screen, ScreenProvider},
};

/// Number of sampled directions.
const DEGREES: u16 = 360;

/// Entry distance of a ray into `r`, if it hits.
fn ray_entry(ox: f64, oy: f64, dx: f64, dy: f64, r: &Rect) -> Option<f64> {
    let mut t_min = f64::NEG_INFINITY;
    let mut t_max = f64::INFINITY;
    for (o, d, lo, hi) in [(ox, dx, r.min_x(), r.max_x()), (oy, dy, r.min_y(), r.max_y())] {
        if d.abs() < 1e-12 {
            if o < lo || o > hi {
                return None;
            }
            continue;
        }
        let t1 = (lo - o) / d;
        let t2 = (hi - o) / d;
        t_min = t_min.max(t1.min(t2));
        t_max = t_max.min(t1.max(t2));
    }
    if t_max < t_min || t_max < 0.0 {
        return None;
    }
    Some(t_min.max(0.0))
}

fn center_distance(a: &Rect, b: &Rect) -> f64 {
    (a.cx() - b.cx()).hypot(a.cy() - b.cy())
}

/// Angular ranges of every neighbor around one screen.
#[derive(Debug, Clone)]
pub struct NeighborMap<S> {
    origin: S,
    /// Neighbors in provider order with the degrees credited to them.
    ranges: Vec<(S, Vec<u16>)>,
}

impl<S: Screen> NeighborMap<S> {
    /// Sample all directions around `origin`.
    pub fn compute<P>(provider: &P, origin: &S) -> Self
    where
        P: ScreenProvider<Screen = S> + ?Sized,
    {
        let of = origin.frame();
        let (ox, oy) = (of.cx(), of.cy());
        let others: Vec<S> = provider.screens().into_iter().filter(|s| s != origin).collect();

        let mut hits: HashMap<&S, Vec<u16>> = HashMap::new();
        for deg in 0..DEGREES {
            let (dy, dx) = f64::from(deg).to_radians().sin_cos();
            let mut best: Option<(f64, f64, &S)> = None;
            for s in &others {
                let Some(entry) = ray_entry(ox, oy, dx, dy, &s.frame()) else {
                    continue;
                };
                let dist = center_distance(&of, &s.frame());
                let closer = match best {
                    None => true,
                    Some((be, bd, _)) => entry < be || (entry == be && dist < bd),
                };
                if closer {
                    best = Some((entry, dist, s));
                }
            }
            if let Some((_, _, s)) = best {
                hits.entry(s).or_default().push(deg);
            }
        }

        let ranges = others
            .iter()
            .filter_map(|s| hits.get(s).map(|d| (s.clone(), d.clone())))
            .collect();
        Self {
            origin: origin.clone(),
            ranges,
        }
    }

    /// The screen the search started from.
    pub fn origin(&self) -> &S {
        &self.origin
    }

    /// Degrees credited to `screen`.
    pub fn degrees(&self, screen: &S) -> &[u16] {
        self.ranges
            .iter()
            .find(|(s, _)| s == screen)
            .map(|(_, d)| d.as_slice())
            .unwrap_or_default()
    }

    /// The neighbor best matching the arc from `a` to `b` degrees.
    ///
    /// The arc runs counter-clockwise and wraps at 360; equal endpoints select
    /// a single direction.
    pub fn select(&self, a: f64, b: f64) -> Option<S> {
        let arc = arc_degrees(a, b);
        let of = self.origin.frame();
        let mut best: Option<(usize, usize, f64, &S)> = None;
        for (s, degrees) in &self.ranges {
            let overlap = degrees.iter().filter(|d| arc[usize::from(**d)]).count();
            if overlap == 0 {
                continue;
            }
            let dist = center_distance(&of, &s.frame());
            let better = match best {
                None => true,
                Some((bo, bt, bd, _)) => {
                    (overlap, degrees.len()) > (bo, bt)
                        || ((overlap, degrees.len()) == (bo, bt) && dist < bd)
                }
            };
            if better {
                best = Some((overlap, degrees.len(), dist, s));
            }
        }
        trace!(
            origin = %self.origin.name(),
            a, b,
            target = ?best.map(|(_, _, _, s)| s.name()),
            "neighbor_select"
        );
        best.map(|(_, _, _, s)| s.clone())
    }
}

fn normalize(deg: f64) -> usize {
    // Truncation is safe: the value is in 0..360 after rem_euclid.
    let d = deg.round().rem_euclid(f64::from(DEGREES));
    (d as usize) % usize::from(DEGREES)
}

/// Membership table for the arc from `a` to `b`.
fn arc_degrees(a: f64, b: f64) -> [bool; DEGREES as usize] {
    let mut arc = [false; DEGREES as usize];
    if a.is_nan() || b.is_nan() {
        return arc;
    }
    let start = normalize(a);
    let end = normalize(b);
    let mut d = start;
    loop {
        arc[d] = true;
        if d == end {
            break;
        }
        d = (d + 1) % usize::from(DEGREES);
    }
    arc
}

/// Neighbor of `origin` in the direction arc `a..=b`.
pub fn neighbor_screen<P>(provider: &P, origin: &P::Screen, a: f64, b: f64) -> Option<P::Screen>
where
    P: ScreenProvider + ?Sized,
{
    NeighborMap::compute(provider, origin).select(a, b)
}
