//! Simulation entry points.
//!
//! Every operation comes in two forms: a structured one returning typed
//! results, and a text one (`simulate_set_time`, `simulate_multi_trajectory_time`,
//! `simulate_der_range`, `simulate_exp_range`) that formats those results with
//! the sample protocol for external callers.
//!
//! Batch operations simulate each (mode, point) pair independently. With
//! `SimOptions::parallel` the pairs run on the rayon pool; results always come
//! back in input order.

use hy_automaton::HybridAutomaton;
use hy_core::{HyperRectangle, Real};
use rayon::prelude::*;
use tracing::{debug_span, trace, warn};

use crate::error::{SimError, SimResult};
use crate::protocol::{self, SAMPLE_DELIM, TRAJECTORY_DELIM};
use crate::sim::{FailurePolicy, RangeSampling, Sample, SimOptions, SimRecord};
use crate::trajectory::Trajectory;

/// Simulate every (mode, point) pair to `time` and return the final samples.
///
/// The outer error covers malformed arguments; per-pair failures are
/// reported in their slot.
pub fn simulate_points_to_time<S, P>(
    automaton: &HybridAutomaton,
    mode_names: &[S],
    points: &[P],
    time: Real,
    opts: &SimOptions,
) -> SimResult<Vec<SimResult<Sample>>>
where
    S: AsRef<str> + Sync,
    P: AsRef<[Real]> + Sync,
{
    let _span = debug_span!("simulate_points_to_time", pairs = points.len(), time).entered();
    opts.validate()?;
    check_pairs(mode_names.len(), points.len())?;
    check_horizon(time)?;

    Ok(run_pairs(opts, points.len(), |i| {
        let mut trajectory =
            Trajectory::start(automaton, mode_names[i].as_ref(), points[i].as_ref(), opts)?;
        trajectory.advance_to(time, opts.dt, |_| Ok(()))?;
        Ok(trajectory.sample())
    }))
}

/// Batch fixed-time simulation: `mode,coord_0,...` per pair, joined by `;`.
pub fn simulate_set_time<S, P>(
    automaton: &HybridAutomaton,
    mode_names: &[S],
    points: &[P],
    time: Real,
    opts: &SimOptions,
) -> SimResult<String>
where
    S: AsRef<str> + Sync,
    P: AsRef<[Real]> + Sync,
{
    let results = simulate_points_to_time(automaton, mode_names, points, time, opts)?;
    let groups = render_outcomes(results, opts.failure_policy, |s| {
        protocol::format_sample(&s.mode, &s.state)
    })?;
    Ok(groups.join(SAMPLE_DELIM))
}

/// Simulate every corner of `rect` from `mode_name` to `time`.
///
/// Output is positional in the corner order of [`HyperRectangle::star`].
pub fn simulate_star_to_time(
    automaton: &HybridAutomaton,
    mode_name: &str,
    rect: &HyperRectangle,
    time: Real,
    opts: &SimOptions,
) -> SimResult<String> {
    let corners = rect.star()?;
    let mode_names = vec![mode_name; corners.len()];
    simulate_set_time(automaton, &mode_names, &corners, time, opts)
}

/// Record every sample of each trajectory up to `time`.
///
/// The step is shrunk so that each trajectory takes at least `min_steps`
/// steps; together with the initial sample that is more than `min_steps`
/// samples per trajectory.
pub fn simulate_trajectories<S, P>(
    automaton: &HybridAutomaton,
    mode_names: &[S],
    points: &[P],
    time: Real,
    min_steps: usize,
    opts: &SimOptions,
) -> SimResult<Vec<SimResult<SimRecord>>>
where
    S: AsRef<str> + Sync,
    P: AsRef<[Real]> + Sync,
{
    let _span = debug_span!(
        "simulate_trajectories",
        pairs = points.len(),
        time,
        min_steps
    )
    .entered();
    opts.validate()?;
    check_pairs(mode_names.len(), points.len())?;
    check_horizon(time)?;
    if time == 0.0 {
        return Err(SimError::InvalidArg {
            what: "trajectory sampling needs a positive time",
        });
    }

    let max_dt = if min_steps > 0 {
        opts.dt.min(time / min_steps as Real)
    } else {
        opts.dt
    };

    Ok(run_pairs(opts, points.len(), |i| {
        let mut trajectory =
            Trajectory::start(automaton, mode_names[i].as_ref(), points[i].as_ref(), opts)?;
        let mut samples = vec![trajectory.sample()];
        trajectory.advance_to(time, max_dt, |t| {
            samples.push(t.sample());
            Ok(())
        })?;
        Ok(SimRecord { samples })
    }))
}

/// Multi-trajectory time sampling: one `|`-joined segment per trajectory,
/// each a `;`-joined list of `mode,coord_0,...` samples.
pub fn simulate_multi_trajectory_time<S, P>(
    automaton: &HybridAutomaton,
    mode_names: &[S],
    points: &[P],
    time: Real,
    min_steps: usize,
    opts: &SimOptions,
) -> SimResult<String>
where
    S: AsRef<str> + Sync,
    P: AsRef<[Real]> + Sync,
{
    let results = simulate_trajectories(automaton, mode_names, points, time, min_steps, opts)?;
    let segments = render_outcomes(results, opts.failure_policy, |record| {
        record
            .samples
            .iter()
            .map(|s| protocol::format_sample(&s.mode, &s.state))
            .collect::<Vec<_>>()
            .join(SAMPLE_DELIM)
    })?;
    Ok(segments.join(TRAJECTORY_DELIM))
}

/// Sample one component of the active mode's derivative over each window.
///
/// One continuous trajectory is integrated from `point` at time zero; each
/// window yields a pair per `SimOptions::range_sampling`.
pub fn simulate_derivative_ranges(
    automaton: &HybridAutomaton,
    dimension: usize,
    mode_name: &str,
    point: &[Real],
    intervals: &[(Real, Real)],
    opts: &SimOptions,
) -> SimResult<Vec<(Real, Real)>> {
    let _span = debug_span!("simulate_derivative_ranges", dimension, mode_name).entered();
    if dimension >= point.len() {
        return Err(SimError::InvalidArg {
            what: "derivative dimension is out of range",
        });
    }
    sample_ranges(automaton, mode_name, point, intervals, opts, |t| {
        Ok(t.derivative()?[dimension])
    })
}

/// Derivative-range sampling: `start,end` per window, joined by `;`.
pub fn simulate_der_range(
    automaton: &HybridAutomaton,
    dimension: usize,
    mode_name: &str,
    point: &[Real],
    intervals: &[(Real, Real)],
    opts: &SimOptions,
) -> SimResult<String> {
    let ranges =
        simulate_derivative_ranges(automaton, dimension, mode_name, point, intervals, opts)?;
    Ok(format_ranges(&ranges))
}

/// Sample a scalar function of the state over each window.
pub fn simulate_expression_ranges<E>(
    automaton: &HybridAutomaton,
    expression: E,
    mode_name: &str,
    point: &[Real],
    intervals: &[(Real, Real)],
    opts: &SimOptions,
) -> SimResult<Vec<(Real, Real)>>
where
    E: Fn(&[Real]) -> Real,
{
    let _span = debug_span!("simulate_expression_ranges", mode_name).entered();
    sample_ranges(automaton, mode_name, point, intervals, opts, |t| {
        let value = expression(t.state());
        if value.is_finite() {
            Ok(value)
        } else {
            Err(SimError::Diverged {
                mode: t.mode().name().to_string(),
                time: t.time(),
            })
        }
    })
}

/// Expression-range sampling: `start,end` per window, joined by `;`.
pub fn simulate_exp_range<E>(
    automaton: &HybridAutomaton,
    expression: E,
    mode_name: &str,
    point: &[Real],
    intervals: &[(Real, Real)],
    opts: &SimOptions,
) -> SimResult<String>
where
    E: Fn(&[Real]) -> Real,
{
    let ranges =
        simulate_expression_ranges(automaton, expression, mode_name, point, intervals, opts)?;
    Ok(format_ranges(&ranges))
}

fn check_pairs(modes: usize, points: usize) -> SimResult<()> {
    if modes != points {
        return Err(SimError::InvalidArg {
            what: "mode names and points must have the same length",
        });
    }
    Ok(())
}

fn check_horizon(time: Real) -> SimResult<()> {
    if !(time.is_finite() && time >= 0.0) {
        return Err(SimError::InvalidArg {
            what: "time must be finite and non-negative",
        });
    }
    Ok(())
}

/// Windows must be finite, non-negative, ordered, with non-decreasing starts.
fn check_intervals(intervals: &[(Real, Real)]) -> SimResult<()> {
    let mut last_start = 0.0;
    for &(start, end) in intervals {
        if !(start.is_finite() && end.is_finite()) || start < 0.0 || start > end {
            return Err(SimError::InvalidArg {
                what: "time intervals must be finite with 0 <= start <= end",
            });
        }
        if start < last_start {
            return Err(SimError::InvalidArg {
                what: "time interval start times must be non-decreasing",
            });
        }
        last_start = start;
    }
    Ok(())
}

fn run_pairs<T, F>(opts: &SimOptions, n: usize, simulate_one: F) -> Vec<SimResult<T>>
where
    T: Send,
    F: Fn(usize) -> SimResult<T> + Sync + Send,
{
    if opts.parallel {
        (0..n).into_par_iter().map(&simulate_one).collect()
    } else {
        (0..n).map(simulate_one).collect()
    }
}

fn render_outcomes<T>(
    results: Vec<SimResult<T>>,
    policy: FailurePolicy,
    render: impl Fn(&T) -> String,
) -> SimResult<Vec<String>> {
    results
        .into_iter()
        .enumerate()
        .map(|(index, result)| match result {
            Ok(value) => Ok(render(&value)),
            Err(err) => match policy {
                FailurePolicy::FailFast => Err(err),
                FailurePolicy::Isolate => {
                    warn!(index, error = %err, "trajectory failed");
                    Ok(protocol::format_failure(&err))
                }
            },
        })
        .collect()
}

/// Integrate once through every window boundary and summarize each window.
fn sample_ranges<Q>(
    automaton: &HybridAutomaton,
    mode_name: &str,
    point: &[Real],
    intervals: &[(Real, Real)],
    opts: &SimOptions,
    quantity: Q,
) -> SimResult<Vec<(Real, Real)>>
where
    Q: Fn(&Trajectory<'_>) -> SimResult<Real>,
{
    opts.validate()?;
    check_intervals(intervals)?;

    let mut checkpoints: Vec<Real> = intervals.iter().flat_map(|&(s, e)| [s, e]).collect();
    checkpoints.sort_by(Real::total_cmp);
    checkpoints.dedup();

    let mut trajectory = Trajectory::start(automaton, mode_name, point, opts)?;
    // (time, value) at the start and after every step; times strictly increase
    let mut samples = vec![(trajectory.time(), quantity(&trajectory)?)];
    for &checkpoint in &checkpoints {
        trajectory.advance_to(checkpoint, opts.dt, |t| {
            let value = quantity(t)?;
            trace!(time = t.time(), mode = t.mode().name(), value, "range sample");
            samples.push((t.time(), value));
            Ok(())
        })?;
    }

    intervals
        .iter()
        .map(|&(start, end)| match opts.range_sampling {
            RangeSampling::Endpoints => Ok((value_at(&samples, start)?, value_at(&samples, end)?)),
            RangeSampling::Envelope => Ok(envelope(&samples, start, end)),
        })
        .collect()
}

fn value_at(samples: &[(Real, Real)], time: Real) -> SimResult<Real> {
    let idx = samples.partition_point(|&(t, _)| t < time);
    match samples.get(idx) {
        Some(&(t, value)) if t == time => Ok(value),
        _ => Err(SimError::InvalidArg {
            what: "no trajectory sample at the requested time",
        }),
    }
}

fn envelope(samples: &[(Real, Real)], start: Real, end: Real) -> (Real, Real) {
    samples
        .iter()
        .filter(|&&(t, _)| start <= t && t <= end)
        .fold((Real::INFINITY, Real::NEG_INFINITY), |(lo, hi), &(_, v)| {
            (lo.min(v), hi.max(v))
        })
}

fn format_ranges(ranges: &[(Real, Real)]) -> String {
    ranges
        .iter()
        .map(|&(start, end)| protocol::format_pair(start, end))
        .collect::<Vec<_>>()
        .join(SAMPLE_DELIM)
}
