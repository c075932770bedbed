// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use std::fmt;

use crate::candidate::CandidateList;
use crate::error::Error;
use crate::random::RandomSource;
use crate::random::XorShift64;
use crate::resource::ResourceVector;
use crate::select::Selector;
use crate::select::Solution;
use crate::select::ensure_not_empty;

const DEFAULT_ALPHA: f64 = 0.5;
const DEFAULT_INITIAL_TEMPERATURE: f64 = 1000.0;
const DEFAULT_COOLING_RATE: f64 = 0.995;
const DEFAULT_MIN_TEMPERATURE: f64 = 1e-3;
const DEFAULT_MAX_ITERATIONS: u64 = 100_000;

/// How the annealer picks its starting candidate in every range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InitialPolicy {
    /// The lowest-error candidate.
    First,
    /// The candidate in the middle of the sorted list.
    Middle,
    /// The highest-error candidate.
    Last,
    /// A uniformly random candidate.
    Random,
}

impl InitialPolicy {
    /// Every policy.
    pub const ALL: [InitialPolicy; 4] = [
        InitialPolicy::First,
        InitialPolicy::Middle,
        InitialPolicy::Last,
        InitialPolicy::Random,
    ];

    fn pick<R: RandomSource>(self, len: usize, rng: &mut R) -> usize {
        match self {
            InitialPolicy::First => 0,
            InitialPolicy::Middle => len / 2,
            InitialPolicy::Last => len - 1,
            InitialPolicy::Random => rng.next_index(len),
        }
    }

    /// Short name.
    pub fn name(self) -> &'static str {
        match self {
            InitialPolicy::First => "first",
            InitialPolicy::Middle => "middle",
            InitialPolicy::Last => "last",
            InitialPolicy::Random => "random",
        }
    }
}

impl fmt::Display for InitialPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Objective minimized by the annealer.
///
/// `cost = alpha * total_error + (1 - alpha) * weighted_usage(total_cost, budget)`, or
/// infinity when `total_cost` exceeds the budget in any component. See
/// [`ResourceVector::weighted_usage`] for the resource term.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostModel {
    alpha: f64,
    budget: ResourceVector,
}

impl CostModel {
    /// Creates a cost model.
    pub fn new(alpha: f64, budget: ResourceVector) -> Self {
        Self { alpha, budget }
    }

    /// Cost of an assignment with the given error and resource totals.
    pub fn cost(&self, total_error: f64, total_cost: &ResourceVector) -> f64 {
        if !total_cost.fits_within(&self.budget) {
            return f64::INFINITY;
        }
        self.alpha * total_error + (1.0 - self.alpha) * total_cost.weighted_usage(&self.budget)
    }

    /// Cost of a solution.
    pub fn solution_cost(&self, solution: &Solution) -> f64 {
        self.cost(solution.total_error(), &solution.total_cost())
    }

    fn assignment_cost(&self, lists: &[CandidateList], assignment: &[usize]) -> f64 {
        let mut error = 0.0;
        let mut cost = ResourceVector::ZERO;
        for (list, index) in lists.iter().zip(assignment) {
            let candidate = &list.candidates()[*index];
            error += candidate.error();
            cost += candidate.cost();
        }
        self.cost(error, &cost)
    }
}

/// Simulated annealing over one-candidate-per-range assignments.
///
/// Each step re-draws the candidate of one random range. Improvements are always accepted and
/// a worsening by `delta` is accepted with probability `exp(-delta / temperature)`. The
/// temperature is multiplied by the cooling rate after every step; the search stops when it
/// falls to the minimum temperature or the iteration cap is reached, and returns the best
/// assignment seen.
///
/// # Examples
///
/// ```
/// use histcomposer::select::InitialPolicy;
/// use histcomposer::select::SimulatedAnnealing;
///
/// let annealer = SimulatedAnnealing::builder()
///     .alpha(0.7)
///     .initial_policy(InitialPolicy::Middle)
///     .seed(42)
///     .build()
///     .unwrap();
/// assert_eq!(annealer.initial_policy(), InitialPolicy::Middle);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatedAnnealing {
    alpha: f64,
    initial_temperature: f64,
    cooling_rate: f64,
    min_temperature: f64,
    max_iterations: u64,
    initial_policy: InitialPolicy,
    seed: Option<u64>,
}

impl Default for SimulatedAnnealing {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
            initial_temperature: DEFAULT_INITIAL_TEMPERATURE,
            cooling_rate: DEFAULT_COOLING_RATE,
            min_temperature: DEFAULT_MIN_TEMPERATURE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            initial_policy: InitialPolicy::First,
            seed: None,
        }
    }
}

impl SimulatedAnnealing {
    /// Returns a builder with the default schedule.
    pub fn builder() -> SimulatedAnnealingBuilder {
        SimulatedAnnealingBuilder::default()
    }

    /// Weight of the error term.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Starting temperature.
    pub fn initial_temperature(&self) -> f64 {
        self.initial_temperature
    }

    /// Per-step temperature multiplier.
    pub fn cooling_rate(&self) -> f64 {
        self.cooling_rate
    }

    /// Temperature at which the search stops.
    pub fn min_temperature(&self) -> f64 {
        self.min_temperature
    }

    /// Iteration cap.
    pub fn max_iterations(&self) -> u64 {
        self.max_iterations
    }

    /// Starting policy.
    pub fn initial_policy(&self) -> InitialPolicy {
        self.initial_policy
    }

    /// The cost model this annealer minimizes against `budget`.
    pub fn cost_model(&self, budget: &ResourceVector) -> CostModel {
        CostModel::new(self.alpha, *budget)
    }

    /// Runs the search with an explicit random source.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::ConfigInvalid`](crate::error::ErrorKind::ConfigInvalid) if `lists`
    /// is empty, and [`ErrorKind::Infeasible`](crate::error::ErrorKind::Infeasible) if some
    /// range has no candidate or no assignment seen fits the budget.
    pub fn anneal<R: RandomSource>(
        &self,
        lists: &[CandidateList],
        budget: &ResourceVector,
        rng: &mut R,
    ) -> Result<Solution, Error> {
        ensure_not_empty(lists)?;
        if let Some(index) = lists.iter().position(CandidateList::is_empty) {
            return Err(Error::infeasible("range has no candidate within the budget")
                .with_context("range_index", index)
                .with_context("range", lists[index].range()));
        }

        let model = self.cost_model(budget);
        let mut current: Vec<usize> = lists
            .iter()
            .map(|list| self.initial_policy.pick(list.len(), rng))
            .collect();
        let mut current_cost = model.assignment_cost(lists, &current);
        let mut best = current.clone();
        let mut best_cost = current_cost;

        let mut temperature = self.initial_temperature;
        let mut iteration = 0;
        while temperature > self.min_temperature && iteration < self.max_iterations {
            iteration += 1;

            let range_index = rng.next_index(lists.len());
            let previous = current[range_index];
            current[range_index] = rng.next_index(lists[range_index].len());

            let new_cost = model.assignment_cost(lists, &current);
            if new_cost < current_cost
                || rng.next_f64() < ((current_cost - new_cost) / temperature).exp()
            {
                current_cost = new_cost;
                if new_cost < best_cost {
                    best.copy_from_slice(&current);
                    best_cost = new_cost;
                }
            } else {
                current[range_index] = previous;
            }

            temperature *= self.cooling_rate;
        }

        tracing::debug!(
            policy = %self.initial_policy,
            iterations = iteration,
            best_cost,
            "annealing finished"
        );

        if best_cost.is_infinite() {
            return Err(Error::infeasible("no assignment within the budget was found")
                .with_context("iterations", iteration)
                .with_context("budget", budget));
        }
        let chosen = lists
            .iter()
            .zip(&best)
            .map(|(list, index)| list.candidates()[*index].clone())
            .collect();
        Ok(Solution::new(chosen))
    }
}

impl Selector for SimulatedAnnealing {
    fn select(&self, lists: &[CandidateList], budget: &ResourceVector) -> Result<Solution, Error> {
        let mut rng = match self.seed {
            Some(seed) => XorShift64::seeded(seed),
            None => XorShift64::default(),
        };
        self.anneal(lists, budget, &mut rng)
    }

    fn name(&self) -> String {
        format!("simulated-annealing-{}", self.initial_policy)
    }
}

/// Builder for [`SimulatedAnnealing`].
#[derive(Debug, Clone, Default)]
pub struct SimulatedAnnealingBuilder {
    config: SimulatedAnnealing,
}

impl SimulatedAnnealingBuilder {
    /// Weight of the error term, in `[0, 1]`; the resource term gets `1 - alpha`.
    pub fn alpha(mut self, alpha: f64) -> Self {
        self.config.alpha = alpha;
        self
    }

    /// Starting temperature; must be positive.
    pub fn initial_temperature(mut self, temperature: f64) -> Self {
        self.config.initial_temperature = temperature;
        self
    }

    /// Per-step temperature multiplier, in `(0, 1)`.
    pub fn cooling_rate(mut self, rate: f64) -> Self {
        self.config.cooling_rate = rate;
        self
    }

    /// Temperature at which the search stops; must not be negative.
    pub fn min_temperature(mut self, temperature: f64) -> Self {
        self.config.min_temperature = temperature;
        self
    }

    /// Iteration cap.
    pub fn max_iterations(mut self, iterations: u64) -> Self {
        self.config.max_iterations = iterations;
        self
    }

    /// Starting policy.
    pub fn initial_policy(mut self, policy: InitialPolicy) -> Self {
        self.config.initial_policy = policy;
        self
    }

    /// Seeds the random source; unseeded annealers draw a seed from the clock.
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Validates the schedule and builds the annealer.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::ConfigInvalid`](crate::error::ErrorKind::ConfigInvalid) if a
    /// parameter is out of its documented range.
    pub fn build(self) -> Result<SimulatedAnnealing, Error> {
        let config = self.config;
        if !(0.0..=1.0).contains(&config.alpha) {
            return Err(Error::config_invalid("alpha must be in [0, 1]")
                .with_context("alpha", config.alpha));
        }
        if !(config.initial_temperature.is_finite() && config.initial_temperature > 0.0) {
            return Err(Error::config_invalid("initial temperature must be positive")
                .with_context("initial_temperature", config.initial_temperature));
        }
        if !(config.cooling_rate > 0.0 && config.cooling_rate < 1.0) {
            return Err(Error::config_invalid("cooling rate must be in (0, 1)")
                .with_context("cooling_rate", config.cooling_rate));
        }
        if config.min_temperature.is_nan() || config.min_temperature < 0.0 {
            return Err(Error::config_invalid("minimum temperature must not be negative")
                .with_context("min_temperature", config.min_temperature));
        }
        Ok(config)
    }
}
