use crate::*;

/// Tuning knobs for the whole optimization run. The defaults reproduce the
/// reference schedule; the grid steps trade placement quality for running
/// time and are deliberately exposed rather than buried as constants.
#[derive(Debug, Clone, Builder)]
pub struct AnnealConfig {
    #[builder(default = 5000.0)]
    pub initial_temp: float,
    #[builder(default = 0.1)]
    pub final_temp: float,
    #[builder(default = 0.97)]
    pub cooling_rate: float,
    #[builder(default = 100)]
    pub iterations_per_temp: usize,
    /// Candidate grid step for quadrant placement.
    #[builder(default = 10.0)]
    pub quadrant_grid_step: float,
    /// Grid step used when relocating blocks displaced by corner snapping.
    #[builder(default = 50.0)]
    pub resolve_grid_step: float,
    /// Grid step of the density-maximizing packing pass.
    #[builder(default = 20.0)]
    pub density_grid_step: float,
    /// Seed of the run's random generator; fixed seed, fixed result.
    #[builder(default = 0)]
    pub seed: u64,
    #[builder(default)]
    pub weights: CostWeights,
    /// Hides the cooling progress bar.
    #[builder(default = true)]
    pub quiet: bool,
}
impl Default for AnnealConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}
impl AnnealConfig {
    /// Number of outer cooling steps the schedule will take.
    pub fn cooling_steps(&self) -> u64 {
        if self.initial_temp <= self.final_temp {
            return 0;
        }
        ((self.final_temp / self.initial_temp).ln() / self.cooling_rate.ln()).ceil() as u64
    }
}

/// Classic geometric-cooling simulated annealing over whole-plan states.
///
/// Candidates carrying any overlap are rejected outright before costing:
/// overlap is never an acceptable transition, whatever the temperature.
/// Everything else follows the Metropolis rule, and the best plan ever
/// accepted is tracked and returned.
#[time]
pub fn anneal(
    initial: FloorPlan,
    max_aspect_ratio: float,
    config: &AnnealConfig,
    rng: &mut StdRng,
) -> FloorPlan {
    let mut current = initial;
    let mut current_cost = calculate_cost(&mut current, max_aspect_ratio, &config.weights);
    let mut best = current.clone();
    let mut best_cost = current_cost;

    let pbar = ProgressBar::new(config.cooling_steps());
    pbar.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos:>4}/{len:4} {msg}",
        )
        .unwrap()
        .progress_chars("##-"),
    );
    if config.quiet {
        pbar.set_draw_target(ProgressDrawTarget::hidden());
    }

    let mut temperature = config.initial_temp;
    while temperature > config.final_temp {
        for _ in 0..config.iterations_per_temp {
            let mut candidate = generate_neighbor(&current, rng);
            if candidate.has_overlaps() {
                continue;
            }
            let candidate_cost = calculate_cost(&mut candidate, max_aspect_ratio, &config.weights);
            let delta = candidate_cost - current_cost;
            if delta < 0.0 || rng.gen::<float>() < (-delta / temperature).exp() {
                current = candidate;
                current_cost = candidate_cost;
                if current_cost < best_cost {
                    best = current.clone();
                    best_cost = current_cost;
                }
            }
        }
        temperature *= config.cooling_rate;
        pbar.inc(1);
    }
    pbar.finish_and_clear();
    debug!("annealing done, best cost {:.1}", best_cost);
    best
}
