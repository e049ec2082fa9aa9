use std::collections::BTreeMap;

use rand::seq::index;
use rand::Rng;
use rand_distr::{Distribution, Geometric, Poisson};

use super::arena::{Genealogy, NodeId};
use super::segments::SegmentSet;
use crate::base::{Genome, SeedSource, SimRng};
use crate::errors::{ConfigError, SimulationError};
use crate::evolution::{SubstitutionModel, TransferModel};
use crate::simulation::CoalescentParams;

/// How a backtrace ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BacktraceOutcome {
    /// Every site reached its most recent common ancestor.
    Complete { generations: u64 },
    /// The generation cap was hit; the remaining lineages became independent roots.
    Partial {
        generations: u64,
        remaining_lineages: usize,
    },
}

impl BacktraceOutcome {
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete { .. })
    }

    /// Generations traced backward.
    pub fn generations(&self) -> u64 {
        match *self {
            Self::Complete { generations } | Self::Partial { generations, .. } => generations,
        }
    }
}

/// A sampled lineage during the backtrace.
#[derive(Debug, Clone)]
struct Lineage {
    node: NodeId,
    /// Sites of this ancestor that are still ancestral to the sample
    segments: SegmentSet,
}

/// Coalescent simulator for one sample.
#[derive(Debug, Clone)]
pub struct CoalescentSimulation {
    params: CoalescentParams,
    substitution: SubstitutionModel,
    transfer: TransferModel,
    /// Per-lineage per-generation probability of an incoming transfer
    transfer_probability: f64,
    rng: SimRng,
    genealogy: Option<Genealogy>,
}

impl CoalescentSimulation {
    /// Create a coalescent simulation seeded from `seed`, or from entropy if `None`.
    pub fn new(params: CoalescentParams, seed: Option<u64>) -> Result<Self, ConfigError> {
        Self::with_rng(params, SeedSource::new(seed).master())
    }

    pub fn with_rng(params: CoalescentParams, rng: SimRng) -> Result<Self, ConfigError> {
        params.validate()?;
        let substitution = params.population.substitution_model()?;
        let transfer = params.population.transfer_model()?;
        let transfer_probability = transfer.event_probability(params.population.genome_length);
        Ok(Self {
            params,
            substitution,
            transfer,
            transfer_probability,
            rng,
            genealogy: None,
        })
    }

    pub fn params(&self) -> &CoalescentParams {
        &self.params
    }

    /// The genealogy of the last backtrace, until `fortrace` consumes it.
    pub fn genealogy(&self) -> Option<&Genealogy> {
        self.genealogy.as_ref()
    }

    /// Trace the sample's ancestry backward in time.
    ///
    /// Generations without events are skipped with a geometric wait; each
    /// event generation then applies a zero-truncated Poisson number of
    /// coalescences and transfers drawn from the current rates.
    /// Any genealogy left from a previous backtrace is replaced.
    pub fn backtrace(&mut self) -> BacktraceOutcome {
        let population = &self.params.population;
        let length = population.genome_length;
        let samples = self.params.sample_size;
        let cap = self.params.cap();
        let rng = &mut self.rng;

        let mut genealogy = Genealogy::with_samples(samples);
        let mut lineages: Vec<Lineage> = (0..samples)
            .map(|i| Lineage {
                node: NodeId(i as u32),
                segments: SegmentSet::full(length),
            })
            .collect();
        // Number of active lineages carrying each site
        let mut carriers: Vec<u32> = vec![samples as u32; length];

        let pair_hazard = hazard(1.0 / population.population_size as f64);
        let lineage_hazard = hazard(self.transfer_probability);
        let mut time = 0u64;
        let (mut coalescences, mut transfers) = (0usize, 0usize);

        while lineages.len() >= 2 {
            let (coalescence_rate, transfer_rate) =
                event_rates(lineages.len(), pair_hazard, lineage_hazard);
            let total_rate = coalescence_rate + transfer_rate;
            let p_event = -(-total_rate).exp_m1();

            // Generations without any event, then the event generation itself
            let wait = Geometric::new(p_event).map_or(u64::MAX, |g| g.sample(rng));
            time = time.saturating_add(wait).saturating_add(1);
            if time > cap {
                log::warn!(
                    "Coalescent hit the generation cap ({cap}) with {} lineages left; \
                     treating them as independent roots",
                    lineages.len()
                );
                let remaining = lineages.len();
                for lineage in lineages {
                    genealogy.mark_unresolved(lineage.node, lineage.segments);
                }
                log::debug!(
                    "Backtrace stopped: {coalescences} coalescences, {transfers} transfers"
                );
                self.genealogy = Some(genealogy);
                return BacktraceOutcome::Partial {
                    generations: cap,
                    remaining_lineages: remaining,
                };
            }

            // Every event of this generation happens at the same time
            for _ in 0..events_in_generation(total_rate, rng) {
                if lineages.len() < 2 {
                    break;
                }
                let (coalescence_rate, transfer_rate) =
                    event_rates(lineages.len(), pair_hazard, lineage_hazard);

                if rng.random::<f64>() * (coalescence_rate + transfer_rate) < coalescence_rate {
                    coalescences += 1;
                    let picked = index::sample(rng, lineages.len(), 2);
                    let (lo, hi) = {
                        let (a, b) = (picked.index(0), picked.index(1));
                        (a.min(b), a.max(b))
                    };
                    let second = lineages.swap_remove(hi);
                    let first = lineages.swap_remove(lo);

                    let parent = genealogy.add_node(time);
                    genealogy.add_edges(parent, first.node, &first.segments);
                    genealogy.add_edges(parent, second.node, &second.segments);

                    // Sites left with a single carrier have found their MRCA
                    let overlap = first.segments.intersect(&second.segments);
                    let resolved =
                        SegmentSet::from_sorted_sites(overlap.sites().filter(|&site| {
                            carriers[site] -= 1;
                            carriers[site] == 1
                        }));
                    let merged = first.segments.union(&second.segments).subtract(&resolved);
                    if !merged.is_empty() {
                        lineages.push(Lineage {
                            node: parent,
                            segments: merged,
                        });
                    }
                } else {
                    let target = rng.random_range(0..lineages.len());
                    let start = rng.random_range(0..length);
                    let window = SegmentSet::window(start, self.transfer.fragment(), length);
                    let lineage = &lineages[target];
                    let inside = lineage.segments.intersect(&window);
                    // A window that misses or covers all material leaves one ancestor
                    if inside.is_empty() || inside == lineage.segments {
                        continue;
                    }
                    transfers += 1;
                    let outside = lineage.segments.subtract(&window);
                    let child = lineage.node;

                    let parent = genealogy.add_node(time);
                    let donor = genealogy.add_node(time);
                    genealogy.add_edges(parent, child, &outside);
                    genealogy.add_edges(donor, child, &inside);

                    lineages[target] = Lineage {
                        node: parent,
                        segments: outside,
                    };
                    lineages.push(Lineage {
                        node: donor,
                        segments: inside,
                    });
                }
            }
        }

        log::debug!(
            "Backtrace complete after {time} generations: {coalescences} coalescences, \
             {transfers} transfers, {} nodes",
            genealogy.nodes().len()
        );
        self.genealogy = Some(genealogy);
        BacktraceOutcome::Complete { generations: time }
    }

    /// Replay the recorded genealogy forward and return the sampled genomes.
    ///
    /// The genealogy is consumed; call `backtrace` again for a new sample.
    pub fn fortrace(&mut self) -> Result<Vec<Genome>, SimulationError> {
        let genealogy = self.genealogy.take().ok_or(SimulationError::NotBacktraced)?;
        let population = &self.params.population;
        let alphabet = population.alphabet;
        let mu = self.substitution.rate();
        let samples = self.params.sample_size;
        let rng = &mut self.rng;

        let ancestral = Genome::random(population.genome_length, alphabet, rng);
        let ancestral_states = ancestral.as_slice();

        // Per-node states stored as differences from the ancestral genome
        let mut deltas: Vec<BTreeMap<usize, u8>> = vec![BTreeMap::new(); genealogy.nodes().len()];

        for root in genealogy.unresolved() {
            let node_deltas = &mut deltas[root.node.index()];
            for site in root.segments.sites() {
                let state = alphabet.random_state(rng);
                if state != ancestral_states[site] {
                    node_deltas.insert(site, state);
                }
            }
        }

        // Edges are grouped by parent in ascending id order, so walking them
        // backward finishes every parent before any of its children is read.
        let mut current: Option<NodeId> = None;
        for edge in genealogy.edges().iter().rev() {
            if current != Some(edge.parent) {
                if let Some(done) = current.filter(|id| id.index() >= samples) {
                    deltas[done.index()] = BTreeMap::new();
                }
                current = Some(edge.parent);
            }

            let (lower, upper) = deltas.split_at_mut(edge.parent.index());
            let parent_deltas = &upper[0];
            let child_deltas = &mut lower[edge.child.index()];
            child_deltas.extend(
                parent_deltas
                    .range(edge.start..edge.end)
                    .map(|(&site, &state)| (site, state)),
            );

            let duration = genealogy
                .node(edge.parent)
                .time
                .saturating_sub(genealogy.node(edge.child).time);
            let lambda = mu * duration as f64 * (edge.end - edge.start) as f64;
            for _ in 0..poisson_hits(lambda, rng) {
                let site = rng.random_range(edge.start..edge.end);
                let state = child_deltas
                    .get(&site)
                    .copied()
                    .unwrap_or(ancestral_states[site]);
                let next = self.substitution.substitute(state, rng);
                if next == ancestral_states[site] {
                    child_deltas.remove(&site);
                } else {
                    child_deltas.insert(site, next);
                }
            }
        }

        Ok(deltas
            .iter()
            .take(samples)
            .map(|node_deltas| {
                let mut genome = ancestral.clone();
                let states = genome.as_mut_slice();
                for (&site, &state) in node_deltas {
                    states[site] = state;
                }
                genome
            })
            .collect())
    }

    /// Backtrace then fortrace.
    pub fn run(&mut self) -> Result<(BacktraceOutcome, Vec<Genome>), SimulationError> {
        let outcome = self.backtrace();
        let genomes = self.fortrace()?;
        Ok((outcome, genomes))
    }
}

/// Largest per-generation hazard of a single pair or lineage, used when the
/// event is certain (N = 1 or a transfer probability of one).
const MAX_HAZARD: f64 = 64.0;

/// Hazard `-ln(1 - p)` of an event with per-generation probability `p`.
fn hazard(p: f64) -> f64 {
    if p >= 1.0 {
        MAX_HAZARD
    } else {
        (-(-p).ln_1p()).min(MAX_HAZARD)
    }
}

/// Expected coalescences and transfers per generation among `k` lineages.
fn event_rates(k: usize, pair_hazard: f64, lineage_hazard: f64) -> (f64, f64) {
    let k = k as f64;
    (k * (k - 1.0) / 2.0 * pair_hazard, k * lineage_hazard)
}

/// Number of events in a generation known to hold at least one:
/// Poisson(`rate`) conditioned on being positive.
fn events_in_generation<R: Rng + ?Sized>(rate: f64, rng: &mut R) -> u64 {
    if rate >= 1.0 {
        return match Poisson::new(rate) {
            Ok(poisson) => loop {
                let n = poisson.sample(rng) as u64;
                if n > 0 {
                    break n;
                }
            },
            Err(_) => 1,
        };
    }
    // Inversion over rate^n / (n! (e^rate - 1)), n >= 1
    let u: f64 = rng.random();
    let mut n = 1u64;
    let mut term = rate / rate.exp_m1();
    let mut cumulative = term;
    while u > cumulative && term > f64::EPSILON {
        n += 1;
        term *= rate / n as f64;
        cumulative += term;
    }
    n
}

fn poisson_hits<R: Rng + ?Sized>(lambda: f64, rng: &mut R) -> u64 {
    if lambda <= 0.0 || !lambda.is_finite() {
        return 0;
    }
    Poisson::new(lambda).map_or(0, |p| p.sample(rng) as u64)
}
