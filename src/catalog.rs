//! Demo data provider
//!
//! Stands in for a remote satellite/arc catalog: a fixed set of showcase
//! arcs plus a small satellite fleet that keeps mutating - new launches at
//! random positions, periodic rearrangement into a ring formation, then a
//! scatter back to random orbits. Fully deterministic under a seed.

use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::geo::{ArcSpec, GeoPoint};
use crate::rgb8;
use crate::sim::SatelliteSpec;

/// Arc/satellite accent palette
const COLORS: [[f32; 4]; 3] = [
    rgb8(0x06, 0xb6, 0xd4),
    rgb8(0x3b, 0x82, 0xf6),
    rgb8(0x63, 0x66, 0xf1),
];

/// Frames between fleet mutations
const MUTATION_INTERVAL: u32 = 180;
/// Fleet size at which launches stop and the formation cycle begins
const FLEET_SIZE: usize = 12;
/// Mutations spent holding each of formation/scattered before flipping
const HOLD_CYCLES: u32 = 3;

/// Ring formation parameters: one orbital plane's worth of evenly spaced
/// slots at a shared latitude and altitude
const FORMATION_LAT: f64 = 20.0;
const FORMATION_ALT: f64 = 0.08;

#[derive(Debug, Clone, Copy, PartialEq)]
enum FleetPhase {
    Launching,
    Formation,
    Scattered,
}

/// Mutating demo fleet plus static showcase arcs
pub struct Catalog {
    rng: Pcg32,
    satellites: Vec<SatelliteSpec>,
    phase: FleetPhase,
    frames: u32,
    holds: u32,
}

impl Catalog {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            satellites: Vec::new(),
            phase: FleetPhase::Launching,
            frames: 0,
            holds: 0,
        }
    }

    /// The showcase connection arcs (fixed endpoints, random accent colors)
    pub fn sample_arcs(&mut self) -> Vec<ArcSpec> {
        let routes = [
            // Belo Horizonte -> Rio de Janeiro
            (GeoPoint::new(-19.885592, -43.951191), GeoPoint::new(-22.9068, -43.1729), 0.1),
            // New Delhi -> Kuala Lumpur
            (GeoPoint::new(28.6139, 77.209), GeoPoint::new(3.139, 101.6869), 0.2),
            // London -> New York
            (GeoPoint::new(51.5072, -0.1276), GeoPoint::new(40.7128, -74.006), 0.3),
        ];

        routes
            .into_iter()
            .map(|(start, end, altitude)| ArcSpec {
                start,
                end,
                altitude,
                color: COLORS[self.rng.random_range(0..COLORS.len())],
            })
            .collect()
    }

    /// Current fleet contents
    pub fn satellites(&self) -> &[SatelliteSpec] {
        &self.satellites
    }

    /// Advance one frame; returns true when the fleet changed this frame
    pub fn tick(&mut self) -> bool {
        self.frames += 1;
        if self.frames % MUTATION_INTERVAL != 0 {
            return false;
        }
        self.mutate();
        true
    }

    fn mutate(&mut self) {
        match self.phase {
            FleetPhase::Launching => {
                self.launch();
                if self.satellites.len() >= FLEET_SIZE {
                    self.phase = FleetPhase::Scattered;
                    self.holds = 0;
                }
            }
            FleetPhase::Scattered => {
                self.holds += 1;
                if self.holds >= HOLD_CYCLES {
                    self.form_ring();
                    self.phase = FleetPhase::Formation;
                    self.holds = 0;
                } else {
                    // Nudge one satellite to a new orbit while loitering
                    self.reassign_one();
                }
            }
            FleetPhase::Formation => {
                self.holds += 1;
                if self.holds >= HOLD_CYCLES {
                    self.scatter();
                    self.phase = FleetPhase::Scattered;
                    self.holds = 0;
                }
            }
        }
    }

    fn random_spec(&mut self, index: usize) -> SatelliteSpec {
        SatelliteSpec {
            id: format!("sat-{index}"),
            lat: self.rng.random_range(-60.0..60.0),
            lng: self.rng.random_range(-180.0..180.0),
            alt: self.rng.random_range(0.03..0.12),
            color: COLORS[self.rng.random_range(0..COLORS.len())],
        }
    }

    fn launch(&mut self) {
        let spec = self.random_spec(self.satellites.len());
        log::info!("launching {} at ({:.1}, {:.1})", spec.id, spec.lat, spec.lng);
        self.satellites.push(spec);
    }

    fn reassign_one(&mut self) {
        if self.satellites.is_empty() {
            return;
        }
        let index = self.rng.random_range(0..self.satellites.len());
        let replacement = self.random_spec(index);
        self.satellites[index] = replacement;
    }

    /// Snap every satellite onto evenly spaced longitudes of one ring
    fn form_ring(&mut self) {
        let n = self.satellites.len();
        if n == 0 {
            return;
        }
        log::info!("fleet forming ring of {n}");
        let step = 360.0 / n as f64;
        for (i, sat) in self.satellites.iter_mut().enumerate() {
            sat.lat = FORMATION_LAT;
            sat.lng = -180.0 + step * i as f64;
            sat.alt = FORMATION_ALT;
        }
    }

    fn scatter(&mut self) {
        log::info!("fleet scattering");
        for i in 0..self.satellites.len() {
            self.satellites[i] = self.random_spec(i);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_mutations(catalog: &mut Catalog, count: u32) {
        let mut done = 0;
        while done < count {
            if catalog.tick() {
                done += 1;
            }
        }
    }

    #[test]
    fn test_fleet_changes_only_on_cadence() {
        let mut catalog = Catalog::new(1);
        let mut changes = 0;
        for _ in 0..(MUTATION_INTERVAL * 3) {
            if catalog.tick() {
                changes += 1;
            }
        }
        assert_eq!(changes, 3);
    }

    #[test]
    fn test_launch_phase_grows_fleet() {
        let mut catalog = Catalog::new(1);
        run_mutations(&mut catalog, FLEET_SIZE as u32);
        assert_eq!(catalog.satellites().len(), FLEET_SIZE);
    }

    #[test]
    fn test_formation_spaces_longitudes_evenly() {
        let mut catalog = Catalog::new(1);
        // Launch everything, loiter, then reach the formation flip
        run_mutations(&mut catalog, FLEET_SIZE as u32 + HOLD_CYCLES);
        assert_eq!(catalog.phase, FleetPhase::Formation);

        let sats = catalog.satellites();
        let step = 360.0 / sats.len() as f64;
        for (i, sat) in sats.iter().enumerate() {
            assert_eq!(sat.lat, FORMATION_LAT);
            assert_eq!(sat.alt, FORMATION_ALT);
            assert!((sat.lng - (-180.0 + step * i as f64)).abs() < 1e-12);
        }
    }

    #[test]
    fn test_scatter_leaves_formation() {
        let mut catalog = Catalog::new(1);
        run_mutations(&mut catalog, FLEET_SIZE as u32 + HOLD_CYCLES * 2);
        assert_eq!(catalog.phase, FleetPhase::Scattered);
        let off_ring = catalog
            .satellites()
            .iter()
            .filter(|s| s.lat != FORMATION_LAT)
            .count();
        assert!(off_ring > 0);
    }

    #[test]
    fn test_deterministic_under_seed() {
        let run = |seed| {
            let mut catalog = Catalog::new(seed);
            run_mutations(&mut catalog, 20);
            catalog.satellites().to_vec()
        };
        assert_eq!(run(99), run(99));
    }

    #[test]
    fn test_sample_arcs_use_palette() {
        let mut catalog = Catalog::new(1);
        let arcs = catalog.sample_arcs();
        assert_eq!(arcs.len(), 3);
        for arc in &arcs {
            assert!(COLORS.contains(&arc.color));
            assert!(arc.altitude > 0.0);
        }
    }
}
