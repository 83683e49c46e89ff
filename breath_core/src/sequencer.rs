//! Phase topology of a breathing cycle.
//!
//! `inhale -> [hold] -> exhale -> [rest]`, where the bracketed phases are
//! skipped when the technique gives them zero seconds. The sequencer knows
//! nothing about cycles; reaching the end of one is reported as `None`.

use crate::{BreathingTechnique, Phase, PhaseStep};

/// The phase that follows `current`, or `None` at a cycle boundary
pub fn next_phase(current: Phase, technique: &BreathingTechnique) -> Option<PhaseStep> {
    let next = match current {
        Phase::Inhale if technique.hold > 0 => Phase::Hold,
        Phase::Inhale | Phase::Hold => Phase::Exhale,
        Phase::Exhale if technique.rest > 0 => Phase::Rest,
        Phase::Exhale | Phase::Rest => return None,
    };

    Some(PhaseStep {
        phase: next,
        duration_seconds: technique.duration_of(next),
    })
}

/// Every phase of one cycle in order, with durations
pub fn cycle_plan(technique: &BreathingTechnique) -> Vec<PhaseStep> {
    let mut plan = vec![PhaseStep {
        phase: Phase::Inhale,
        duration_seconds: technique.inhale,
    }];
    let mut current = Phase::Inhale;
    while let Some(step) = next_phase(current, technique) {
        current = step.phase;
        plan.push(step);
    }
    plan
}
