//! Phase state machine and the side effects applied on every committed transition.

use nightfall_core::{Ambience, CursorContext, Event, Phase, PlayerAbility};

/// Authoritative holder of the global phase and the affordances that follow it.
#[derive(Clone, Debug)]
pub(crate) struct PhaseMachine {
    phase: Phase,
    ambience: Ambience,
    ability: PlayerAbility,
    cursor: CursorContext,
    time_scale: f32,
    night_mode: bool,
    night_markers: Vec<String>,
}

impl PhaseMachine {
    pub(crate) fn new() -> Self {
        Self {
            phase: Phase::None,
            ambience: Ambience::Day,
            ability: PlayerAbility::Digging,
            cursor: CursorContext::Default,
            time_scale: 1.0,
            night_mode: false,
            night_markers: Vec::new(),
        }
    }

    /// Commits `next` and emits the transition side effects.
    ///
    /// Returns `false` without emitting anything when `next` is already active.
    pub(crate) fn transition(&mut self, next: Phase, out_events: &mut Vec<Event>) -> bool {
        if next == self.phase {
            return false;
        }

        if !next.suppresses_world_transition() {
            let ambience = Ambience::for_phase(next);
            if ambience != self.ambience {
                self.ambience = ambience;
                out_events.push(Event::WorldRethemed { ambience });
            }
        }

        let from = self.phase;
        self.phase = next;
        out_events.push(Event::PhaseChanged { from, to: next });

        if next == Phase::Digging {
            self.set_ability(PlayerAbility::Digging, out_events);
        }

        let cursor = next.cursor();
        if cursor != self.cursor {
            self.cursor = cursor;
            out_events.push(Event::CursorChanged { cursor });
        }

        if let Some(scale) = next.time_scale() {
            if scale.to_bits() != self.time_scale.to_bits() {
                self.time_scale = scale;
                out_events.push(Event::TimeScaleChanged { scale });
            }
        }

        let night_mode = next == Phase::Night;
        if night_mode != self.night_mode {
            self.night_mode = night_mode;
            if !self.night_markers.is_empty() {
                out_events.push(Event::NightModeChanged {
                    enabled: night_mode,
                    markers: self.night_markers.len(),
                });
            }
        }

        true
    }

    pub(crate) fn set_ability(&mut self, ability: PlayerAbility, out_events: &mut Vec<Event>) {
        if ability == self.ability {
            return;
        }
        self.ability = ability;
        out_events.push(Event::AbilityChanged { ability });
    }

    pub(crate) fn register_marker(&mut self, name: String) {
        self.night_markers.push(name);
    }

    pub(crate) const fn phase(&self) -> Phase {
        self.phase
    }

    pub(crate) const fn ambience(&self) -> Ambience {
        self.ambience
    }

    pub(crate) const fn ability(&self) -> PlayerAbility {
        self.ability
    }

    pub(crate) const fn cursor(&self) -> CursorContext {
        self.cursor
    }

    pub(crate) const fn time_scale(&self) -> f32 {
        self.time_scale
    }

    pub(crate) const fn night_mode(&self) -> bool {
        self.night_mode
    }

    pub(crate) fn night_markers(&self) -> &[String] {
        &self.night_markers
    }
}
