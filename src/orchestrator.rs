//! Wires inputs into the turn engine and viewport, and queues
//! notifications for the presentation layer.
//!
//! All input handling is serialized on the caller's thread: each handler
//! runs to completion, and operations invalid for the current phase are
//! rejected by the engine rather than queued. Presentation pacing (dice
//! animation delays, focus easing) is the consumer's business; the
//! orchestrator emits target states only.

use std::collections::VecDeque;

use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::config::{CAPTURE_FACE, FOCUS_SCALE};
use crate::game::events::GameEvent;
use crate::game::state::{Outcome, TurnPhase};
use crate::game::turn::{SetupError, TurnEngine};
use crate::map::geometry::{BBox, GeometryProvider, Point};
use crate::map::region::{Player, WorldMap};
use crate::viewport::{Transform, ViewportController, ZoomDirection};

/// Orchestrator construction options.
#[derive(Debug, Clone, Copy)]
pub struct OrchestratorOptions {
    /// Viewport size in screen units.
    pub view_width: f64,
    pub view_height: f64,
    /// Debug mode: every roll is forced to the capture face.
    pub forced_capture_face: bool,
    /// RNG seed; None seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for OrchestratorOptions {
    fn default() -> Self {
        OrchestratorOptions {
            view_width: 600.0,
            view_height: 400.0,
            forced_capture_face: false,
            seed: None,
        }
    }
}

/// Connects the geometry source, turn engine, and viewport, translating
/// raw UI inputs into engine operations and engine results into events.
pub struct GameOrchestrator<G: GeometryProvider> {
    provider: G,
    engine: TurnEngine,
    viewport: ViewportController,
    rng: SmallRng,
    forced_capture_face: bool,
    pan_anchor: Option<Point>,
    events: VecDeque<GameEvent>,
}

impl<G: GeometryProvider> GameOrchestrator<G> {
    /// Builds the world from `ids` and the provider's geometry, assigns
    /// starting regions, and creates the viewport over the content
    /// bounds. Fails only on setup errors (empty map, too few regions).
    pub fn new(
        provider: G,
        ids: &[String],
        options: OrchestratorOptions,
    ) -> Result<Self, SetupError> {
        let world = WorldMap::build(&provider, ids);
        let mut rng = match options.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        let engine = TurnEngine::start(world, &mut rng)?;
        let viewport = ViewportController::new(
            engine.world().content_bounds(),
            options.view_width,
            options.view_height,
        );

        let mut orchestrator = GameOrchestrator {
            provider,
            engine,
            viewport,
            rng,
            forced_capture_face: options.forced_capture_face,
            pan_anchor: None,
            events: VecDeque::new(),
        };
        orchestrator.push_scores();
        orchestrator
            .events
            .push_back(GameEvent::TurnChanged(Player::One));
        orchestrator.push_turn_banner();
        Ok(orchestrator)
    }

    /// The engine, for read-only inspection.
    pub fn engine(&self) -> &TurnEngine {
        &self.engine
    }

    /// The viewport controller, for read-only inspection.
    pub fn viewport(&self) -> &ViewportController {
        &self.viewport
    }

    /// Drains all pending notifications in emission order.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain(..).collect()
    }

    /// Roll-button press.
    pub fn roll_button_pressed(&mut self) {
        let forced = if self.forced_capture_face {
            Some(CAPTURE_FACE)
        } else {
            None
        };
        self.roll(forced);
    }

    /// Rolls the die, optionally with a forced debug value.
    pub fn roll(&mut self, forced: Option<u8>) {
        // Stale highlights from the previous capture phase clear as soon
        // as a new roll starts.
        self.push_clear_highlights();
        match self.engine.roll_dice(&mut self.rng, forced) {
            Ok(value) => {
                self.events.push_back(GameEvent::DiceRolled(value));
                if self.engine.phase() == TurnPhase::CapturePhase {
                    let set = self.engine.highlight_set();
                    self.events.push_back(GameEvent::TerritoryHighlights {
                        available: set.available,
                        unavailable: set.unavailable,
                        capturable: set.capturable,
                    });
                    self.push_status(
                        "Выпала 6! Кликните по СВОБОДНОЙ стране для захвата или завершите ход."
                            .to_string(),
                    );
                } else if value == CAPTURE_FACE {
                    self.push_status("Выпала 6, но нет свободных стран! Завершите ход.".to_string());
                } else {
                    self.push_status(format!("Выпало {}. Завершите ход.", value));
                }
            }
            Err(err) => self.push_status(err.to_string()),
        }
    }

    /// Region click: a capture attempt during the capture phase,
    /// territory info otherwise.
    pub fn region_clicked(&mut self, region: &str) {
        if self.engine.state().is_game_over() {
            return;
        }
        if self.engine.phase() == TurnPhase::CapturePhase {
            self.try_capture(region);
        } else {
            self.push_territory_info(region);
        }
    }

    fn try_capture(&mut self, region: &str) {
        let player = self.engine.current_player();
        match self.engine.attempt_capture(region) {
            Ok(capture) => {
                self.events.push_back(GameEvent::CaptureResult {
                    region: region.to_string(),
                    success: true,
                    reason: None,
                });
                self.push_clear_highlights();
                self.push_scores();
                match capture.previous_owner {
                    Some(prev) => self.push_status(format!(
                        "Игрок {} захватил {} у Игрока {}! Завершите ход.",
                        player, region, prev
                    )),
                    None => self.push_status(format!(
                        "Игрок {} захватил {}! Завершите ход.",
                        player, region
                    )),
                }
                match capture.outcome {
                    Outcome::Ongoing => {}
                    Outcome::Victory { winner, message } => self.push_game_over(Some(winner), message),
                    Outcome::Draw { message, .. } => self.push_game_over(None, message),
                }
            }
            Err(rejection) => {
                self.events.push_back(GameEvent::CaptureResult {
                    region: region.to_string(),
                    success: false,
                    reason: Some(rejection.to_string()),
                });
                self.push_status(
                    "Вы можете захватить только территорию, граничащую с вашими владениями!"
                        .to_string(),
                );
            }
        }
    }

    /// End-turn button press.
    pub fn end_turn_pressed(&mut self) {
        match self.engine.end_turn() {
            Ok(next) => {
                self.push_clear_highlights();
                self.events.push_back(GameEvent::TurnChanged(next));
                self.push_turn_banner();
            }
            Err(err) => self.push_status(err.to_string()),
        }
    }

    /// Wheel gesture at a screen point.
    pub fn wheel(&mut self, x: f64, y: f64, direction: ZoomDirection) {
        let transform = self.viewport.zoom_at(Point::new(x, y), direction);
        self.push_transform(transform);
    }

    /// Pointer press begins a pan session.
    pub fn pointer_down(&mut self, x: f64, y: f64) {
        self.pan_anchor = Some(Point::new(x, y));
    }

    /// Pointer movement pans relative to the previous position.
    pub fn pointer_move(&mut self, x: f64, y: f64) {
        if let Some(anchor) = self.pan_anchor {
            let transform = self.viewport.pan_by(x - anchor.x, y - anchor.y);
            self.pan_anchor = Some(Point::new(x, y));
            self.push_transform(transform);
        }
    }

    /// Pointer release ends the pan session.
    pub fn pointer_up(&mut self) {
        self.pan_anchor = None;
    }

    /// Score-entry click: focus the viewport on the player's start region.
    pub fn score_entry_clicked(&mut self, player: Player) {
        let region = match self.engine.start_region(player) {
            Some(id) => id.to_string(),
            None => return,
        };
        self.focus_region(&region);
    }

    /// Focuses the viewport on a region, falling back to a 1x1 box at a
    /// boundary point when the bounding box is degenerate, and dropping
    /// the request when no geometry is obtainable at all.
    pub fn focus_region(&mut self, region: &str) {
        let bounds = match self.provider.bounding_box(region) {
            Some(b) if !b.is_degenerate() => b,
            _ => match self.provider.boundary_point(region) {
                Some(p) => BBox::new(p.x, p.y, 1.0, 1.0),
                None => {
                    tracing::warn!(region = %region, "focus skipped; no usable geometry");
                    return;
                }
            },
        };
        let transform = self.viewport.focus_on(bounds, FOCUS_SCALE);
        self.push_transform(transform);
    }

    fn push_territory_info(&mut self, region: &str) {
        let player = self.engine.current_player();
        let score = self.engine.state().score_of(player);
        let owner = match self.engine.world().region(region) {
            Some(r) => r.owner,
            None => {
                tracing::warn!(region = %region, "click on unknown region ignored");
                return;
            }
        };
        match owner {
            Some(owner) => self.push_status(format!(
                "Страна {} принадлежит Игроку {}. Ваш счет: {}.",
                region, owner, score
            )),
            None => self.push_status(format!(
                "Страна {} нейтральна. Выбросите 6 для захвата.",
                region
            )),
        }
    }

    fn push_game_over(&mut self, winner: Option<Player>, message: String) {
        self.push_status(format!("=== {} ===", message));
        self.events.push_back(GameEvent::GameOver { winner, message });
    }

    fn push_turn_banner(&mut self) {
        let player = self.engine.current_player();
        self.push_status(format!("Ход Игрока {}. Бросьте кубик!", player));
    }

    fn push_status(&mut self, message: String) {
        self.events.push_back(GameEvent::StatusMessage(message));
    }

    fn push_scores(&mut self) {
        self.events
            .push_back(GameEvent::ScoresChanged(self.engine.state().scoreboard()));
    }

    fn push_clear_highlights(&mut self) {
        self.events.push_back(GameEvent::TerritoryHighlights {
            available: Vec::new(),
            unavailable: Vec::new(),
            capturable: Vec::new(),
        });
    }

    fn push_transform(&mut self, transform: Transform) {
        self.events.push_back(GameEvent::TransformChanged {
            scale: transform.scale,
            translate_x: transform.translate_x,
            translate_y: transform.translate_y,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::loader::MapDef;
    use crate::simulate::grid_map;

    fn orchestrator(seed: u64) -> GameOrchestrator<MapDef> {
        let def = grid_map(5, 4);
        let ids = def.region_ids();
        GameOrchestrator::new(
            def,
            &ids,
            OrchestratorOptions {
                seed: Some(seed),
                ..OrchestratorOptions::default()
            },
        )
        .unwrap()
    }

    fn statuses(events: &[GameEvent]) -> Vec<&str> {
        events
            .iter()
            .filter_map(|e| match e {
                GameEvent::StatusMessage(m) => Some(m.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn construction_announces_first_turn() {
        let mut orch = orchestrator(3);
        let events = orch.drain_events();

        assert!(events
            .iter()
            .any(|e| matches!(e, GameEvent::ScoresChanged(map) if map.values().sum::<u32>() == 4)));
        assert!(events
            .iter()
            .any(|e| matches!(e, GameEvent::TurnChanged(Player::One))));
        assert_eq!(
            statuses(&events).last(),
            Some(&"Ход Игрока 1. Бросьте кубик!")
        );
        // The viewport clamps against the same bounds the world computed.
        assert_eq!(
            orch.viewport().content_bounds(),
            orch.engine().world().content_bounds()
        );
    }

    #[test]
    fn forced_six_roll_emits_dice_and_highlights() {
        let mut orch = orchestrator(3);
        orch.drain_events();

        orch.roll(Some(6));
        let events = orch.drain_events();

        assert!(events.iter().any(|e| matches!(e, GameEvent::DiceRolled(6))));
        let highlight = events
            .iter()
            .filter_map(|e| match e {
                GameEvent::TerritoryHighlights {
                    available,
                    unavailable,
                    capturable,
                } => Some((available, unavailable, capturable)),
                _ => None,
            })
            .last()
            .unwrap();
        // 16 neutral cells split between in-reach and out-of-reach.
        assert_eq!(highlight.0.len() + highlight.1.len(), 16);
    }

    #[test]
    fn low_roll_reports_and_allows_end_turn() {
        let mut orch = orchestrator(3);
        orch.drain_events();

        orch.roll(Some(2));
        let events = orch.drain_events();
        assert!(statuses(&events).contains(&"Выпало 2. Завершите ход."));

        orch.end_turn_pressed();
        let events = orch.drain_events();
        assert!(events
            .iter()
            .any(|e| matches!(e, GameEvent::TurnChanged(Player::Two))));
    }

    #[test]
    fn capture_click_emits_result_and_scores() {
        let mut orch = orchestrator(3);
        orch.drain_events();

        orch.roll(Some(6));
        let events = orch.drain_events();
        let target = events
            .iter()
            .filter_map(|e| match e {
                GameEvent::TerritoryHighlights {
                    available,
                    capturable,
                    ..
                } => available.iter().chain(capturable).next().cloned(),
                _ => None,
            })
            .last()
            .unwrap();

        orch.region_clicked(&target);
        let events = orch.drain_events();
        assert!(events.iter().any(|e| matches!(
            e,
            GameEvent::CaptureResult { region, success: true, .. } if *region == target
        )));
        assert!(events
            .iter()
            .any(|e| matches!(e, GameEvent::ScoresChanged(map) if map[&Player::One] == 2)));
    }

    #[test]
    fn rejected_capture_keeps_state() {
        let mut orch = orchestrator(3);
        orch.drain_events();

        orch.roll(Some(6));
        orch.drain_events();
        let own = orch.engine().start_region(Player::One).unwrap().to_string();

        orch.region_clicked(&own);
        let events = orch.drain_events();
        assert!(events.iter().any(|e| matches!(
            e,
            GameEvent::CaptureResult { success: false, reason: Some(_), .. }
        )));
        assert_eq!(orch.engine().state().scores, [1, 1, 1, 1]);
        // The capture phase stays open after a rejection.
        assert_eq!(orch.engine().phase(), TurnPhase::CapturePhase);
    }

    #[test]
    fn click_outside_capture_phase_reports_territory_info() {
        let mut orch = orchestrator(3);
        orch.drain_events();
        let own = orch.engine().start_region(Player::One).unwrap().to_string();

        orch.region_clicked(&own);
        let events = orch.drain_events();
        let expected = format!("Страна {} принадлежит Игроку 1. Ваш счет: 1.", own);
        assert!(statuses(&events).contains(&expected.as_str()));
        assert_eq!(orch.engine().phase(), TurnPhase::AwaitingRoll);
    }

    #[test]
    fn pan_session_emits_transforms_only_while_down() {
        let mut orch = orchestrator(3);
        orch.drain_events();

        orch.pointer_move(50.0, 50.0);
        assert!(orch.drain_events().is_empty());

        orch.pointer_down(10.0, 10.0);
        orch.pointer_move(30.0, 25.0);
        orch.pointer_up();
        orch.pointer_move(90.0, 90.0);
        let events = orch.drain_events();
        let transforms: Vec<_> = events
            .iter()
            .filter(|e| matches!(e, GameEvent::TransformChanged { .. }))
            .collect();
        assert_eq!(transforms.len(), 1);
    }

    #[test]
    fn wheel_zoom_emits_transform() {
        let mut orch = orchestrator(3);
        orch.drain_events();

        orch.wheel(100.0, 100.0, ZoomDirection::In);
        let events = orch.drain_events();
        assert!(events.iter().any(
            |e| matches!(e, GameEvent::TransformChanged { scale, .. } if (*scale - 1.1).abs() < 1e-9)
        ));
    }

    #[test]
    fn score_entry_click_focuses_start_region() {
        let mut orch = orchestrator(3);
        orch.drain_events();

        orch.score_entry_clicked(Player::Two);
        let events = orch.drain_events();
        assert!(events
            .iter()
            .any(|e| matches!(e, GameEvent::TransformChanged { .. })));
    }

    #[test]
    fn debug_mode_forces_capture_face() {
        let def = grid_map(5, 4);
        let ids = def.region_ids();
        let mut orch = GameOrchestrator::new(
            def,
            &ids,
            OrchestratorOptions {
                seed: Some(11),
                forced_capture_face: true,
                ..OrchestratorOptions::default()
            },
        )
        .unwrap();
        orch.drain_events();

        orch.roll_button_pressed();
        let events = orch.drain_events();
        assert!(events.iter().any(|e| matches!(e, GameEvent::DiceRolled(6))));
    }
}
