//! Battle execution loop
//!
//! A single state machine drives the whole battle. Player interaction comes
//! in through [`Battle::handle_input`]; everything time-based happens in
//! [`Battle::update`], one state's worth of work per tick.

use serde::{Deserialize, Serialize};

use crate::battle::ability::{Ability, ActivationMode, TileOccupancy};
use crate::battle::ai::{BattlePolicy, Decision};
use crate::battle::board::{BattleOutcome, BattleSetup, Board};
use crate::battle::command::{Command, CommandQueue};
use crate::battle::grid::Grid;
use crate::battle::hit::Hit;
use crate::battle::movement::{advance_along_path, PathFollow};
use crate::battle::templates::CombatantFactory;
use crate::core::config::BattleConfig;
use crate::core::error::{BattleError, Result};
use crate::core::types::{CombatantId, Faction, TileCoord};

/// Battle phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BattlePhase {
    #[default]
    PlayerTurn,
    EnemyTurn,
    CharacterSelected,
    SelectingAbility,
    AimingAbility,
    ExecutingCommand,
    DisplayingHits,
    MovingCharacter,
    /// Waiting out a timer before moving on to the stored phase
    Delay,
}

/// Top-level choices offered for a selected combatant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionChoice {
    Move,
    Attack,
    Special,
    Item,
    Wait,
}

/// Player intents, delivered by whatever UI sits on top
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattleInput {
    Select(CombatantId),
    ChooseAction(ActionChoice),
    ChooseAbility(Ability),
    SubmitTarget(TileCoord),
    Cancel,
    ExecuteQueued,
    EndTurn,
}

/// Whether an input changed anything
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOutcome {
    Accepted,
    /// Not legal in the current phase; nothing changed
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HighlightKind {
    Movement,
    Targeting,
}

/// Log entry for battle events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattleEvent {
    pub tick: u64,
    pub event_type: BattleEventType,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum BattleEventType {
    Status { round: u32, faction: Faction },
    Highlight { kind: HighlightKind, grid: Grid },
    HighlightCleared,
    CommandQueued { command: Command },
    CommandDropped { command: Command },
    MoveStarted { actor: CombatantId, path: Vec<TileCoord> },
    CombatantMoved { actor: CombatantId, tile: TileCoord },
    HitApplied {
        magnitude: i32,
        is_heal: bool,
        tile: TileCoord,
        critical: bool,
    },
    CombatantDied { id: CombatantId, name: String },
    FactionChanged { faction: Faction, round: u32 },
    BattleEnded { outcome: BattleOutcome },
}

/// Events produced since the last update
#[derive(Debug, Clone, Default)]
pub struct BattleEventLog {
    pub events: Vec<BattleEvent>,
}

impl BattleEventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event_type: BattleEventType, description: String, tick: u64) {
        self.events.push(BattleEvent {
            tick,
            event_type,
            description,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BattleEvent> {
        self.events.iter()
    }
}

/// A running battle
pub struct Battle {
    board: Board,
    config: BattleConfig,
    policy: Box<dyn BattlePolicy>,

    phase: BattlePhase,
    delay_remaining: f32,
    after_delay: BattlePhase,

    queue: CommandQueue,
    hits: Vec<Hit>,
    path_follow: Option<PathFollow>,

    // Player selection
    selected: Option<CombatantId>,
    aiming: Option<Ability>,
    aim_elapsed: f32,

    tick: u64,
    outcome: Option<BattleOutcome>,
    pending: BattleEventLog,
}

impl Battle {
    /// Start a battle on a prepared board; round 1, player to move
    pub fn new(board: Board, policy: Box<dyn BattlePolicy>, config: BattleConfig) -> Result<Self> {
        config.validate()?;

        let mut battle = Self {
            board,
            config,
            policy,
            phase: BattlePhase::PlayerTurn,
            delay_remaining: 0.0,
            after_delay: BattlePhase::PlayerTurn,
            queue: CommandQueue::new(),
            hits: Vec::new(),
            path_follow: None,
            selected: None,
            aiming: None,
            aim_elapsed: 0.0,
            tick: 0,
            outcome: None,
            pending: BattleEventLog::new(),
        };
        battle.change_faction(Faction::Player);
        Ok(battle)
    }

    /// Build the board from templates and start the battle
    pub fn from_setup(
        setup: &BattleSetup,
        factory: &dyn CombatantFactory,
        policy: Box<dyn BattlePolicy>,
        config: BattleConfig,
    ) -> Result<Self> {
        let board = Board::from_setup(setup, factory)?;
        Self::new(board, policy, config)
    }

    // ===== QUERIES =====

    pub fn phase(&self) -> BattlePhase {
        self.phase
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    pub fn queue(&self) -> &CommandQueue {
        &self.queue
    }

    /// Hits still waiting for their delay to run out
    pub fn pending_hits(&self) -> &[Hit] {
        &self.hits
    }

    pub fn selected(&self) -> Option<CombatantId> {
        self.selected
    }

    pub fn aiming(&self) -> Option<Ability> {
        self.aiming
    }

    pub fn round(&self) -> u32 {
        self.board.round
    }

    pub fn faction_turn(&self) -> Faction {
        self.board.faction_turn
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn outcome(&self) -> Option<BattleOutcome> {
        self.outcome
    }

    /// Abilities the selected combatant could pick from the special menu
    pub fn selectable_abilities(&self) -> Vec<Ability> {
        self.selected
            .and_then(|id| self.board.combatant(id))
            .map(|c| c.castable_abilities())
            .unwrap_or_default()
    }

    // ===== INPUT =====

    /// Apply one player intent
    ///
    /// Inputs that are not legal in the current phase are ignored and leave
    /// the battle untouched.
    pub fn handle_input(&mut self, input: BattleInput) -> InputOutcome {
        match self.try_input(input) {
            Ok(()) => InputOutcome::Accepted,
            Err(e) => {
                tracing::debug!("Ignored {:?} during {:?}: {}", input, self.phase, e);
                InputOutcome::Ignored
            }
        }
    }

    /// Like [`Battle::handle_input`], but says why an input was refused
    ///
    /// A refused input never changes state.
    pub fn try_input(&mut self, input: BattleInput) -> Result<()> {
        match input {
            BattleInput::Select(id) => self.select(id),
            BattleInput::ChooseAction(choice) => self.choose_action(choice),
            BattleInput::ChooseAbility(ability) => self.choose_ability(ability),
            BattleInput::SubmitTarget(tile) => self.submit_target(tile),
            BattleInput::Cancel => self.cancel(),
            BattleInput::ExecuteQueued => self.execute_queued(),
            BattleInput::EndTurn => self.end_turn(),
        }
    }

    fn illegal(&self, what: &str) -> BattleError {
        BattleError::IllegalTransition(format!("{} during {:?}", what, self.phase))
    }

    fn select(&mut self, id: CombatantId) -> Result<()> {
        if self.phase == BattlePhase::CharacterSelected && self.selected == Some(id) {
            self.reset_selection();
            self.phase = BattlePhase::PlayerTurn;
            return Ok(());
        }

        if self.phase != BattlePhase::PlayerTurn {
            return Err(self.illegal("select"));
        }
        let combatant = self
            .board
            .combatant(id)
            .ok_or(BattleError::CombatantNotFound(id))?;
        if combatant.faction != Faction::Player {
            return Err(BattleError::ActionUnavailable(format!(
                "{} is not in the player party",
                combatant.name
            )));
        }

        self.selected = Some(id);
        self.phase = BattlePhase::CharacterSelected;
        Ok(())
    }

    fn choose_action(&mut self, choice: ActionChoice) -> Result<()> {
        if self.phase != BattlePhase::CharacterSelected {
            return Err(self.illegal("choose action"));
        }
        let id = self.selected.ok_or_else(|| self.illegal("choose action"))?;
        let combatant = self
            .board
            .combatant(id)
            .ok_or(BattleError::CombatantNotFound(id))?;
        let (can_move, can_act) = (combatant.can_move, combatant.can_act);
        let spent = |what: &str| {
            BattleError::ActionUnavailable(format!("{} has already spent its {}", combatant.name, what))
        };

        match choice {
            ActionChoice::Move if !can_move => Err(spent("move")),
            ActionChoice::Attack | ActionChoice::Special if !can_act => Err(spent("action")),
            ActionChoice::Move => self.begin_aim(id, Ability::Move),
            ActionChoice::Attack => self.begin_aim(id, Ability::Attack),
            ActionChoice::Special => {
                self.phase = BattlePhase::SelectingAbility;
                Ok(())
            }
            ActionChoice::Wait => {
                if let Some(c) = self.board.combatant_mut(id) {
                    c.end_round();
                }
                self.reset_selection();
                self.phase = BattlePhase::PlayerTurn;
                Ok(())
            }
            // No consumables exist, so there is never an item to use
            ActionChoice::Item => Err(BattleError::ActionUnavailable("no usable items".into())),
        }
    }

    fn choose_ability(&mut self, ability: Ability) -> Result<()> {
        if self.phase != BattlePhase::SelectingAbility {
            return Err(self.illegal("choose ability"));
        }
        let id = self.selected.ok_or_else(|| self.illegal("choose ability"))?;
        if !self.selectable_abilities().contains(&ability) {
            return Err(BattleError::ActionUnavailable(format!(
                "{} cannot be cast right now",
                ability
            )));
        }
        self.begin_aim(id, ability)
    }

    fn begin_aim(&mut self, id: CombatantId, ability: Ability) -> Result<()> {
        let grid = self.board.target_grid(id, ability)?;

        let kind = if ability == Ability::Move {
            HighlightKind::Movement
        } else {
            HighlightKind::Targeting
        };

        self.aiming = Some(ability);
        self.aim_elapsed = 0.0;
        self.phase = BattlePhase::AimingAbility;
        self.emit(
            BattleEventType::Highlight { kind, grid },
            format!("Aiming {}", ability),
        );
        Ok(())
    }

    fn submit_target(&mut self, tile: TileCoord) -> Result<()> {
        if self.phase != BattlePhase::AimingAbility {
            return Err(self.illegal("submit target"));
        }
        // Guards against the click that opened the grid also choosing a target
        if self.aim_elapsed <= self.config.aim_guard_secs {
            return Err(self.illegal("submit inside the aim guard"));
        }
        let (Some(id), Some(ability)) = (self.selected, self.aiming) else {
            return Err(self.illegal("submit target"));
        };

        if !self.board.target_grid(id, ability)?.is_passable(tile) {
            return Err(BattleError::ActionUnavailable(format!(
                "({}, {}) is out of reach for {}",
                tile.x, tile.y, ability
            )));
        }
        if !ability.can_target(self.board.occupancy(id, tile)) {
            return Err(BattleError::ActionUnavailable(format!(
                "{} cannot land on ({}, {})",
                ability, tile.x, tile.y
            )));
        }

        let command = Command::new(id, ability, tile);
        self.emit(BattleEventType::HighlightCleared, "Target chosen".into());

        if command.is_move() {
            self.execute_command(command);
            return Ok(());
        }

        if let Some(c) = self.board.combatant_mut(id) {
            c.can_act = false;
        }
        self.queue.push(command);
        self.emit(
            BattleEventType::CommandQueued { command },
            format!("{} queued at ({}, {})", ability, tile.x, tile.y),
        );
        self.reset_selection();
        self.enter_delay(self.config.queue_grace_secs, BattlePhase::PlayerTurn);
        Ok(())
    }

    fn cancel(&mut self) -> Result<()> {
        match self.phase {
            BattlePhase::CharacterSelected
            | BattlePhase::SelectingAbility
            | BattlePhase::AimingAbility => {
                if self.aiming.is_some() {
                    self.emit(BattleEventType::HighlightCleared, "Aim cancelled".into());
                }
                self.reset_selection();
                self.phase = BattlePhase::PlayerTurn;
                Ok(())
            }
            _ => Err(self.illegal("cancel")),
        }
    }

    fn execute_queued(&mut self) -> Result<()> {
        if self.phase != BattlePhase::PlayerTurn {
            return Err(self.illegal("execute queued"));
        }
        self.phase = BattlePhase::ExecutingCommand;
        Ok(())
    }

    fn end_turn(&mut self) -> Result<()> {
        if self.phase != BattlePhase::PlayerTurn {
            return Err(self.illegal("end turn"));
        }
        self.change_faction(self.board.faction_turn.other());
        Ok(())
    }

    // ===== TICK =====

    /// Advance the battle by `dt` seconds and collect what happened
    pub fn update(&mut self, dt: f32) -> BattleEventLog {
        self.tick += 1;
        self.emit(
            BattleEventType::Status {
                round: self.board.round,
                faction: self.board.faction_turn,
            },
            String::new(),
        );

        match self.phase {
            BattlePhase::EnemyTurn => self.update_enemy_turn(),
            BattlePhase::AimingAbility => self.aim_elapsed += dt,
            BattlePhase::ExecutingCommand => self.update_executing_command(),
            BattlePhase::DisplayingHits => self.update_displaying_hits(dt),
            BattlePhase::MovingCharacter => self.update_moving_character(dt),
            BattlePhase::Delay => {
                self.delay_remaining -= dt;
                if self.delay_remaining <= 0.0 {
                    self.phase = self.after_delay;
                }
            }
            BattlePhase::PlayerTurn
            | BattlePhase::CharacterSelected
            | BattlePhase::SelectingAbility => {}
        }

        std::mem::take(&mut self.pending)
    }

    fn update_enemy_turn(&mut self) {
        let mover = self
            .board
            .faction_members(Faction::Opponent)
            .find(|c| c.can_move)
            .map(|c| c.id);

        let Some(id) = mover else {
            if self.queue.is_empty() {
                self.change_faction(self.board.faction_turn.other());
            } else {
                // Drain what the opponents queued; comes back here when empty
                self.phase = BattlePhase::ExecutingCommand;
            }
            return;
        };

        let decision = self.policy.decide(id, &self.board);
        // Checked before the move so occupancy is judged on the board the
        // policy saw
        let command = decision
            .command
            .map(|command| (command, self.check_policy_command(id, &decision)));

        self.selected = Some(id);
        self.execute_command(Command::new(id, Ability::Move, decision.destination));

        // Queued after the move so the move does not cancel it
        match command {
            None => {}
            Some((command, Err(e))) => {
                tracing::warn!("Policy command {} rejected: {}", command.ability, e);
                self.drop_command(command);
            }
            Some((command, Ok(()))) => {
                if let Some(c) = self.board.combatant_mut(id) {
                    c.can_act = false;
                }
                self.queue.push(command);
                self.emit(
                    BattleEventType::CommandQueued { command },
                    format!("{} queued", command.ability),
                );
            }
        }
    }

    /// Hold a policy's command to the same rules a player's would face,
    /// aimed from the decision's destination
    fn check_policy_command(&self, id: CombatantId, decision: &Decision) -> Result<()> {
        let Some(command) = decision.command else {
            return Ok(());
        };
        let caster = self
            .board
            .combatant(id)
            .ok_or(BattleError::CombatantNotFound(id))?;

        let unavailable = |why: String| Err(BattleError::ActionUnavailable(why));

        if command.actor != id || command.is_move() {
            return unavailable(format!("{:?} is not a command for {}", command, caster.name));
        }
        let castable = command.ability == Ability::Attack
            || caster.castable_abilities().contains(&command.ability);
        if !castable {
            return unavailable(format!("{} cannot cast {}", caster.name, command.ability));
        }

        let reach = command
            .ability
            .target_grid_from(&self.board.grid, decision.destination);
        if !reach.is_passable(command.target) {
            return unavailable(format!(
                "({}, {}) is out of {} reach",
                command.target.x, command.target.y, command.ability
            ));
        }

        let occupancy = if command.target == decision.destination {
            TileOccupancy::Caster
        } else {
            match self.board.occupancy(id, command.target) {
                // The caster will have walked away from its old tile
                TileOccupancy::Caster => TileOccupancy::Vacant,
                other => other,
            }
        };
        if !command.ability.can_target(occupancy) {
            return unavailable(format!(
                "{} cannot land on ({}, {})",
                command.ability, command.target.x, command.target.y
            ));
        }
        Ok(())
    }

    fn update_executing_command(&mut self) {
        match self.queue.pop_front() {
            Some(command) => self.execute_command(command),
            None => self.phase = self.turn_phase(),
        }
    }

    fn update_displaying_hits(&mut self, dt: f32) {
        let elapsed_ms = (dt * 1000.0) as i32;
        let mut waiting = Vec::new();

        for mut hit in std::mem::take(&mut self.hits) {
            hit.delay_ms -= elapsed_ms;
            if hit.delay_ms <= 0 {
                self.apply_hit(hit);
            } else {
                waiting.push(hit);
            }
        }

        if !waiting.is_empty() {
            self.hits = waiting;
            return;
        }

        self.death_sweep();
        self.reset_selection();
        self.enter_delay(self.config.hit_pause_secs, BattlePhase::ExecutingCommand);
    }

    fn update_moving_character(&mut self, dt: f32) {
        let Some(follow) = self.path_follow.as_mut() else {
            self.phase = self.turn_phase();
            return;
        };
        let Some(mover) = self.board.combatant_mut(follow.actor) else {
            self.path_follow = None;
            self.phase = self.turn_phase();
            return;
        };

        let result = advance_along_path(mover, follow, dt, &self.config);
        let (actor, faction) = (mover.id, mover.faction);

        if let Some(tile) = result.reached_waypoint {
            self.emit(
                BattleEventType::CombatantMoved { actor, tile },
                format!("Reached ({}, {})", tile.x, tile.y),
            );
        }

        if result.finished {
            self.path_follow = None;
            self.reset_selection();
            self.phase = match faction {
                Faction::Player => BattlePhase::PlayerTurn,
                Faction::Opponent => BattlePhase::EnemyTurn,
            };
        }
    }

    // ===== COMMANDS =====

    /// Run a command right away; moves start walking, the rest show hits
    fn execute_command(&mut self, command: Command) {
        self.phase = BattlePhase::ExecutingCommand;

        if self.board.combatant(command.actor).is_none() {
            tracing::warn!("Dropping {} from a combatant no longer on the board", command.ability);
            self.drop_command(command);
            return;
        }

        if command.is_move() {
            self.begin_move(command);
        } else {
            self.resolve_ability(command);
        }
    }

    fn begin_move(&mut self, command: Command) {
        let id = command.actor;
        let path = self.board.movement_grid(id).and_then(|range| {
            if range.is_passable(command.target) {
                self.board.path_for(id, command.target)
            } else {
                Err(BattleError::NoPathFound {
                    from: self.board.combatant(id).map(|c| c.position).unwrap_or_default(),
                    to: command.target,
                })
            }
        });

        let Some(mover) = self.board.combatant_mut(id) else {
            return;
        };
        mover.can_move = false;

        let path = match path {
            Ok(path) => path,
            Err(e) => {
                tracing::error!("Move for {} rejected: {}", mover.name, e);
                self.phase = self.turn_phase();
                return;
            }
        };

        // Moving abandons whatever this combatant had queued
        if let Some(cancelled) = self.queue.cancel_first_for(id) {
            mover.can_act = true;
            tracing::debug!("{} moved; cancelled queued {}", mover.name, cancelled.ability);
        }

        let description = format!("{} moves to ({}, {})", mover.name, command.target.x, command.target.y);
        self.path_follow = Some(PathFollow::new(id, path.clone()));
        self.selected = Some(id);
        self.phase = BattlePhase::MovingCharacter;
        self.emit(BattleEventType::MoveStarted { actor: id, path }, description);
    }

    fn resolve_ability(&mut self, command: Command) {
        let ability = command.ability;
        let Some(caster) = self.board.combatant(command.actor) else {
            return;
        };

        if ability.activation() == ActivationMode::Passive {
            tracing::warn!("{} cannot cast passive {}", caster.name, ability);
            self.drop_command(command);
            return;
        }
        if !caster.can_afford(ability) {
            let err = BattleError::InsufficientMana {
                name: caster.name.clone(),
                cost: ability.mana_cost(),
                available: caster.current_mana,
            };
            tracing::warn!("Dropping stale {}: {}", ability, err);
            self.drop_command(command);
            return;
        }

        let hits: Vec<Hit> = ability
            .generate_hits(&self.board, &command)
            .into_iter()
            .filter(|hit| self.board.living_at(hit.target).is_some())
            .collect();

        if hits.is_empty() {
            tracing::warn!("{} has nothing left to hit", ability);
            self.drop_command(command);
            return;
        }

        if let Some(caster) = self.board.combatant_mut(command.actor) {
            caster.current_mana -= ability.mana_cost();
            caster.can_act = false;
        }
        self.selected = Some(command.actor);
        self.hits = hits;
        self.phase = BattlePhase::DisplayingHits;
    }

    fn drop_command(&mut self, command: Command) {
        self.emit(
            BattleEventType::CommandDropped { command },
            format!("{} dropped", command.ability),
        );
    }

    fn apply_hit(&mut self, hit: Hit) {
        let Some(target) = self.board.combatant_at_mut(hit.target) else {
            tracing::debug!("Hit at ({}, {}) found nobody", hit.target.x, hit.target.y);
            return;
        };

        let hit = target.process_hit(hit);
        target.receive_hit(&hit);
        let description = format!(
            "{} {} {} ({} hp)",
            target.name,
            if hit.is_heal() { "healed" } else { "took" },
            hit.magnitude(),
            target.current_health
        );

        self.emit(
            BattleEventType::HitApplied {
                magnitude: hit.magnitude(),
                is_heal: hit.is_heal(),
                tile: hit.target,
                critical: hit.critical,
            },
            description,
        );
    }

    /// Remove the fallen, then check whether a side is wiped out
    fn death_sweep(&mut self) {
        for fallen in self.board.remove_dead() {
            tracing::info!("{} has fallen", fallen.name);
            if self.selected == Some(fallen.id) {
                self.selected = None;
            }
            self.emit(
                BattleEventType::CombatantDied {
                    id: fallen.id,
                    name: fallen.name.clone(),
                },
                format!("{} has fallen", fallen.name),
            );
        }

        if self.outcome.is_some() {
            return;
        }
        if let Some(outcome) = self.board.check_battle_end() {
            tracing::info!("Battle ended: {:?}", outcome);
            self.outcome = Some(outcome);
            self.emit(
                BattleEventType::BattleEnded { outcome },
                format!("Battle ended: {:?}", outcome),
            );
        }
    }

    // ===== FACTIONS =====

    /// Hand the turn to `faction`
    ///
    /// Clears the queue and resets everyone's flags; the round counter only
    /// advances when control returns to the player.
    pub fn change_faction(&mut self, faction: Faction) {
        let discarded = self.queue.clear();
        if discarded > 0 {
            tracing::debug!("Discarded {} queued commands at faction change", discarded);
        }

        self.board.faction_turn = faction;
        if faction == Faction::Player {
            self.board.round += 1;
        }
        self.board.begin_round();
        self.reset_selection();
        self.phase = self.turn_phase();

        tracing::info!("Round {}: {:?} to move", self.board.round, faction);
        self.emit(
            BattleEventType::FactionChanged {
                faction,
                round: self.board.round,
            },
            format!("Round {}, {:?}", self.board.round, faction),
        );
    }

    // ===== HELPERS =====

    fn turn_phase(&self) -> BattlePhase {
        match self.board.faction_turn {
            Faction::Player => BattlePhase::PlayerTurn,
            Faction::Opponent => BattlePhase::EnemyTurn,
        }
    }

    fn enter_delay(&mut self, seconds: f32, then: BattlePhase) {
        self.delay_remaining = seconds;
        self.after_delay = then;
        self.phase = BattlePhase::Delay;
    }

    fn reset_selection(&mut self) {
        self.selected = None;
        self.aiming = None;
        self.aim_elapsed = 0.0;
    }

    fn emit(&mut self, event_type: BattleEventType, description: String) {
        self.pending.push(event_type, description, self.tick);
    }
}
