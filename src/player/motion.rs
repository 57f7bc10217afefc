//! Player movement state machine.
//!
//! ## Phases
//!
//! The phase is derived from contact flags and the multi-jump pool rather than
//! stored:
//!
//! | Phase                   | Condition                                 |
//! |-------------------------|-------------------------------------------|
//! | `Grounded`              | body touching / blocked downward          |
//! | `AirborneCanMultiJump`  | airborne, multi-jump charge left          |
//! | `AirborneExhausted`     | airborne, multi-jump pool empty           |
//!
//! ## Tick order
//!
//! 1. Deferred events due this tick (down-collision restore, tilt reset).
//! 2. Landing: reset the multi-jump and dash pools; end the jump once the body
//!    is no longer rising.
//! 3. Horizontal acceleration, with the strafe-cancel snap evaluated before the
//!    facing is updated.
//! 4. Jump / multi-jump / lingering boost.
//! 5. Drop-through one-way platforms.
//! 6. Dash.
//! 7. Overcap decay applied to the body's max speed (every tick).
//! 8. Sub-pixel anti-jitter snap.

use crate::aim::AimVector;
use crate::body::Body;
use crate::charges::ChargePool;
use crate::constants::*;
use crate::input::{Action, ControlInput};
use crate::overcap::VelocityOvercap;
use crate::scheduler::DeferredQueue;
use bevy::log::debug;
use bevy::math::Vec2;
use std::f32::consts::{FRAC_PI_2, PI, TAU};

/// Tuning for [`MotionController`].  Built from
/// [`crate::config::ControllerConfig::motion_config`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionConfig {
    pub acceleration: f32,
    pub max_velocity: f32,
    pub jump_velocity: f32,
    pub jump_boost_duration_ms: f32,
    /// `None` for unlimited.
    pub multi_jump_charges: Option<u32>,
    pub strafe_cancel_snap_velocity: f32,
    pub drop_through_velocity: f32,
    pub drop_through_recollide_ms: f32,
    pub dash_velocity: f32,
    /// `None` for unlimited.
    pub dash_charges: Option<u32>,
    /// Regeneration delay of one spent dash charge.
    pub dash_delay_ms: f32,
    pub lock_dash_while_overcapped: bool,
    pub overcap_decay_per_tick: f32,
    pub dash_tilt_hold_ms: f32,
    /// Length of one physics tick; converts overcap decay ticks into time.
    pub tick_ms: f32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            acceleration: ACCELERATION,
            max_velocity: MAX_VELOCITY,
            jump_velocity: JUMP_VELOCITY,
            jump_boost_duration_ms: JUMP_BOOST_DURATION_MS,
            multi_jump_charges: Some(MULTI_JUMP_CHARGES),
            strafe_cancel_snap_velocity: STRAFE_CANCEL_SNAP_VELOCITY,
            drop_through_velocity: DROP_THROUGH_VELOCITY,
            drop_through_recollide_ms: DROP_THROUGH_RECOLLIDE_MS,
            dash_velocity: DASH_VELOCITY,
            dash_charges: Some(DASH_CHARGES),
            dash_delay_ms: DASH_DELAY_MS,
            lock_dash_while_overcapped: false,
            overcap_decay_per_tick: OVERCAP_DECAY_PER_TICK,
            dash_tilt_hold_ms: DASH_TILT_HOLD_MS,
            tick_ms: (1000.0 / PHYSICS_TICK_HZ) as f32,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }

    fn action(self) -> Action {
        match self {
            Facing::Left => Action::Left,
            Facing::Right => Action::Right,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionPhase {
    Grounded,
    AirborneCanMultiJump,
    AirborneExhausted,
}

/// Clock values for one controller tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TickContext {
    pub delta_ms: f32,
    /// Monotonic time since startup.
    pub now_ms: f64,
}

impl TickContext {
    pub fn new(delta_ms: f32, now_ms: f64) -> Self {
        Self { delta_ms, now_ms }
    }
}

/// What happened during a tick, for logging and cosmetics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MotionReport {
    pub landed: bool,
    pub jumped: bool,
    pub multi_jumped: bool,
    pub boosted: bool,
    pub strafe_cancelled: bool,
    pub dropped_through: bool,
    pub dashed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum MotionEvent {
    RestoreDownCollision,
    BeginTiltReset { duration_ms: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct TiltEase {
    from: f32,
    elapsed_ms: f32,
    duration_ms: f32,
}

/// Cosmetic lean toward the last dash.
///
/// Snaps to the dash angle immediately, holds, then eases back upright.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DashTilt {
    angle: f32,
    easing: Option<TiltEase>,
}

impl DashTilt {
    #[inline]
    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn is_upright(&self) -> bool {
        self.angle == 0.0 && self.easing.is_none()
    }

    fn snap_to(&mut self, angle: f32) {
        self.angle = angle;
        self.easing = None;
    }

    fn begin_reset(&mut self, duration_ms: f32) {
        if duration_ms <= 0.0 {
            self.snap_to(0.0);
        } else {
            self.easing = Some(TiltEase {
                from: self.angle,
                elapsed_ms: 0.0,
                duration_ms,
            });
        }
    }

    fn tick(&mut self, delta_ms: f32) {
        let Some(ease) = self.easing.as_mut() else {
            return;
        };
        ease.elapsed_ms += delta_ms.max(0.0);
        let t = (ease.elapsed_ms / ease.duration_ms).min(1.0);
        // Quadratic ease-out.
        let eased = 1.0 - (1.0 - t) * (1.0 - t);
        self.angle = ease.from * (1.0 - eased);
        if t >= 1.0 {
            self.snap_to(0.0);
        }
    }
}

/// Rotation that leans an upright body toward `direction`, wrapped to (-π, π].
fn lean_toward(direction: Vec2) -> f32 {
    let mut angle = direction.y.atan2(direction.x) - FRAC_PI_2;
    if angle <= -PI {
        angle += TAU;
    }
    angle
}

/// Jump, dash and run state of one player.
#[derive(Debug, Clone)]
pub struct MotionController {
    config: MotionConfig,
    jumping: bool,
    jump_hold_elapsed_ms: f32,
    multi_jumps: ChargePool,
    dashes: ChargePool,
    overcap: VelocityOvercap,
    last_direction: Facing,
    standing_on_one_way: bool,
    dropping_through: bool,
    was_grounded: bool,
    deferred: DeferredQueue<MotionEvent>,
    tilt: DashTilt,
}

impl MotionController {
    pub fn new(config: MotionConfig) -> Self {
        Self {
            config,
            jumping: false,
            jump_hold_elapsed_ms: 0.0,
            multi_jumps: ChargePool::new(config.multi_jump_charges),
            dashes: ChargePool::new(config.dash_charges).with_recharge(config.dash_delay_ms),
            overcap: VelocityOvercap::new(config.max_velocity, config.overcap_decay_per_tick),
            last_direction: Facing::default(),
            standing_on_one_way: false,
            dropping_through: false,
            was_grounded: true,
            deferred: DeferredQueue::new(),
            tilt: DashTilt::default(),
        }
    }

    pub fn config(&self) -> &MotionConfig {
        &self.config
    }

    /// Set by the platform layer when the body rests on a one-way platform.
    pub fn set_standing_on_one_way(&mut self, standing: bool) {
        self.standing_on_one_way = standing;
    }

    pub fn standing_on_one_way(&self) -> bool {
        self.standing_on_one_way
    }

    pub fn is_dropping_through(&self) -> bool {
        self.dropping_through
    }

    pub fn facing(&self) -> Facing {
        self.last_direction
    }

    pub fn jump_hold_elapsed_ms(&self) -> f32 {
        self.jump_hold_elapsed_ms
    }

    pub fn is_jumping(&self) -> bool {
        self.jumping
    }

    pub fn multi_jumps(&self) -> &ChargePool {
        &self.multi_jumps
    }

    pub fn dashes(&self) -> &ChargePool {
        &self.dashes
    }

    pub fn overcap(&self) -> &VelocityOvercap {
        &self.overcap
    }

    pub fn tilt(&self) -> &DashTilt {
        &self.tilt
    }

    pub fn phase(&self, on_ground: bool) -> MotionPhase {
        if on_ground {
            MotionPhase::Grounded
        } else if self.multi_jumps.has_charge() {
            MotionPhase::AirborneCanMultiJump
        } else {
            MotionPhase::AirborneExhausted
        }
    }

    /// Run one fixed tick.  `aim` steers dashes; without it the dash follows
    /// the facing direction.
    pub fn tick<B, I>(
        &mut self,
        body: &mut B,
        input: &I,
        aim: Option<&AimVector>,
        ctx: TickContext,
    ) -> MotionReport
    where
        B: Body + ?Sized,
        I: ControlInput + ?Sized,
    {
        let mut report = MotionReport::default();

        for event in self.deferred.advance(ctx.delta_ms) {
            match event {
                MotionEvent::RestoreDownCollision => {
                    let mut flags = body.collision_flags();
                    flags.down = true;
                    body.set_collision_flags(flags);
                    self.dropping_through = false;
                }
                MotionEvent::BeginTiltReset { duration_ms } => self.tilt.begin_reset(duration_ms),
            }
        }
        self.tilt.tick(ctx.delta_ms);
        self.dashes.tick(ctx.delta_ms);

        let grounded = body.contact_flags().on_ground();
        if grounded {
            report.landed = !self.was_grounded;
            self.multi_jumps.reset();
            self.dashes.reset();
            if body.velocity().y <= 0.0 {
                self.jumping = false;
                self.jump_hold_elapsed_ms = 0.0;
            }
        }
        self.was_grounded = grounded;

        self.apply_horizontal(body, input, &mut report);
        self.apply_jump(body, input, grounded, ctx, &mut report);
        self.apply_drop_through(body, input, &mut report);
        self.apply_dash(body, input, aim, &mut report);

        let cap = self.overcap.tick();
        body.set_max_speed(cap);

        let v = body.velocity();
        let p = body.position();
        if v.x.abs() < 1.0 && (p.x % 1.0).abs() > 0.01 {
            body.set_position(Vec2::new(p.x.round(), p.y));
        }

        report
    }

    fn apply_horizontal<B, I>(&mut self, body: &mut B, input: &I, report: &mut MotionReport)
    where
        B: Body + ?Sized,
        I: ControlInput + ?Sized,
    {
        let wanted = if input.held(Action::Left) {
            Some(Facing::Left)
        } else if input.held(Action::Right) {
            Some(Facing::Right)
        } else {
            None
        };

        let Some(direction) = wanted else {
            body.set_acceleration_x(0.0);
            return;
        };

        if direction != self.last_direction && input.just_pressed(direction.action()) {
            let old_sign = self.last_direction.sign();
            let snap = self.config.strafe_cancel_snap_velocity;
            if body.velocity().x * old_sign > snap {
                body.set_velocity_x(old_sign * snap);
                report.strafe_cancelled = true;
            }
        }

        body.set_acceleration_x(direction.sign() * self.config.acceleration);
        self.last_direction = direction;
    }

    fn apply_jump<B, I>(
        &mut self,
        body: &mut B,
        input: &I,
        grounded: bool,
        ctx: TickContext,
        report: &mut MotionReport,
    ) where
        B: Body + ?Sized,
        I: ControlInput + ?Sized,
    {
        let pressed = input.just_pressed(Action::Jump);
        let held = input.held(Action::Jump);

        if pressed && grounded {
            self.start_jump(body);
            report.jumped = true;
        } else if pressed && !grounded && self.multi_jumps.try_consume() {
            self.start_jump(body);
            report.multi_jumped = true;
            debug!(
                "multi-jump ({} used) at {:.0}ms",
                self.multi_jumps.used(),
                ctx.now_ms
            );
        } else if held && self.jumping && self.jump_hold_elapsed_ms < self.config.jump_boost_duration_ms
        {
            body.set_velocity_y(self.config.jump_velocity);
            report.boosted = true;
        }

        if self.jumping {
            if held {
                self.jump_hold_elapsed_ms += ctx.delta_ms;
            } else {
                // Releasing closes the boost window; only a fresh press jumps again.
                self.jump_hold_elapsed_ms = self
                    .jump_hold_elapsed_ms
                    .max(self.config.jump_boost_duration_ms);
            }
        }
    }

    fn start_jump<B: Body + ?Sized>(&mut self, body: &mut B) {
        body.set_velocity_y(self.config.jump_velocity);
        self.jumping = true;
        self.jump_hold_elapsed_ms = 0.0;
    }

    fn apply_drop_through<B, I>(&mut self, body: &mut B, input: &I, report: &mut MotionReport)
    where
        B: Body + ?Sized,
        I: ControlInput + ?Sized,
    {
        let down_held = input.held(Action::Down);
        if down_held && self.standing_on_one_way {
            let mut flags = body.collision_flags();
            flags.down = false;
            body.set_collision_flags(flags);
            body.set_velocity_y(-self.config.drop_through_velocity);
            self.deferred
                .cancel_where(|e| matches!(e, MotionEvent::RestoreDownCollision));
            self.dropping_through = true;
            report.dropped_through = true;
        } else if self.dropping_through
            && !down_held
            && !self
                .deferred
                .any_pending(|e| matches!(e, MotionEvent::RestoreDownCollision))
        {
            self.deferred.schedule(
                self.config.drop_through_recollide_ms,
                MotionEvent::RestoreDownCollision,
            );
        }
    }

    fn dash_gate_open(&self) -> bool {
        !(self.config.lock_dash_while_overcapped && self.overcap.is_overcapped())
    }

    fn apply_dash<B, I>(
        &mut self,
        body: &mut B,
        input: &I,
        aim: Option<&AimVector>,
        report: &mut MotionReport,
    ) where
        B: Body + ?Sized,
        I: ControlInput + ?Sized,
    {
        if !input.just_pressed(Action::Dash) || !self.dash_gate_open() {
            return;
        }
        if !self.dashes.try_consume() {
            return;
        }

        // A cursor on the aim origin has no direction; fall back to facing.
        let direction = aim
            .filter(|aim| (aim.cursor() - aim.origin()).length_squared() > 0.0)
            .map(AimVector::direction)
            .unwrap_or(Vec2::new(self.last_direction.sign(), 0.0));
        let speed = self.config.dash_velocity;
        body.set_velocity(direction * speed);
        self.overcap.overcap(speed);

        // A new dash overrides any tilt still holding or easing back.
        self.deferred
            .cancel_where(|e| matches!(e, MotionEvent::BeginTiltReset { .. }));
        self.tilt.snap_to(lean_toward(direction));
        let settle_ms = self.overcap.ticks_to_settle().unwrap_or(0) as f32 * self.config.tick_ms;
        self.deferred.schedule(
            self.config.dash_tilt_hold_ms,
            MotionEvent::BeginTiltReset {
                duration_ms: settle_ms,
            },
        );

        report.dashed = true;
        debug!(
            "dash toward ({:.2}, {:.2}); {:?} charges left",
            direction.x,
            direction.y,
            self.dashes.available()
        );
    }
}
