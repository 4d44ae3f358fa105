//! Gallery session
//!
//! The one object that owns every piece of mutable navigation state: the hall
//! and its obstacles, the door, the live camera controller and the guides.
//! Input callbacks only write to an [`IntentState`]; [`GallerySession::tick`]
//! drains it once per frame and runs, in order:
//!
//! 1. pending mode switch
//! 2. door animation
//! 3. the active controller (movement, collision, room clamp, door use)
//! 4. guides
//!
//! and returns everything the renderer and UI need in a [`FrameOutput`].

use glam::Vec3;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::agent::{Guide, Navigator};
use crate::camera::{ActiveController, CameraPose, NavMode};
use crate::config::{ConfigError, GalleryConfig};
use crate::input::{FrameIntent, IntentState, ModeRequest};
use crate::physics::ObstacleSet;
use crate::world::{Door, DoorState, GalleryLayout, RoomBounds};

/// Something collaborators may want to react to (audio, hints, UI).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionEvent {
    /// The door entered a new state
    DoorChanged(DoorState),
    /// The live controller was swapped
    ModeChanged { from: NavMode, to: NavMode },
    /// A guide got a new destination
    AgentRetargeted { agent: usize, target: Vec3 },
}

/// Where one guide stands this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentPose {
    pub position: Vec3,
    /// Yaw around +Y, 0 = facing +Z
    pub facing: f32,
}

/// Everything the renderer re-reads each frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameOutput {
    pub mode: NavMode,
    pub camera: CameraPose,
    pub door_state: DoorState,
    /// `(left, right)` leaf angles in radians
    pub door_leaves: (f32, f32),
    pub agents: Vec<AgentPose>,
    pub events: Vec<SessionEvent>,
}

pub struct GallerySession {
    config: GalleryConfig,
    layout: GalleryLayout,
    controller: ActiveController,
    navigator: Navigator,
    guides: Vec<Guide>,
    rng: StdRng,
    pending_events: Vec<SessionEvent>,
    frame: u64,
}

impl GallerySession {
    /// Validate `config` and build the default hall from it.
    pub fn new(config: GalleryConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let layout = GalleryLayout::build(&config.layout)?;
        Ok(Self::with_layout(config, layout))
    }

    /// Run against an externally built hall (room bounds, obstacles, door).
    ///
    /// Guides with no waypoints of their own take the layout's default
    /// routes in order.
    pub fn with_layout(config: GalleryConfig, layout: GalleryLayout) -> Self {
        let navigator = Navigator::new(config.navigator.clone());
        let routes = layout.guide_routes();
        let guides = config
            .guides
            .iter()
            .enumerate()
            .map(|(i, guide)| {
                if guide.waypoints.is_empty() && !routes.is_empty() {
                    let mut guide = guide.clone();
                    guide.waypoints = routes[i % routes.len()].clone();
                    Guide::new(&guide, navigator.config().speed)
                } else {
                    Guide::new(guide, navigator.config().speed)
                }
            })
            .collect();
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let controller = ActiveController::enter(config.start_mode.into(), &config.orbit, &config.fps);

        log::info!(
            "gallery session ready: {} obstacles, {} guides, {:?} mode",
            layout.obstacles.len(),
            config.guides.len(),
            controller.mode()
        );

        Self {
            config,
            layout,
            controller,
            navigator,
            guides,
            rng,
            pending_events: Vec::new(),
            frame: 0,
        }
    }

    pub fn config(&self) -> &GalleryConfig {
        &self.config
    }

    pub fn mode(&self) -> NavMode {
        self.controller.mode()
    }

    pub fn controller(&self) -> &ActiveController {
        &self.controller
    }

    pub fn camera(&self) -> CameraPose {
        self.controller.pose()
    }

    pub fn room(&self) -> &RoomBounds {
        &self.layout.room
    }

    pub fn obstacles(&self) -> &ObstacleSet {
        &self.layout.obstacles
    }

    pub fn door(&self) -> &Door {
        &self.layout.door
    }

    pub fn guides(&self) -> &[Guide] {
        &self.guides
    }

    /// Frames ticked so far.
    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    /// Swap the live controller. Switching to the active mode is a no-op
    /// and returns `false`.
    pub fn switch_mode(&mut self, mode: NavMode) -> bool {
        let from = self.controller.mode();
        if from == mode {
            return false;
        }
        let next = ActiveController::enter(mode, &self.config.orbit, &self.config.fps);
        std::mem::replace(&mut self.controller, next).exit();
        self.pending_events.push(SessionEvent::ModeChanged { from, to: mode });
        true
    }

    /// Send a guide somewhere. No-op if the index is unknown or the guide is
    /// already headed there.
    pub fn retarget_guide(&mut self, agent: usize, target: Vec3) -> bool {
        let Some(guide) = self.guides.get_mut(agent) else {
            return false;
        };
        let changed = guide.retarget(target);
        if changed {
            self.pending_events.push(SessionEvent::AgentRetargeted { agent, target });
        }
        changed
    }

    /// Open or close the door from a script, skipping the gaze check.
    pub fn force_toggle_door(&mut self) -> Option<DoorState> {
        let state = self.layout.door.force_toggle(&mut self.layout.obstacles)?;
        self.pending_events.push(SessionEvent::DoorChanged(state));
        Some(state)
    }

    /// Run one frame.
    pub fn tick(&mut self, intent: &mut IntentState, dt: f32) -> FrameOutput {
        let input = intent.take_frame();
        let mut events = std::mem::take(&mut self.pending_events);

        match input.mode_request {
            Some(ModeRequest::Set(mode)) => {
                self.switch_mode(mode);
            }
            Some(ModeRequest::Toggle) => {
                self.switch_mode(self.controller.mode().other());
            }
            None => {}
        }
        events.append(&mut self.pending_events);

        if let Some(state) = self.layout.door.update(dt) {
            events.push(SessionEvent::DoorChanged(state));
        }

        self.update_controller(&input, dt, &mut events);

        for (agent, guide) in self.guides.iter_mut().enumerate() {
            let retarget = guide.update(
                &self.navigator,
                dt,
                &self.layout.obstacles,
                &self.layout.room,
                &mut self.rng,
            );
            if let Some(target) = retarget {
                events.push(SessionEvent::AgentRetargeted { agent, target });
            }
        }

        self.frame += 1;
        for event in &events {
            log::debug!("frame {}: {event:?}", self.frame);
        }

        FrameOutput {
            mode: self.controller.mode(),
            camera: self.controller.pose(),
            door_state: self.layout.door.state(),
            door_leaves: self.layout.door.leaf_angles(),
            agents: self
                .guides
                .iter()
                .map(|g| AgentPose {
                    position: g.position(),
                    facing: g.facing(),
                })
                .collect(),
            events,
        }
    }

    fn update_controller(&mut self, input: &FrameIntent, dt: f32, events: &mut Vec<SessionEvent>) {
        let layout = &mut self.layout;
        let room = self.controller.room_for(&layout.room);
        match &mut self.controller {
            ActiveController::Exhibit(orbit) => {
                if input.drag_delta != glam::Vec2::ZERO {
                    orbit.rotate(input.drag_delta.x, input.drag_delta.y);
                }
                if input.scroll_lines != 0.0 {
                    orbit.zoom(input.scroll_lines);
                }
                if let Some(click) = input.click {
                    orbit.handle_click(click, &self.config.raycast, &layout.obstacles, &room);
                }
                orbit.update(dt, &layout.obstacles, &room);
            }
            ActiveController::Fps(fps) => {
                fps.apply_mouse_delta(input.look_delta.x, input.look_delta.y);
                fps.update(&input.movement, dt, &layout.obstacles, &room);
                if input.use_pressed {
                    let (eye, dir) = fps.view_ray();
                    if let Some(state) = layout.door.toggle(eye, dir, &mut layout.obstacles) {
                        events.push(SessionEvent::DoorChanged(state));
                    }
                }
            }
        }
    }
}
