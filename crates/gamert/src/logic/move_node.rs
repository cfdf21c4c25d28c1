//! Gamepad-driven 2D movement

use serde::{Deserialize, Serialize};

use crate::foundation::math::Vec2;
use crate::scene::{NodeCapabilities, NodeId, SceneGraph2d};

use super::logic_node::{LogicError, LogicNode, LogicResult, NodeBinding, TickParams};

/// Parameters of [`Node2dMove`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MoveConfig {
    /// Controller index to read
    pub controller: usize,

    /// Units per second at full stick deflection
    pub speed: f32,
}

impl Default for MoveConfig {
    fn default() -> Self {
        Self {
            controller: 0,
            speed: 0.5,
        }
    }
}

/// Moves the bound node by the left thumbstick of one controller
#[derive(Debug, Clone, Default)]
pub struct Node2dMove {
    binding: NodeBinding,
    config: MoveConfig,
}

impl Node2dMove {
    /// Registered behavior name
    pub const NAME: &'static str = "Node2d-Move";

    /// Create an unbound behavior with default parameters
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an unbound behavior with `config`
    pub fn with_config(config: MoveConfig) -> Self {
        Self {
            binding: NodeBinding::default(),
            config,
        }
    }

    /// Current parameters
    pub fn config(&self) -> &MoveConfig {
        &self.config
    }

    /// Select the controller to read
    pub fn set_controller(&mut self, controller: usize) {
        self.config.controller = controller;
    }
}

impl LogicNode for Node2dMove {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn required_capabilities(&self) -> NodeCapabilities {
        NodeCapabilities::TRANSFORM_2D
    }

    fn configure(&mut self, config: &toml::Value) -> LogicResult<()> {
        self.config = config
            .clone()
            .try_into()
            .map_err(|e: toml::de::Error| LogicError::InvalidConfig {
                behavior: Self::NAME,
                reason: e.to_string(),
            })?;
        Ok(())
    }

    fn bind(&mut self, graph: &SceneGraph2d, node: NodeId) -> LogicResult<()> {
        self.binding
            .bind(Self::NAME, self.required_capabilities(), graph, node)
    }

    fn bound_node(&self) -> Option<NodeId> {
        self.binding.target()
    }

    fn on_tick(&mut self, params: &TickParams<'_>, graph: &mut SceneGraph2d) {
        let Some(id) = self.binding.live_target(graph) else {
            return;
        };

        let pad = params.input.gamepad(self.config.controller);
        let displacement = Vec2::new(pad.thumb_lx, pad.thumb_ly) * (params.elapsed * self.config.speed);

        let position = match graph.node(id) {
            Ok(node) => node.local().position + displacement,
            Err(_) => return,
        };
        if let Err(e) = graph.set_position(id, position) {
            log::warn!("{} failed to move {id:?}: {e}", Self::NAME);
        }
    }
}
