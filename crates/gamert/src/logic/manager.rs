//! Logic manager

use crate::scene::{NodeId, SceneGraph2d};

use super::logic_node::{LogicNode, LogicResult, TickParams};
use super::registry::LogicRegistry;

/// Owns spawned behaviors and ticks them in spawn order
#[derive(Default)]
pub struct LogicManager {
    nodes: Vec<Box<dyn LogicNode>>,
}

impl LogicManager {
    /// Create an empty manager
    pub fn new() -> Self {
        Self::default()
    }

    /// Create behavior `name`, configure it, bind it to `node` and keep it
    ///
    /// Nothing is kept if any step fails. Returns the behavior's index.
    pub fn spawn(
        &mut self,
        registry: &LogicRegistry,
        name: &str,
        graph: &SceneGraph2d,
        node: NodeId,
        config: Option<&toml::Value>,
    ) -> LogicResult<usize> {
        let mut behavior = registry.create(name)?;
        if let Some(config) = config {
            behavior.configure(config)?;
        }
        behavior.bind(graph, node)?;
        log::debug!("Spawned '{name}' on {node:?}");
        Ok(self.add(behavior))
    }

    /// Keep an already bound behavior; returns its index
    pub fn add(&mut self, behavior: Box<dyn LogicNode>) -> usize {
        self.nodes.push(behavior);
        self.nodes.len() - 1
    }

    /// Tick every behavior once
    pub fn tick(&mut self, params: &TickParams<'_>, graph: &mut SceneGraph2d) {
        log::trace!("Ticking {} behaviors, elapsed {}", self.nodes.len(), params.elapsed);
        for behavior in &mut self.nodes {
            behavior.on_tick(params, graph);
        }
    }

    /// Behavior at `index`
    pub fn get(&self, index: usize) -> Option<&dyn LogicNode> {
        self.nodes.get(index).map(|node| node.as_ref())
    }

    /// Number of behaviors
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether no behaviors are held
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Drop every behavior
    pub fn clear(&mut self) {
        self.nodes.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec2;
    use crate::input::{GamepadAxes, InputSnapshot};
    use crate::logic::{LogicError, Node2dMove};
    use crate::scene::{Group, Spatial2d};
    use approx::assert_relative_eq;

    #[test]
    fn test_spawn_and_tick() {
        let registry = LogicRegistry::with_builtins();
        let mut graph = SceneGraph2d::new();
        let a = graph.create_node("a", Spatial2d);
        let b = graph.create_node("b", Spatial2d);
        let fast: toml::Value = toml::from_str("speed = 1.0").unwrap();
        let mut manager = LogicManager::new();

        manager.spawn(&registry, Node2dMove::NAME, &graph, a, None).unwrap();
        manager.spawn(&registry, Node2dMove::NAME, &graph, b, Some(&fast)).unwrap();

        let mut input = InputSnapshot::new();
        input.set_gamepad(0, GamepadAxes::new(0.0, 1.0));
        manager.tick(&TickParams { elapsed: 1.0, input: &input }, &mut graph);

        assert_relative_eq!(graph.node(a).unwrap().local().position.y, 0.5, epsilon = 1e-6);
        assert_relative_eq!(graph.node(b).unwrap().local().position.y, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_failed_spawn_keeps_nothing() {
        let registry = LogicRegistry::with_builtins();
        let mut graph = SceneGraph2d::new();
        let group = graph.create_node("group", Group);
        let mut manager = LogicManager::new();

        let result = manager.spawn(&registry, Node2dMove::NAME, &graph, group, None);

        assert!(matches!(result, Err(LogicError::MissingCapability { .. })));
        assert!(manager.is_empty());
        assert!(manager.spawn(&registry, "Nope", &graph, group, None).is_err());
    }

    #[test]
    fn test_tick_survives_destroyed_node() {
        let registry = LogicRegistry::with_builtins();
        let mut graph = SceneGraph2d::new();
        let doomed = graph.create_node("doomed", Spatial2d);
        let kept = graph.create_node("kept", Spatial2d);
        let mut manager = LogicManager::new();
        manager.spawn(&registry, Node2dMove::NAME, &graph, doomed, None).unwrap();
        manager.spawn(&registry, Node2dMove::NAME, &graph, kept, None).unwrap();
        graph.destroy_node(doomed).unwrap();

        let mut input = InputSnapshot::new();
        input.set_gamepad(0, GamepadAxes::new(2.0, 0.0));
        manager.tick(&TickParams { elapsed: 1.0, input: &input }, &mut graph);

        assert_eq!(manager.len(), 2);
        assert_eq!(graph.node(kept).unwrap().local().position, Vec2::new(1.0, 0.0));
    }
}
